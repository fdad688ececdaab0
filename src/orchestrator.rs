use crate::{
    error::{GenerationError, Result},
    generator::ImageGenerator,
    logger,
    models::{GeneratedImage, GenerationRequest},
    prompt::build_prompt,
    state::{InputState, RequestState},
};
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the request lifecycle and the single outstanding call to the model.
#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn ImageGenerator>,
    state: Arc<watch::Sender<RequestState>>,
}

/// Puts the state back to Idle if an in-flight request is dropped before it settles.
struct InFlight<'a> {
    state: &'a watch::Sender<RequestState>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, outcome: RequestState) {
        self.state.send_replace(outcome);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::warn!("Generation dropped while in flight, returning to idle");
            self.state.send_replace(RequestState::Idle);
        }
    }
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            generator,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Drops a previous failure so the next view starts clean. Results and in-flight requests are kept.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| match state {
            RequestState::Failed(_) => {
                *state = RequestState::Idle;
                true
            }
            _ => false,
        });
    }

    /// Records an error raised outside a generation, such as an unreadable upload.
    pub fn report_error(&self, error: &GenerationError) {
        log::error!("{}", error);
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = RequestState::Failed(error.user_message());
            true
        });
    }

    /// Runs one generation for a snapshot of the inputs.
    ///
    /// Without an image this returns [`GenerationError::ImageRequired`] and leaves the state alone.
    /// While another request is loading it returns [`GenerationError::Busy`] and changes nothing.
    /// Otherwise the state goes to Loading and ends as Succeeded or Failed.
    pub async fn generate(&self, inputs: &InputState) -> Result<GeneratedImage> {
        let image = inputs.image().cloned().ok_or_else(|| {
            log::warn!("Generation requested without an uploaded image");
            GenerationError::ImageRequired
        })?;

        let started = self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = RequestState::Loading;
            true
        });
        if !started {
            log::debug!("Generation already in flight, ignoring trigger");
            return Err(GenerationError::Busy);
        }
        let in_flight = InFlight {
            state: &self.state,
            settled: false,
        };

        let request = GenerationRequest::new(image, build_prompt(inputs.parameters()));
        let result = self.call(&request).await;

        match &result {
            Ok(image) => {
                log::info!(
                    "Generated {} image [req:{}]",
                    image.mime_type,
                    request.request_id
                );
                in_flight.settle(RequestState::Succeeded(image.clone()));
            }
            Err(e) => {
                log::error!("Generation failed [req:{}]: {}", request.request_id, e);
                in_flight.settle(RequestState::Failed(e.user_message()));
            }
        }

        result
    }

    async fn call(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let _timer = logger::timer(&format!("generate [req:{}]", request.request_id));
        log::debug!(
            "Sending prompt to {} [req:{}]: {}",
            self.generator.model(),
            request.request_id,
            request.prompt
        );

        let response = self.generator.generate(request).await?;
        match response.first_inline_image() {
            Some(image) => Ok(image),
            None => {
                if let Some(text) = response.text() {
                    log::warn!("Model answered without an image: {}", text);
                }
                Err(GenerationError::NoImageReturned)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GENERIC_MESSAGE, IMAGE_REQUIRED_MESSAGE, NO_IMAGE_MESSAGE};
    use crate::models::{GenerateContentResponse, Part, UploadedImage};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    enum Reply {
        Parts(Vec<Part>),
        Service(Option<&'static str>),
        Transport(&'static str),
    }

    struct ScriptedGenerator {
        reply: Reply,
        gate: Option<Arc<Notify>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                gate: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn gated(reply: Reply, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(reply)
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageGenerator for ScriptedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<GenerateContentResponse> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.reply {
                Reply::Parts(parts) => Ok(GenerateContentResponse::from_parts(parts.clone())),
                Reply::Service(message) => Err(GenerationError::ServiceError {
                    status: 500,
                    message: message.map(String::from),
                }),
                Reply::Transport(message) => Err(GenerationError::RequestError(message.to_string())),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn inputs_with_image() -> InputState {
        let mut inputs = InputState::new();
        inputs.set_image(UploadedImage::new("cGhvdG8=", "image/jpeg").unwrap());
        inputs
    }

    fn harness(generator: ScriptedGenerator) -> (Orchestrator, Arc<ScriptedGenerator>) {
        let generator = Arc::new(generator);
        (Orchestrator::new(generator.clone()), generator)
    }

    #[tokio::test]
    async fn no_image_never_enters_loading() {
        let (orchestrator, generator) = harness(ScriptedGenerator::new(Reply::Parts(vec![])));
        let states = orchestrator.subscribe();

        let err = orchestrator.generate(&InputState::new()).await.unwrap_err();

        assert!(matches!(err, GenerationError::ImageRequired));
        assert_eq!(err.user_message(), IMAGE_REQUIRED_MESSAGE);
        assert_eq!(orchestrator.state(), RequestState::Idle);
        assert!(!states.has_changed().unwrap());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn first_inline_image_becomes_the_result() {
        let (orchestrator, generator) = harness(ScriptedGenerator::new(Reply::Parts(vec![
            Part::text("Here is your character"),
            Part::inline("Zmlyc3Q=", "image/png"),
            Part::inline("c2Vjb25k", "image/png"),
        ])));

        let image = orchestrator.generate(&inputs_with_image()).await.unwrap();

        assert_eq!(image.data, "Zmlyc3Q=");
        assert_eq!(orchestrator.state(), RequestState::Succeeded(image));
        assert_eq!(
            generator.prompts.lock().unwrap()[0],
            build_prompt(inputs_with_image().parameters())
        );
    }

    #[tokio::test]
    async fn response_without_image_fails_with_advisory() {
        let (orchestrator, _) = harness(ScriptedGenerator::new(Reply::Parts(vec![
            Part::text("I cannot help with that"),
        ])));

        let err = orchestrator.generate(&inputs_with_image()).await.unwrap_err();

        assert!(matches!(err, GenerationError::NoImageReturned));
        assert_eq!(
            orchestrator.state(),
            RequestState::Failed(NO_IMAGE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn service_error_message_is_surfaced() {
        let (orchestrator, _) = harness(ScriptedGenerator::new(Reply::Service(Some(
            "API key not valid. Please pass a valid API key.",
        ))));

        orchestrator.generate(&inputs_with_image()).await.unwrap_err();

        assert_eq!(
            orchestrator.state().error(),
            Some("API key not valid. Please pass a valid API key.")
        );
    }

    #[tokio::test]
    async fn service_error_without_message_uses_generic_text() {
        let (orchestrator, _) = harness(ScriptedGenerator::new(Reply::Service(None)));

        orchestrator.generate(&inputs_with_image()).await.unwrap_err();

        assert_eq!(orchestrator.state().error(), Some(GENERIC_MESSAGE));
    }

    #[tokio::test]
    async fn transport_error_message_is_surfaced() {
        let (orchestrator, _) =
            harness(ScriptedGenerator::new(Reply::Transport("connection refused")));

        orchestrator.generate(&inputs_with_image()).await.unwrap_err();

        assert_eq!(orchestrator.state().error(), Some("connection refused"));
    }

    #[tokio::test]
    async fn second_trigger_while_loading_is_ignored() {
        let gate = Arc::new(Notify::new());
        let (orchestrator, generator) = harness(ScriptedGenerator::gated(
            Reply::Parts(vec![Part::inline("b25l", "image/png")]),
            gate.clone(),
        ));

        let first = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.generate(&inputs_with_image()).await })
        };
        let mut states = orchestrator.subscribe();
        states
            .wait_for(|state| state.is_loading())
            .await
            .unwrap();

        let second = orchestrator.generate(&inputs_with_image()).await;
        assert!(matches!(second, Err(GenerationError::Busy)));
        assert_eq!(orchestrator.state(), RequestState::Loading);
        assert_eq!(generator.calls(), 1);

        gate.notify_one();
        let image = first.await.unwrap().unwrap();
        assert_eq!(orchestrator.state(), RequestState::Succeeded(image));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn new_trigger_clears_previous_result() {
        let gate = Arc::new(Notify::new());
        let (orchestrator, _) = harness(ScriptedGenerator::gated(
            Reply::Parts(vec![Part::inline("b25l", "image/png")]),
            gate.clone(),
        ));

        gate.notify_one();
        orchestrator.generate(&inputs_with_image()).await.unwrap();
        assert!(orchestrator.state().image().is_some());

        let run = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.generate(&inputs_with_image()).await })
        };
        let mut states = orchestrator.subscribe();
        let loading = states
            .wait_for(|state| state.is_loading())
            .await
            .unwrap()
            .clone();
        assert!(loading.image().is_none());

        gate.notify_one();
        run.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn failure_then_retry_succeeds() {
        let (failing, _) = harness(ScriptedGenerator::new(Reply::Parts(vec![])));
        failing.generate(&inputs_with_image()).await.unwrap_err();
        assert!(failing.state().error().is_some());

        let (orchestrator, _) = harness(ScriptedGenerator::new(Reply::Parts(vec![
            Part::inline("b25l", "image/webp"),
        ])));
        orchestrator.report_error(&GenerationError::NoImageReturned);
        orchestrator.generate(&inputs_with_image()).await.unwrap();
        assert!(orchestrator.state().image().is_some());
    }

    #[tokio::test]
    async fn dropped_request_returns_to_idle() {
        let gate = Arc::new(Notify::new());
        let (orchestrator, _) =
            harness(ScriptedGenerator::gated(Reply::Parts(vec![]), gate));

        let run = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.generate(&inputs_with_image()).await })
        };
        let mut states = orchestrator.subscribe();
        states
            .wait_for(|state| state.is_loading())
            .await
            .unwrap();

        run.abort();
        let _ = run.await;
        assert_eq!(orchestrator.state(), RequestState::Idle);
    }

    #[test]
    fn clear_error_only_touches_failures() {
        let (orchestrator, _) = harness(ScriptedGenerator::new(Reply::Parts(vec![])));
        orchestrator.report_error(&GenerationError::NoImageReturned);
        orchestrator.clear_error();
        assert_eq!(orchestrator.state(), RequestState::Idle);
    }
}
