use crate::{
    error::Result,
    generator::ImageGenerator,
    models::{GeneratedImage, UploadedImage},
    orchestrator::Orchestrator,
    state::{GenerationParameters, InputState, OutfitMode, RequestState},
};
use std::{path::Path, sync::Arc};
use tokio::sync::watch;

/// One user session: the entered parameters plus the generation lifecycle.
///
/// Every setter publishes the new inputs to subscribers so views can re-render.
pub struct Studio {
    inputs: watch::Sender<InputState>,
    orchestrator: Orchestrator,
}

impl Studio {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        let (inputs, _) = watch::channel(InputState::new());
        Self {
            inputs,
            orchestrator: Orchestrator::new(generator),
        }
    }

    pub fn inputs(&self) -> InputState {
        self.inputs.borrow().clone()
    }

    pub fn request_state(&self) -> RequestState {
        self.orchestrator.state()
    }

    pub fn subscribe_inputs(&self) -> watch::Receiver<InputState> {
        self.inputs.subscribe()
    }

    pub fn subscribe_requests(&self) -> watch::Receiver<RequestState> {
        self.orchestrator.subscribe()
    }

    /// Generation is offered only with an image and no request in flight.
    pub fn can_generate(&self) -> bool {
        self.inputs.borrow().image().is_some() && !self.orchestrator.is_loading()
    }

    pub fn set_image(&self, image: UploadedImage) {
        log::info!("Image selected ({})", image.mime_type());
        self.inputs.send_modify(|inputs| inputs.set_image(image));
        self.orchestrator.clear_error();
    }

    /// Takes the outcome of decoding an upload. A rejected upload is shown as the request error.
    pub fn upload(&self, image: Result<UploadedImage>) -> Result<()> {
        match image {
            Ok(image) => {
                self.set_image(image);
                Ok(())
            }
            Err(e) => {
                self.orchestrator.report_error(&e);
                Err(e)
            }
        }
    }

    /// Reads and encodes a file.
    pub async fn load_image(&self, path: impl AsRef<Path>) -> Result<()> {
        self.upload(UploadedImage::from_path(path.as_ref()).await)
    }

    pub fn set_parameters(&self, parameters: GenerationParameters) {
        self.inputs
            .send_modify(|inputs| inputs.set_parameters(parameters));
    }

    pub fn set_environment(&self, value: impl Into<String>) {
        let value = value.into();
        self.inputs.send_modify(|inputs| inputs.set_environment(value));
    }

    pub fn set_style(&self, value: impl Into<String>) {
        let value = value.into();
        self.inputs.send_modify(|inputs| inputs.set_style(value));
    }

    pub fn set_pose(&self, value: impl Into<String>) {
        let value = value.into();
        self.inputs.send_modify(|inputs| inputs.set_pose(value));
    }

    pub fn set_outfit_mode(&self, mode: OutfitMode) {
        self.inputs.send_modify(|inputs| inputs.set_outfit_mode(mode));
    }

    pub fn set_outfit_value(&self, value: impl Into<String>) {
        let value = value.into();
        self.inputs.send_modify(|inputs| inputs.set_outfit_value(value));
    }

    pub async fn generate(&self) -> Result<GeneratedImage> {
        let snapshot = self.inputs();
        self.orchestrator.generate(&snapshot).await
    }
}
