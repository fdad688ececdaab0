//! HTTP front-end over a single [`Studio`] session.

use crate::{
    error::GenerationError,
    models::{OptionCatalog, UploadedImage},
    state::{GenerationParameters, OutfitMode, RequestState},
    studio::Studio,
};
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::json;

impl ResponseError for GenerationError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenerationError::ImageRequired
            | GenerationError::FileRead(_)
            | GenerationError::UnsupportedImage(_)
            | GenerationError::InvalidDataUri(_) => StatusCode::BAD_REQUEST,
            GenerationError::Busy => StatusCode::CONFLICT,
            GenerationError::NoImageReturned
            | GenerationError::ServiceError { .. }
            | GenerationError::RequestError(_)
            | GenerationError::SerializationError(_) => StatusCode::BAD_GATEWAY,
            GenerationError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.user_message() }))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub parameters: GenerationParameters,
    pub image_preview: Option<String>,
    pub can_generate: bool,
    pub request: RequestState,
    pub generated_image: Option<String>,
}

impl SessionView {
    fn of(studio: &Studio) -> Self {
        let inputs = studio.inputs();
        let request = studio.request_state();
        Self {
            parameters: inputs.parameters().clone(),
            image_preview: inputs.image().map(UploadedImage::data_uri),
            can_generate: studio.can_generate(),
            generated_image: request.image().map(|image| image.data_uri()),
            request,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImageUpload {
    DataUri {
        #[serde(rename = "dataUri")]
        data_uri: String,
    },
    Inline {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterUpdate {
    pub environment: Option<String>,
    pub style: Option<String>,
    pub outfit_mode: Option<OutfitMode>,
    pub outfit_value: Option<String>,
    pub pose: Option<String>,
}

async fn options() -> HttpResponse {
    HttpResponse::Ok().json(OptionCatalog::load())
}

async fn session(studio: web::Data<Studio>) -> HttpResponse {
    HttpResponse::Ok().json(SessionView::of(&studio))
}

async fn upload_image(
    studio: web::Data<Studio>,
    body: web::Json<ImageUpload>,
) -> Result<HttpResponse, GenerationError> {
    let image = match body.into_inner() {
        ImageUpload::DataUri { data_uri } => UploadedImage::from_data_uri(&data_uri),
        ImageUpload::Inline { data, mime_type } => UploadedImage::new(data, mime_type),
    };

    studio.upload(image).map_err(|e| {
        log::warn!("Rejected upload: {}", e);
        e
    })?;
    Ok(HttpResponse::Ok().json(SessionView::of(&studio)))
}

async fn update_parameters(
    studio: web::Data<Studio>,
    body: web::Json<ParameterUpdate>,
) -> HttpResponse {
    let update = body.into_inner();
    if let Some(environment) = update.environment {
        if !crate::models::is_known_environment(&environment) {
            log::warn!("Environment outside the catalog: {}", environment);
        }
        studio.set_environment(environment);
    }
    if let Some(style) = update.style {
        studio.set_style(style);
    }
    if let Some(mode) = update.outfit_mode {
        studio.set_outfit_mode(mode);
    }
    if let Some(value) = update.outfit_value {
        studio.set_outfit_value(value);
    }
    if let Some(pose) = update.pose {
        studio.set_pose(pose);
    }

    HttpResponse::Ok().json(SessionView::of(&studio))
}

async fn generate(studio: web::Data<Studio>) -> Result<HttpResponse, GenerationError> {
    studio.generate().await?;
    Ok(HttpResponse::Ok().json(SessionView::of(&studio)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/options", web::get().to(options))
            .route("/state", web::get().to(session))
            .route("/image", web::post().to(upload_image))
            .route("/parameters", web::put().to(update_parameters))
            .route("/generate", web::post().to(generate)),
    );
}

pub async fn run(studio: Studio, port: u16) -> std::io::Result<()> {
    let studio = web::Data::new(studio);
    log::info!("🌐 Serving on http://127.0.0.1:{}", port);

    HttpServer::new(move || App::new().app_data(studio.clone()).configure(configure))
        .bind(("127.0.0.1", port))?
        .run()
        .await
}
