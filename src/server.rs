//! HTTP surface: generation, catalog, diagnostics and history routes.

use crate::{
    catalog,
    config::{ProviderConfig, Settings},
    error::{InkError, Result},
    handler::GenerationService,
    history::HistoryManager,
    models::{HistoryEntry, HistoryFilter, HistoryUpdate, RawDesignRequest},
};
use actix_web::{
    error::InternalError,
    http::StatusCode,
    web, HttpResponse, ResponseError,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

pub struct AppState {
    pub service: GenerationService,
    pub history: HistoryManager,
    provider: ProviderConfig,
}

impl AppState {
    pub fn new(service: GenerationService, history: HistoryManager, settings: &Settings) -> Self {
        Self {
            service,
            history,
            provider: settings.provider.clone(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let service = GenerationService::new(settings)?;
        let history = HistoryManager::from_config(&settings.history);
        Ok(Self::new(service, history, settings))
    }
}

impl ResponseError for InkError {
    fn status_code(&self) -> StatusCode {
        match self {
            InkError::Validation { .. } => StatusCode::BAD_REQUEST,
            InkError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            InkError::NotFound(_) => StatusCode::NOT_FOUND,
            InkError::GenerationFailed { .. }
            | InkError::Provider { .. }
            | InkError::Configuration(_)
            | InkError::Storage(_)
            | InkError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self.details() {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed request bodies get the same `{error}` shape as other failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {}", err);
        let response = HttpResponse::BadRequest().json(json!({ "error": message }));
        InternalError::from_response(err, response).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource("/api/generate-tattoo")
                .route(web::post().to(generate_tattoo))
                .route(web::get().to(generation_status)),
        )
        .route("/api/test", web::get().to(diagnostics))
        .route("/api/catalog", web::get().to(get_catalog))
        .route("/api/history", web::get().to(list_history))
        .route("/api/history/favorites", web::get().to(list_favorites))
        .route("/api/history/{id}/favorite", web::post().to(toggle_favorite))
        .service(
            web::resource("/api/history/{id}")
                .route(web::patch().to(update_history))
                .route(web::delete().to(delete_history)),
        );
}

async fn generate_tattoo(
    state: web::Data<AppState>,
    body: web::Json<RawDesignRequest>,
) -> std::result::Result<HttpResponse, InkError> {
    let result = state.service.handle(body.into_inner()).await.map_err(|e| {
        log::error!("Tattoo generation failed: {}", e);
        e
    })?;

    if let Err(e) = state.history.save(result.clone()).await {
        log::warn!("Could not record generation {} in history: {}", result.id, e);
    }

    Ok(HttpResponse::Ok().json(result))
}

async fn generation_status() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Tattoo design generation API is up and running.",
        "status": "active",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn diagnostics(state: web::Data<AppState>) -> HttpResponse {
    let provider = &state.provider;
    HttpResponse::Ok().json(json!({
        "message": "API test succeeded!",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": {
            "hasApiKey": !provider.api_key.trim().is_empty(),
            "model": provider.model,
            "imageSize": provider.image_size,
            "imageQuality": provider.image_quality,
            "maxImagesPerRequest": state.service.images_per_request(),
        }
    }))
}

async fn get_catalog() -> HttpResponse {
    HttpResponse::Ok().json(catalog::catalog())
}

#[derive(Debug, Default, Deserialize)]
struct HistoryQuery {
    q: Option<String>,
    style: Option<String>,
    theme: Option<String>,
    #[serde(default)]
    favorites: bool,
}

async fn list_history(
    state: web::Data<AppState>,
    query: web::Query<HistoryQuery>,
) -> std::result::Result<HttpResponse, InkError> {
    let query = query.into_inner();
    let filter = HistoryFilter {
        style: query.style,
        theme: query.theme,
        favorites_only: query.favorites,
    };

    let entries: Vec<HistoryEntry> = state
        .history
        .search(query.q.as_deref().unwrap_or(""))
        .await?
        .into_iter()
        .filter(|entry| filter.accepts(entry))
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}

async fn list_favorites(
    state: web::Data<AppState>,
) -> std::result::Result<HttpResponse, InkError> {
    Ok(HttpResponse::Ok().json(state.history.favorites().await?))
}

async fn toggle_favorite(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> std::result::Result<HttpResponse, InkError> {
    Ok(HttpResponse::Ok().json(state.history.toggle_favorite(&id).await?))
}

async fn update_history(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<HistoryUpdate>,
) -> std::result::Result<HttpResponse, InkError> {
    let entry = state.history.update(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entry))
}

async fn delete_history(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> std::result::Result<HttpResponse, InkError> {
    state.history.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
