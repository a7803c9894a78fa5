//! Request handlers for the API endpoints.

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;

use crate::AppState;

/// Health check response payload.
#[derive(serde::Serialize)]
struct ApiHealth {
    healthy: bool,
    version: &'static str,
}

/// `GET /api/health`
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Chat request payload.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's question.
    pub message: String,
}

/// `POST /api/chat`
///
/// Runs the full assistant pipeline over the posted message.
pub async fn chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> impl Responder {
    let message = body.message.trim();
    if message.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No message provided."
        }));
    }

    match state.assistant.answer(message).await {
        Ok(response) => HttpResponse::Ok().json(serde_json::json!({
            "response": response
        })),
        Err(e) => {
            log::error!("Chat request failed: {e:?}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to process chat request"
            }))
        }
    }
}

/// `GET /api/disasters`
pub async fn disasters(state: web::Data<AppState>) -> impl Responder {
    match state.disaster_store.all() {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => {
            log::error!("Failed to list disasters: {e:?}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to load disaster records"
            }))
        }
    }
}

/// `GET /api/shelters`
pub async fn shelters(state: web::Data<AppState>) -> impl Responder {
    match state.shelter_store.all() {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => {
            log::error!("Failed to list shelters: {e:?}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to load shelter records"
            }))
        }
    }
}
