//! handlers/mod.rs
//! Handlers HTTP: sólo traducen JSON <-> servicios y errores -> status.

use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;

use crate::error::MessagingError;

pub mod message_handler;
pub mod template_handler;

/// Respuesta de error uniforme; los errores por fila van uno por uno.
pub fn error_response(e: &MessagingError) -> HttpResponse {
    let status = match e {
        MessagingError::TemplateNotFound(_) | MessagingError::BatchNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        MessagingError::TemplateAlreadyExists(_) => StatusCode::CONFLICT,
        MessagingError::Storage(_)
        | MessagingError::GatewaySendFailure(_)
        | MessagingError::UnexpectedDispatchError(_) => {
            log::error!("Internal error: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    };

    HttpResponse::build(status).json(json!({
        "success": false,
        "error": e.to_string(),
        "row_errors": e.row_errors(),
    }))
}
