//! handlers/message_handler.rs
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::{
    error::MessagingError,
    handlers::error_response,
    models::{
        batch_model::{BatchHistoryResponse, BatchStatusResponse},
        dispatch_model::SendBatchRequest,
        history_model::ListHistoryResponse,
    },
    services::{
        batch_service::BatchService, history_service::HistoryService,
        messaging_service::MessagingService,
    },
};

#[derive(Deserialize)]
pub struct PaginationQuery {
    page: Option<u64>,
    page_size: Option<u64>,
}

impl PaginationQuery {
    fn resolve(&self) -> (u64, u64) {
        (
            self.page.unwrap_or(1).max(1),
            self.page_size.unwrap_or(10).clamp(1, 500),
        )
    }
}

/// POST /api/messages/validate
pub async fn validate_batch_endpoint(
    messaging_service: web::Data<MessagingService>,
    body: web::Json<SendBatchRequest>,
) -> HttpResponse {
    match messaging_service.validate_batch(&body.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => error_response(&e),
    }
}

/// POST /api/messages/send
pub async fn send_batch_endpoint(
    messaging_service: web::Data<MessagingService>,
    body: web::Json<SendBatchRequest>,
) -> HttpResponse {
    match messaging_service.send_batch(body.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => {
            if e.is_batch_structural() {
                log::warn!("Batch rejected: {}", e);
            } else {
                log::error!("Batch send error: {}", e);
            }
            error_response(&e)
        }
    }
}

/// GET /api/messages/history
/// Sin `page` devuelve todo el historial (más reciente primero).
pub async fn list_history_endpoint(
    history_service: web::Data<HistoryService>,
    query: web::Query<PaginationQuery>,
) -> HttpResponse {
    if query.page.is_none() {
        return match history_service.list_all().await {
            Ok(items) => HttpResponse::Ok().json(ListHistoryResponse {
                total: items.len() as u64,
                page: 1,
                page_size: items.len() as u64,
                items,
            }),
            Err(e) => error_response(&MessagingError::Storage(e)),
        };
    }

    let (page, page_size) = query.resolve();
    match history_service.list_page(page, page_size).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&MessagingError::Storage(e)),
    }
}

/// GET /api/messages/batches
pub async fn list_batches_endpoint(
    batch_service: web::Data<BatchService>,
    query: web::Query<PaginationQuery>,
) -> HttpResponse {
    let (page, page_size) = query.resolve();

    match batch_service.list_batches(page, page_size).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&MessagingError::Storage(e)),
    }
}

/// GET /api/messages/batches/{id}
pub async fn get_batch_endpoint(
    batch_service: web::Data<BatchService>,
    path: web::Path<String>,
) -> HttpResponse {
    let batch_id = path.into_inner();

    match batch_service.get_batch(&batch_id).await {
        Ok(Some(batch)) => HttpResponse::Ok().json(BatchStatusResponse::from(batch)),
        Ok(None) => error_response(&MessagingError::BatchNotFound(batch_id)),
        Err(e) => error_response(&MessagingError::Storage(e)),
    }
}

/// GET /api/messages/batches/{id}/history
pub async fn batch_history_endpoint(
    batch_service: web::Data<BatchService>,
    history_service: web::Data<HistoryService>,
    path: web::Path<String>,
) -> HttpResponse {
    let batch_id = path.into_inner();

    match batch_service.get_batch(&batch_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(&MessagingError::BatchNotFound(batch_id)),
        Err(e) => return error_response(&MessagingError::Storage(e)),
    }

    match history_service.list_for_batch(&batch_id).await {
        Ok(items) => HttpResponse::Ok().json(BatchHistoryResponse { batch_id, items }),
        Err(e) => error_response(&MessagingError::Storage(e)),
    }
}
