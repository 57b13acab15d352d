use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::history_model::MessageHistory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBatchRecord {
    pub id: String,
    pub status: String, // "pending", "running", "done", "failed"
    pub message_source: String,
    pub total: u64,
    pub processed: u64,
    pub success_count: u64,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub is_async: bool,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MessageBatchRecord {
    /// Fracción procesada (0.0 - 1.0)
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Request para crear un lote
#[derive(Debug, Clone)]
pub struct CreateBatchRequest {
    pub message_source: String,
    pub total: u64,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub is_async: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchStatusResponse {
    #[serde(flatten)]
    pub batch: MessageBatchRecord,
    pub progress: f64,
}

impl From<MessageBatchRecord> for BatchStatusResponse {
    fn from(batch: MessageBatchRecord) -> Self {
        let progress = batch.progress();
        BatchStatusResponse { batch, progress }
    }
}

/// Para listar lotes con paginación
#[derive(Debug, Clone, Serialize)]
pub struct ListBatchesResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<BatchStatusResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchHistoryResponse {
    pub batch_id: String,
    pub items: Vec<MessageHistory>,
}
