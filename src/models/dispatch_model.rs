use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    history_model::MessageStatus,
    recipient_model::{RecipientTable, RowError, ValidatedRecipient},
    template_model::MessageSelection,
};

/// Request de envío masivo
#[derive(Debug, Clone, Deserialize)]
pub struct SendBatchRequest {
    pub recipients: RecipientTable,
    pub message: MessageSelection,
    /// Si viene, los mensajes quedan "scheduled" y no se envían
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Indica si el envío corre en segundo plano
    #[serde(default)]
    pub async_send: bool,
}

/// Lote ya validado y con el cuerpo resuelto, listo para despachar.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    pub message_source: String,
    pub body: String,
    pub recipients: Vec<ValidatedRecipient>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// Resultado por destinatario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientOutcome {
    pub index: usize,
    pub client_name: String,
    pub phone_number: String,
    pub status: MessageStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchResult {
    pub total: usize,
    pub success_count: usize,
    pub outcomes: Vec<RecipientOutcome>,
}

impl DispatchResult {
    pub fn failures(&self) -> impl Iterator<Item = &RecipientOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == MessageStatus::Failed)
    }
}

/// Progreso emitido tras cada destinatario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchProgress {
    pub processed: usize,
    pub total: usize,
    pub success_count: usize,
}

impl DispatchProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Respuesta genérica de envío
#[derive(Debug, Clone, Serialize)]
pub struct SendBatchResponse {
    pub success: bool,
    pub batch_id: String,
    pub message: String,
    pub result: Option<DispatchResult>,
}

/// Respuesta de validación previa (sin enviar)
#[derive(Debug, Clone, Serialize)]
pub struct ValidateBatchResponse {
    pub sendable: bool,
    pub valid: Vec<ValidatedRecipient>,
    pub errors: Vec<RowError>,
    pub preview: Option<String>,
}
