//! error.rs
//! Taxonomía de errores del flujo de mensajería.

use chrono::{DateTime, Utc};

use crate::models::recipient_model::RowError;

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// Teléfono imposible de convertir a texto (null, bool, lista...)
    #[error("invalid phone number format: {0}")]
    InvalidPhoneFormat(String),

    /// Fila sin nombre de cliente
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Faltan columnas requeridas en la tabla subida
    #[error("CSV must contain columns: {}", quote_columns(.missing))]
    MissingColumns { missing: Vec<String> },

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template already exists: {0}")]
    TemplateAlreadyExists(String),

    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// Ningún destinatario válido tras la validación
    #[error("no valid entries found in the batch")]
    EmptyBatch { row_errors: Vec<RowError> },

    /// Hay filas inválidas; el lote no se envía hasta corregirlas
    #[error("{} row(s) have invalid data, please fix them and try again", .errors.len())]
    InvalidRows { errors: Vec<RowError> },

    #[error("please enter a message or select a template")]
    EmptyMessage,

    #[error("scheduled time {0} is in the past")]
    ScheduleInPast(DateTime<Utc>),

    #[error("batch not found: {0}")]
    BatchNotFound(String),

    /// Fallo reportado por el gateway para un destinatario
    #[error("gateway send failure: {0}")]
    GatewaySendFailure(String),

    /// Cualquier otro error al procesar un destinatario
    #[error("unexpected dispatch error: {0}")]
    UnexpectedDispatchError(String),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl MessagingError {
    /// Errores de estructura del lote: se reportan antes de cualquier efecto.
    pub fn is_batch_structural(&self) -> bool {
        matches!(
            self,
            MessagingError::MissingColumns { .. }
                | MessagingError::TemplateNotFound(_)
                | MessagingError::EmptyBatch { .. }
                | MessagingError::InvalidRows { .. }
                | MessagingError::EmptyMessage
                | MessagingError::ScheduleInPast(_)
        )
    }

    /// Errores por fila, si los hay.
    pub fn row_errors(&self) -> &[RowError] {
        match self {
            MessagingError::EmptyBatch { row_errors } => row_errors,
            MessagingError::InvalidRows { errors } => errors,
            _ => &[],
        }
    }
}

fn quote_columns(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(" and ")
}

pub type MessagingResult<T> = std::result::Result<T, MessagingError>;
