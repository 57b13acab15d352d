use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sent,
    Failed,
    Scheduled,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Failed => "failed",
            MessageStatus::Scheduled => "scheduled",
        }
    }

    /// Cuenta para el total de éxitos del lote
    pub fn is_success(&self) -> bool {
        !matches!(self, MessageStatus::Failed)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(MessageStatus::Sent),
            "failed" => Ok(MessageStatus::Failed),
            "scheduled" => Ok(MessageStatus::Scheduled),
            other => Err(anyhow!("Estado de mensaje desconocido: {other}")),
        }
    }
}

/// Registro de auditoría: uno por destinatario y lote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageHistory {
    pub id: String,
    pub batch_id: Option<String>,
    pub client_name: String,
    pub phone_number: String,
    pub message: String,
    pub status: MessageStatus,
    pub error: Option<String>,
    pub provider_message_id: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar un registro (id y created_at los pone el store)
#[derive(Debug, Clone)]
pub struct NewMessageHistory {
    pub batch_id: Option<String>,
    pub client_name: String,
    pub phone_number: String,
    pub message: String,
    pub status: MessageStatus,
    pub error: Option<String>,
    pub provider_message_id: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Para listar historial con paginación
#[derive(Debug, Clone, Serialize)]
pub struct ListHistoryResponse {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<MessageHistory>,
}
