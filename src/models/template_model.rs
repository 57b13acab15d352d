use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marcador que se reemplaza por el nombre del cliente.
pub const CLIENT_NAME_PLACEHOLDER: &str = "{Client Name}";

/// Nombre que se usa en las vistas previas.
pub const PREVIEW_SAMPLE_NAME: &str = "John Doe";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: String,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear una plantilla
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub content: String,
}

/// Request para sobrescribir el contenido de una plantilla
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTemplateRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplatePreviewResponse {
    pub name: String,
    pub content: String,
    pub preview: String,
}

/// Origen del cuerpo del mensaje: plantilla guardada o texto libre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageSelection {
    Custom { text: String },
    Template { name: String },
}

impl MessageSelection {
    /// Descripción corta para el registro del lote ("custom" o "template:<nombre>")
    pub fn source_label(&self) -> String {
        match self {
            MessageSelection::Custom { .. } => "custom".to_string(),
            MessageSelection::Template { name } => format!("template:{name}"),
        }
    }
}
