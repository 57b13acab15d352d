use serde::Serialize;

/// Respuesta del proveedor para un envío individual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatewayResponse {
    pub success: bool,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
}

impl GatewayResponse {
    pub fn delivered(provider_message_id: impl Into<String>) -> Self {
        GatewayResponse {
            success: true,
            provider_message_id: Some(provider_message_id.into()),
            error: None,
        }
    }

    /// Aceptado por el proveedor, pero sin identificador de mensaje
    pub fn accepted_without_id() -> Self {
        GatewayResponse {
            success: true,
            provider_message_id: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        GatewayResponse {
            success: false,
            provider_message_id: None,
            error: Some(error.into()),
        }
    }
}
