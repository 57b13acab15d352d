//! config/app_config.rs
//! Configuración global del servicio, leída desde el entorno (.env incluido).

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 5022;
const DEFAULT_TWILIO_API_BASE_URL: &str = "https://api.twilio.com";
/// Tiempo máximo por llamada al gateway
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_host: String,
    pub bind_port: u16,
    /// Si no viene, se usa ./data/messaging.db
    pub database_url: Option<String>,
    pub gateway: GatewayConfig,
}

/// Credenciales y parámetros del proveedor SMS (Twilio).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub api_base_url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Nombres de las variables de credenciales que faltan.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = vec![];
        if self.account_sid.is_none() {
            missing.push("TWILIO_ACCOUNT_SID");
        }
        if self.auth_token.is_none() {
            missing.push("TWILIO_AUTH_TOKEN");
        }
        if self.from_number.is_none() {
            missing.push("TWILIO_PHONE_NUMBER");
        }
        missing
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base_url: DEFAULT_TWILIO_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_GATEWAY_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_port = match non_empty_var("BIND_PORT") {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("BIND_PORT inválido: {p}"))?,
            None => DEFAULT_BIND_PORT,
        };

        let timeout_secs = match non_empty_var("GATEWAY_TIMEOUT_SECS") {
            Some(t) => t
                .parse::<u64>()
                .with_context(|| format!("GATEWAY_TIMEOUT_SECS inválido: {t}"))?,
            None => DEFAULT_GATEWAY_TIMEOUT_SECS,
        };

        Ok(AppConfig {
            bind_host: non_empty_var("BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.to_string()),
            bind_port,
            database_url: non_empty_var("DATABASE_URL"),
            gateway: GatewayConfig {
                account_sid: non_empty_var("TWILIO_ACCOUNT_SID"),
                auth_token: non_empty_var("TWILIO_AUTH_TOKEN"),
                from_number: non_empty_var("TWILIO_PHONE_NUMBER"),
                api_base_url: non_empty_var("TWILIO_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_TWILIO_API_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

// Una variable definida pero vacía cuenta como ausente (típico en .env.example)
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
