//! services/gateway_service.rs
//! Envío de SMS por el proveedor externo (API REST de Twilio).

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::app_config::GatewayConfig, logger::mask_phone,
    models::gateway_model::GatewayResponse, models::recipient_model::CanonicalPhone,
};

/// Proveedor de mensajería.
///
/// `Ok` con `success = false` es un rechazo del proveedor (número inválido,
/// cuenta trial, etc.); `Err` es un fallo inesperado (red, respuesta ilegible).
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send(&self, to: &CanonicalPhone, body: &str) -> Result<GatewayResponse>;

    fn provider_name(&self) -> &str;
}

/// Arma el gateway según la config. Sin credenciales completas, cada envío falla
/// con un error descriptivo en lugar de tumbar el servicio.
pub fn build_gateway(config: &GatewayConfig) -> Result<Arc<dyn MessageGateway>> {
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        log::warn!(
            "(build_gateway) Faltan credenciales de Twilio: {}. Los envíos inmediatos fallarán.",
            missing.join(", ")
        );
        return Ok(Arc::new(UnconfiguredGateway));
    }
    Ok(Arc::new(TwilioGateway::new(config)?))
}

#[derive(Clone)]
pub struct TwilioGateway {
    http_client: Client,
    api_base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let (Some(account_sid), Some(auth_token), Some(from_number)) = (
            config.account_sid.clone(),
            config.auth_token.clone(),
            config.from_number.clone(),
        ) else {
            return Err(anyhow!("Credenciales de Twilio incompletas"));
        };

        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("No se pudo crear el cliente HTTP")?;

        Ok(Self {
            http_client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            account_sid,
            auth_token,
            from_number,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base_url, self.account_sid
        )
    }
}

#[async_trait]
impl MessageGateway for TwilioGateway {
    async fn send(&self, to: &CanonicalPhone, body: &str) -> Result<GatewayResponse> {
        log::info!(
            "(send) Enviando mensaje a {} desde {}",
            mask_phone(to.as_str()),
            mask_phone(&self.from_number)
        );

        let form = [
            ("To", to.as_str()),
            ("From", self.from_number.as_str()),
            ("Body", body),
        ];

        let resp = self
            .http_client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .context("Fallo al hacer POST a Twilio")?;

        let status = resp.status();
        let json_val = resp
            .json::<serde_json::Value>()
            .await
            .with_context(|| format!("Respuesta ilegible de Twilio (status={status})"))?;

        if !status.is_success() {
            let detail = json_val
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            log::error!("(send) Twilio rechazó el mensaje: {}", detail);
            return Ok(GatewayResponse::failed(format!(
                "Failed to send message: {detail}"
            )));
        }

        // Un 2xx significa que Twilio aceptó el mensaje, traiga o no el SID
        match json_val.get("sid").and_then(|v| v.as_str()) {
            Some(sid) => {
                log::info!("(send) Mensaje enviado con éxito. SID: {}", sid);
                Ok(GatewayResponse::delivered(sid))
            }
            None => {
                log::warn!(
                    "(send) Twilio aceptó el mensaje (status={}) sin 'sid': {}",
                    status,
                    json_val
                );
                Ok(GatewayResponse::accepted_without_id())
            }
        }
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}

/// Gateway usado cuando faltan credenciales.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredGateway;

#[async_trait]
impl MessageGateway for UnconfiguredGateway {
    async fn send(&self, to: &CanonicalPhone, _body: &str) -> Result<GatewayResponse> {
        log::error!(
            "(send) Gateway no inicializado, no se envía a {}",
            mask_phone(to.as_str())
        );
        Ok(GatewayResponse::failed(
            "Twilio client not initialized. Check credentials.",
        ))
    }

    fn provider_name(&self) -> &str {
        "unconfigured"
    }
}
