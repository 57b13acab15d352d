//! services/dispatch_service.rs
//! Recorre el lote destinatario por destinatario: envía (o agenda), registra el
//! historial y reporta progreso. Un fallo individual nunca corta el lote.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::MessagingError,
    logger::mask_phone,
    models::{
        dispatch_model::{DispatchProgress, DispatchResult, RecipientOutcome},
        gateway_model::GatewayResponse,
        history_model::{MessageStatus, NewMessageHistory},
        recipient_model::ValidatedRecipient,
    },
    services::{
        batch_service::BatchService, gateway_service::MessageGateway,
        history_service::HistoryService, template_service::personalize,
    },
};

/// Recibe el avance después de cada destinatario.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn report(&self, progress: DispatchProgress);
}

/// Vuelca el progreso en la fila del lote, para consultarlo por la API.
pub struct BatchProgress {
    batch_service: BatchService,
    batch_id: String,
}

impl BatchProgress {
    pub fn new(batch_service: BatchService, batch_id: String) -> Self {
        Self {
            batch_service,
            batch_id,
        }
    }
}

#[async_trait]
impl ProgressReporter for BatchProgress {
    async fn report(&self, progress: DispatchProgress) {
        log::info!(
            "(report) Lote {}: {}/{} procesados ({:.0}%)",
            self.batch_id,
            progress.processed,
            progress.total,
            progress.fraction() * 100.0
        );
        if let Err(e) = self
            .batch_service
            .update_progress(
                &self.batch_id,
                progress.processed as u64,
                progress.success_count as u64,
            )
            .await
        {
            // El progreso es informativo: no se corta el lote por esto
            log::error!(
                "(report) No se pudo guardar progreso del lote {}: {:?}",
                self.batch_id,
                e
            );
        }
    }
}

#[derive(Clone)]
pub struct DispatchEngine {
    gateway: Arc<dyn MessageGateway>,
    history_service: HistoryService,
}

/// Estado terminal de un destinatario antes de registrarlo
struct Delivery {
    status: MessageStatus,
    error: Option<String>,
    provider_message_id: Option<String>,
    sent_at: Option<DateTime<Utc>>,
}

impl DispatchEngine {
    pub fn new(gateway: Arc<dyn MessageGateway>, history_service: HistoryService) -> Self {
        Self {
            gateway,
            history_service,
        }
    }

    /// Despacha el lote en orden. `scheduled_for` marca todo como "scheduled"
    /// sin tocar el gateway.
    pub async fn dispatch(
        &self,
        batch_id: Option<&str>,
        recipients: &[ValidatedRecipient],
        body: &str,
        scheduled_for: Option<DateTime<Utc>>,
        progress: &dyn ProgressReporter,
    ) -> DispatchResult {
        let total = recipients.len();
        let mut result = DispatchResult {
            total,
            success_count: 0,
            outcomes: Vec::with_capacity(total),
        };

        log::info!(
            "(dispatch) Iniciando lote {:?}: {} destinatarios, gateway={}, agendado={:?}",
            batch_id,
            total,
            self.gateway.provider_name(),
            scheduled_for
        );

        for (i, recipient) in recipients.iter().enumerate() {
            let message = personalize(body, &recipient.client_name);

            let delivery = match scheduled_for {
                Some(_) => Delivery {
                    status: MessageStatus::Scheduled,
                    error: None,
                    provider_message_id: None,
                    sent_at: None,
                },
                None => self.deliver(recipient, &message).await,
            };

            let mut outcome = RecipientOutcome {
                index: recipient.index,
                client_name: recipient.client_name.clone(),
                phone_number: recipient.phone.to_string(),
                status: delivery.status,
                error: delivery.error.clone(),
            };

            let record = NewMessageHistory {
                batch_id: batch_id.map(str::to_string),
                client_name: recipient.client_name.clone(),
                phone_number: recipient.phone.to_string(),
                message,
                status: delivery.status,
                error: delivery.error,
                provider_message_id: delivery.provider_message_id,
                scheduled_for,
                sent_at: delivery.sent_at,
            };

            if let Err(e) = self.history_service.append(record).await {
                let err = MessagingError::UnexpectedDispatchError(format!(
                    "history write failed after status '{}': {:#}",
                    outcome.status, e
                ));
                log::error!(
                    "(dispatch) Error registrando historial para {}: {}",
                    recipient.client_name,
                    err
                );
                outcome.status = MessageStatus::Failed;
                outcome.error = Some(err.to_string());
            }

            if outcome.status.is_success() {
                result.success_count += 1;
            }
            result.outcomes.push(outcome);

            progress
                .report(DispatchProgress {
                    processed: i + 1,
                    total,
                    success_count: result.success_count,
                })
                .await;
        }

        log::info!(
            "(dispatch) Lote {:?} finalizado: {} de {} con éxito",
            batch_id,
            result.success_count,
            total
        );
        result
    }

    async fn deliver(&self, recipient: &ValidatedRecipient, message: &str) -> Delivery {
        match self.send_one(recipient, message).await {
            Ok(resp) => {
                log::info!(
                    "(deliver) Mensaje enviado a {} ({})",
                    recipient.client_name,
                    mask_phone(recipient.phone.as_str())
                );
                Delivery {
                    status: MessageStatus::Sent,
                    error: None,
                    provider_message_id: resp.provider_message_id,
                    sent_at: Some(Utc::now()),
                }
            }
            Err(e) => {
                log::error!(
                    "(deliver) Fallo al enviar a {} ({}): {}",
                    recipient.client_name,
                    mask_phone(recipient.phone.as_str()),
                    e
                );
                let detail = match e {
                    MessagingError::GatewaySendFailure(detail) => detail,
                    other => other.to_string(),
                };
                Delivery {
                    status: MessageStatus::Failed,
                    error: Some(detail),
                    provider_message_id: None,
                    sent_at: None,
                }
            }
        }
    }

    async fn send_one(
        &self,
        recipient: &ValidatedRecipient,
        message: &str,
    ) -> Result<GatewayResponse, MessagingError> {
        let resp = self
            .gateway
            .send(&recipient.phone, message)
            .await
            .map_err(|e| MessagingError::UnexpectedDispatchError(format!("{e:#}")))?;

        if resp.success {
            return Ok(resp);
        }

        let detail = resp
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "gateway reported a failure without details".to_string());
        Err(MessagingError::GatewaySendFailure(detail))
    }
}
