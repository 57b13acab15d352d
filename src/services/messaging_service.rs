//! services/messaging_service.rs
//! Orquesta un envío masivo: valida, resuelve el mensaje, registra el lote y
//! despacha (en línea o en segundo plano).

use anyhow::Result;
use chrono::Utc;

use crate::{
    error::{MessagingError, MessagingResult},
    models::{
        batch_model::CreateBatchRequest,
        dispatch_model::{
            DispatchResult, PreparedBatch, SendBatchRequest, SendBatchResponse,
            ValidateBatchResponse,
        },
    },
    services::{
        batch_service::BatchService,
        dispatch_service::{BatchProgress, DispatchEngine},
        recipient_validator,
        template_service::{preview, TemplateService},
    },
};

#[derive(Clone)]
pub struct MessagingService {
    template_service: TemplateService,
    batch_service: BatchService,
    dispatch_engine: DispatchEngine,
}

impl MessagingService {
    pub fn new(
        template_service: TemplateService,
        batch_service: BatchService,
        dispatch_engine: DispatchEngine,
    ) -> Self {
        Self {
            template_service,
            batch_service,
            dispatch_engine,
        }
    }

    /// Todos los chequeos estructurales, sin efectos secundarios.
    pub async fn prepare_batch(&self, req: &SendBatchRequest) -> MessagingResult<PreparedBatch> {
        let body = self.template_service.resolve(&req.message).await?;

        let outcome = recipient_validator::validate(&req.recipients)?;
        if !outcome.errors.is_empty() {
            return Err(MessagingError::InvalidRows {
                errors: outcome.errors,
            });
        }

        if let Some(at) = req.scheduled_for {
            if at < Utc::now() {
                return Err(MessagingError::ScheduleInPast(at));
            }
        }

        Ok(PreparedBatch {
            message_source: req.message.source_label(),
            body,
            recipients: outcome.valid,
            scheduled_for: req.scheduled_for,
        })
    }

    /// Valida sin enviar: filas válidas, errores y vista previa del mensaje.
    pub async fn validate_batch(
        &self,
        req: &SendBatchRequest,
    ) -> MessagingResult<ValidateBatchResponse> {
        let body = self.template_service.resolve(&req.message).await?;
        let outcome = recipient_validator::validate(&req.recipients)?;

        Ok(ValidateBatchResponse {
            sendable: outcome.errors.is_empty(),
            valid: outcome.valid,
            errors: outcome.errors,
            preview: Some(preview(&body)),
        })
    }

    pub async fn send_batch(&self, req: SendBatchRequest) -> MessagingResult<SendBatchResponse> {
        let prepared = self.prepare_batch(&req).await?;
        let scheduled = prepared.scheduled_for;

        let batch_id = self
            .batch_service
            .create_batch(CreateBatchRequest {
                message_source: prepared.message_source.clone(),
                total: prepared.recipients.len() as u64,
                scheduled_for: scheduled,
                is_async: req.async_send,
            })
            .await?;

        log::info!(
            "(send_batch) Lote {} creado ({} destinatarios, async={})",
            batch_id,
            prepared.recipients.len(),
            req.async_send
        );

        if req.async_send {
            let service = self.clone();
            let id = batch_id.clone();
            tokio::spawn(async move {
                match service.process_batch(&id, prepared).await {
                    Ok(result) => log::info!(
                        "Lote async {} terminado: {}/{}",
                        id,
                        result.success_count,
                        result.total
                    ),
                    Err(e) => log::error!("Fallo en lote async {}: {:?}", id, e),
                }
            });

            return Ok(SendBatchResponse {
                success: true,
                batch_id,
                message: "Batch queued for async processing".to_string(),
                result: None,
            });
        }

        let result = self.process_batch(&batch_id, prepared).await?;
        let message = match scheduled {
            Some(at) => format!(
                "Successfully scheduled {} out of {} messages for {}",
                result.success_count, result.total, at
            ),
            None => format!(
                "Successfully sent {} out of {} messages",
                result.success_count, result.total
            ),
        };

        Ok(SendBatchResponse {
            success: result.success_count == result.total,
            batch_id,
            message,
            result: Some(result),
        })
    }

    /// Corre el despacho de un lote ya creado y deja su estado final
    /// ("done", o "failed" si falla la persistencia del propio lote).
    pub async fn process_batch(
        &self,
        batch_id: &str,
        prepared: PreparedBatch,
    ) -> Result<DispatchResult> {
        match self.run_batch(batch_id, prepared).await {
            Ok(result) => Ok(result),
            Err(e) => {
                if let Err(e2) = self
                    .batch_service
                    .mark_batch_failed(batch_id, &format!("{e:#}"))
                    .await
                {
                    log::error!(
                        "(process_batch) No se pudo marcar el lote {} como fallido: {:?}",
                        batch_id,
                        e2
                    );
                }
                Err(e)
            }
        }
    }

    async fn run_batch(&self, batch_id: &str, prepared: PreparedBatch) -> Result<DispatchResult> {
        self.batch_service.mark_running(batch_id).await?;

        let progress = BatchProgress::new(self.batch_service.clone(), batch_id.to_string());
        let result = self
            .dispatch_engine
            .dispatch(
                Some(batch_id),
                &prepared.recipients,
                &prepared.body,
                prepared.scheduled_for,
                &progress,
            )
            .await;

        self.batch_service.finish_batch(batch_id).await?;

        for failed in result.failures() {
            log::warn!(
                "(run_batch) Lote {}: fila {} ({}) falló: {}",
                batch_id,
                failed.index,
                failed.client_name,
                failed.error.as_deref().unwrap_or_default()
            );
        }

        Ok(result)
    }
}
