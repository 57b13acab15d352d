//! tests/mod.rs
//! Helpers compartidos: SQLite en memoria, gateway falso y colector de progreso.

mod handler_tests;
mod history_tests;
mod phone_tests;

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::db;
use crate::models::dispatch_model::DispatchProgress;
use crate::models::gateway_model::GatewayResponse;
use crate::models::recipient_model::{
    CanonicalPhone, RecipientTable, CLIENT_NAME_COLUMN, PHONE_NUMBER_COLUMN,
};
use crate::services::dispatch_service::ProgressReporter;
use crate::services::gateway_service::MessageGateway;

/// Pool en memoria con una sola conexión (si se cierra, se pierde la DB).
pub async fn test_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("No se pudo abrir SQLite en memoria");
    db::run_migrations(&pool)
        .await
        .expect("Fallo en migraciones de test");
    pool
}

/// Tabla con las columnas estándar
pub fn table(rows: Vec<(Value, Value)>) -> RecipientTable {
    RecipientTable {
        columns: vec![CLIENT_NAME_COLUMN.to_string(), PHONE_NUMBER_COLUMN.to_string()],
        rows: rows.into_iter().map(|(n, p)| vec![n, p]).collect(),
    }
}

pub fn five_clients() -> RecipientTable {
    table(vec![
        (json!("Ana"), json!("0411111111")),
        (json!("Ben"), json!("0422222222")),
        (json!("Cleo"), json!("0433333333")),
        (json!("Dev"), json!("0444444444")),
        (json!("Eli"), json!("0455555555")),
    ])
}

/// Gateway con respuestas programadas por número de destino.
#[derive(Default)]
pub struct FakeGateway {
    rejects: Vec<String>,
    breaks: Vec<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// El proveedor responde con fallo para este número
    pub fn rejecting(mut self, phone: &str) -> Self {
        self.rejects.push(phone.to_string());
        self
    }

    /// La llamada misma falla (red, etc.) para este número
    pub fn breaking(mut self, phone: &str) -> Self {
        self.breaks.push(phone.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageGateway for FakeGateway {
    async fn send(&self, to: &CanonicalPhone, body: &str) -> Result<GatewayResponse> {
        let calls = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((to.to_string(), body.to_string()));
            calls.len()
        };

        if self.breaks.iter().any(|p| p == to.as_str()) {
            return Err(anyhow!("connection reset by peer"));
        }
        if self.rejects.iter().any(|p| p == to.as_str()) {
            return Ok(GatewayResponse::failed(format!(
                "Failed to send message: The number {to} is unverified"
            )));
        }
        Ok(GatewayResponse::delivered(format!("SM{calls:04}")))
    }

    fn provider_name(&self) -> &str {
        "fake"
    }
}

pub fn shared(gateway: FakeGateway) -> Arc<FakeGateway> {
    Arc::new(gateway)
}

/// Para cuando nadie escucha el progreso
pub struct NoProgress;

#[async_trait]
impl ProgressReporter for NoProgress {
    async fn report(&self, _progress: DispatchProgress) {}
}

/// Guarda cada reporte de progreso
#[derive(Default)]
pub struct RecordingProgress {
    reports: Mutex<Vec<DispatchProgress>>,
}

impl RecordingProgress {
    pub fn reports(&self) -> Vec<DispatchProgress> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressReporter for RecordingProgress {
    async fn report(&self, progress: DispatchProgress) {
        self.reports.lock().unwrap().push(progress);
    }
}
