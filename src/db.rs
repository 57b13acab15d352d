//! db.rs
//! Conexión a SQLite, migraciones y helpers de fechas para las columnas TEXT.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

/// Abre (o crea) la base de datos. Sin DATABASE_URL se usa ./data/messaging.db
pub async fn setup_database(database_url: Option<&str>) -> Result<Pool<Sqlite>> {
    let db_url = match database_url {
        Some(url) => url.to_string(),
        None => {
            std::fs::create_dir_all("data").context("No se pudo crear directorio 'data'")?;
            let db_path = std::env::current_dir()
                .context("No se pudo obtener el current_dir")?
                .join("data")
                .join("messaging.db");
            format!("sqlite:{}", db_path.to_string_lossy())
        }
    };

    log::info!("Conectando a SQLite en {}", db_url);

    let options = SqliteConnectOptions::from_str(&db_url)
        .with_context(|| format!("DATABASE_URL inválida: {db_url}"))?
        .create_if_missing(true);

    let db_pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("No se pudo conectar a la base de datos SQLite.")?;

    Ok(db_pool)
}

/// Corre migraciones con sqlx (plantillas, lotes, historial)
pub async fn run_migrations(db_pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(db_pool)
        .await
        .context("Fallo en migraciones")?;
    Ok(())
}

/// Formato fijo (microsegundos, "Z") para que el orden de texto sea el cronológico.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .with_context(|| format!("Fecha inválida en DB: {raw}"))
}

pub fn parse_optional_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.as_deref().map(parse_timestamp).transpose()
}
