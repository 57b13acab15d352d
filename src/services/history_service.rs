//! services/history_service.rs
//! Historial de mensajes: sólo inserción y lectura.

use anyhow::{Context, Result};
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use crate::{
    db::{format_timestamp, now_timestamp, parse_optional_timestamp, parse_timestamp},
    models::history_model::{ListHistoryResponse, MessageHistory, NewMessageHistory},
};

const HISTORY_COLUMNS: &str = r#"
    id, batch_id, client_name, phone_number, message, status, error,
    provider_message_id, scheduled_for, sent_at, created_at
"#;

#[derive(Clone, Debug)]
pub struct HistoryService {
    db_pool: Pool<Sqlite>,
}

impl HistoryService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        HistoryService { db_pool }
    }

    /// Inserta un registro (una sola escritura atómica) y devuelve su ID
    pub async fn append(&self, record: NewMessageHistory) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let created_at = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO message_history (
                id, batch_id, client_name, phone_number, message, status, error,
                provider_message_id, scheduled_for, sent_at, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&id)
        .bind(&record.batch_id)
        .bind(&record.client_name)
        .bind(&record.phone_number)
        .bind(&record.message)
        .bind(record.status.as_str())
        .bind(&record.error)
        .bind(&record.provider_message_id)
        .bind(record.scheduled_for.map(format_timestamp))
        .bind(record.sent_at.map(format_timestamp))
        .bind(created_at)
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar message_history")?;

        Ok(id)
    }

    /// Todo el historial, más reciente primero
    pub async fn list_all(&self) -> Result<Vec<MessageHistory>> {
        let sql = format!(
            "SELECT {HISTORY_COLUMNS} FROM message_history ORDER BY created_at DESC, rowid DESC"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.db_pool)
            .await
            .context("Fallo al listar message_history")?;

        rows.iter().map(history_from_row).collect()
    }

    /// Lista historial con paginación
    pub async fn list_page(&self, page: u64, page_size: u64) -> Result<ListHistoryResponse> {
        let page = page.max(1);
        // Páginas absurdas devuelven vacío, no desbordan
        let offset = (page - 1).saturating_mul(page_size);

        let total: i64 = sqlx::query("SELECT COUNT(*) AS cnt FROM message_history")
            .fetch_one(&self.db_pool)
            .await?
            .try_get("cnt")?;

        let sql = format!(
            r#"
            SELECT {HISTORY_COLUMNS}
            FROM message_history
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(i64::try_from(page_size).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.db_pool)
            .await
            .context("Fallo al paginar message_history")?;

        let items = rows.iter().map(history_from_row).collect::<Result<Vec<_>>>()?;

        Ok(ListHistoryResponse {
            total: total as u64,
            page,
            page_size,
            items,
        })
    }

    /// Registros de un lote, en el orden en que se procesaron
    pub async fn list_for_batch(&self, batch_id: &str) -> Result<Vec<MessageHistory>> {
        let sql = format!(
            "SELECT {HISTORY_COLUMNS} FROM message_history WHERE batch_id = ?1 ORDER BY rowid ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(batch_id)
            .fetch_all(&self.db_pool)
            .await
            .context("Fallo al listar historial del lote")?;

        rows.iter().map(history_from_row).collect()
    }
}

fn history_from_row(r: &SqliteRow) -> Result<MessageHistory> {
    let status: String = r.try_get("status")?;
    let created_at: String = r.try_get("created_at")?;
    Ok(MessageHistory {
        id: r.try_get("id")?,
        batch_id: r.try_get("batch_id")?,
        client_name: r.try_get("client_name")?,
        phone_number: r.try_get("phone_number")?,
        message: r.try_get("message")?,
        status: status.parse()?,
        error: r.try_get("error")?,
        provider_message_id: r.try_get("provider_message_id")?,
        scheduled_for: parse_optional_timestamp(r.try_get("scheduled_for")?)?,
        sent_at: parse_optional_timestamp(r.try_get("sent_at")?)?,
        created_at: parse_timestamp(&created_at)?,
    })
}
