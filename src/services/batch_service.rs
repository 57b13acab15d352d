use anyhow::{Context, Result};
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use crate::{
    db::{format_timestamp, now_timestamp, parse_optional_timestamp, parse_timestamp},
    models::batch_model::{
        BatchStatusResponse, CreateBatchRequest, ListBatchesResponse, MessageBatchRecord,
    },
};

const BATCH_COLUMNS: &str = r#"
    id, status, message_source, total, processed, success_count,
    scheduled_for, is_async, error_message, created_at, updated_at
"#;

#[derive(Clone, Debug)]
pub struct BatchService {
    db_pool: Pool<Sqlite>,
}

impl BatchService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        BatchService { db_pool }
    }

    /// Crea el lote en DB con estado "pending" y devuelve su ID
    pub async fn create_batch(&self, req: CreateBatchRequest) -> Result<String> {
        let batch_id = Uuid::new_v4().to_string();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO message_batches (
                id, status, message_source, total, processed, success_count,
                scheduled_for, is_async, error_message, created_at, updated_at
            )
            VALUES (?1, 'pending', ?2, ?3, 0, 0, ?4, ?5, NULL, ?6, ?6)
            "#,
        )
        .bind(&batch_id)
        .bind(&req.message_source)
        .bind(req.total as i64)
        .bind(req.scheduled_for.map(format_timestamp))
        .bind(req.is_async as i32)
        .bind(&now)
        .execute(&self.db_pool)
        .await
        .context("Fallo al insertar message_batch")?;

        Ok(batch_id)
    }

    pub async fn mark_running(&self, batch_id: &str) -> Result<()> {
        self.update_status(batch_id, "running", None).await
    }

    /// Refleja el avance tras cada destinatario
    pub async fn update_progress(
        &self,
        batch_id: &str,
        processed: u64,
        success_count: u64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE message_batches
            SET processed = ?2,
                success_count = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(batch_id)
        .bind(processed as i64)
        .bind(success_count as i64)
        .bind(now_timestamp())
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar progreso del lote")?;

        Ok(())
    }

    pub async fn finish_batch(&self, batch_id: &str) -> Result<()> {
        self.update_status(batch_id, "done", None).await
    }

    pub async fn mark_batch_failed(&self, batch_id: &str, error: &str) -> Result<()> {
        self.update_status(batch_id, "failed", Some(error)).await
    }

    /// Obtiene la info de un lote (None si no existe)
    pub async fn get_batch(&self, batch_id: &str) -> Result<Option<MessageBatchRecord>> {
        let sql = format!("SELECT {BATCH_COLUMNS} FROM message_batches WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(batch_id)
            .fetch_optional(&self.db_pool)
            .await
            .context("Fallo al buscar message_batch")?;

        row.as_ref().map(batch_from_row).transpose()
    }

    /// Lista lotes con paginación
    pub async fn list_batches(&self, page: u64, page_size: u64) -> Result<ListBatchesResponse> {
        let page = page.max(1);
        // Páginas absurdas devuelven vacío, no desbordan
        let offset = (page - 1).saturating_mul(page_size);

        let total: i64 = sqlx::query("SELECT COUNT(*) AS cnt FROM message_batches")
            .fetch_one(&self.db_pool)
            .await?
            .try_get("cnt")?;

        let sql = format!(
            r#"
            SELECT {BATCH_COLUMNS}
            FROM message_batches
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1 OFFSET ?2
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(i64::try_from(page_size).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.db_pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for r in &rows {
            items.push(BatchStatusResponse::from(batch_from_row(r)?));
        }

        Ok(ListBatchesResponse {
            total: total as u64,
            page,
            page_size,
            items,
        })
    }

    async fn update_status(
        &self,
        batch_id: &str,
        status: &str,
        error: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE message_batches
            SET status = ?2,
                error_message = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(batch_id)
        .bind(status)
        .bind(error)
        .bind(now_timestamp())
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar estado del lote")?;

        Ok(())
    }
}

fn batch_from_row(r: &SqliteRow) -> Result<MessageBatchRecord> {
    let created_at: String = r.try_get("created_at")?;
    let updated_at: String = r.try_get("updated_at")?;
    let total: i64 = r.try_get("total")?;
    let processed: i64 = r.try_get("processed")?;
    let success_count: i64 = r.try_get("success_count")?;
    let is_async: i64 = r.try_get("is_async")?;

    Ok(MessageBatchRecord {
        id: r.try_get("id")?,
        status: r.try_get("status")?,
        message_source: r.try_get("message_source")?,
        total: total as u64,
        processed: processed as u64,
        success_count: success_count as u64,
        scheduled_for: parse_optional_timestamp(r.try_get("scheduled_for")?)?,
        is_async: is_async != 0,
        error_message: r.try_get("error_message")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
