//! services/template_service.rs
//! Plantillas de mensaje: CRUD sobre SQLite y resolución/personalización del cuerpo.

use anyhow::Context;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use crate::{
    db::{now_timestamp, parse_timestamp},
    error::{MessagingError, MessagingResult},
    models::template_model::{
        MessageSelection, MessageTemplate, CLIENT_NAME_PLACEHOLDER, PREVIEW_SAMPLE_NAME,
    },
};

#[derive(Clone, Debug)]
pub struct TemplateService {
    db_pool: Pool<Sqlite>,
}

impl TemplateService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        TemplateService { db_pool }
    }

    pub async fn create_template(
        &self,
        name: &str,
        content: &str,
    ) -> MessagingResult<MessageTemplate> {
        let name = name.trim();
        check_template_fields(name, content)?;

        let id = Uuid::new_v4().to_string();
        let now = now_timestamp();

        let inserted = sqlx::query(
            r#"
            INSERT INTO message_templates (id, name, content, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(content)
        .bind(&now)
        .execute(&self.db_pool)
        .await;

        // El UNIQUE de la tabla decide los duplicados, también entre altas concurrentes
        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(MessagingError::TemplateAlreadyExists(name.to_string()));
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context("Fallo al insertar plantilla")
                    .into())
            }
        }

        log::info!("(create_template) Plantilla '{}' creada con ID={}", name, id);
        self.get_template(name).await
    }

    /// Todas las plantillas, ordenadas por nombre
    pub async fn list_templates(&self) -> MessagingResult<Vec<MessageTemplate>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, content, created_at, updated_at
            FROM message_templates
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar plantillas")?;

        let mut templates = Vec::with_capacity(rows.len());
        for r in rows {
            templates.push(template_from_row(&r)?);
        }
        Ok(templates)
    }

    pub async fn get_template(&self, name: &str) -> MessagingResult<MessageTemplate> {
        let name = name.trim();
        self.find_template(name)
            .await?
            .ok_or_else(|| MessagingError::TemplateNotFound(name.to_string()))
    }

    /// Sobrescribe el contenido (sin versionado)
    pub async fn update_template(
        &self,
        name: &str,
        content: &str,
    ) -> MessagingResult<MessageTemplate> {
        let name = name.trim();
        check_template_fields(name, content)?;

        let result = sqlx::query(
            r#"
            UPDATE message_templates
            SET content = ?2,
                updated_at = ?3
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .bind(content)
        .bind(now_timestamp())
        .execute(&self.db_pool)
        .await
        .context("Fallo al actualizar plantilla")?;

        if result.rows_affected() == 0 {
            return Err(MessagingError::TemplateNotFound(name.to_string()));
        }
        self.get_template(name).await
    }

    pub async fn delete_template(&self, name: &str) -> MessagingResult<()> {
        let name = name.trim();
        let result = sqlx::query("DELETE FROM message_templates WHERE name = ?1")
            .bind(name)
            .execute(&self.db_pool)
            .await
            .context("Fallo al borrar plantilla")?;

        if result.rows_affected() == 0 {
            return Err(MessagingError::TemplateNotFound(name.to_string()));
        }
        log::info!("(delete_template) Plantilla '{}' borrada", name);
        Ok(())
    }

    /// Devuelve el cuerpo (aún sin personalizar) para la selección del operador.
    pub async fn resolve(&self, selection: &MessageSelection) -> MessagingResult<String> {
        let body = match selection {
            MessageSelection::Custom { text } => text.clone(),
            MessageSelection::Template { name } => self.get_template(name).await?.content,
        };

        if body.trim().is_empty() {
            return Err(MessagingError::EmptyMessage);
        }
        Ok(body)
    }

    async fn find_template(&self, name: &str) -> MessagingResult<Option<MessageTemplate>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, content, created_at, updated_at
            FROM message_templates
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al buscar plantilla")?;

        row.as_ref().map(template_from_row).transpose()
    }
}

/// Reemplaza cada aparición de `{Client Name}` por el nombre del destinatario.
pub fn personalize(body: &str, client_name: &str) -> String {
    body.replace(CLIENT_NAME_PLACEHOLDER, client_name)
}

/// Vista previa con un nombre de ejemplo
pub fn preview(body: &str) -> String {
    personalize(body, PREVIEW_SAMPLE_NAME)
}

fn check_template_fields(name: &str, content: &str) -> MessagingResult<()> {
    if name.trim().is_empty() || content.trim().is_empty() {
        return Err(MessagingError::InvalidTemplate(
            "please fill in all fields".to_string(),
        ));
    }
    Ok(())
}

fn template_from_row(r: &SqliteRow) -> MessagingResult<MessageTemplate> {
    let created_at: String = r.try_get("created_at").context("created_at")?;
    let updated_at: String = r.try_get("updated_at").context("updated_at")?;
    Ok(MessageTemplate {
        id: r.try_get("id").context("id")?,
        name: r.try_get("name").context("name")?,
        content: r.try_get("content").context("content")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
