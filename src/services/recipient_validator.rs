//! services/recipient_validator.rs
//! Valida la tabla de destinatarios: columnas requeridas, nombre y teléfono por fila.

use serde_json::Value;

use crate::{
    error::{MessagingError, MessagingResult},
    models::recipient_model::{
        RecipientRow, RecipientTable, RowError, ValidatedRecipient, ValidationOutcome,
        CLIENT_NAME_COLUMN, PHONE_NUMBER_COLUMN,
    },
    services::phone_normalizer,
};

/// Separa filas válidas y errores. Los errores de fila no cortan la validación.
///
/// Falla con `MissingColumns` antes de mirar filas, y con `EmptyBatch`
/// (incluyendo los errores de fila) si no queda ningún destinatario válido.
pub fn validate(table: &RecipientTable) -> MessagingResult<ValidationOutcome> {
    let name_col = table.column_index(CLIENT_NAME_COLUMN);
    let phone_col = table.column_index(PHONE_NUMBER_COLUMN);

    let (name_col, phone_col) = match (name_col, phone_col) {
        (Some(n), Some(p)) => (n, p),
        (n, p) => {
            let mut missing = vec![];
            if n.is_none() {
                missing.push(CLIENT_NAME_COLUMN.to_string());
            }
            if p.is_none() {
                missing.push(PHONE_NUMBER_COLUMN.to_string());
            }
            return Err(MessagingError::MissingColumns { missing });
        }
    };

    let mut outcome = ValidationOutcome::default();

    for (index, cells) in table.rows.iter().enumerate() {
        let row = RecipientRow {
            index,
            client_name: cell_text(cells.get(name_col)),
            raw_phone: cells.get(phone_col).cloned().unwrap_or(Value::Null),
        };

        match validate_row(&row) {
            Ok(valid) => outcome.valid.push(valid),
            Err(e) => {
                log::warn!(
                    "(validate) Fila {} inválida ({}): {}",
                    row.index,
                    row.client_name,
                    e
                );
                outcome.errors.push(RowError {
                    index: row.index,
                    client_name: row.client_name,
                    reason: e.to_string(),
                });
            }
        }
    }

    if outcome.valid.is_empty() {
        return Err(MessagingError::EmptyBatch {
            row_errors: outcome.errors,
        });
    }

    Ok(outcome)
}

fn validate_row(row: &RecipientRow) -> MessagingResult<ValidatedRecipient> {
    if row.client_name.trim().is_empty() {
        return Err(MessagingError::InvalidRecipient(
            "client name is required".to_string(),
        ));
    }

    let phone = phone_normalizer::normalize(&row.raw_phone)?;
    Ok(ValidatedRecipient {
        index: row.index,
        client_name: row.client_name.clone(),
        phone,
    })
}

// El nombre se muestra tal cual; números u otros escalares se pasan a texto
fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
