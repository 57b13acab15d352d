//! logger.rs
//! Configuración del logger usando env_logger.

pub fn init_logger() {
    // RUST_LOG manda; si no está, "info" para la app y "warn" para sqlx,
    // que loguea cada query a nivel info.
    let log_env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".to_string());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_env))
        .format_timestamp_secs()
        .init();
}

/// Enmascara un teléfono para logs: sólo quedan visibles los últimos 4 dígitos.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    if phone.starts_with('+') {
        format!("+{}{}", "*".repeat(chars.len() - 5), visible)
    } else {
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}
