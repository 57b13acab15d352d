//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod batch_service;
pub mod dispatch_service;
pub mod gateway_service;
pub mod history_service;
pub mod messaging_service;
pub mod phone_normalizer;
pub mod recipient_validator;
pub mod template_service;
