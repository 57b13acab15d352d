//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod batch_model;
pub mod dispatch_model;
pub mod gateway_model;
pub mod history_model;
pub mod recipient_model;
pub mod template_model;
