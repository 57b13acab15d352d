//! app.rs
use crate::handlers::{message_handler, template_handler};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/templates")
                    .route(
                        "",
                        web::get().to(template_handler::list_templates_endpoint),
                    )
                    .route(
                        "",
                        web::post().to(template_handler::create_template_endpoint),
                    )
                    .route(
                        "/{name}",
                        web::put().to(template_handler::update_template_endpoint),
                    )
                    .route(
                        "/{name}",
                        web::delete().to(template_handler::delete_template_endpoint),
                    )
                    .route(
                        "/{name}/preview",
                        web::get().to(template_handler::preview_template_endpoint),
                    ),
            )
            .service(
                web::scope("/messages")
                    .route(
                        "/validate",
                        web::post().to(message_handler::validate_batch_endpoint),
                    )
                    .route("/send", web::post().to(message_handler::send_batch_endpoint))
                    .route(
                        "/history",
                        web::get().to(message_handler::list_history_endpoint),
                    )
                    .route(
                        "/batches",
                        web::get().to(message_handler::list_batches_endpoint),
                    )
                    .route(
                        "/batches/{id}",
                        web::get().to(message_handler::get_batch_endpoint),
                    )
                    .route(
                        "/batches/{id}/history",
                        web::get().to(message_handler::batch_history_endpoint),
                    ),
            ),
    );
}
