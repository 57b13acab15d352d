//! handlers/template_handler.rs
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    handlers::error_response,
    models::template_model::{
        CreateTemplateRequest, TemplatePreviewResponse, UpdateTemplateRequest,
    },
    services::template_service::{preview, TemplateService},
};

/// GET /api/templates
pub async fn list_templates_endpoint(
    template_service: web::Data<TemplateService>,
) -> HttpResponse {
    match template_service.list_templates().await {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => error_response(&e),
    }
}

/// POST /api/templates
pub async fn create_template_endpoint(
    template_service: web::Data<TemplateService>,
    body: web::Json<CreateTemplateRequest>,
) -> HttpResponse {
    let req = body.into_inner();
    match template_service
        .create_template(&req.name, &req.content)
        .await
    {
        Ok(template) => HttpResponse::Created().json(template),
        Err(e) => error_response(&e),
    }
}

/// PUT /api/templates/{name}
pub async fn update_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<String>,
    body: web::Json<UpdateTemplateRequest>,
) -> HttpResponse {
    let name = path.into_inner();
    match template_service
        .update_template(&name, &body.into_inner().content)
        .await
    {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => error_response(&e),
    }
}

/// DELETE /api/templates/{name}
pub async fn delete_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<String>,
) -> HttpResponse {
    let name = path.into_inner();
    match template_service.delete_template(&name).await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Template deleted!"
        })),
        Err(e) => error_response(&e),
    }
}

/// GET /api/templates/{name}/preview
pub async fn preview_template_endpoint(
    template_service: web::Data<TemplateService>,
    path: web::Path<String>,
) -> HttpResponse {
    let name = path.into_inner();
    match template_service.get_template(&name).await {
        Ok(template) => HttpResponse::Ok().json(TemplatePreviewResponse {
            preview: preview(&template.content),
            name: template.name,
            content: template.content,
        }),
        Err(e) => error_response(&e),
    }
}
