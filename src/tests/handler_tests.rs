//! tests/handler_tests.rs
//! Pruebas de la API HTTP sobre el servicio completo.

use actix_web::{test, web, App};
use serde_json::{json, Value};

use crate::app::init_app;
use crate::services::batch_service::BatchService;
use crate::services::dispatch_service::DispatchEngine;
use crate::services::history_service::HistoryService;
use crate::services::messaging_service::MessagingService;
use crate::services::template_service::TemplateService;
use crate::tests::{shared, test_pool, FakeGateway};

macro_rules! test_app {
    ($gateway:expr) => {{
        let pool = test_pool().await;
        let templates = TemplateService::new(pool.clone());
        let history = HistoryService::new(pool.clone());
        let batches = BatchService::new(pool.clone());
        let engine = DispatchEngine::new(shared($gateway), history.clone());
        let messaging = MessagingService::new(templates.clone(), batches.clone(), engine);
        test::init_service(
            App::new()
                .app_data(web::Data::new(templates))
                .app_data(web::Data::new(history))
                .app_data(web::Data::new(batches))
                .app_data(web::Data::new(messaging))
                .configure(init_app),
        )
        .await
    }};
}

fn send_body(message: Value, rows: Value) -> Value {
    json!({
        "recipients": {
            "columns": ["Client Name", "Phone Number"],
            "rows": rows
        },
        "message": message
    })
}

#[actix_rt::test]
async fn test_template_endpoints() {
    let app = test_app!(FakeGateway::new());

    let req = test::TestRequest::post()
        .uri("/api/templates")
        .set_json(json!({"name": "Reminder", "content": "Hi {Client Name}"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    let req = test::TestRequest::post()
        .uri("/api/templates")
        .set_json(json!({"name": "Reminder", "content": "again"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);

    let req = test::TestRequest::get()
        .uri("/api/templates/Reminder/preview")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["preview"], "Hi John Doe");

    let req = test::TestRequest::delete()
        .uri("/api/templates/Reminder")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/api/templates").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_rt::test]
async fn test_send_and_read_history() {
    let app = test_app!(FakeGateway::new().rejecting("+61422222222"));

    let req = test::TestRequest::post()
        .uri("/api/messages/send")
        .set_json(send_body(
            json!({"type": "custom", "text": "Hi {Client Name}"}),
            json!([["Ana", "0411 111 111"], ["Ben", 422222222]]),
        ))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"]["total"], 2);
    assert_eq!(body["result"]["success_count"], 1);
    assert_eq!(body["result"]["outcomes"][1]["status"], "failed");
    let batch_id = body["batch_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/messages/batches/{batch_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "done");
    assert_eq!(body["progress"], 1.0);

    let req = test::TestRequest::get()
        .uri("/api/messages/history?page=1&page_size=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["client_name"], "Ben");
    assert_eq!(body["items"][1]["message"], "Hi Ana");
}

#[actix_rt::test]
async fn test_row_errors_are_listed_individually() {
    let app = test_app!(FakeGateway::new());

    let req = test::TestRequest::post()
        .uri("/api/messages/send")
        .set_json(send_body(
            json!({"type": "custom", "text": "Hi"}),
            json!([["Ana", null], ["Ben", true], ["Cleo", "0433333333"]]),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body["row_errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["client_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana", "Ben"]);
}

#[actix_rt::test]
async fn test_unknown_template_and_batch_are_not_found() {
    let app = test_app!(FakeGateway::new());

    let req = test::TestRequest::post()
        .uri("/api/messages/send")
        .set_json(send_body(
            json!({"type": "template", "name": "Missing"}),
            json!([["Ana", "0411111111"]]),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let req = test::TestRequest::get()
        .uri("/api/messages/batches/does-not-exist")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_rt::test]
async fn test_huge_page_returns_empty_list() {
    let app = test_app!(FakeGateway::new());

    let req = test::TestRequest::post()
        .uri("/api/messages/send")
        .set_json(send_body(
            json!({"type": "custom", "text": "Hi"}),
            json!([["Ana", "0411111111"]]),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    for uri in [
        format!("/api/messages/batches?page={}&page_size=500", u64::MAX),
        format!("/api/messages/history?page={}&page_size=500", u64::MAX),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 1, "{uri}");
        assert_eq!(body["page"], u64::MAX, "{uri}");
        assert_eq!(body["items"].as_array().unwrap().len(), 0, "{uri}");
    }
}
