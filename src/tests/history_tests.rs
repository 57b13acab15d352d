//! tests/history_tests.rs
//! Pruebas del historial y del seguimiento de lotes.

use actix_rt::test;

use crate::models::batch_model::CreateBatchRequest;
use crate::models::history_model::{MessageStatus, NewMessageHistory};
use crate::services::batch_service::BatchService;
use crate::services::history_service::HistoryService;
use crate::tests::test_pool;

fn record(name: &str, status: MessageStatus) -> NewMessageHistory {
    NewMessageHistory {
        batch_id: None,
        client_name: name.to_string(),
        phone_number: "+61411111111".to_string(),
        message: format!("Hi {name}"),
        status,
        error: None,
        provider_message_id: None,
        scheduled_for: None,
        sent_at: None,
    }
}

#[test]
async fn test_list_all_is_newest_first() {
    let history = HistoryService::new(test_pool().await);
    for name in ["first", "second", "third"] {
        history.append(record(name, MessageStatus::Sent)).await.unwrap();
    }

    let names: Vec<String> = history
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|h| h.client_name)
        .collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[test]
async fn test_append_round_trips_fields() {
    let history = HistoryService::new(test_pool().await);
    let mut rec = record("Ana", MessageStatus::Failed);
    rec.error = Some("Failed to send message: invalid number".to_string());

    let id = history.append(rec).await.unwrap();
    let stored = history.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].status, MessageStatus::Failed);
    assert_eq!(
        stored[0].error.as_deref(),
        Some("Failed to send message: invalid number")
    );
}

#[test]
async fn test_history_pagination() {
    let history = HistoryService::new(test_pool().await);
    for i in 0..7 {
        history
            .append(record(&format!("c{i}"), MessageStatus::Scheduled))
            .await
            .unwrap();
    }

    let page1 = history.list_page(1, 5).await.unwrap();
    assert_eq!(page1.total, 7);
    assert_eq!(page1.items.len(), 5);
    assert_eq!(page1.items[0].client_name, "c6");

    let page2 = history.list_page(2, 5).await.unwrap();
    assert_eq!(page2.items.len(), 2);
    assert_eq!(page2.items[1].client_name, "c0");
}

#[test]
async fn test_batch_lifecycle() {
    let batches = BatchService::new(test_pool().await);
    let id = batches
        .create_batch(CreateBatchRequest {
            message_source: "custom".to_string(),
            total: 4,
            scheduled_for: None,
            is_async: false,
        })
        .await
        .unwrap();

    let batch = batches.get_batch(&id).await.unwrap().expect("lote creado");
    assert_eq!(batch.status, "pending");
    assert_eq!(batch.progress(), 0.0);

    batches.mark_running(&id).await.unwrap();
    batches.update_progress(&id, 2, 1).await.unwrap();
    let batch = batches.get_batch(&id).await.unwrap().unwrap();
    assert_eq!(batch.status, "running");
    assert_eq!(batch.processed, 2);
    assert_eq!(batch.success_count, 1);
    assert_eq!(batch.progress(), 0.5);

    batches.mark_batch_failed(&id, "disk full").await.unwrap();
    let batch = batches.get_batch(&id).await.unwrap().unwrap();
    assert_eq!(batch.status, "failed");
    assert_eq!(batch.error_message.as_deref(), Some("disk full"));

    assert!(batches.get_batch("missing").await.unwrap().is_none());
    assert_eq!(batches.list_batches(1, 10).await.unwrap().total, 1);
}
