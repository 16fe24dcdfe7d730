use std::path::PathBuf;

use inventory_core::{
    InventoryError, InventoryEvent, InventoryRequest, LimitCategoryId, PlayerContext, PlayerId,
    StoreRequest, TemplateId,
};
use inventory_runtime::persistence::EventLog;
use inventory_runtime::{InventoryRuntime, RuntimeConfig, RuntimeError};

const PLAYER: PlayerId = PlayerId(1);
const POTION: TemplateId = TemplateId(1);
const DRAUGHT: TemplateId = TemplateId(2);

fn bundled_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn config(save_dir: &std::path::Path) -> RuntimeConfig {
    RuntimeConfig::default()
        .with_data_dir(bundled_data())
        .with_save_dir(save_dir)
}

fn store(template: TemplateId, quantity: u32) -> InventoryRequest {
    InventoryRequest::Store(StoreRequest::new(template, quantity))
}

#[tokio::test]
async fn committed_events_reach_subscribers_and_the_event_log() {
    let save = tempfile::tempdir().unwrap();
    let mut runtime = InventoryRuntime::start(config(save.path())).await.unwrap();
    let mut notices = runtime.subscribe();

    let service = runtime.service_mut();
    service.open(PLAYER).unwrap();
    let report = service
        .execute(PLAYER, &PlayerContext::new(10), &store(POTION, 25))
        .unwrap();
    assert_eq!(report.nonce, 1);
    assert_eq!(report.events.len(), 2);
    assert!(
        report
            .events
            .iter()
            .all(|event| matches!(event, InventoryEvent::Created { template, .. } if *template == POTION))
    );

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.owner, PLAYER);
    assert_eq!(notice.events, report.events);

    runtime.flush().await.unwrap();
    let records = EventLog::read_all(save.path().join(EventLog::FILE_NAME)).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|record| record.owner == PLAYER));
    assert_eq!(records[0].sequence, 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejected_requests_publish_nothing() {
    let save = tempfile::tempdir().unwrap();
    let mut runtime = InventoryRuntime::start(config(save.path())).await.unwrap();
    let mut notices = runtime.subscribe();

    let service = runtime.service_mut();
    service.open(PLAYER).unwrap();
    let error = service
        .execute(PLAYER, &PlayerContext::new(10), &store(DRAUGHT, 5))
        .unwrap_err();
    match error {
        RuntimeError::Transaction(error) => assert_eq!(
            error.error,
            InventoryError::CategoryLimitExceeded {
                category: LimitCategoryId(1),
                shortfall: 3,
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(runtime.service().inventory(PLAYER).unwrap().nonce(), 0);
    assert!(notices.try_recv().is_err());

    runtime.flush().await.unwrap();
    let records = EventLog::read_all(save.path().join(EventLog::FILE_NAME)).unwrap();
    assert!(records.is_empty());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn level_bonus_raises_the_category_cap() {
    let save = tempfile::tempdir().unwrap();
    let mut runtime = InventoryRuntime::start(config(save.path()).with_persistence(false))
        .await
        .unwrap();

    let service = runtime.service_mut();
    service.open(PLAYER).unwrap();
    let report = service
        .execute(PLAYER, &PlayerContext::new(60), &store(DRAUGHT, 3))
        .unwrap();
    assert_eq!(report.stored[0].placed, 3);

    runtime.shutdown().await.unwrap();
    assert!(!save.path().join(EventLog::FILE_NAME).exists());
}

#[tokio::test]
async fn inventories_are_restored_after_restart() {
    let save = tempfile::tempdir().unwrap();

    let mut runtime = InventoryRuntime::start(config(save.path())).await.unwrap();
    let service = runtime.service_mut();
    service.open(PLAYER).unwrap();
    service
        .execute(PLAYER, &PlayerContext::new(10), &store(POTION, 25))
        .unwrap();
    runtime.shutdown().await.unwrap();

    let mut runtime = InventoryRuntime::start(config(save.path())).await.unwrap();
    let restored = runtime.service_mut().open(PLAYER).unwrap();
    assert_eq!(restored.nonce(), 1);
    assert_eq!(restored.stack_count(), 2);
    assert_eq!(
        restored.stacks().map(|stack| stack.quantity).sum::<u32>(),
        25
    );
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn missing_content_fails_to_start() {
    let empty = tempfile::tempdir().unwrap();
    let config = RuntimeConfig::default()
        .with_data_dir(empty.path())
        .with_persistence(false);

    let result = InventoryRuntime::start(config).await;
    assert!(matches!(result, Err(RuntimeError::Content(_))));
}
