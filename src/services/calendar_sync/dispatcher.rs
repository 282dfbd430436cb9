use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{CalendarSync, SyncDispatcher, SyncRequest};
use crate::models::event::EventPatch;
use crate::services::event::EventStore;

/// Runs each sync request as a detached task on a tokio runtime.
///
/// Outcomes are only logged. When a store is attached, an external id handed
/// back by the remote calendar is recorded on the local event.
pub struct TokioSyncDispatcher {
    runtime: Handle,
    sync: Arc<dyn CalendarSync>,
    store: Option<Arc<dyn EventStore>>,
}

impl TokioSyncDispatcher {
    pub fn new(runtime: Handle, sync: Arc<dyn CalendarSync>) -> Self {
        Self {
            runtime,
            sync,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn EventStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Spawn the request and return its task handle.
    pub fn spawn(&self, request: SyncRequest) -> JoinHandle<()> {
        let sync = Arc::clone(&self.sync);
        let store = self.store.clone();

        self.runtime.spawn(async move {
            let ack = match request.send(sync.as_ref()).await {
                Ok(ack) => ack,
                Err(err) => {
                    log::warn!(
                        "Calendar sync {} failed for event {}: {:#}",
                        request.action(),
                        request.event_id(),
                        err
                    );
                    return;
                }
            };
            log::info!(
                "Calendar sync {} succeeded for event {}",
                request.action(),
                request.event_id()
            );

            let (Some(store), Some(external_id)) = (store, ack.external_sync_id) else {
                return;
            };
            if !request.links_external_id() {
                return;
            }
            if let Err(err) = store
                .update_event(request.event_id(), EventPatch::link_external(external_id))
                .await
            {
                log::warn!(
                    "Failed to record external calendar id for event {}: {:#}",
                    request.event_id(),
                    err
                );
            }
        })
    }
}

impl SyncDispatcher for TokioSyncDispatcher {
    fn dispatch(&self, request: SyncRequest) {
        // Dropping the handle detaches the task; it keeps running.
        drop(self.spawn(request));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{NewEvent, TimedEvent};
    use crate::services::calendar_sync::{SyncAck, SyncPayload};
    use crate::services::event::SqliteEventStore;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSync {
        calls: Mutex<Vec<String>>,
        external_id: Option<String>,
        fail: bool,
    }

    impl FakeSync {
        fn record(&self, call: String) -> Result<SyncAck> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(anyhow!("webhook unreachable"));
            }
            Ok(SyncAck {
                external_sync_id: self.external_id.clone(),
            })
        }
    }

    #[async_trait]
    impl CalendarSync for FakeSync {
        async fn sync_create(&self, event_id: &str, _payload: &SyncPayload) -> Result<SyncAck> {
            self.record(format!("create:{}", event_id))
        }

        async fn sync_update(
            &self,
            event_id: &str,
            external_sync_id: Option<&str>,
            _payload: &SyncPayload,
        ) -> Result<SyncAck> {
            self.record(format!("update:{}:{}", event_id, external_sync_id.unwrap_or("-")))
        }

        async fn sync_delete(&self, event_id: &str, external_sync_id: Option<&str>) -> Result<SyncAck> {
            self.record(format!("delete:{}:{}", event_id, external_sync_id.unwrap_or("-")))
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    async fn stored_event(store: &SqliteEventStore) -> TimedEvent {
        store
            .create_event(NewEvent {
                day: day(),
                title: "Standup".into(),
                notes: None,
                start: Some(day().and_hms_opt(9, 0, 0).unwrap()),
                end: Some(day().and_hms_opt(10, 0, 0).unwrap()),
                period: None,
                all_day: false,
                category: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_spawned_request_reaches_sync() {
        let sync = Arc::new(FakeSync::default());
        let dispatcher = TokioSyncDispatcher::new(Handle::current(), sync.clone());

        dispatcher
            .spawn(SyncRequest::delete("evt-1", Some("g-1".into())))
            .await
            .unwrap();

        assert_eq!(*sync.calls.lock().unwrap(), vec!["delete:evt-1:g-1".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let sync = Arc::new(FakeSync {
            fail: true,
            ..FakeSync::default()
        });
        let dispatcher = TokioSyncDispatcher::new(Handle::current(), sync.clone());

        let outcome = dispatcher.spawn(SyncRequest::delete("evt-1", None)).await;
        assert!(outcome.is_ok());
        assert_eq!(sync.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_external_id_recorded_after_create() {
        let store = Arc::new(SqliteEventStore::in_memory().unwrap());
        let event = stored_event(&store).await;
        let sync = Arc::new(FakeSync {
            external_id: Some("g-5".into()),
            ..FakeSync::default()
        });
        let dispatcher =
            TokioSyncDispatcher::new(Handle::current(), sync).with_store(store.clone());

        dispatcher.spawn(SyncRequest::create(&event)).await.unwrap();

        let linked = store.get(&event.id).unwrap().unwrap();
        assert_eq!(linked.external_sync_id.as_deref(), Some("g-5"));
    }

    #[tokio::test]
    async fn test_known_external_id_not_rewritten() {
        let store = Arc::new(SqliteEventStore::in_memory().unwrap());
        let event = stored_event(&store)
            .await
            .with_external_sync_id("g-original");
        let sync = Arc::new(FakeSync {
            external_id: Some("g-other".into()),
            ..FakeSync::default()
        });
        let dispatcher =
            TokioSyncDispatcher::new(Handle::current(), sync.clone()).with_store(store.clone());

        dispatcher.spawn(SyncRequest::update(&event)).await.unwrap();

        assert_eq!(
            *sync.calls.lock().unwrap(),
            vec![format!("update:{}:g-original", event.id)]
        );
        assert_eq!(store.get(&event.id).unwrap().unwrap().external_sync_id, None);
    }
}
