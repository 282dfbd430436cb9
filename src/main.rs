// Day Timeline Application
// Main entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;

use day_timeline::models::settings::TimelineSettings;
use day_timeline::services::calendar_sync::{
    NoopSyncDispatcher, SyncDispatcher, TokioSyncDispatcher, WebhookCalendarSync,
};
use day_timeline::services::event::{EventStore, SqliteEventStore};
use day_timeline::services::settings::{default_database_path, SettingsService};
use day_timeline::timeline::DayTimelineController;
use day_timeline::ui_egui::TimelineApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Day Timeline");

    let settings = SettingsService::from_environment()
        .load()
        .unwrap_or_else(|err| {
            log::warn!("{}; using default settings", err);
            TimelineSettings::default()
        });

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let database_path = settings
        .database_path
        .clone()
        .unwrap_or_else(default_database_path);
    if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
    }
    log::info!("Using event database at {}", database_path.display());
    let store: Arc<dyn EventStore> =
        Arc::new(SqliteEventStore::open(&database_path.to_string_lossy())?);

    let sync: Arc<dyn SyncDispatcher> = match settings.sync_webhook_url.as_deref() {
        Some(endpoint) => match WebhookCalendarSync::new(endpoint) {
            Ok(webhook) => Arc::new(
                TokioSyncDispatcher::new(runtime.handle().clone(), Arc::new(webhook))
                    .with_store(store.clone()),
            ),
            Err(err) => {
                log::warn!("Calendar sync disabled: {:#}", err);
                Arc::new(NoopSyncDispatcher)
            }
        },
        None => Arc::new(NoopSyncDispatcher),
    };

    let controller =
        DayTimelineController::new(settings, store, sync, Local::now().naive_local());
    let app = TimelineApp::new(runtime, controller);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Day Timeline")
            .with_inner_size([520.0, 820.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Day Timeline",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("Failed to run application: {}", err))
}
