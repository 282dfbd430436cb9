// Service module exports
// Collaborators behind the timeline: storage, external sync, categories, config

pub mod calendar_sync;
pub mod category;
pub mod database;
pub mod event;
pub mod settings;
