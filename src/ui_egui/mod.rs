mod app;
pub mod event_dialog;
pub mod toast;
pub mod views;

pub use app::TimelineApp;
