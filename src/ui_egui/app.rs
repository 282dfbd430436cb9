use std::time::Instant;

use tokio::runtime::Runtime;

use super::event_dialog::{render_event_dialog, DialogAction};
use super::toast::ToastManager;
use super::views::{DayTimelineView, TimelineAction};
use crate::timeline::{DayTimelineController, TimelineResult};

/// Desktop shell around the day timeline controller.
///
/// The controller's store calls are async; the app drives them to completion
/// on its own runtime so each frame sees a settled state.
pub struct TimelineApp {
    runtime: Runtime,
    controller: DayTimelineController,
    toasts: ToastManager,
    last_tick: Instant,
}

impl TimelineApp {
    pub fn new(runtime: Runtime, mut controller: DayTimelineController) -> Self {
        let initial = runtime.block_on(controller.refresh());
        let mut app = Self {
            runtime,
            controller,
            toasts: ToastManager::new(),
            last_tick: Instant::now(),
        };
        app.report(initial);
        app
    }

    /// Failures already surface as notices; only keep a trace in the log.
    fn report(&mut self, result: TimelineResult<()>) {
        if let Err(err) = result {
            log::debug!("Timeline action failed: {}", err);
        }
        self.toasts
            .extend_from_notices(self.controller.drain_notices());
    }

    fn apply(&mut self, action: TimelineAction) {
        let now = Instant::now();
        let result = match action {
            TimelineAction::PreviousDay => self.runtime.block_on(self.controller.previous()),
            TimelineAction::NextDay => self.runtime.block_on(self.controller.next()),
            TimelineAction::Today => self.runtime.block_on(self.controller.today()),
            TimelineAction::CreateEvent => {
                self.controller.open_create(None);
                Ok(())
            }
            TimelineAction::EditEvent(id) => self.controller.open_edit(&id),
            TimelineAction::PressEvent { id, y } => {
                self.controller.pointer_down_on_event(&id, y, now);
                Ok(())
            }
            TimelineAction::PressBackground { y } => {
                self.controller.pointer_down_on_background(y, now);
                Ok(())
            }
            TimelineAction::Move { y } => {
                self.controller.pointer_move(y);
                Ok(())
            }
            TimelineAction::Release { y, over_event } => self
                .runtime
                .block_on(self.controller.pointer_up(y, now, over_event)),
        };
        self.report(result);
    }

    fn apply_dialog(&mut self, action: DialogAction) {
        let result = match action {
            DialogAction::Submit => self.runtime.block_on(self.controller.submit_dialog()),
            DialogAction::Cancel => {
                self.controller.close_dialog();
                Ok(())
            }
            DialogAction::RequestDelete(id) => self.controller.request_delete(&id),
        };
        self.report(result);
    }

    fn tick_clock(&mut self, ctx: &egui::Context) {
        let interval = self.controller.settings().now_tick();
        if self.last_tick.elapsed() >= interval {
            self.controller.tick_local();
            self.last_tick = Instant::now();
        }
        ctx.request_repaint_after(interval);
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick_clock(ctx);

        let model = self.controller.render_model();
        let pixels_per_hour = self.controller.axis().pixels_per_hour();
        let input_enabled = !self.controller.is_dialog_open();

        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                DayTimelineView::show(ui, &model, pixels_per_hour, input_enabled)
            })
            .inner;
        for action in actions {
            self.apply(action);
        }

        let palette = self.controller.palette().clone();
        if let Some(action) = render_event_dialog(ctx, self.controller.dialog_mut(), &palette) {
            self.apply_dialog(action);
        }

        let is_dark = ctx.style().visuals.dark_mode;
        self.toasts.render(ctx, is_dark);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Shutting down day timeline");
        self.controller.teardown();
    }
}
