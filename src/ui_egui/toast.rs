//! Controller notices shown as a short-lived stack above the bottom edge.

use std::time::{Duration, Instant};

use egui::{Align2, Color32, Context, RichText};

use super::views::palette::with_alpha;
use crate::timeline::{Notice, NoticeLevel};

const LIFETIME: Duration = Duration::from_secs(3);
const ERROR_LIFETIME: Duration = Duration::from_secs(5);
const FADE: Duration = Duration::from_millis(500);

/// Accent color for a notice; the card fill is a translucent wash of it.
fn accent(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Success => Color32::from_rgb(34, 160, 84),
        NoticeLevel::Info => Color32::from_rgb(59, 130, 246),
        NoticeLevel::Warning => Color32::from_rgb(217, 150, 20),
        NoticeLevel::Error => Color32::from_rgb(220, 60, 60),
    }
}

#[derive(Debug, Clone)]
struct Toast {
    notice: Notice,
    shown_at: Instant,
}

impl Toast {
    fn lifetime(&self) -> Duration {
        match self.notice.level {
            NoticeLevel::Error => ERROR_LIFETIME,
            _ => LIFETIME,
        }
    }

    /// 1.0 until the last half second, then linear down to 0.0.
    fn opacity_at(&self, now: Instant) -> f32 {
        let remaining = self
            .lifetime()
            .saturating_sub(now.saturating_duration_since(self.shown_at));
        (remaining.as_secs_f32() / FADE.as_secs_f32()).min(1.0)
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_from_notices(&mut self, notices: impl IntoIterator<Item = Notice>) {
        let shown_at = Instant::now();
        self.toasts.extend(
            notices
                .into_iter()
                .map(|notice| Toast { notice, shown_at }),
        );
    }

    fn retain_visible(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.opacity_at(now) > 0.0);
    }

    pub fn render(&mut self, ctx: &Context, is_dark_theme: bool) {
        let now = Instant::now();
        self.retain_visible(now);
        if self.toasts.is_empty() {
            return;
        }
        ctx.request_repaint();

        let text = if is_dark_theme {
            Color32::from_gray(235)
        } else {
            Color32::from_gray(30)
        };

        egui::Area::new(egui::Id::new("timeline_notices"))
            .anchor(Align2::CENTER_BOTTOM, [0.0, -40.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let opacity = toast.opacity_at(now);
                    let accent = accent(toast.notice.level);
                    egui::Frame::none()
                        .fill(with_alpha(accent, (70.0 * opacity) as u8))
                        .stroke(egui::Stroke::new(1.0, with_alpha(accent, (200.0 * opacity) as u8)))
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(12.0, 6.0))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(&toast.notice.message)
                                    .color(with_alpha(text, (255.0 * opacity) as u8)),
                            );
                        });
                    ui.add_space(4.0);
                }
            });
    }
}
