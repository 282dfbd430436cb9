//! Day timeline: header, all-day strip, hour canvas and footer.
//!
//! Painting works from a [`RenderModel`] only. Raw pointer input is turned
//! into [`TimelineAction`]s which the app applies to the controller.

use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};

use super::palette::{event_fill, text_on, with_alpha, TimelinePalette};
use crate::timeline::{EventBox, RenderModel};

/// Width of the hour label gutter left of the event area.
pub const TIME_LABEL_WIDTH: f32 = 50.0;
const BOX_GAP: f32 = 2.0;
const FOOTER_HEIGHT: f32 = 24.0;

/// User intent produced by one frame of the timeline view.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    PreviousDay,
    NextDay,
    Today,
    CreateEvent,
    EditEvent(String),
    PressEvent { id: String, y: f64 },
    PressBackground { y: f64 },
    Move { y: f64 },
    Release { y: f64, over_event: bool },
}

/// Primary-button pointer input in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Pressed(Pos2),
    Moved(Pos2),
    Released(Pos2),
}

/// Where the canvas sits on screen this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Whole canvas including the label gutter
    pub canvas: Rect,
    /// Part of the canvas that is currently scrolled into view
    pub visible: Rect,
}

impl CanvasGeometry {
    pub fn new(canvas: Rect, visible: Rect) -> Self {
        Self { canvas, visible }
    }

    /// Area right of the gutter where event boxes live.
    pub fn events_rect(&self) -> Rect {
        Rect::from_min_max(
            Pos2::new(self.canvas.left() + TIME_LABEL_WIDTH, self.canvas.top()),
            self.canvas.max,
        )
    }

    /// Screen position to `(x as percent of event area width, canvas y)`.
    pub fn to_canvas(&self, pos: Pos2) -> (f64, f64) {
        let events = self.events_rect();
        let x_percent = (pos.x - events.left()) / events.width().max(1.0) * 100.0;
        (x_percent as f64, (pos.y - self.canvas.top()) as f64)
    }

    pub fn y_to_screen(&self, y: f64) -> f32 {
        self.canvas.top() + y as f32
    }

    /// Presses only count where the canvas is actually visible.
    pub fn accepts_press(&self, pos: Pos2) -> bool {
        self.canvas.contains(pos) && self.visible.contains(pos)
    }

    pub fn box_rect(&self, event_box: &EventBox) -> Rect {
        let events = self.events_rect();
        let left = events.left() + events.width() * (event_box.left_percent / 100.0) as f32;
        let width = events.width() * (event_box.width_percent / 100.0) as f32;
        let top = self.y_to_screen(event_box.top);
        Rect::from_min_size(
            Pos2::new(left + BOX_GAP / 2.0, top + 1.0),
            Vec2::new(
                (width - BOX_GAP).max(1.0),
                (event_box.height as f32 - 2.0).max(1.0),
            ),
        )
    }
}

/// Map one pointer input onto a timeline action.
///
/// Presses are hit-tested against the boxes; moves and releases are routed
/// from anywhere so a drag keeps tracking after leaving the canvas.
pub fn route_pointer(
    input: PointerInput,
    geometry: &CanvasGeometry,
    model: &RenderModel,
) -> Option<TimelineAction> {
    match input {
        PointerInput::Pressed(pos) => {
            if !geometry.accepts_press(pos) {
                return None;
            }
            let (x_percent, y) = geometry.to_canvas(pos);
            Some(match model.box_at(x_percent, y) {
                Some(event_box) => TimelineAction::PressEvent {
                    id: event_box.event_id.clone(),
                    y,
                },
                None => TimelineAction::PressBackground { y },
            })
        }
        PointerInput::Moved(pos) => Some(TimelineAction::Move {
            y: geometry.to_canvas(pos).1,
        }),
        PointerInput::Released(pos) => {
            let (x_percent, y) = geometry.to_canvas(pos);
            let over_event =
                geometry.canvas.contains(pos) && model.box_at(x_percent, y).is_some();
            Some(TimelineAction::Release { y, over_event })
        }
    }
}

/// Primary-button events of this frame in arrival order.
fn pointer_inputs(ctx: &egui::Context) -> Vec<PointerInput> {
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => Some(if *pressed {
                    PointerInput::Pressed(*pos)
                } else {
                    PointerInput::Released(*pos)
                }),
                egui::Event::PointerMoved(pos) => Some(PointerInput::Moved(*pos)),
                _ => None,
            })
            .collect()
    })
}

pub struct DayTimelineView;

impl DayTimelineView {
    /// Render the whole view and collect this frame's actions.
    pub fn show(
        ui: &mut egui::Ui,
        model: &RenderModel,
        pixels_per_hour: f64,
        input_enabled: bool,
    ) -> Vec<TimelineAction> {
        let palette = TimelinePalette::from_ui(ui);
        let mut actions = Vec::new();

        Self::render_header(ui, model, &mut actions);
        ui.separator();

        if !model.all_day.is_empty() {
            Self::render_all_day_strip(ui, model, &palette, &mut actions);
            ui.add_space(4.0);
        }

        let scroll_height = (ui.available_height() - FOOTER_HEIGHT).max(0.0);
        egui::ScrollArea::vertical()
            .id_source("day_timeline_scroll")
            .auto_shrink([false, false])
            .drag_to_scroll(false)
            .max_height(scroll_height)
            .show(ui, |ui| {
                let size = Vec2::new(ui.available_width(), model.canvas_height as f32);
                let (canvas, response) = ui.allocate_exact_size(size, Sense::hover());
                let geometry = CanvasGeometry::new(canvas, ui.clip_rect());

                Self::paint_canvas(ui, model, &geometry, pixels_per_hour, &palette);

                if input_enabled {
                    for input in pointer_inputs(ui.ctx()) {
                        if let Some(action) = route_pointer(input, &geometry, model) {
                            actions.push(action);
                        }
                    }
                    if let Some(id) = Self::double_clicked_box(ui, &geometry, model) {
                        actions.push(TimelineAction::EditEvent(id));
                    }
                }

                if model.drag_preview.is_some() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
                } else if let Some(pos) = response.hover_pos() {
                    let (x_percent, y) = geometry.to_canvas(pos);
                    if model.box_at(x_percent, y).is_some() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                    }
                }
            });

        ui.add_space(4.0);
        ui.label(RichText::new(&model.event_count_label).color(palette.muted_text));

        actions
    }

    fn render_header(ui: &mut egui::Ui, model: &RenderModel, actions: &mut Vec<TimelineAction>) {
        ui.horizontal(|ui| {
            if ui.button("◀").on_hover_text("Previous day").clicked() {
                actions.push(TimelineAction::PreviousDay);
            }
            if ui.button("Today").clicked() {
                actions.push(TimelineAction::Today);
            }
            if ui.button("▶").on_hover_text("Next day").clicked() {
                actions.push(TimelineAction::NextDay);
            }

            ui.add_space(8.0);
            ui.heading(&model.day_label);
            if model.is_today {
                ui.label(RichText::new("Today").small().strong());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("+ New event").clicked() {
                    actions.push(TimelineAction::CreateEvent);
                }
            });
        });
    }

    fn render_all_day_strip(
        ui: &mut egui::Ui,
        model: &RenderModel,
        palette: &TimelinePalette,
        actions: &mut Vec<TimelineAction>,
    ) {
        egui::Frame::none()
            .fill(palette.strip_bg)
            .stroke(Stroke::new(1.0, palette.strip_border))
            .rounding(4.0)
            .inner_margin(egui::Margin::symmetric(6.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new("All day").small().color(palette.muted_text));
                    for item in &model.all_day {
                        let fill = event_fill(&item.color);
                        let chip = egui::Button::new(
                            RichText::new(&item.title).small().color(text_on(fill)),
                        )
                        .fill(fill)
                        .rounding(8.0);
                        if ui.add(chip).clicked() {
                            actions.push(TimelineAction::EditEvent(item.event_id.clone()));
                        }
                    }
                });
            });
    }

    fn paint_canvas(
        ui: &egui::Ui,
        model: &RenderModel,
        geometry: &CanvasGeometry,
        pixels_per_hour: f64,
        palette: &TimelinePalette,
    ) {
        let painter = ui.painter_at(geometry.canvas);
        let events = geometry.events_rect();

        painter.rect_filled(geometry.canvas, 0.0, palette.canvas_bg);

        for label in &model.hour_labels {
            let y = geometry.y_to_screen(label.y);
            painter.hline(events.x_range(), y, Stroke::new(1.0, palette.hour_line));
            painter.text(
                Pos2::new(geometry.canvas.left() + TIME_LABEL_WIDTH - 6.0, y + 2.0),
                Align2::RIGHT_TOP,
                &label.text,
                FontId::proportional(11.0),
                palette.hour_label,
            );

            let half = geometry.y_to_screen(label.y + pixels_per_hour / 2.0);
            if half < geometry.canvas.bottom() {
                painter.hline(events.x_range(), half, Stroke::new(1.0, palette.half_hour_line));
            }
        }

        let dragged_id = model
            .drag_preview
            .as_ref()
            .map(|preview| preview.event_id.as_str());
        for event_box in &model.boxes {
            let dragging = dragged_id == Some(event_box.event_id.as_str());
            Self::paint_box(ui, geometry, event_box, dragging);
        }

        if let Some(indicator) = model.now_indicator {
            let y = geometry.y_to_screen(indicator.y);
            painter.hline(events.x_range(), y, Stroke::new(2.0, palette.now_line));
            painter.circle_filled(Pos2::new(events.left(), y), 4.0, palette.now_line);
        }

        if let Some(preview) = &model.drag_preview {
            let y = geometry.y_to_screen(preview.top);
            painter.extend(egui::Shape::dashed_line(
                &[Pos2::new(events.left(), y), Pos2::new(events.right(), y)],
                Stroke::new(1.5, palette.drag_guide),
                6.0,
                4.0,
            ));
            painter.text(
                Pos2::new(events.right() - 4.0, y - 2.0),
                Align2::RIGHT_BOTTOM,
                &preview.time_label,
                FontId::proportional(11.0),
                palette.drag_guide,
            );
        }
    }

    fn paint_box(ui: &egui::Ui, geometry: &CanvasGeometry, event_box: &EventBox, dragging: bool) {
        let rect = geometry.box_rect(event_box);
        let painter = ui.painter_at(rect.intersect(geometry.canvas));
        let base = event_fill(&event_box.color);
        let fill = if dragging { with_alpha(base, 200) } else { base };
        let text_color = text_on(base);

        painter.rect_filled(rect, 4.0, fill);
        painter.rect_filled(
            Rect::from_min_size(rect.min, Vec2::new(3.0, rect.height())),
            egui::Rounding {
                nw: 4.0,
                sw: 4.0,
                ne: 0.0,
                se: 0.0,
            },
            base.linear_multiply(0.75),
        );
        if dragging {
            painter.rect_stroke(rect, 4.0, Stroke::new(2.0, Color32::WHITE));
        }

        let text_left = rect.left() + 7.0;
        painter.text(
            Pos2::new(text_left, rect.top() + 3.0),
            Align2::LEFT_TOP,
            &event_box.title,
            FontId::proportional(12.0),
            text_color,
        );
        if rect.height() >= 34.0 {
            painter.text(
                Pos2::new(text_left, rect.top() + 18.0),
                Align2::LEFT_TOP,
                &event_box.time_label,
                FontId::proportional(10.0),
                with_alpha(text_color, 200),
            );
        }
    }

    fn double_clicked_box(
        ui: &egui::Ui,
        geometry: &CanvasGeometry,
        model: &RenderModel,
    ) -> Option<String> {
        let pos = ui.input(|input| {
            if input.pointer.button_double_clicked(egui::PointerButton::Primary) {
                input.pointer.interact_pos()
            } else {
                None
            }
        })?;
        if !geometry.accepts_press(pos) {
            return None;
        }
        let (x_percent, y) = geometry.to_canvas(pos);
        model
            .box_at(x_percent, y)
            .map(|event_box| event_box.event_id.clone())
    }
}
