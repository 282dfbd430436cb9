//! Create/edit/delete dialog for timeline events.

use chrono::{NaiveTime, Timelike};
use egui::RichText;

use super::views::palette::event_fill;
use crate::services::category::CategoryPalette;
use crate::timeline::DialogState;

const FORM_LABEL_WIDTH: f32 = 90.0;

/// What the user asked the dialog to do this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    Submit,
    Cancel,
    /// Switch from editing to delete confirmation
    RequestDelete(String),
}

fn labeled_row(ui: &mut egui::Ui, label: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.horizontal(|ui| {
        ui.add_sized([FORM_LABEL_WIDTH, 20.0], egui::Label::new(label));
        add_contents(ui);
    });
}

/// Hour and minute pickers. The current minute stays selectable even when it
/// is off the quarter-hour grid.
fn render_time_picker(ui: &mut egui::Ui, id: &str, time: &mut NaiveTime) {
    let mut hour = time.hour();
    let mut minute = time.minute();

    ui.horizontal(|ui| {
        egui::ComboBox::from_id_source(format!("{}_hour", id))
            .width(60.0)
            .selected_text(format!("{:02}", hour))
            .show_ui(ui, |ui| {
                for h in 0..24 {
                    ui.selectable_value(&mut hour, h, format!("{:02}", h));
                }
            });

        ui.label(":");

        let mut minutes: Vec<u32> = (0..60).step_by(15).collect();
        if !minutes.contains(&minute) {
            minutes.push(minute);
            minutes.sort_unstable();
        }
        egui::ComboBox::from_id_source(format!("{}_minute", id))
            .width(60.0)
            .selected_text(format!("{:02}", minute))
            .show_ui(ui, |ui| {
                for m in minutes {
                    ui.selectable_value(&mut minute, m, format!("{:02}", m));
                }
            });
    });

    if let Some(new_time) = NaiveTime::from_hms_opt(hour, minute, 0) {
        *time = new_time;
    }
}

/// Render the dialog for the current state; nothing is shown when closed.
pub fn render_event_dialog(
    ctx: &egui::Context,
    dialog: &mut DialogState,
    palette: &CategoryPalette,
) -> Option<DialogAction> {
    let mut action = None;
    let mut window_open = true;
    let edit_id = match dialog {
        DialogState::Edit { id, .. } => Some(id.clone()),
        _ => None,
    };

    match dialog {
        DialogState::Closed => return None,
        DialogState::ConfirmDelete { title, .. } => {
            egui::Window::new("Delete Event")
                .open(&mut window_open)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!("Delete \"{}\"? This cannot be undone.", title));
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui
                            .button(RichText::new("Delete").color(egui::Color32::from_rgb(220, 38, 38)))
                            .clicked()
                        {
                            action = Some(DialogAction::Submit);
                        }
                        if ui.button("Cancel").clicked() {
                            action = Some(DialogAction::Cancel);
                        }
                    });
                });
        }
        DialogState::Create(draft) | DialogState::Edit { draft, .. } => {
            let title = if edit_id.is_some() { "Edit Event" } else { "New Event" };

            egui::Window::new(title)
                .open(&mut window_open)
                .collapsible(false)
                .resizable(false)
                .default_width(380.0)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(RichText::new(draft.day.format("%A, %-d %B %Y").to_string()).weak());
                    ui.add_space(6.0);

                    labeled_row(ui, "Title:", |ui| {
                        let response = ui.text_edit_singleline(&mut draft.title);
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            action = Some(DialogAction::Submit);
                        }
                    });

                    labeled_row(ui, "All day:", |ui| {
                        ui.checkbox(&mut draft.all_day, "");
                    });

                    if !draft.all_day {
                        labeled_row(ui, "Start:", |ui| {
                            render_time_picker(ui, "event_dialog_start", &mut draft.start);
                        });
                        labeled_row(ui, "End:", |ui| {
                            render_time_picker(ui, "event_dialog_end", &mut draft.end);
                        });
                    }

                    labeled_row(ui, "Category:", |ui| {
                        let selected = draft
                            .category
                            .as_deref()
                            .and_then(|value| palette.find(value))
                            .map(|category| category.label.clone())
                            .unwrap_or_else(|| "None".to_string());
                        egui::ComboBox::from_id_source("event_dialog_category")
                            .width(160.0)
                            .selected_text(selected)
                            .show_ui(ui, |ui| {
                                ui.selectable_value(&mut draft.category, None, "None");
                                for category in palette.categories() {
                                    let swatch = RichText::new("⏺").color(event_fill(&category.color));
                                    ui.horizontal(|ui| {
                                        ui.label(swatch);
                                        ui.selectable_value(
                                            &mut draft.category,
                                            Some(category.value.clone()),
                                            category.label.as_str(),
                                        );
                                    });
                                }
                            });
                    });

                    ui.label("Notes:");
                    ui.add(
                        egui::TextEdit::multiline(&mut draft.notes)
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );

                    if let Err(message) = draft.validate() {
                        ui.label(RichText::new(message).small().color(ui.visuals().warn_fg_color));
                    }

                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button("Save").clicked() {
                            action = Some(DialogAction::Submit);
                        }
                        if ui.button("Cancel").clicked() {
                            action = Some(DialogAction::Cancel);
                        }
                        if let Some(id) = &edit_id {
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("Delete").clicked() {
                                    action = Some(DialogAction::RequestDelete(id.clone()));
                                }
                            });
                        }
                    });
                });
        }
    }

    if !window_open {
        action = Some(DialogAction::Cancel);
    }
    action
}
