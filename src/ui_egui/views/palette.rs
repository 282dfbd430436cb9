use egui::Color32;

use crate::services::category::DEFAULT_EVENT_COLOR;

/// Parse a `#rrggbb` category color.
pub fn parse_color(hex: &str) -> Option<Color32> {
    if hex.is_empty() {
        return None;
    }

    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color32::from_rgb(r, g, b))
}

/// Category color for an event box, falling back to the default blue.
pub fn event_fill(hex: &str) -> Color32 {
    parse_color(hex)
        .or_else(|| parse_color(DEFAULT_EVENT_COLOR))
        .unwrap_or(Color32::from_rgb(59, 130, 246))
}

pub fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Dark text on pastel fills, white text on saturated ones.
pub fn text_on(fill: Color32) -> Color32 {
    let luminance =
        0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luminance > 160.0 {
        Color32::from_rgb(30, 41, 59)
    } else {
        Color32::WHITE
    }
}

#[derive(Clone, Copy)]
pub(crate) struct TimelinePalette {
    pub canvas_bg: Color32,
    pub hour_line: Color32,
    pub half_hour_line: Color32,
    pub hour_label: Color32,
    pub now_line: Color32,
    pub drag_guide: Color32,
    pub strip_bg: Color32,
    pub strip_border: Color32,
    pub muted_text: Color32,
}

impl TimelinePalette {
    pub fn from_ui(ui: &egui::Ui) -> Self {
        let visuals = ui.visuals();
        let is_dark = visuals.dark_mode;
        Self {
            canvas_bg: visuals.extreme_bg_color,
            hour_line: visuals.widgets.noninteractive.bg_stroke.color,
            half_hour_line: with_alpha(
                visuals.widgets.noninteractive.bg_stroke.color,
                if is_dark { 60 } else { 80 },
            ),
            hour_label: visuals.weak_text_color(),
            now_line: Color32::from_rgb(239, 68, 68),
            drag_guide: Color32::from_rgb(59, 130, 246),
            strip_bg: visuals.faint_bg_color,
            strip_border: visuals.widgets.noninteractive.bg_stroke.color,
            muted_text: visuals.weak_text_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ef4444"), Some(Color32::from_rgb(239, 68, 68)));
        assert_eq!(parse_color("3b82f6"), Some(Color32::from_rgb(59, 130, 246)));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_event_fill_falls_back() {
        assert_eq!(event_fill("not a color"), Color32::from_rgb(59, 130, 246));
    }

    #[test]
    fn test_text_contrast() {
        assert_eq!(text_on(Color32::from_rgb(220, 252, 231)), Color32::from_rgb(30, 41, 59));
        assert_eq!(text_on(Color32::from_rgb(59, 130, 246)), Color32::WHITE);
    }
}
