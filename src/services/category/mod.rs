//! Category color lookup for event boxes.
//!
//! Categories are matched by value or by case-insensitive label; anything
//! unknown falls back to the default event color.

/// Color used for events without a known category.
pub const DEFAULT_EVENT_COLOR: &str = "#3b82f6";

/// A category known to the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCategory {
    pub value: String,
    pub label: String,
    /// Hex color code (e.g. "#ef4444")
    pub color: String,
}

impl CalendarCategory {
    pub fn new(value: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            color: color.into(),
        }
    }

    /// Category derived from a user-defined name, e.g. "Board Meetings" -> "board_meetings".
    pub fn from_name(name: &str, color: impl Into<String>) -> Self {
        let value = name
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        Self::new(value, name.trim(), color)
    }
}

/// Built-in categories available before any user-defined ones.
pub fn default_categories() -> Vec<CalendarCategory> {
    vec![
        CalendarCategory::new("legal", "Legal", "#ef4444"),
        CalendarCategory::new("family", "Family", "#dcfce7"),
        CalendarCategory::new("holidays", "Holidays", "#fde047"),
        CalendarCategory::new("finance", "Finance", "#bfdbfe"),
        CalendarCategory::new("health", "Health", "#f3e8ff"),
        CalendarCategory::new("work", "Work", "#fed7aa"),
        CalendarCategory::new("personal", "Personal", "#fce7f3"),
    ]
}

/// Resolves event categories to display colors.
#[derive(Debug, Clone)]
pub struct CategoryPalette {
    categories: Vec<CalendarCategory>,
}

impl CategoryPalette {
    pub fn new(categories: Vec<CalendarCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[CalendarCategory] {
        &self.categories
    }

    pub fn find(&self, category: &str) -> Option<&CalendarCategory> {
        self.categories.iter().find(|candidate| {
            candidate.value == category || candidate.label.eq_ignore_ascii_case(category)
        })
    }

    pub fn color_for(&self, category: Option<&str>) -> &str {
        category
            .and_then(|category| self.find(category))
            .map(|found| found.color.as_str())
            .unwrap_or(DEFAULT_EVENT_COLOR)
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_value_and_label() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.color_for(Some("legal")), "#ef4444");
        assert_eq!(palette.color_for(Some("WORK")), "#fed7aa");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.color_for(Some("gardening")), DEFAULT_EVENT_COLOR);
        assert_eq!(palette.color_for(None), DEFAULT_EVENT_COLOR);
    }

    #[test]
    fn test_user_category_value_from_name() {
        let category = CalendarCategory::from_name(" Board  Meetings ", "#123456");
        assert_eq!(category.value, "board_meetings");
        assert_eq!(category.label, "Board  Meetings");

        let palette = CategoryPalette::new(vec![category]);
        assert_eq!(palette.color_for(Some("board_meetings")), "#123456");
    }
}
