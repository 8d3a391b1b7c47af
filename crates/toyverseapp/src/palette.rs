//! Badge colors for toy types.
//!
//! [`TypeColors`] hands out colors from a fixed palette in the order types are
//! first seen, wrapping around once the palette is exhausted. Keys are the
//! trimmed, lower-cased type, so `"Lego"` and `" lego "` share a color. The
//! assignment lives as long as the `TypeColors` value; nothing is persisted.
//!
//! The assigner takes `&mut self`. Share it across threads only behind a lock.

use std::collections::HashMap;

/// Red, blue, yellow, green, pink, purple, orange, indigo, magenta, teal.
pub const PALETTE: [&str; 10] = [
    "#ff4d4d", "#33ccff", "#ffcc00", "#94ff33", "#ff6b6b", "#cc99ff", "#ff9966", "#6666ff",
    "#ff66a3", "#33ff99",
];

/// Color for an absent or blank type.
pub const DEFAULT_COLOR: &str = "#666666";

#[derive(Debug, Clone)]
pub struct TypeColors {
    palette: &'static [&'static str],
    assigned: HashMap<String, &'static str>,
    next: usize,
}

impl Default for TypeColors {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeColors {
    pub fn new() -> Self {
        Self::with_palette(&PALETTE)
    }

    /// An assigner over a custom palette. An empty palette yields [`DEFAULT_COLOR`] for everything.
    pub fn with_palette(palette: &'static [&'static str]) -> Self {
        Self {
            palette,
            assigned: HashMap::new(),
            next: 0,
        }
    }

    /// The color for `toy_type`, assigning the next palette entry on first sight.
    pub fn color_for(&mut self, toy_type: Option<&str>) -> &'static str {
        let key = match toy_type.map(|t| t.trim().to_lowercase()) {
            Some(key) if !key.is_empty() => key,
            _ => return DEFAULT_COLOR,
        };
        if let Some(&color) = self.assigned.get(&key) {
            return color;
        }
        let Some(&color) = self.palette.get(self.next) else {
            return DEFAULT_COLOR;
        };
        self.next = (self.next + 1) % self.palette.len();
        self.assigned.insert(key, color);
        color
    }

    /// The color already assigned to `toy_type`, without assigning one.
    pub fn peek(&self, toy_type: &str) -> Option<&'static str> {
        self.assigned
            .get(&toy_type.trim().to_lowercase())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
