use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Fixed advance per character; stable across machines, which keeps SVG output reproducible.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let font_size = style.font_size.max(1.0);
        TextMetrics {
            width: text.chars().count() as f64 * font_size * char_width_factor,
            height: font_size * line_height_factor,
        }
    }
}

const ELLIPSIS: char = '\u{2026}';

/// Shortens `text` with a trailing ellipsis until it measures at most `max_width`.
///
/// Returns an empty string when not even the ellipsis fits.
pub fn fit_label(
    text: &str,
    max_width: f64,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> String {
    if measurer.measure(text, style).width <= max_width {
        return text.to_string();
    }
    let chars = text.chars().collect::<Vec<_>>();
    for keep in (0..chars.len()).rev() {
        let mut candidate = chars[..keep].iter().collect::<String>();
        candidate.push(ELLIPSIS);
        if measurer.measure(&candidate, style).width <= max_width {
            return candidate;
        }
    }
    String::new()
}
