//! Cell value → display text

use crate::document::{CellValue, Opaque};

/// Marker shown for values with no textual form
pub const VALUE_ERROR: &str = "#VALUE!";

/// Characters kept per pixel of cell width before layout
const CHARS_PER_PIXEL: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Text ready to be laid out inside one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellText {
    pub text: String,
    pub align: Align,
    /// Drawn with the error color
    pub is_error: bool,
}

/// Upper bound on characters laid out for a cell of `width` pixels.
pub fn char_budget(width: i64) -> usize {
    ((width.max(0) as f64) * CHARS_PER_PIXEL) as usize
}

/// First line of `text`, cut to `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> &str {
    let line = text.lines().next().unwrap_or("");
    match line.char_indices().nth(max_chars) {
        Some((end, _)) => &line[..end],
        None => line,
    }
}

/// Display text for a value in a cell of `width` pixels; `None` for blanks.
pub fn cell_text(value: &CellValue, width: i64) -> Option<CellText> {
    let (text, align, is_error) = match value {
        CellValue::Null => return None,
        CellValue::Text(text) if text.is_empty() => return None,
        CellValue::Text(_) | CellValue::Bool(_) => (value.to_string(), Align::Left, false),
        CellValue::Int(_) | CellValue::Float(_) | CellValue::Temporal(_) => {
            (value.to_string(), Align::Right, false)
        }
        CellValue::Opaque(Opaque::Duration(_)) => (value.to_string(), Align::Right, false),
        CellValue::Opaque(_) => (VALUE_ERROR.to_string(), Align::Left, true),
    };

    let text = truncate(&text, char_budget(width)).to_string();
    if text.is_empty() {
        return None;
    }
    Some(CellText {
        text,
        align,
        is_error,
    })
}

/// Header label of a table column.
pub fn header_text(name: &str, width: i64) -> Option<CellText> {
    let text = truncate(name, char_budget(width));
    (!text.is_empty()).then(|| CellText {
        text: text.to_string(),
        align: Align::Left,
        is_error: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_truncate_first_line() {
        assert_eq!(truncate("hello\nworld", 100), "hello");
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("åäö", 2), "åä");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_budget_scales_with_width() {
        assert_eq!(char_budget(65), 13);
        assert_eq!(char_budget(4), 0);
        assert_eq!(char_budget(-10), 0);
    }

    #[test]
    fn test_alignment_by_type() {
        let number = cell_text(&CellValue::Int(42), 65).unwrap();
        assert_eq!(number.align, Align::Right);
        assert_eq!(number.text, "42");

        let text = cell_text(&CellValue::from("abc"), 65).unwrap();
        assert_eq!(text.align, Align::Left);

        assert!(cell_text(&CellValue::Null, 65).is_none());
    }

    #[test]
    fn test_opaque_values() {
        let list = CellValue::Opaque(Opaque::List(vec![CellValue::Int(1)]));
        let shown = cell_text(&list, 65).unwrap();
        assert_eq!(shown.text, VALUE_ERROR);
        assert!(shown.is_error);

        let duration = CellValue::Opaque(Opaque::Duration(TimeDelta::seconds(61)));
        assert_eq!(cell_text(&duration, 65).unwrap().text, "1m 1s");
    }
}
