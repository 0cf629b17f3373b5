use super::model::Cell;

// ---------------------------------------------------------------------------
// Value – a cell classified for comparison and formatting
// ---------------------------------------------------------------------------

/// The normalized form of a [`Cell`]. Every cell maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Numeric(f64),
    Text(&'a str),
    Missing,
}

impl Cell {
    /// Classify the cell.
    ///
    /// * Numbers and strings that parse fully as a finite decimal number
    ///   (surrounding whitespace ignored) → [`Value::Numeric`]
    /// * Empty or whitespace-only strings, non-finite numbers → [`Value::Missing`]
    /// * Anything else → [`Value::Text`]
    pub fn normalize(&self) -> Value<'_> {
        match self {
            Cell::Number(n) if n.is_finite() => Value::Numeric(*n),
            Cell::Number(_) | Cell::Missing => Value::Missing,
            Cell::Text(s) => {
                if s.trim().is_empty() {
                    Value::Missing
                } else if let Some(n) = parse_number(s) {
                    Value::Numeric(n)
                } else {
                    Value::Text(s)
                }
            }
        }
    }

    /// Shorthand for the numeric reading of the cell, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self.normalize() {
            Value::Numeric(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.normalize(), Value::Missing)
    }
}

/// Parse a full decimal literal. `"12abc"`, `"inf"` and `"NaN"` are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

// ---------------------------------------------------------------------------
// Display formatting for table cells
// ---------------------------------------------------------------------------

/// Placeholder shown for missing cells.
pub const MISSING_PLACEHOLDER: &str = "—";

/// Render a cell for display.
///
/// Large numbers (|n| ≥ 1000) get thousands separators and up to three
/// decimals, other fractional numbers up to six decimals with trailing zeros
/// trimmed, whole numbers print plainly.
pub fn format_cell(cell: &Cell) -> String {
    match cell.normalize() {
        Value::Missing => MISSING_PLACEHOLDER.to_string(),
        Value::Text(s) => s.to_string(),
        Value::Numeric(n) if n.abs() >= 1000.0 => group_thousands(&trim_decimals(n, 3)),
        Value::Numeric(n) if n.fract() != 0.0 => trim_decimals(n, 6),
        Value::Numeric(n) => format!("{n}"),
    }
}

fn trim_decimals(n: f64, places: usize) -> String {
    let s = format!("{n:.places$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn group_thousands(s: &str) -> String {
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
