//! Shared missing-value policy for numeric cells.
//!
//! Every stage reads numbers through [`parse_number`], so blank cells, `NaN`
//! markers and junk text are treated identically everywhere in the pipeline.

/// Tokens that mean "no value" regardless of case.
const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "nan", "none", "null", "."];

/// Parse a cell into a finite number, or `None` if the cell is missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if is_missing_token(trimmed) {
        return None;
    }
    let cleaned = trimmed.replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_missing_token(trimmed: &str) -> bool {
    MISSING_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(trimmed))
}

/// Parse a text cell, returning `None` for missing markers.
pub fn parse_text(cell: &str) -> Option<&str> {
    let trimmed = cell.trim();
    if is_missing_token(trimmed) {
        None
    } else {
        Some(trimmed)
    }
}

/// Decimal precision used when a derived value is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Currency and energy quantities (2 decimals)
    Amount,
    /// Fractions, rates and emissions (4 decimals)
    Fraction,
    /// Whole numbers such as scores
    Whole,
    /// Sums of source values, kept fine enough to equal their re-read parts
    Full,
}

impl Precision {
    const fn decimals(self) -> i32 {
        match self {
            Self::Amount => 2,
            Self::Fraction => 4,
            Self::Whole => 0,
            Self::Full => 9,
        }
    }
}

/// Round half away from zero to the given precision.
pub fn round_to(value: f64, precision: Precision) -> f64 {
    let factor = 10f64.powi(precision.decimals());
    let rounded = (value * factor).round() / factor;
    // Avoid writing "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format a derived value for the table. `None` becomes an empty cell.
pub fn format_number(value: Option<f64>, precision: Precision) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}", round_to(v, precision)),
        _ => String::new(),
    }
}
