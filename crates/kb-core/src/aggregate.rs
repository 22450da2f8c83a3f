//! Aggregation engine: one-pass sum/avg/min/max over a dataset column

use std::fmt;

use crate::data::{CellValue, Dataset};
use crate::kpi::{AggregationKind, Kpi};

/// Display text for "cannot compute"
pub const NO_DATA: &str = "—";

/// Result of computing a KPI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayValue {
    /// Missing dataset, column, kind or numeric values
    NoData,
    /// Plain number (sum, min, max)
    Number(f64),
    /// Number shown with two decimals (avg)
    Fixed2(f64),
}

impl DisplayValue {
    pub fn is_no_data(&self) -> bool {
        matches!(self, DisplayValue::NoData)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            DisplayValue::NoData => None,
            DisplayValue::Number(v) | DisplayValue::Fixed2(v) => Some(*v),
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::NoData => f.write_str(NO_DATA),
            DisplayValue::Number(v) | DisplayValue::Fixed2(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            DisplayValue::Number(v) => f.write_str(&plain_number(*v)),
            DisplayValue::Fixed2(v) => f.write_str(&fixed2(*v)),
        }
    }
}

/// Shortest round-trip text, switching to exponent form below 1e-6 and
/// from 1e21 up; `-0` prints as `0`
fn plain_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    // `{:e}` gives the shortest digits, e.g. "-1.25e-7"
    let sci = format!("{:e}", v.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit
    let n = exp + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let rest = if k > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits.clone()
        };
        format!("{}e{}{}", rest, sign, (n - 1).abs())
    };

    if v < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Two decimals with exact ties rounded away from zero (0.125 -> "0.13")
fn fixed2(v: f64) -> String {
    if !v.is_finite() || v.abs() >= 1e21 {
        return plain_number(v);
    }

    let magnitude = v.abs();
    // Exact decimal expansion; an f64 never needs more than 1074 places
    let exact = format!("{:.1074}", magnitude);
    let is_tie = exact
        .split_once('.')
        .map(|(_, frac)| frac.as_bytes().get(2) == Some(&b'5') && frac[3..].bytes().all(|b| b == b'0'))
        .unwrap_or(false);

    let rounded = if is_tie {
        // Nudge just above the tie so the formatter rounds up
        format!("{:.2}", f64::from_bits(magnitude.to_bits() + 1))
    } else {
        format!("{:.2}", magnitude)
    };

    if v < 0.0 {
        format!("-{}", rounded)
    } else {
        rounded
    }
}

/// Compute the display value of a KPI against the current dataset
pub fn compute_kpi(dataset: &Dataset, kpi: &Kpi) -> DisplayValue {
    if dataset.is_empty() {
        return DisplayValue::NoData;
    }
    let Some(column) = kpi.column.as_deref() else {
        return DisplayValue::NoData;
    };
    let Some(kind) = kpi.kind.as_ref() else {
        return DisplayValue::NoData;
    };

    let values = numeric_column(dataset, column);
    if values.is_empty() {
        return DisplayValue::NoData;
    }

    match kind {
        AggregationKind::Sum => DisplayValue::Number(values.iter().sum()),
        AggregationKind::Avg => {
            DisplayValue::Fixed2(values.iter().sum::<f64>() / values.len() as f64)
        }
        AggregationKind::Min => DisplayValue::Number(values.iter().copied().fold(f64::INFINITY, f64::min)),
        AggregationKind::Max => DisplayValue::Number(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        AggregationKind::Other(_) => DisplayValue::NoData,
    }
}

/// Numeric values of a column; non-numeric cells are skipped
pub fn numeric_column(dataset: &Dataset, column: &str) -> Vec<f64> {
    numeric_points(dataset, column)
        .into_iter()
        .map(|(_, v)| v)
        .collect()
}

/// Numeric values of a column paired with their row index
pub fn numeric_points(dataset: &Dataset, column: &str) -> Vec<(usize, f64)> {
    dataset
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| row.get(column).and_then(coerce_number).map(|v| (idx, v)))
        .collect()
}

/// Coerce a cell to a number
pub fn coerce_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if !n.is_nan() => Some(*n),
        CellValue::Number(_) => None,
        CellValue::Text(text) => parse_number_prefix(text),
        CellValue::Bool(_) => None,
    }
}

/// Parse the longest numeric prefix of a string ("12.5kg" -> 12.5)
fn parse_number_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut j = end + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - end - 1;
        if int_digits > 0 || frac_digits > 0 {
            end = j;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse::<f64>().ok()
}
