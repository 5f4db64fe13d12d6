//! Parse errors for raw form values.

/// Result type for parsing helpers.
pub type ParseResult<T> = Result<T, ParseError>;

/// A raw form value could not be turned into a typed quantity.
///
/// Parse errors are always recoverable: cross-field checks treat them as
/// "not yet checkable" and leave the plain field constraints to report them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Blank input (or an empty time portion of a timestamp).
    #[error("value is empty")]
    Empty,

    /// A clock-time string did not have exactly three `:`-separated segments.
    #[error("expected 3 ':'-separated segments, found {found}")]
    SegmentCount { found: usize },

    #[error("'{value}' is not a number")]
    NotNumeric { value: String },

    #[error("'{value}' must not be negative")]
    Negative { value: String },

    #[error("'{value}' is not a recognised date and time")]
    InvalidTimestamp { value: String },
}

/// Parse a finite floating point number, ignoring surrounding whitespace.
pub fn parse_number(raw: &str) -> ParseResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::NotNumeric {
            value: trimmed.to_string(),
        }),
    }
}

/// Like [`parse_number`] but rejects negative values.
pub(crate) fn parse_non_negative(raw: &str) -> ParseResult<f64> {
    let value = parse_number(raw)?;
    if value < 0.0 {
        return Err(ParseError::Negative {
            value: raw.trim().to_string(),
        });
    }
    Ok(value)
}
