use chrono::NaiveDate;

/// Direction of the day-over-day change, driving the arrow glyph and the
/// color class in the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
    Flat,
    /// No resolved close (data missing or the provider failed).
    Unavailable,
}

impl ChangeDirection {
    /// Classify a percentage change by sign.
    pub fn from_change_pct(change_pct: f64) -> Self {
        if change_pct > 0.0 {
            ChangeDirection::Up
        } else if change_pct < 0.0 {
            ChangeDirection::Down
        } else {
            ChangeDirection::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            ChangeDirection::Up => "▲",
            ChangeDirection::Down => "▼",
            ChangeDirection::Flat | ChangeDirection::Unavailable => "-",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ChangeDirection::Up => "up",
            ChangeDirection::Down => "down",
            ChangeDirection::Flat => "flat",
            ChangeDirection::Unavailable => "na",
        }
    }
}

/// Resolved state of one market index for one run.
///
/// `close`, `change_pct` and `base_date` are either all present or all
/// absent; `direction` is `Unavailable` exactly when they are absent.
#[derive(Debug, Clone)]
pub struct IndexSummary {
    pub name: String,
    pub close: Option<f64>,
    pub change_pct: Option<f64>,
    pub direction: ChangeDirection,
    pub base_date: Option<NaiveDate>,
    pub error: Option<String>,
}

impl IndexSummary {
    /// Summary for an index whose data could not be resolved.
    pub fn unavailable(name: &str, error: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            close: None,
            change_pct: None,
            direction: ChangeDirection::Unavailable,
            base_date: None,
            error: Some(error.into()),
        }
    }
}

/// One row of a daily time series as returned by a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

/// Daily series table returned by a data source.
///
/// `has_close` records whether the source exposed a closing-price column at
/// all; a source can answer a symbol with a table that simply lacks it.
#[derive(Debug, Clone, Default)]
pub struct DailySeries {
    pub has_close: bool,
    pub rows: Vec<DailyRow>,
}

/// A configured index: display name plus the provider-specific symbol.
#[derive(Debug, Clone, Copy)]
pub struct IndexSpec {
    pub name: &'static str,
    pub symbol: &'static str,
}
