//! Shared query vocabulary for the class-change and permission histories.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Ordering of history rows by their change timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Inclusive date-range filter. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl DateRange {
    pub fn new(from: Option<Timestamp>, to: Option<Timestamp>) -> Result<Self, CoreError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(CoreError::Validation(
                    "date range start must not be after its end".into(),
                ));
            }
        }
        Ok(Self { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn default_sort_is_newest_first() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!(SortOrder::default().as_sql(), "DESC");
    }

    #[test]
    fn sort_order_parses_lowercase() {
        let order: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order, SortOrder::Asc);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let now = Utc::now();
        let result = DateRange::new(Some(now), Some(now - Duration::days(1)));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn equal_bounds_are_accepted() {
        let now = Utc::now();
        assert!(DateRange::new(Some(now), Some(now)).is_ok());
    }
}
