//! Page-window helpers shared by every list operation.

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Hard upper bound on items per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Resolve a `(limit, offset)` window.
///
/// A 1-based `page` (with optional `page_size`) takes precedence over
/// `limit`/`offset` when present.
pub fn resolve_window(
    limit: Option<i64>,
    offset: Option<i64>,
    page: Option<i64>,
    page_size: Option<i64>,
) -> (i64, i64) {
    match page {
        Some(page) => {
            let size = clamp_limit(page_size.or(limit), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
            let page = page.max(1);
            (size, (page - 1).saturating_mul(size))
        }
        None => (
            clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            clamp_offset(offset),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 10, 100), 10);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(500), 10, 100), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(0), 10, 100), 1);
        assert_eq!(clamp_limit(Some(-3), 10, 100), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-7)), 0);
        assert_eq!(clamp_offset(Some(30)), 30);
    }

    #[test]
    fn page_takes_precedence_over_offset() {
        assert_eq!(resolve_window(Some(5), Some(99), Some(3), Some(20)), (20, 40));
    }

    #[test]
    fn page_zero_is_first_page() {
        assert_eq!(resolve_window(None, None, Some(0), None), (10, 0));
    }

    #[test]
    fn limit_offset_without_page() {
        assert_eq!(resolve_window(Some(25), Some(50), None, None), (25, 50));
        assert_eq!(resolve_window(None, None, None, None), (10, 0));
    }
}
