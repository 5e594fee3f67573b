use serde::Serialize;

/// One page of a filtered list plus the full filtered count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}
