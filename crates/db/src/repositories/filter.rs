//! Dynamic WHERE-clause building shared by the filtered list queries.

use jdl_core::types::Timestamp;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// Typed bind value for dynamically-built queries.
#[derive(Debug, Clone)]
pub(crate) enum BindValue {
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// Accumulates `AND`-joined conditions and their bind values.
///
/// Each condition template uses `{}` as the placeholder for its own bind
/// parameter; the placeholder may appear more than once.
#[derive(Debug, Default)]
pub(crate) struct Filter {
    conditions: Vec<String>,
    values: Vec<BindValue>,
}

impl Filter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a condition bound to `value`.
    pub(crate) fn push(&mut self, template: &str, value: BindValue) {
        let placeholder = format!("${}", self.values.len() + 1);
        self.conditions.push(template.replace("{}", &placeholder));
        self.values.push(value);
    }

    /// `column = $n` when `value` is present.
    pub(crate) fn eq_text(&mut self, column: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.push(&format!("{column} = {{}}"), BindValue::Text(v.to_string()));
        }
    }

    /// Case-insensitive substring match over one or more columns.
    pub(crate) fn search(&mut self, columns: &[&str], term: Option<&str>) {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return;
        };
        let clauses: Vec<String> = columns.iter().map(|c| format!("{c} ILIKE {{}}")).collect();
        self.push(
            &format!("({})", clauses.join(" OR ")),
            BindValue::Text(format!("%{}%", escape_like(term))),
        );
    }

    /// Inclusive timestamp bounds on `column`.
    pub(crate) fn range(&mut self, column: &str, from: Option<Timestamp>, to: Option<Timestamp>) {
        if let Some(from) = from {
            self.push(&format!("{column} >= {{}}"), BindValue::Timestamp(from));
        }
        if let Some(to) = to {
            self.push(&format!("{column} <= {{}}"), BindValue::Timestamp(to));
        }
    }

    /// The clause, empty when no conditions are active.
    pub(crate) fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Index of the first bind parameter after the filter's own.
    pub(crate) fn next_index(&self) -> usize {
        self.values.len() + 1
    }

    pub(crate) fn bind_as<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }

    pub(crate) fn bind_scalar<'q>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    ) -> QueryScalar<'q, Postgres, i64, PgArguments> {
        for val in &self.values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let filter = Filter::new();
        assert_eq!(filter.where_clause(), "");
        assert_eq!(filter.next_index(), 1);
    }

    #[test]
    fn placeholders_are_numbered_in_order() {
        let mut filter = Filter::new();
        filter.eq_text("status", Some("active"));
        filter.eq_text("team_id", None);
        filter.search(&["name", "email"], Some("sora"));
        assert_eq!(
            filter.where_clause(),
            "WHERE status = $1 AND (name ILIKE $2 OR email ILIKE $2)"
        );
        assert_eq!(filter.next_index(), 3);
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut filter = Filter::new();
        filter.search(&["name"], Some("   "));
        assert_eq!(filter.where_clause(), "");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
