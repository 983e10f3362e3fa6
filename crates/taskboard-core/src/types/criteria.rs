//! Request-side query description: predicates, ordering, and a page window.

use super::filter::Predicate;
use super::sorting::Ordered;
use super::value::SqlValue;
use crate::error::AppError;
use crate::result::AppResult;

/// Page size used when a caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u64 = 30;

/// Largest `LIMIT` or `OFFSET` PostgreSQL accepts.
const MAX_WINDOW: u64 = i64::MAX as u64;

/// Predicates, ordering, and the page to fetch.
///
/// Top-level predicates are combined with `AND`. Page numbers are 1-based:
/// page `N` covers rows `(N-1) * size ..= N * size - 1`.
#[derive(Debug, Clone)]
pub struct Criteria {
    filters: Vec<Predicate>,
    order_by: Vec<Ordered>,
    page_size: u64,
    page_number: u64,
}

impl Criteria {
    /// Empty criteria for the given window. Both numbers must be at least 1,
    /// and the window must fit a PostgreSQL `BIGINT`.
    pub fn new(page_number: u64, page_size: u64) -> AppResult<Self> {
        if page_number < 1 {
            return Err(AppError::validation(format!(
                "page_number must be at least 1, got {page_number}"
            )));
        }
        if page_size < 1 {
            return Err(AppError::validation(format!(
                "page_size must be at least 1, got {page_size}"
            )));
        }
        let offset = (page_number - 1).checked_mul(page_size);
        if page_size > MAX_WINDOW || offset.is_none_or(|offset| offset > MAX_WINDOW) {
            return Err(AppError::validation(format!(
                "page {page_number} of size {page_size} is out of range"
            )));
        }
        Ok(Self {
            filters: Vec::new(),
            order_by: Vec::new(),
            page_size,
            page_number,
        })
    }

    /// Add a predicate.
    pub fn filter(mut self, predicate: impl Into<Predicate>) -> Self {
        self.filters.push(predicate.into());
        self
    }

    /// Add an ordering clause. Clauses apply in insertion order.
    pub fn order_by(mut self, ordered: Ordered) -> Self {
        self.order_by.push(ordered);
        self
    }

    /// Add a predicate in place.
    pub fn push_filter(&mut self, predicate: impl Into<Predicate>) {
        self.filters.push(predicate.into());
    }

    /// Add an ordering clause in place.
    pub fn push_order(&mut self, ordered: Ordered) {
        self.order_by.push(ordered);
    }

    /// Top-level predicates, joined with `AND` when rendered.
    pub fn filters(&self) -> &[Predicate] {
        &self.filters
    }

    /// Ordering clauses in insertion order.
    pub fn orders(&self) -> &[Ordered] {
        &self.order_by
    }

    /// Rows per page.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// 1-based page number.
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// SQL `LIMIT`.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// SQL `OFFSET`. Bounded by the check in [`Criteria::new`].
    pub fn offset(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// Parameters of every predicate, in rendering order.
    pub fn values(&self) -> Vec<SqlValue> {
        self.filters.iter().flat_map(Predicate::values).collect()
    }

    /// Qualify every unqualified attribute with `table`.
    pub fn with_table(self, table: &str) -> Self {
        Self {
            filters: self
                .filters
                .into_iter()
                .map(|p| p.with_table(table))
                .collect(),
            order_by: self
                .order_by
                .into_iter()
                .map(|o| o.with_table(table))
                .collect(),
            ..self
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            order_by: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::filter::testing::eq;

    #[test]
    fn test_window_arithmetic() {
        let criteria = Criteria::new(3, 10).unwrap();
        assert_eq!(criteria.limit(), 10);
        assert_eq!(criteria.offset(), 20);
        assert_eq!(Criteria::default().offset(), 0);
        assert_eq!(Criteria::default().limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_zero_page_rejected() {
        assert!(Criteria::new(0, 10).is_err());
        assert!(Criteria::new(1, 0).is_err());
    }

    #[test]
    fn test_window_beyond_bigint_rejected() {
        let err = Criteria::new(u64::MAX, 100).unwrap_err();
        assert!(err.is(crate::error::ErrorKind::Validation));
        assert!(Criteria::new(u64::MAX / 100, 100).is_err());
        assert!(Criteria::new(1, u64::MAX).is_err());

        let last = Criteria::new(i64::MAX as u64 / 100 + 1, 100).unwrap();
        assert!(last.offset() <= i64::MAX as u64);
    }

    #[test]
    fn test_values_in_filter_order() {
        let criteria = Criteria::default()
            .filter(eq("username", "alice"))
            .filter(eq("age", 30));
        let values: Vec<String> = criteria.values().iter().map(ToString::to_string).collect();
        assert_eq!(values, vec!["alice", "30"]);
    }

    #[test]
    fn test_with_table() {
        let criteria = Criteria::default().filter(eq("id", "x")).with_table("tbl_board");
        assert_eq!(criteria.filters()[0].to_definition(), "tbl_board.id = ?");
    }
}
