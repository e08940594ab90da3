//! Row query builder
//!
//! Renders the filter/order/limit query pairs the backend's row API
//! understands, including embedded child selections such as
//! `select=*,order_items(*)`. Rendering is deterministic: pairs appear in
//! the order the builder calls were made, with `select` first.

/// Builder for a row read (or the filter part of an update/delete)
#[derive(Debug, Clone)]
pub struct RowQuery {
    select: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<u32>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self {
            select: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Columns to select, `*` by default. Embedded children use the
    /// `child_table(*)` form.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = columns.into();
        self
    }

    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn neq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "neq", value)
    }

    pub fn gt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "gt", value)
    }

    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "lt", value)
    }

    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "lte", value)
    }

    /// Membership filter: `status=in.(PENDING,PREPARING)`
    pub fn in_list(mut self, column: &str, values: &[&str]) -> Self {
        self.filters
            .push((column.to_string(), format!("in.({})", values.join(","))));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push((column.to_string(), "is.null".into()));
        self
    }

    fn filter(mut self, column: &str, op: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("{op}.{}", value.to_string())));
        self
    }

    /// Sort key. Repeated calls append further columns:
    /// `order=zone.asc,name.asc`
    pub fn order_by(mut self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        self.order.push(format!("{column}.{direction}"));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Query pairs for the HTTP layer; percent-encoding happens there.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.select.clone())];
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Logical rendering, used in logs and tests.
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Filter pairs only (no select/order/limit), the shape updates and
    /// deletes scope their rows with.
    pub fn to_filter_pairs(&self) -> Vec<(String, String)> {
        self.filters.clone()
    }
}

impl Default for RowQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        assert_eq!(RowQuery::new().to_query_string(), "select=*");
    }

    #[test]
    fn test_single_filter() {
        let query = RowQuery::new().eq("status", "PENDING");
        assert_eq!(query.to_query_string(), "select=*&status=eq.PENDING");
    }

    #[test]
    fn test_embedded_children_with_order_and_limit() {
        let query = RowQuery::new()
            .select("*,order_items(*)")
            .eq("status", "PENDING")
            .order_by("created_at", true)
            .limit(50);
        assert_eq!(
            query.to_query_string(),
            "select=*,order_items(*)&status=eq.PENDING&order=created_at.desc&limit=50"
        );
    }

    #[test]
    fn test_range_filters_keep_call_order() {
        let query = RowQuery::new()
            .gte("created_at", "2024-03-01T00:00:00Z")
            .lt("created_at", "2024-04-01T00:00:00Z");
        assert_eq!(
            query.to_query_string(),
            "select=*&created_at=gte.2024-03-01T00:00:00Z&created_at=lt.2024-04-01T00:00:00Z"
        );
    }

    #[test]
    fn test_multi_column_order() {
        let query = RowQuery::new()
            .order_by("zone", false)
            .order_by("name", false);
        assert_eq!(query.to_query_string(), "select=*&order=zone.asc,name.asc");
    }

    #[test]
    fn test_in_list() {
        let query = RowQuery::new().in_list("status", &["PENDING", "PREPARING", "READY"]);
        assert_eq!(
            query.to_query_string(),
            "select=*&status=in.(PENDING,PREPARING,READY)"
        );
    }

    #[test]
    fn test_is_null() {
        let query = RowQuery::new().is_null("invoice_id");
        assert_eq!(query.to_query_string(), "select=*&invoice_id=is.null");
    }

    #[test]
    fn test_filter_pairs_exclude_select() {
        let query = RowQuery::new().eq("id", "abc").limit(1);
        assert_eq!(
            query.to_filter_pairs(),
            vec![("id".to_string(), "eq.abc".to_string())]
        );
    }
}
