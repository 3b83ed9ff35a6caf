//! Sort-key filtering.

use super::Whitelist;
use crate::SortField;

impl Whitelist {
    /// Keep the sort fields whose name is whitelisted, in their original
    /// order. Directions pass through unchanged.
    ///
    /// ```
    /// use mik_filter::{DataType, FieldSpec, SortField, Whitelist};
    ///
    /// let whitelist = Whitelist::new([
    ///     FieldSpec::new("a", DataType::String),
    ///     FieldSpec::new("b", DataType::String),
    /// ]);
    /// let orders = [SortField::asc("a"), SortField::desc("unknown"), SortField::desc("b")];
    /// assert_eq!(
    ///     whitelist.filter_orders(&orders),
    ///     [SortField::asc("a"), SortField::desc("b")]
    /// );
    /// ```
    #[must_use]
    pub fn filter_orders(&self, orders: &[SortField]) -> Vec<SortField> {
        orders
            .iter()
            .filter(|order| {
                let known = self.contains(&order.field);
                if !known {
                    tracing::debug!(field = %order.field, "sort field rejected");
                }
                known
            })
            .cloned()
            .collect()
    }
}
