//! # Filters, Orders & Sortable Columns
//!
//! Value types the list controller keeps in its filter and order sets, plus
//! [`SortableColumns`], the table-header helper that accumulates multi-column
//! sort state one header click at a time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single `key = value` filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Filter {
    pub key: String,
    pub value: String,
}

impl Filter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Sort direction as sent to the backend. `None` means "unsorted".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[default]
    #[serde(rename = "DESC")]
    Desc,
    #[serde(rename = "")]
    None,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
            SortDirection::None => "",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            "" => Ok(SortDirection::None),
            other => Err(format!("Unknown sort direction: {}", other)),
        }
    }
}

/// Sort on one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Order {
    pub column: String,
    pub direction: SortDirection,
}

impl Order {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Accumulated multi-column sort state driven by header clicks.
///
/// Sorting an already-sorted column changes its direction in place, and an
/// empty direction drops it. Sorting a new column appends it, so the first
/// column clicked keeps the highest priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortableColumns {
    orders: Vec<Order>,
}

impl SortableColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_sorted(&mut self, sorted: Order) -> &[Order] {
        if sorted.column.is_empty() {
            return &self.orders;
        }
        match self.orders.iter().position(|o| o.column == sorted.column) {
            Some(pos) if sorted.direction == SortDirection::None => {
                self.orders.remove(pos);
            }
            Some(pos) => self.orders[pos].direction = sorted.direction,
            None => self.orders.push(sorted),
        }
        &self.orders
    }

    pub fn reset_sortings(&mut self) {
        self.orders.clear();
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}
