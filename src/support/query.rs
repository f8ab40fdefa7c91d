//! Builder for Google Ads Query Language strings.
//!
//! ```text
//! SELECT <fields> FROM <resource> [WHERE c1 AND c2 ...] [ORDER BY <field> ASC|DESC] [LIMIT n]
//! ```
//!
//! Conditions are collected in the order they are added and joined with `AND`. Date windows
//! are just another condition (`segments.date DURING LAST_7_DAYS` or `BETWEEN`).

use std::fmt::Write as _;

use super::date_range::DateWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    resource:   &'static str,
    fields:     Vec<&'static str>,
    conditions: Vec<String>,
    order_by:   Option<(&'static str, SortOrder)>,
    limit:      Option<i64>,
}

impl Query {
    pub fn select(fields: &[&'static str]) -> QueryFrom {
        QueryFrom {
            fields: fields.to_vec(),
        }
    }

    /// Append more selected fields
    pub fn and_select(mut self, fields: &[&'static str]) -> Self {
        for field in fields {
            if !self.fields.contains(field) {
                self.fields.push(field);
            }
        }
        self
    }

    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn filter_if(self, enabled: bool, condition: impl Into<String>) -> Self {
        if enabled { self.filter(condition) } else { self }
    }

    /// `field = id` when an id was supplied
    pub fn id_equals(self, field: &str, id: Option<&str>) -> Self {
        match id {
            Some(id) => self.filter(format!("{field} = {id}")),
            None => self,
        }
    }

    /// Exact status when one was requested, otherwise hide removed entities unless opted in
    pub fn status(self, field: &str, status: Option<&str>, include_removed: bool) -> Self {
        match status {
            Some(status) => self.filter(format!("{field} = {}", quote(status))),
            None if include_removed => self,
            None => self.filter(format!("{field} != 'REMOVED'")),
        }
    }

    pub fn during(self, window: &DateWindow) -> Self {
        match window.condition() {
            Some(condition) => self.filter(condition),
            None => self,
        }
    }

    pub fn order_by(mut self, field: &'static str, order: SortOrder) -> Self {
        self.order_by = Some((field, order));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(&self) -> String {
        let mut query = format!("SELECT {} FROM {}", self.fields.join(", "), self.resource);
        if !self.conditions.is_empty() {
            let _ = write!(query, " WHERE {}", self.conditions.join(" AND "));
        }
        if let Some((field, order)) = self.order_by {
            let _ = write!(query, " ORDER BY {field} {}", order.keyword());
        }
        if let Some(limit) = self.limit {
            let _ = write!(query, " LIMIT {limit}");
        }
        query
    }
}

/// Intermediate step of [`Query::select`] waiting for the resource
pub struct QueryFrom {
    fields: Vec<&'static str>,
}

impl QueryFrom {
    pub fn from(self, resource: &'static str) -> Query {
        Query {
            resource,
            fields: self.fields,
            conditions: Vec::new(),
            order_by: None,
            limit: None,
        }
    }
}

/// Single-quoted string literal with backslash escaping
pub fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
