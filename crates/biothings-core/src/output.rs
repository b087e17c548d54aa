//! Tagged result types returned by the clients

use crate::table::Table;
use serde_json::{json, Value};

/// Undecoded response bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutput {
    /// The call needed a single batch
    One(String),
    /// One body per batch, in batch order
    Many(Vec<String>),
}

impl RawOutput {
    pub(crate) fn from_bodies(mut bodies: Vec<String>) -> Self {
        if bodies.len() == 1 {
            RawOutput::One(bodies.remove(0))
        } else {
            RawOutput::Many(bodies)
        }
    }

    pub fn bodies(&self) -> Vec<&str> {
        match self {
            RawOutput::One(body) => vec![body.as_str()],
            RawOutput::Many(bodies) => bodies.iter().map(String::as_str).collect(),
        }
    }
}

/// Result of a batch annotation lookup
#[derive(Debug)]
pub enum Annotations<L> {
    Rows(Vec<Value>),
    /// Lazy sequence of hits; nothing is requested until it is first pulled
    Lazy(L),
    Table(Table),
    Raw(RawOutput),
}

impl<L> Annotations<L> {
    pub fn is_lazy(&self) -> bool {
        matches!(self, Annotations::Lazy(_))
    }

    pub fn into_rows(self) -> Option<Vec<Value>> {
        match self {
            Annotations::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn into_lazy(self) -> Option<L> {
        match self {
            Annotations::Lazy(lazy) => Some(lazy),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            Annotations::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn into_raw(self) -> Option<RawOutput> {
        match self {
            Annotations::Raw(raw) => Some(raw),
            _ => None,
        }
    }
}

/// Result of a search query
#[derive(Debug)]
pub enum QueryOutput<S> {
    /// The response object (`total`, `hits`, ...)
    Response(Value),
    Table(Table),
    /// Lazy `fetch_all` sequence
    Scroll(S),
}

impl<S> QueryOutput<S> {
    pub fn into_response(self) -> Option<Value> {
        match self {
            QueryOutput::Response(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            QueryOutput::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn into_scroll(self) -> Option<S> {
        match self {
            QueryOutput::Scroll(scroll) => Some(scroll),
            _ => None,
        }
    }
}

/// Hits of a query-many call, as rows or as a table
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    Rows(Vec<Value>),
    Table(Table),
}

/// Complete query-many outcome including duplicate and missing terms
#[derive(Debug, Clone, PartialEq)]
pub struct QueryManyReport {
    pub out: Records,
    pub dup: Vec<(String, usize)>,
    pub missing: Vec<String>,
}

impl QueryManyReport {
    pub fn dup_table(&self) -> Table {
        Table::from_rows(
            &["query", "duplicate hits"],
            self.dup
                .iter()
                .map(|(term, count)| vec![json!(term), json!(count)])
                .collect(),
        )
    }

    pub fn missing_table(&self) -> Table {
        Table::from_rows(
            &["query"],
            self.missing.iter().map(|term| vec![json!(term)]).collect(),
        )
    }

    /// JSON rendering `{"out": [...], "dup": [[term, n], ...], "missing": [...]}`
    pub fn to_json(&self) -> Value {
        let out = match &self.out {
            Records::Rows(rows) => Value::Array(rows.clone()),
            Records::Table(table) => json!(table),
        };
        json!({
            "out": out,
            "dup": self.dup,
            "missing": self.missing,
        })
    }
}

/// Result of a query-many call
#[derive(Debug, Clone, PartialEq)]
pub enum QueryMany {
    Hits(Vec<Value>),
    Table(Table),
    Raw(RawOutput),
    Report(QueryManyReport),
}

impl QueryMany {
    pub fn into_hits(self) -> Option<Vec<Value>> {
        match self {
            QueryMany::Hits(hits) => Some(hits),
            QueryMany::Report(QueryManyReport {
                out: Records::Rows(rows),
                ..
            }) => Some(rows),
            _ => None,
        }
    }

    pub fn into_report(self) -> Option<QueryManyReport> {
        match self {
            QueryMany::Report(report) => Some(report),
            _ => None,
        }
    }
}
