//! Per-call options for the client operations

use crate::table::DataFrameMode;
use std::collections::BTreeMap;

fn default_true() -> bool {
    true
}

/// Options for a single annotation lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Fields to return; empty means all
    pub fields: Vec<String>,
    /// Extra parameters passed through to the service
    pub params: BTreeMap<String, String>,
}

impl GetOptions {
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Options for a batch annotation lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetManyOptions {
    pub fields: Vec<String>,
    pub params: BTreeMap<String, String>,
    /// Log per-batch progress
    pub verbose: bool,
    /// Return a lazy sequence instead of a collected list
    pub as_generator: bool,
    /// Return a [`Table`](crate::Table)
    pub as_dataframe: Option<DataFrameMode>,
    /// Index the table by the `query` column
    pub df_index: bool,
    /// Return the undecoded response bodies
    pub return_raw: bool,
}

impl Default for GetManyOptions {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            params: BTreeMap::new(),
            verbose: default_true(),
            as_generator: false,
            as_dataframe: None,
            df_index: default_true(),
            return_raw: false,
        }
    }
}

impl GetManyOptions {
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn lazy(mut self) -> Self {
        self.as_generator = true;
        self
    }

    pub fn table(mut self, mode: DataFrameMode) -> Self {
        self.as_dataframe = Some(mode);
        self
    }

    pub fn raw(mut self) -> Self {
        self.return_raw = true;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }
}

/// Options for a search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub fields: Vec<String>,
    pub params: BTreeMap<String, String>,
    /// Page size, capped at 1000
    pub size: Option<usize>,
    pub skip: Option<usize>,
    /// Sort keys; prefix with `-` for descending order
    pub sort: Vec<String>,
    /// Scroll through every hit lazily
    pub fetch_all: bool,
    pub verbose: bool,
    pub as_dataframe: Option<DataFrameMode>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            params: BTreeMap::new(),
            size: None,
            skip: None,
            sort: Vec::new(),
            fetch_all: false,
            verbose: default_true(),
            as_dataframe: None,
        }
    }
}

impl QueryOptions {
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn fetch_all(mut self) -> Self {
        self.fetch_all = true;
        self
    }

    pub fn table(mut self, mode: DataFrameMode) -> Self {
        self.as_dataframe = Some(mode);
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }
}

/// Options for a batch multi-term query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryManyOptions {
    /// Fields the terms are matched against
    pub scopes: Vec<String>,
    pub fields: Vec<String>,
    pub params: BTreeMap<String, String>,
    pub verbose: bool,
    pub as_dataframe: Option<DataFrameMode>,
    pub df_index: bool,
    /// Also return duplicate and missing terms
    pub returnall: bool,
    pub return_raw: bool,
}

impl Default for QueryManyOptions {
    fn default() -> Self {
        Self {
            scopes: Vec::new(),
            fields: Vec::new(),
            params: BTreeMap::new(),
            verbose: default_true(),
            as_dataframe: None,
            df_index: default_true(),
            returnall: false,
            return_raw: false,
        }
    }
}

impl QueryManyOptions {
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn returnall(mut self) -> Self {
        self.returnall = true;
        self
    }

    pub fn table(mut self, mode: DataFrameMode) -> Self {
        self.as_dataframe = Some(mode);
        self
    }

    pub fn raw(mut self) -> Self {
        self.return_raw = true;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }
}
