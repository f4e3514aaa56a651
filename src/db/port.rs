//! # Database Port (Synchronous)
//!
//! Defines an abstract database interface (`Db`) and the owned value types
//! exchanged with adapters such as [`MySqlDb`](crate::db::mysql_adapter::MySqlDb).
//!
//! - [`Param`]: a positional SQL parameter
//! - [`Value`] / [`Row`]: owned column data
//! - [`Db`]: `fetch_one`, `fetch_all`, `exec`
//!
//! # Example
//! ```rust,ignore
//! use ticket_desk::db::port::{Db, Param};
//! use ticket_desk::params;
//!
//! let ps = params!["0190...", "Closed"];
//! let n = db.exec("UPDATE tickets SET status = ? WHERE id = ?", &ps)?;
//! ```
use std::collections::HashMap;

use anyhow::{Result, bail};
use chrono::NaiveDateTime;

/// SQL parameter types passed to a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Param<'a> {
    Str(&'a str),
    DateTime(NaiveDateTime),
}

/// Owned column value used for row mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I64(i64),
    U64(u64),
    Str(String),
    DateTime(NaiveDateTime),
    Null,
}

/// A single database row (column name → value).
#[derive(Debug, Clone, Default)]
pub struct Row {
    cols: HashMap<String, Value>,
}

impl<'a> From<&'a str> for Param<'a> {
    fn from(x: &'a str) -> Self {
        Param::Str(x)
    }
}

impl<'a> From<&'a String> for Param<'a> {
    fn from(x: &'a String) -> Self {
        Param::Str(x.as_str())
    }
}

impl From<NaiveDateTime> for Param<'_> {
    fn from(x: NaiveDateTime) -> Self {
        Param::DateTime(x)
    }
}

/// Builds a `Vec<Param>` from heterogeneous values.
///
/// ```rust
/// use ticket_desk::db::port::Param;
/// use ticket_desk::params;
///
/// let id = String::from("0190");
/// let ps = params![&id, "Open"];
/// assert_eq!(ps, vec![Param::Str("0190"), Param::Str("Open")]);
/// ```
#[macro_export]
macro_rules! params {
    ($($x:expr),* $(,)?) => {{
        let mut v = Vec::<$crate::db::port::Param>::new();
        $( v.push($crate::db::port::Param::from($x)); )*
        v
    }};
}

impl Row {
    /// Inserts a column (used by adapters and test doubles).
    pub fn insert(&mut self, key: impl Into<String>, val: Value) {
        self.cols.insert(key.into(), val);
    }

    /// Builder-style [`Row::insert`].
    pub fn with(mut self, key: impl Into<String>, val: Value) -> Self {
        self.insert(key, val);
        self
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        match self.cols.get(key) {
            Some(Value::Str(s)) => Ok(s.clone()),
            Some(_) => bail!("column `{key}` is not String"),
            None => bail!("column `{key}` not found"),
        }
    }

    pub fn get_datetime(&self, key: &str) -> Result<NaiveDateTime> {
        match self.cols.get(key) {
            Some(Value::DateTime(dt)) => Ok(*dt),
            Some(_) => bail!("column `{key}` is not DateTime"),
            None => bail!("column `{key}` not found"),
        }
    }
}

/// Database abstraction (synchronous).
///
/// Async stores call it from `tokio::task::spawn_blocking`.
pub trait Db: Send + Sync + 'static {
    fn fetch_one(&self, sql: &str, params: &[Param]) -> Result<Option<Row>>;

    fn fetch_all(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>>;

    /// Executes a write (`INSERT`, `UPDATE`, `DELETE`) and returns the
    /// affected row count.
    fn exec(&self, sql: &str, params: &[Param]) -> Result<u64>;
}
