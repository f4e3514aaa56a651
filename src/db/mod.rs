//! Database port, MySQL adapter, and the blocking bridge used by async stores.

pub mod blocking;
pub mod mysql_adapter;
pub mod port;

pub use blocking::run_blocking;
pub use mysql_adapter::MySqlDb;
pub use port::{Db, Param, Row, Value};
