//! Database operations: pool construction and the native query executor.

pub mod connection;
pub mod native;

pub use connection::DatabaseConnection;
pub use native::{NativeQueryExecutor, NativeRow, RowValue};
