pub mod connection_table;

pub use self::connection_table::ConnectionTableWidget;
