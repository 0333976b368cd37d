pub mod connection;
pub mod enumerator;
pub mod process;
pub mod snapshot;
pub mod viewport;
