//! marmot is a single-leader, semi-synchronously replicated key-value store.
//!
//! One node runs as the leader and accepts client writes over HTTP+JSON.
//! Every write is committed to the leader's local [`Store`] first and then
//! fanned out concurrently to the configured followers through the
//! [`replication::Replicator`]; the client is answered as soon as the write
//! quorum of followers has acknowledged. Reads are served by any node from
//! its own local store.

pub mod config;
pub mod error;
pub mod replication;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::Error;
pub use replication::Mode;
pub use store::Store;

pub type Result<T> = std::result::Result<T, Error>;
