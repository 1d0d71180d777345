//! Replication is achieved through a simplistic leader/follower model.
//!
//! The designated leader commits every write to its own store first, then
//! uses its internally configured [`ReplicaClient`]s to push the write to
//! every remote store at once. The [`Replicator`] owns that fan-out and the
//! quorum wait: the caller gets an answer as soon as the write quorum of
//! followers has acknowledged, while slower attempts keep running in the
//! background so every reachable follower converges.

mod client;
mod fanout;

pub use client::{ReplicaClient, ReplicateAck, ReplicateRequest};
pub use fanout::{Replicator, WriteReport};

use serde::Serialize;

/// Role a node runs as for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Leader,
    Follower,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Leader => write!(f, "leader"),
            Mode::Follower => write!(f, "follower"),
        }
    }
}
