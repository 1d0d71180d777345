use std::time::Duration;

use clap::Parser;

use crate::replication::Mode;
use crate::Error;

/// Node configuration, read once at startup and immutable for the node's
/// lifetime. Every flag can also be supplied through the environment, so the
/// same binary works from a shell, a compose file, or an orchestrator.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Role this node runs as.
    #[clap(long, env = "NODE_TYPE", default_value = "leader")]
    pub node_type: Mode,

    #[clap(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[clap(long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Follower acknowledgements required before a write is confirmed
    /// to the client (leader only).
    #[clap(long, env = "WRITE_QUORUM", default_value = "3")]
    pub write_quorum: usize,

    /// Lower bound of the simulated replication delay, in seconds.
    #[clap(long, env = "MIN_DELAY", default_value = "0.0")]
    pub min_delay: f64,

    /// Upper bound of the simulated replication delay, in seconds.
    #[clap(long, env = "MAX_DELAY", default_value = "1.0")]
    pub max_delay: f64,

    /// Base URLs of the follower nodes, comma separated (leader only).
    #[clap(long, env = "FOLLOWERS", value_delimiter = ',')]
    pub followers: Vec<String>,

    /// Upper bound on a single outbound replication attempt, in seconds.
    #[clap(long, env = "REPLICATE_TIMEOUT", default_value = "5.0")]
    pub replicate_timeout: f64,

    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: tracing_subscriber::filter::LevelFilter,
}

impl Config {
    /// Check the invariants that cannot be expressed through clap alone.
    ///
    /// The leader needs at least one follower and a quorum within
    /// [1, followers]; a follower must not carry a peer list, since only the
    /// leader originates replication.
    pub fn validate(&self) -> crate::Result<()> {
        if self.min_delay < 0.0 || self.max_delay < 0.0 {
            return Err(Error::InvalidConfig(
                "delay bounds must not be negative".to_string(),
            ));
        }
        if self.min_delay > self.max_delay {
            return Err(Error::InvalidConfig(format!(
                "min delay {}s exceeds max delay {}s",
                self.min_delay, self.max_delay
            )));
        }
        if self.replicate_timeout <= 0.0 {
            return Err(Error::InvalidConfig(
                "replicate timeout must be positive".to_string(),
            ));
        }

        match self.node_type {
            Mode::Leader => {
                if self.followers.is_empty() {
                    return Err(Error::InvalidConfig(
                        "a leader needs at least one follower".to_string(),
                    ));
                }
                if self.write_quorum < 1 || self.write_quorum > self.followers.len() {
                    return Err(Error::InvalidConfig(format!(
                        "write quorum {} outside [1, {}]",
                        self.write_quorum,
                        self.followers.len()
                    )));
                }
                for follower in &self.followers {
                    if !follower.starts_with("http://") && !follower.starts_with("https://") {
                        return Err(Error::InvalidConfig(format!(
                            "follower '{follower}' is not an http(s) base URL"
                        )));
                    }
                }
            }
            Mode::Follower => {
                if !self.followers.is_empty() {
                    return Err(Error::InvalidConfig(
                        "only the leader takes a follower list".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Simulated-delay bounds as durations. Call after [`Config::validate`];
    /// negative values would panic here.
    pub fn delay_bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_secs_f64(self.min_delay),
            Duration::from_secs_f64(self.max_delay),
        )
    }

    pub fn replication_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.replicate_timeout)
    }

    pub fn listen_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
