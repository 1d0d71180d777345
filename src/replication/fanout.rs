use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::ReplicaClient;

/// Outcome of one replication attempt against one follower.
#[derive(Debug)]
struct Outcome {
    success: bool,
    latency_ms: f64,
}

/// Result of one write's fan-out, as observed at the moment the quorum
/// decision was made. Latencies cover only the successes counted by then;
/// acknowledgements arriving later no longer influence the client response.
#[derive(Debug)]
pub struct WriteReport {
    pub accepted: bool,
    pub replicas: usize,
    pub required: usize,
    pub latencies_ms: Vec<f64>,
}

impl WriteReport {
    /// Mean latency over the successful attempts, 0 when there were none.
    pub fn avg_latency_ms(&self) -> f64 {
        if self.latencies_ms.is_empty() {
            0.0
        } else {
            self.latencies_ms.iter().sum::<f64>() / self.latencies_ms.len() as f64
        }
    }
}

/// The leader's write pipeline: fans each write out to every follower at
/// once and suspends the caller until the quorum decision is known.
pub struct Replicator {
    peers: Vec<ReplicaClient>,
    write_quorum: usize,
    min_delay: Duration,
    max_delay: Duration,
}

impl Replicator {
    pub fn new(
        peers: Vec<ReplicaClient>,
        write_quorum: usize,
        min_delay: Duration,
        max_delay: Duration,
    ) -> Replicator {
        Replicator {
            peers,
            write_quorum,
            min_delay,
            max_delay,
        }
    }

    pub fn write_quorum(&self) -> usize {
        self.write_quorum
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Replicate one write to all peers and wait for the quorum decision.
    ///
    /// Every peer gets exactly one attempt, launched concurrently; there are
    /// no retries. The call returns as soon as the write quorum is met or
    /// enough attempts have failed that it no longer can be. Attempts still
    /// in flight at that point are not cancelled: they run to completion so
    /// their followers converge too, and their outcomes are dropped by the
    /// closed channel.
    pub async fn replicate(&self, key: &str, value: &str) -> WriteReport {
        let (tx, mut rx) = mpsc::channel(self.peers.len().max(1));

        for client in self.peers.iter().cloned() {
            let tx = tx.clone();
            let key = key.to_string();
            let value = value.to_string();
            let (min_delay, max_delay) = (self.min_delay, self.max_delay);
            tokio::spawn(async move {
                let outcome = attempt(client, &key, &value, min_delay, max_delay).await;
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let mut replicas = 0;
        let mut failures = 0;
        let mut latencies_ms = Vec::new();

        while let Some(outcome) = rx.recv().await {
            if outcome.success {
                replicas += 1;
                latencies_ms.push(outcome.latency_ms);
                if replicas >= self.write_quorum {
                    debug!("quorum {} reached, returning early", self.write_quorum);
                    break;
                }
            } else {
                failures += 1;
                if self.peers.len() - failures < self.write_quorum {
                    warn!(
                        "quorum {} unreachable after {failures} failed replications",
                        self.write_quorum
                    );
                    break;
                }
            }
        }

        WriteReport {
            accepted: replicas >= self.write_quorum,
            replicas,
            required: self.write_quorum,
            latencies_ms,
        }
    }
}

/// One replication attempt: simulated network lag, then the actual RPC.
///
/// The delay is drawn fresh for every peer on every write and counts toward
/// the measured latency.
async fn attempt(
    client: ReplicaClient,
    key: &str,
    value: &str,
    min_delay: Duration,
    max_delay: Duration,
) -> Outcome {
    let start = Instant::now();

    let delay = rand::thread_rng().gen_range(min_delay..=max_delay);
    tokio::time::sleep(delay).await;

    let success = match client.replicate(key, value).await {
        Ok(acked) => acked,
        Err(e) => {
            warn!("replication to {} failed: {e}", client.base_url());
            false
        }
    };
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    if success {
        debug!("replicated to {} in {latency_ms:.2}ms", client.base_url());
    }

    Outcome {
        success,
        latency_ms,
    }
}
