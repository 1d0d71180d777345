use std::collections::BTreeMap;
use std::time::Instant;

use actix_web::web::{self, Data, Json};
use actix_web::{get, post, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::replication::{Mode, ReplicaClient, ReplicateAck, ReplicateRequest, Replicator};
use crate::store::Store;
use crate::Error;

/// Shared per-node state handed to every request handler.
pub struct AppData {
    pub mode: Mode,
    pub store: Store,
    /// Present on the leader only.
    pub replicator: Option<Replicator>,
}

impl AppData {
    pub fn new(mode: Mode, store: Store, replicator: Option<Replicator>) -> AppData {
        AppData {
            mode,
            store,
            replicator,
        }
    }

    /// Wire up a node from its configuration: followers get a bare store,
    /// the leader additionally gets a replicator over its peer list.
    pub fn from_config(config: &Config) -> crate::Result<AppData> {
        let replicator = match config.node_type {
            Mode::Leader => {
                let peers = config
                    .followers
                    .iter()
                    .map(|url| ReplicaClient::new(url.clone(), config.replication_timeout()))
                    .collect::<crate::Result<Vec<_>>>()?;
                let (min_delay, max_delay) = config.delay_bounds();
                Some(Replicator::new(
                    peers,
                    config.write_quorum,
                    min_delay,
                    max_delay,
                ))
            }
            Mode::Follower => None,
        };
        Ok(AppData::new(config.node_type, Store::new(), replicator))
    }
}

#[derive(Debug, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SetResponse {
    success: bool,
    key: String,
    value: String,
    replicas: usize,
    required: usize,
    latency_ms: f64,
    avg_replication_latency_ms: f64,
    replication_latencies: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct GetRequest {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct GetResponse {
    success: bool,
    key: String,
    value: String,
    node_type: Mode,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    node_type: Mode,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    node_type: Mode,
    key_count: usize,
    keys: BTreeMap<String, String>,
    write_quorum: Option<usize>,
}

/// Client-facing write path, served by the leader alone.
///
/// The local commit happens before any follower is contacted: the leader's
/// own store is the source of truth for subsequent leader reads, and it is
/// not rolled back even when the quorum fails.
#[post("/set")]
pub async fn set(app: Data<AppData>, req: Json<SetRequest>) -> Result<HttpResponse, Error> {
    let start = Instant::now();

    if app.mode != Mode::Leader {
        return Err(Error::NotLeader);
    }
    let replicator = app.replicator.as_ref().ok_or(Error::NotLeader)?;

    let SetRequest { key, value } = req.into_inner();
    if key.is_empty() {
        return Err(Error::InvalidRequest("key must not be empty".to_string()));
    }

    app.store.put(key.clone(), value.clone());
    info!("SET {key} = {value}");

    let report = replicator.replicate(&key, &value).await;
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    if !report.accepted {
        warn!("write quorum not met: {}/{}", report.replicas, report.required);
        return Err(Error::QuorumNotReached {
            replicas: report.replicas,
            required: report.required,
        });
    }

    info!(
        "write confirmed: {}/{} replicas, total latency {latency_ms:.2}ms",
        report.replicas,
        replicator.peer_count()
    );
    Ok(HttpResponse::Ok().json(SetResponse {
        success: true,
        key,
        value,
        replicas: report.replicas,
        required: report.required,
        latency_ms,
        avg_replication_latency_ms: report.avg_latency_ms(),
        replication_latencies: report.latencies_ms,
    }))
}

/// Replication path, served by followers alone. The store serializes
/// concurrent writes itself; no further locking happens here.
#[post("/replicate")]
pub async fn replicate(
    app: Data<AppData>,
    req: Json<ReplicateRequest>,
) -> Result<Json<ReplicateAck>, Error> {
    if app.mode != Mode::Follower {
        return Err(Error::NotFollower);
    }

    let ReplicateRequest { key, value } = req.into_inner();
    if key.is_empty() {
        return Err(Error::InvalidRequest("key must not be empty".to_string()));
    }

    debug!("REPLICATE {key} = {value}");
    app.store.put(key, value);
    Ok(Json(ReplicateAck { success: true }))
}

#[get("/get")]
pub async fn get_query(
    app: Data<AppData>,
    query: web::Query<GetRequest>,
) -> Result<Json<GetResponse>, Error> {
    lookup(&app, &query.key)
}

#[post("/get")]
pub async fn get_body(
    app: Data<AppData>,
    req: Json<GetRequest>,
) -> Result<Json<GetResponse>, Error> {
    lookup(&app, &req.key)
}

#[get("/get/{key}")]
pub async fn get_path(
    app: Data<AppData>,
    path: web::Path<String>,
) -> Result<Json<GetResponse>, Error> {
    lookup(&app, &path)
}

/// Reads are role-agnostic and consult only the local store.
fn lookup(app: &AppData, key: &str) -> Result<Json<GetResponse>, Error> {
    match app.store.get(key) {
        Some(value) => {
            debug!("GET {key} = {value}");
            Ok(Json(GetResponse {
                success: true,
                key: key.to_string(),
                value,
                node_type: app.mode,
            }))
        }
        None => {
            debug!("GET {key} - not found");
            Err(Error::KeyNotFound)
        }
    }
}

#[get("/health")]
pub async fn health(app: Data<AppData>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        node_type: app.mode,
    })
}

#[get("/status")]
pub async fn status(app: Data<AppData>) -> Json<StatusResponse> {
    let keys = app.store.snapshot();
    Json(StatusResponse {
        node_type: app.mode,
        key_count: keys.len(),
        keys,
        write_quorum: app.replicator.as_ref().map(|r| r.write_quorum()),
    })
}

/// Register every endpoint. Shared between [`run`] and the handler tests so
/// both exercise the same routing table.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(set)
        .service(replicate)
        .service(get_query)
        .service(get_body)
        .service(get_path)
        .service(health)
        .service(status);
}

/// Malformed JSON bodies surface with the same error shape as every other
/// failure instead of actix's default plain-text response.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| Error::InvalidRequest(err.to_string()).into())
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let data = Data::new(AppData::from_config(&config)?);

    info!("{} node listening on {}:{}", config.node_type, config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .app_data(json_config())
            .configure(routes)
    })
    .bind(config.listen_addr())?
    .run()
    .await?;
    Ok(())
}
