use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct App {
    /// Base URL of the node to talk to.
    #[clap(long, global = true, default_value = "http://127.0.0.1:5000")]
    server: String,

    #[clap(subcommand)]
    subcmd: Action,
}

/// Actions that can be performed against a node over its HTTP API.
#[derive(Debug, Subcommand)]
enum Action {
    /// Enter a key-value pair into the store.
    Set { key: String, value: String },

    /// Get a value from the store with the provided key.
    Get { key: String },

    /// Dump the node's role and key space.
    Status,

    /// Check that the node is up.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = App::parse();
    let http = reqwest::Client::new();

    match cli.subcmd {
        Action::Set { key, value } => {
            let body: serde_json::Value = http
                .post(format!("{}/set", cli.server))
                .json(&serde_json::json!({ "key": key, "value": value }))
                .send()
                .await?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Action::Get { key } => {
            let response = http
                .get(format!("{}/get", cli.server))
                .query(&[("key", key)])
                .send()
                .await?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                eprintln!("Key not found");
                std::process::exit(1);
            }
            let body: serde_json::Value = response.json().await?;
            match body.get("value").and_then(|v| v.as_str()) {
                Some(value) => println!("{value}"),
                None => println!("{body}"),
            }
        }
        Action::Status => {
            let body: serde_json::Value = http
                .get(format!("{}/status", cli.server))
                .send()
                .await?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Action::Health => {
            let body: serde_json::Value = http
                .get(format!("{}/health", cli.server))
                .send()
                .await?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
