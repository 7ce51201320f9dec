//! Front-desk CLI - talks to the queue daemon over JSON-RPC

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:4000";

#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(about = "Clinic front-desk walk-in queue", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "FRONTDESK_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a walk-in patient at the back of the queue
    Add {
        /// Patient name
        patient: String,

        /// Doctor the patient is waiting for
        #[arg(short, long)]
        doctor: String,
    },

    /// Show the queue in position order
    List,

    /// Change an entry's status ("Waiting", "In Consultation", "Completed")
    Status {
        /// Entry ID
        id: String,

        /// New status
        status: String,
    },

    /// Remove one entry
    Remove {
        /// Entry ID
        id: String,
    },

    /// Remove every entry
    Clear {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },

    /// Show queue counts
    Stats,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Debug, Deserialize, Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    position: i64,
    patient_name: String,
    doctor_name: String,
    status: String,
    id: String,
}

#[derive(Deserialize)]
struct ListResult {
    entries: Vec<EntryRow>,
}

/// Waiting entries in queue order, then everything at position 0
fn display_rows(mut rows: Vec<EntryRow>) -> Table {
    rows.sort_by_key(|row| (row.position == 0, row.position));
    let mut table = Table::new(&rows);
    table.with(tabled::settings::Style::rounded());
    table
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Add { patient, doctor } => {
            let params = json!({
                "patient_name": patient,
                "doctor_name": doctor,
            });

            let result = call_rpc(&cli.rpc_url, "queue.add.v1", params).await?;
            let row: EntryRow = serde_json::from_value(result)?;

            println!("{}", "✓ Patient added to queue".green().bold());
            println!();
            println!("{}", Table::new(vec![row]));
        }

        Commands::List => {
            let result = call_rpc(&cli.rpc_url, "queue.list.v1", json!({})).await?;
            let list: ListResult = serde_json::from_value(result)?;

            if list.entries.is_empty() {
                println!("{}", "Queue is empty".yellow());
            } else {
                println!("{}", display_rows(list.entries));
            }
        }

        Commands::Status { id, status } => {
            let params = json!({
                "id": id,
                "status": status,
            });

            let result = call_rpc(&cli.rpc_url, "queue.update_status.v1", params).await?;
            let message = result["message"].as_str().unwrap_or("Status updated");
            println!("{}", format!("✓ {}", message).green().bold());
        }

        Commands::Remove { id } => {
            call_rpc(&cli.rpc_url, "queue.remove.v1", json!({ "id": id })).await?;
            println!("{}", format!("✓ Entry {} removed", id).green().bold());
        }

        Commands::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to clear the queue without --yes");
            }
            let result = call_rpc(&cli.rpc_url, "queue.clear.v1", json!({})).await?;
            println!(
                "{}",
                format!("✓ Queue cleared ({} entries removed)", result["removed"])
                    .green()
                    .bold()
            );
        }

        Commands::Stats => {
            println!("{}", "Queue Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "queue.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Waiting:".bold(), stats["waiting"]);
                    println!("  {} {}", "In Consultation:".bold(), stats["in_consultation"]);
                    println!("  {} {}", "Completed:".bold(), stats["completed"]);
                    println!();
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
