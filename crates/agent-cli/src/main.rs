// ============================================================================
// sui-agent — CLI client for the Sui Agent HTTP API
// ============================================================================
// Usage:
//   sui-agent chat "Send 100 SUI to 0xabc" --user-address 0x...
//   sui-agent execute --user-address 0x... --transaction-data '{"action":...}'
//   sui-agent save-contact --user-address 0x... --name Mom --address 0x...
//   sui-agent list-contacts --user-address 0x...
//   sui-agent health
// ============================================================================

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

/// Sui Agent API client
#[derive(Parser)]
#[command(name = "sui-agent", version, about = "Talk to a running Sui Agent server")]
struct Cli {
    /// Base URL of the agent server
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a natural-language message and print the agent's response
    Chat {
        /// The instruction, e.g. "Send 100 SUI to 0xabc"
        message: String,

        /// Wallet address the request acts on behalf of
        #[arg(long)]
        user_address: Option<String>,
    },

    /// Submit a transaction payload returned by a previous chat
    Execute {
        #[arg(long)]
        user_address: String,

        /// The transaction_data JSON from the chat response; may include
        /// a private_key field for server-side signing
        #[arg(long)]
        transaction_data: String,
    },

    /// Save an encrypted contact to the off-chain vault
    SaveContact {
        #[arg(long)]
        user_address: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List all saved contacts for a user
    ListContacts {
        #[arg(long)]
        user_address: String,
    },

    /// Check server liveness
    Health,
}

struct AgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/api/v1/{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn get(&self, path_and_query: &str) -> Result<Value> {
        let response = self
            .client
            .get(format!("{}/api/v1/{}", self.base_url, path_and_query))
            .send()
            .await?;
        Self::into_json(response).await
    }

    async fn into_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            bail!("server returned {}: {}", status, text);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = AgentClient::new(cli.server.clone());

    let result = match cli.command {
        Commands::Chat {
            message,
            user_address,
        } => {
            client
                .post(
                    "chat",
                    json!({ "message": message, "user_address": user_address }),
                )
                .await?
        }
        Commands::Execute {
            user_address,
            transaction_data,
        } => {
            let payload: Value = serde_json::from_str(&transaction_data)
                .map_err(|e| anyhow::anyhow!("--transaction-data is not valid JSON: {e}"))?;
            client
                .post(
                    "execute",
                    json!({ "user_address": user_address, "transaction_data": payload }),
                )
                .await?
        }
        Commands::SaveContact {
            user_address,
            name,
            address,
            notes,
        } => {
            client
                .post(
                    "contacts/save",
                    json!({
                        "user_address": user_address,
                        "contact_name": name,
                        "contact_address": address,
                        "notes": notes,
                    }),
                )
                .await?
        }
        Commands::ListContacts { user_address } => {
            client
                .get(&format!("contacts/list?user_address={user_address}"))
                .await?
        }
        Commands::Health => client.get("health").await?,
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
