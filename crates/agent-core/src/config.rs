//! ============================================================================
//! Configuration - Environment-Driven Settings
//! ============================================================================
//! Loaded once at startup from environment variables (with .env support in
//! the binaries via dotenvy). Defaults target Sui testnet.
//! ============================================================================

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Application settings shared by the server and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // Intent classifier (OpenAI-compatible chat completions API)
    pub classifier_api_key: String,
    pub classifier_api_url: String,
    pub classifier_model: String,

    // Sui network
    pub sui_network: String,
    pub sui_rpc_url: String,

    // Staking contract
    pub stake_package_id: String,
    pub stake_module: String,
    pub stake_pool_object_id: String,

    // On-chain address book contract
    pub address_book_package_id: String,
    pub address_book_module: String,

    // Walrus blob storage
    pub walrus_publisher_url: String,
    pub walrus_aggregator_url: String,

    // Seal encryption key server
    pub seal_service_url: String,

    // HTTP bind
    pub api_host: String,
    pub api_port: u16,
}

impl Settings {
    /// Read settings from the environment. The classifier API key is the
    /// only required variable; everything else has a testnet default.
    pub fn from_env() -> Result<Self> {
        let classifier_api_key = env::var("CLASSIFIER_API_KEY")
            .map_err(|_| anyhow!("CLASSIFIER_API_KEY must be set"))?;

        let api_port = var_or("API_PORT", "8000")
            .parse()
            .map_err(|e| anyhow!("Invalid API_PORT: {}", e))?;

        Ok(Self {
            classifier_api_key,
            classifier_api_url: var_or(
                "CLASSIFIER_API_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            classifier_model: var_or("CLASSIFIER_MODEL", "gpt-4o-2024-08-06"),
            sui_network: var_or("SUI_NETWORK", "testnet"),
            sui_rpc_url: var_or("SUI_RPC_URL", "https://fullnode.testnet.sui.io:443"),
            stake_package_id: var_or("STAKE_PACKAGE_ID", "0x0"),
            stake_module: var_or("STAKE_MODULE", "stake"),
            stake_pool_object_id: var_or("STAKE_POOL_OBJECT_ID", "0x0"),
            address_book_package_id: var_or(
                "ADDRESS_BOOK_PACKAGE_ID",
                "0x8e385abb2ccefc0aed625567e72c8005f06ae3a97d534a25cb8e5dd2b62f6f9c",
            ),
            address_book_module: var_or("ADDRESS_BOOK_MODULE", "address_book"),
            walrus_publisher_url: var_or(
                "WALRUS_PUBLISHER_URL",
                "https://publisher.walrus-testnet.walrus.space",
            ),
            walrus_aggregator_url: var_or(
                "WALRUS_AGGREGATOR_URL",
                "https://aggregator.walrus-testnet.walrus.space",
            ),
            seal_service_url: var_or("SEAL_SERVICE_URL", "https://seal.testnet.sui.io"),
            api_host: var_or("API_HOST", "0.0.0.0"),
            api_port,
        })
    }

    /// Target string for the address-book `create` entry function.
    pub fn address_book_create_target(&self) -> String {
        format!(
            "{}::{}::create_address_book",
            self.address_book_package_id, self.address_book_module
        )
    }

    /// Target string for the address-book `add_contact` entry function.
    pub fn address_book_add_contact_target(&self) -> String {
        format!(
            "{}::{}::add_contact",
            self.address_book_package_id, self.address_book_module
        )
    }

    /// Fully-qualified struct type of the address-book object, used for
    /// owned-object queries.
    pub fn address_book_struct_type(&self) -> String {
        format!(
            "{}::{}::AddressBook",
            self.address_book_package_id, self.address_book_module
        )
    }

    /// Target string for the staking pool entry functions.
    pub fn stake_target(&self, function: &str) -> String {
        format!("{}::{}::{}", self.stake_package_id, self.stake_module, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_targets() {
        let settings = Settings {
            classifier_api_key: "k".into(),
            classifier_api_url: "u".into(),
            classifier_model: "m".into(),
            sui_network: "testnet".into(),
            sui_rpc_url: "r".into(),
            stake_package_id: "0xaa".into(),
            stake_module: "stake".into(),
            stake_pool_object_id: "0xbb".into(),
            address_book_package_id: "0xcc".into(),
            address_book_module: "address_book".into(),
            walrus_publisher_url: "p".into(),
            walrus_aggregator_url: "a".into(),
            seal_service_url: "s".into(),
            api_host: "127.0.0.1".into(),
            api_port: 8000,
        };
        assert_eq!(
            settings.address_book_create_target(),
            "0xcc::address_book::create_address_book"
        );
        assert_eq!(settings.stake_target("stake"), "0xaa::stake::stake");
        assert_eq!(
            settings.address_book_struct_type(),
            "0xcc::address_book::AddressBook"
        );
    }
}
