// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! The engine takes its registry coordinates from an explicitly passed
//! [`RegistryConfig`]; [`RegistryConfig::from_env`] is the conventional
//! way for a consuming binary to build one at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NFT_CONTRACT_ADDRESS` | DataOwnership registry contract address | Required |
//! | `REGISTRY_NETWORK` | `testnet` or `mainnet` | `testnet` |

use crate::ledger::{NetworkConfig, BSC_MAINNET, BSC_TESTNET};

/// Environment variable name for the registry contract address.
pub const CONTRACT_ADDRESS_ENV: &str = "NFT_CONTRACT_ADDRESS";

/// Environment variable name for the registry network selection.
pub const NETWORK_ENV: &str = "REGISTRY_NETWORK";

/// Registry coordinates: which network, which contract.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub network: NetworkConfig,
    pub contract_address: String,
}

impl RegistryConfig {
    pub fn new(network: NetworkConfig, contract_address: impl Into<String>) -> Self {
        Self {
            network,
            contract_address: contract_address.into(),
        }
    }

    /// Load the registry configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let contract_address = std::env::var(CONTRACT_ADDRESS_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingContractAddress)?;

        let network = match std::env::var(NETWORK_ENV) {
            Ok(name) => select_network(&name)?,
            Err(_) => BSC_TESTNET,
        };

        Ok(Self::new(network, contract_address))
    }
}

/// Resolve a network name to its configuration.
pub fn select_network(raw: &str) -> Result<NetworkConfig, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "testnet" | "bsc-testnet" => Ok(BSC_TESTNET),
        "mainnet" | "bsc-mainnet" => Ok(BSC_MAINNET),
        other => Err(ConfigError::UnsupportedNetwork(other.to_string())),
    }
}

/// Configuration loading failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("registry contract address is not configured (set NFT_CONTRACT_ADDRESS)")]
    MissingContractAddress,

    #[error("unsupported registry network `{0}` (expected `testnet` or `mainnet`)")]
    UnsupportedNetwork(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_names_resolve_case_insensitively() {
        assert_eq!(select_network("testnet").unwrap().chain_id, 97);
        assert_eq!(select_network("  Mainnet ").unwrap().chain_id, 56);
        assert_eq!(select_network("bsc-testnet").unwrap().chain_id, 97);
    }

    #[test]
    fn unknown_network_names_are_rejected() {
        let result = select_network("fuji");
        assert!(matches!(result, Err(ConfigError::UnsupportedNetwork(_))));
    }
}
