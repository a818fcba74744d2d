// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registry network types and constants.

/// EVM network configuration for the ownership registry.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

impl NetworkConfig {
    /// Block explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// BSC Testnet configuration (public CORS-friendly RPC).
pub const BSC_TESTNET: NetworkConfig = NetworkConfig {
    name: "BSC Testnet",
    chain_id: 97,
    rpc_url: "https://bsc-testnet-rpc.publicnode.com",
    explorer_url: "https://testnet.bscscan.com",
};

/// BSC Mainnet configuration.
pub const BSC_MAINNET: NetworkConfig = NetworkConfig {
    name: "BSC Mainnet",
    chain_id: 56,
    rpc_url: "https://bsc-dataseed.binance.org",
    explorer_url: "https://bscscan.com",
};

/// Errors raised by registry reads and the mint client plumbing.
///
/// `TokenNotFound` is an expected, non-fatal outcome - the scanner uses
/// it to recognize the unallocated tail of the id range. Everything else
/// means the answer is unknown, never "available".
#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("token {0} does not exist")]
    TokenNotFound(u64),

    #[error("registry RPC failed: {0}")]
    Transport(String),
}

/// Shorthand for registry operation results.
pub type LedgerResult<T> = Result<T, LedgerError>;
