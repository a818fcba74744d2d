// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership registry integration (BSC).
//!
//! This module provides:
//! - Read-only registry queries behind the [`RegistryOracle`] seam
//! - The `sol!`-generated DataOwnership contract binding
//! - Mint transaction submission and confirmation ([`MintClient`])
//!
//! All durable state lives in the registry contract; nothing here caches
//! ownership across calls.

pub mod contract;
pub mod minting;
pub mod oracle;
pub mod types;

pub use contract::{HttpProvider, RegistryContract};
pub use minting::MintClient;
pub use oracle::RegistryOracle;
pub use types::{LedgerError, LedgerResult, NetworkConfig, BSC_MAINNET, BSC_TESTNET};
