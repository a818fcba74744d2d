// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Data Stream Ownership - Claim & Discovery Engine
//!
//! This crate lets a user claim exclusive on-chain ownership of a social
//! data stream (a profile URL) by minting a key bound to its canonical
//! form, and lets any wallet discover which streams it owns. The
//! registry contract is the only system of record; nothing is persisted
//! here.
//!
//! ## Modules
//!
//! - `identity` - URL canonicalization to `(platform, username)` + key
//! - `ledger` - registry contract binding, read oracle, mint client
//! - `claim` - the check / connect / mint state machine
//! - `scanner` - bounded ownership enumeration
//! - `wallet` - wallet-session and mint-transport seams
//! - `config` - environment-driven registry coordinates

pub mod claim;
pub mod config;
pub mod identity;
pub mod ledger;
pub mod scanner;
pub mod wallet;

pub use claim::{Availability, ClaimError, ClaimPhase, ClaimSession, ClaimWorkflow};
pub use config::RegistryConfig;
pub use identity::{identify, Platform, ProfileIdentity};
pub use ledger::{
    LedgerError, MintClient, NetworkConfig, RegistryContract, RegistryOracle, BSC_MAINNET,
    BSC_TESTNET,
};
pub use scanner::{OwnershipScanner, OwnershipToken, ScanReport, PROBE_CEILING};
pub use wallet::{MintError, MintReceipt, MintTransport, SubmittedMint, WalletError, WalletSession};
