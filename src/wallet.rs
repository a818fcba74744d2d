// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet and mint transport seams.
//!
//! The engine never owns the wallet connection UI or the signing
//! transport - the consuming layer wires real implementations in and the
//! claim workflow drives them through these traits. [`MintClient`] in
//! `ledger::minting` is the RPC-backed [`MintTransport`] for service-side
//! signing; browser-wallet transports live with the UI.
//!
//! [`MintClient`]: crate::ledger::MintClient

use alloy::primitives::Address;
use async_trait::async_trait;

/// View of the user's wallet connection as the workflow needs it.
///
/// `address` returning `None` means no wallet is connected; the claim
/// workflow parks in its connecting phase until the user finishes the
/// external connection flow and triggers continuation.
#[async_trait]
pub trait WalletSession: Send + Sync {
    /// Currently connected account, if any.
    fn address(&self) -> Option<Address>;

    /// Chain id the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the wallet to switch to the given chain. Best effort - the
    /// user can reject, and callers must re-verify with [`Self::chain_id`]
    /// afterwards.
    async fn switch_network(&self, chain_id: u64) -> Result<(), WalletError>;
}

/// Transport for submitting and confirming mint transactions.
///
/// Submission and confirmation are split so the caller can observe the
/// transaction hash as soon as it is broadcast; confirmation is a single
/// suspending call, not a poll loop.
#[async_trait]
pub trait MintTransport: Send + Sync {
    /// Broadcast `mintOwnership(to, url)` and return the transaction hash.
    async fn submit_mint(&self, to: Address, url: &str) -> Result<SubmittedMint, MintError>;

    /// Await confirmation of a previously submitted mint.
    async fn confirm_mint(&self, submitted: &SubmittedMint) -> Result<MintReceipt, MintError>;
}

/// Handle for a broadcast mint transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedMint {
    /// 0x-prefixed transaction hash.
    pub tx_hash: String,
}

/// Confirmed mint outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    /// 0x-prefixed transaction hash.
    pub tx_hash: String,
    /// Block the transaction was included in.
    pub block_number: u64,
    /// Token id decoded from the registration event, when one was
    /// parseable. `None` does not downgrade a confirmed mint.
    pub token_id: Option<u64>,
}

/// Wallet-side failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("wallet unavailable: {0}")]
    Unavailable(String),

    #[error("network switch rejected: {0}")]
    SwitchRejected(String),
}

/// Mint transport failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MintError {
    #[error("mint transaction rejected: {0}")]
    Rejected(String),

    #[error("mint transaction reverted: {0}")]
    Reverted(String),

    #[error("mint transport failed: {0}")]
    Transport(String),
}
