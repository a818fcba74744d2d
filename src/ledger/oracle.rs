// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only queries against the ownership registry.
//!
//! The trait is the seam between the claim workflow / ownership scanner
//! and the chain: production code goes through
//! [`RegistryContract`](super::RegistryContract), tests wire in fakes.
//! Nothing behind this trait mutates state, locally or remotely.
//!
//! ## Sequential token ids
//!
//! The registry assigns token ids sequentially starting at 0. The
//! ownership scanner's bounded probing depends on this: ids may be sparse
//! only at the unallocated tail, never in the middle. Any replacement
//! registry implementation must preserve this property or the scanner
//! will under-enumerate.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

use super::types::LedgerResult;

/// Read-only view of the ownership registry.
#[async_trait]
pub trait RegistryOracle: Send + Sync {
    /// Number of tokens owned by `owner`.
    async fn balance_of(&self, owner: Address) -> LedgerResult<u64>;

    /// Current owner of `token_id`.
    ///
    /// Returns [`LedgerError::TokenNotFound`] for an id that was never
    /// minted; that is an expected signal, not a failure.
    ///
    /// [`LedgerError::TokenNotFound`]: super::LedgerError::TokenNotFound
    async fn owner_of(&self, token_id: u64) -> LedgerResult<Address>;

    /// URL bound to `token_id` at mint time. Only defined for tokens whose
    /// existence was confirmed via [`Self::owner_of`].
    async fn bound_url_of(&self, token_id: u64) -> LedgerResult<String>;

    /// Whether `identity_key` has already been claimed.
    ///
    /// A transport failure means the answer is unknown - callers must not
    /// treat it as "available", or they risk submitting a doomed mint.
    async fn is_claimed(&self, identity_key: B256) -> LedgerResult<bool>;
}
