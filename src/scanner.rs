// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enumeration by bounded token-id probing.
//!
//! The registry exposes no per-owner index and event history on public
//! RPC endpoints is pruned, so discovery walks token ids `0, 1, 2, ...`
//! and checks ownership of each. Ids are allocated sequentially starting
//! at 0 (see [`RegistryOracle`]); they can be sparse only at the
//! unallocated tail, so the walk terminates as soon as the owner's full
//! balance is accounted for - or at a fixed ceiling that bounds the scan
//! even against a corrupted balance value.

use std::sync::Arc;

use alloy::primitives::Address;
use serde::Serialize;

use crate::identity::{identify, ProfileIdentity};
use crate::ledger::{LedgerError, LedgerResult, RegistryOracle};

/// Hard upper bound on probed token ids per scan.
pub const PROBE_CEILING: u64 = 100;

/// One minted claim owned by the scanned address.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OwnershipToken {
    /// Token id in the registry.
    pub token_id: u64,
    /// Owner at scan time; ownership can change outside this engine.
    pub owner: Address,
    /// URL recorded at mint time.
    pub bound_url: String,
    /// Canonical identity derived from the bound URL.
    pub identity: ProfileIdentity,
}

/// Result of one ownership scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Tokens found, in increasing token-id order.
    pub tokens: Vec<OwnershipToken>,
    /// Balance the registry reported before the walk.
    pub balance: u64,
    /// True when the probe ceiling was reached before `balance` matches
    /// were found; `tokens` then holds the partial result.
    pub truncated: bool,
}

/// Enumerates tokens owned by an address.
pub struct OwnershipScanner<O> {
    oracle: Arc<O>,
    ceiling: u64,
}

impl<O: RegistryOracle> OwnershipScanner<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self {
            oracle,
            ceiling: PROBE_CEILING,
        }
    }

    /// Override the probe ceiling (primarily for tests).
    pub fn with_ceiling(mut self, ceiling: u64) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// List every token owned by `owner`.
    ///
    /// Fails closed on the balance query; after that, a failed probe
    /// skips one id rather than invalidating the rest of the scan, and
    /// partial results are returned with `truncated` set when the
    /// ceiling cuts the walk short.
    pub async fn list_owned(&self, owner: Address) -> LedgerResult<ScanReport> {
        let balance = self.oracle.balance_of(owner).await?;
        if balance == 0 {
            return Ok(ScanReport {
                tokens: Vec::new(),
                balance,
                truncated: false,
            });
        }

        let mut tokens: Vec<OwnershipToken> = Vec::new();
        let mut token_id: u64 = 0;

        while (tokens.len() as u64) < balance && token_id < self.ceiling {
            match self.oracle.owner_of(token_id).await {
                Ok(holder) if holder == owner => {
                    match self.oracle.bound_url_of(token_id).await {
                        Ok(bound_url) => {
                            let identity = identify(&bound_url);
                            tokens.push(OwnershipToken {
                                token_id,
                                owner,
                                bound_url,
                                identity,
                            });
                        }
                        Err(e) => {
                            tracing::warn!(token_id, error = %e, "failed to read bound URL, skipping token");
                        }
                    }
                }
                Ok(_) => {}
                // Unminted tail id; the walk continues so a balance that
                // overstates reality still ends at the ceiling.
                Err(LedgerError::TokenNotFound(_)) => {}
                Err(e) => {
                    tracing::warn!(token_id, error = %e, "probe failed, skipping token id");
                }
            }
            token_id += 1;
        }

        let truncated = (tokens.len() as u64) < balance;
        if truncated {
            tracing::warn!(
                %owner,
                balance,
                found = tokens.len(),
                "scan hit the probe ceiling before the full balance was found"
            );
        }

        Ok(ScanReport {
            tokens,
            balance,
            truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use alloy::primitives::B256;
    use async_trait::async_trait;

    use crate::identity::Platform;

    use super::*;

    struct FakeRegistry {
        tokens: BTreeMap<u64, (Address, String)>,
        balances: BTreeMap<Address, u64>,
        fail_balance: bool,
        failing_probes: Vec<u64>,
        probe_calls: AtomicUsize,
    }

    impl FakeRegistry {
        fn new(tokens: Vec<(u64, Address, &str)>) -> Self {
            let mut map = BTreeMap::new();
            let mut balances: BTreeMap<Address, u64> = BTreeMap::new();
            for (id, owner, url) in tokens {
                map.insert(id, (owner, url.to_string()));
                *balances.entry(owner).or_default() += 1;
            }
            Self {
                tokens: map,
                balances,
                fail_balance: false,
                failing_probes: Vec::new(),
                probe_calls: AtomicUsize::new(0),
            }
        }

        fn with_balance(mut self, owner: Address, balance: u64) -> Self {
            self.balances.insert(owner, balance);
            self
        }
    }

    #[async_trait]
    impl RegistryOracle for FakeRegistry {
        async fn balance_of(&self, owner: Address) -> LedgerResult<u64> {
            if self.fail_balance {
                return Err(LedgerError::Transport("rpc down".into()));
            }
            Ok(self.balances.get(&owner).copied().unwrap_or(0))
        }

        async fn owner_of(&self, token_id: u64) -> LedgerResult<Address> {
            self.probe_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_probes.contains(&token_id) {
                return Err(LedgerError::Transport("flaky node".into()));
            }
            self.tokens
                .get(&token_id)
                .map(|(owner, _)| *owner)
                .ok_or(LedgerError::TokenNotFound(token_id))
        }

        async fn bound_url_of(&self, token_id: u64) -> LedgerResult<String> {
            self.tokens
                .get(&token_id)
                .map(|(_, url)| url.clone())
                .ok_or(LedgerError::TokenNotFound(token_id))
        }

        async fn is_claimed(&self, _identity_key: B256) -> LedgerResult<bool> {
            Ok(false)
        }
    }

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[tokio::test]
    async fn finds_owned_tokens_in_id_order() {
        let registry = FakeRegistry::new(vec![
            (0, addr(0xaa), "https://x.com/alice"),
            (1, addr(0xbb), "https://x.com/bob"),
            (2, addr(0xaa), "https://youtube.com/@alice"),
        ]);
        let scanner = OwnershipScanner::new(Arc::new(registry));

        let report = scanner.list_owned(addr(0xaa)).await.unwrap();
        assert_eq!(report.balance, 2);
        assert!(!report.truncated);
        assert_eq!(
            report.tokens.iter().map(|t| t.token_id).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(report.tokens[0].identity.platform, Platform::Twitter);
        assert_eq!(report.tokens[0].identity.username, "alice");
        assert_eq!(report.tokens[1].identity.platform, Platform::Youtube);
        assert_eq!(report.tokens[1].bound_url, "https://youtube.com/@alice");
    }

    #[tokio::test]
    async fn zero_balance_returns_without_probing() {
        let registry = Arc::new(FakeRegistry::new(vec![(
            0,
            addr(0xbb),
            "https://x.com/bob",
        )]));
        let scanner = OwnershipScanner::new(registry.clone());

        let report = scanner.list_owned(addr(0xaa)).await.unwrap();
        assert!(report.tokens.is_empty());
        assert_eq!(registry.probe_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stops_early_once_balance_is_accounted_for() {
        let registry = Arc::new(FakeRegistry::new(vec![
            (0, addr(0xaa), "https://x.com/alice"),
            (1, addr(0xbb), "https://x.com/bob"),
        ]));
        let scanner = OwnershipScanner::new(registry.clone());

        let report = scanner.list_owned(addr(0xaa)).await.unwrap();
        assert_eq!(report.tokens.len(), 1);
        // One match found at id 0 == balance; id 1 is never probed.
        assert_eq!(registry.probe_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn corrupt_balance_terminates_at_the_ceiling() {
        let registry = Arc::new(
            FakeRegistry::new(vec![(0, addr(0xaa), "https://x.com/alice")])
                .with_balance(addr(0xaa), u64::MAX),
        );
        let scanner = OwnershipScanner::new(registry.clone()).with_ceiling(10);

        let report = scanner.list_owned(addr(0xaa)).await.unwrap();
        assert!(report.truncated);
        assert_eq!(report.tokens.len(), 1);
        assert_eq!(report.balance, u64::MAX);
        assert_eq!(registry.probe_calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn unminted_tail_ids_are_skipped_not_fatal() {
        // Balance says 2 but only one token exists: the walk crosses the
        // unallocated tail to the ceiling and reports the mismatch.
        let registry = FakeRegistry::new(vec![(0, addr(0xaa), "https://x.com/alice")])
            .with_balance(addr(0xaa), 2);
        let scanner = OwnershipScanner::new(Arc::new(registry)).with_ceiling(5);

        let report = scanner.list_owned(addr(0xaa)).await.unwrap();
        assert_eq!(report.tokens.len(), 1);
        assert!(report.truncated);
    }

    #[tokio::test]
    async fn one_failed_probe_does_not_abort_the_scan() {
        let mut registry = FakeRegistry::new(vec![
            (0, addr(0xaa), "https://x.com/alice"),
            (1, addr(0xaa), "https://x.com/second"),
        ]);
        registry.failing_probes = vec![0];
        let scanner = OwnershipScanner::new(Arc::new(registry)).with_ceiling(5);

        let report = scanner.list_owned(addr(0xaa)).await.unwrap();
        // Token 0 is unreadable this scan; token 1 still comes back.
        assert_eq!(
            report.tokens.iter().map(|t| t.token_id).collect::<Vec<_>>(),
            vec![1]
        );
        assert!(report.truncated);
    }

    #[tokio::test]
    async fn balance_failure_fails_the_whole_scan() {
        let mut registry = FakeRegistry::new(vec![(0, addr(0xaa), "https://x.com/alice")]);
        registry.fail_balance = true;
        let scanner = OwnershipScanner::new(Arc::new(registry));

        let result = scanner.list_owned(addr(0xaa)).await;
        assert!(matches!(result, Err(LedgerError::Transport(_))));
    }
}
