// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim workflow drivers.
//!
//! Sequences uniqueness-check, wallet connection, network verification,
//! mint submission and confirmation over the [`RegistryOracle`],
//! [`WalletSession`] and [`MintTransport`] seams. Each driver performs
//! the IO for one user-initiated step and feeds the outcome through
//! [`ClaimSession::apply`]; the session is the single source of truth
//! the consuming UI renders from.
//!
//! Callers drive one step at a time - the `&mut self` receivers make a
//! second in-flight transition on the same session unrepresentable
//! in-process.

use std::sync::Arc;

use crate::identity::identify;
use crate::ledger::{NetworkConfig, RegistryOracle};
use crate::wallet::{MintTransport, WalletSession};

use super::session::{Availability, ClaimError, ClaimEvent, ClaimPhase, ClaimSession};

/// Drives one claim attempt against the registry.
pub struct ClaimWorkflow<O, W, M> {
    oracle: Arc<O>,
    wallet: Arc<W>,
    minter: Arc<M>,
    network: NetworkConfig,
    session: ClaimSession,
}

impl<O, W, M> ClaimWorkflow<O, W, M>
where
    O: RegistryOracle,
    W: WalletSession,
    M: MintTransport,
{
    /// Create a workflow bound to the registry's required network.
    pub fn new(oracle: Arc<O>, wallet: Arc<W>, minter: Arc<M>, network: NetworkConfig) -> Self {
        Self {
            oracle,
            wallet,
            minter,
            network,
            session: ClaimSession::new(),
        }
    }

    /// Current session state.
    pub fn session(&self) -> &ClaimSession {
        &self.session
    }

    /// Begin a claim attempt for `url`.
    ///
    /// Canonicalizes the URL and checks availability. When the key is
    /// free and a wallet is connected the mint leg runs immediately;
    /// without a wallet the session parks in `Connecting` until the user
    /// connects and calls [`Self::continue_claim`].
    pub async fn start(&mut self, url: &str) -> &ClaimSession {
        let identity = identify(url);
        tracing::info!(
            platform = %identity.platform,
            username = %identity.username,
            "starting claim"
        );

        self.session.apply(ClaimEvent::CheckStarted {
            source_url: url.to_string(),
            identity: identity.clone(),
        });
        if self.session.phase() != ClaimPhase::Checking {
            return &self.session;
        }

        match self.oracle.is_claimed(identity.identity_key).await {
            Ok(true) => {
                self.session
                    .apply(ClaimEvent::Failed(ClaimError::AlreadyClaimed));
            }
            Ok(false) => {
                self.session.apply(ClaimEvent::FoundAvailable);
                if self.wallet.address().is_none() {
                    self.session.apply(ClaimEvent::WalletRequired);
                } else {
                    self.run_mint().await;
                }
            }
            // Unknown is not available: surface the failure instead of
            // risking a doomed mint.
            Err(e) => {
                self.session
                    .apply(ClaimEvent::Failed(ClaimError::transport(e.to_string())));
            }
        }

        &self.session
    }

    /// User-initiated continuation after connecting a wallet.
    ///
    /// A connected wallet alone never triggers the mint - the connection
    /// may have come from an unrelated UI action, so minting waits for
    /// this explicit signal. While the wallet is still disconnected the
    /// session stays parked in `Connecting`.
    pub async fn continue_claim(&mut self) -> &ClaimSession {
        if self.session.phase() != ClaimPhase::Connecting {
            tracing::debug!(phase = ?self.session.phase(), "continue ignored outside connecting");
            return &self.session;
        }
        if self.wallet.address().is_none() {
            return &self.session;
        }

        self.run_mint().await;
        &self.session
    }

    /// Retry after a failed mint.
    ///
    /// Re-enters the mint leg directly: availability was confirmed for
    /// this session already, and the registry's own atomic uniqueness
    /// enforcement backstops any race lost in the meantime.
    pub async fn retry_mint(&mut self) -> &ClaimSession {
        let mint_failed = self.session.phase() == ClaimPhase::Error
            && matches!(
                self.session.last_error(),
                Some(ClaimError::MintFailed { .. })
            );
        if !mint_failed {
            tracing::debug!(phase = ?self.session.phase(), "retry ignored outside mint failure");
            return &self.session;
        }

        self.run_mint().await;
        &self.session
    }

    /// User cancellation: discard the session.
    ///
    /// After submission this means "stop observing the outcome" - a
    /// broadcast transaction cannot be recalled.
    pub fn cancel(&mut self) {
        self.session.apply(ClaimEvent::Cancelled);
    }

    /// The mint leg: wallet and network preconditions, submission,
    /// confirmation. Only entered with availability confirmed.
    async fn run_mint(&mut self) {
        if self.session.availability() != Availability::Available {
            tracing::warn!("mint requested without confirmed availability");
            return;
        }
        let Some(address) = self.wallet.address() else {
            self.session
                .apply(ClaimEvent::Failed(ClaimError::WalletUnavailable));
            return;
        };
        let Some(canonical_url) = self.session.identity().map(|i| i.canonical_url.clone()) else {
            tracing::warn!("mint requested without a derived identity");
            return;
        };

        if !self.verify_network().await {
            return;
        }

        self.session.apply(ClaimEvent::MintStarted);

        let submitted = match self.minter.submit_mint(address, &canonical_url).await {
            Ok(submitted) => {
                self.session.apply(ClaimEvent::MintSubmitted {
                    tx_hash: submitted.tx_hash.clone(),
                });
                submitted
            }
            Err(e) => {
                self.session
                    .apply(ClaimEvent::Failed(ClaimError::mint_failed(e.to_string())));
                return;
            }
        };

        match self.minter.confirm_mint(&submitted).await {
            Ok(receipt) => {
                tracing::info!(
                    tx_url = %self.network.tx_url(&receipt.tx_hash),
                    token_id = ?receipt.token_id,
                    "claim confirmed"
                );
                self.session.apply(ClaimEvent::MintConfirmed {
                    token_id: receipt.token_id,
                });
            }
            Err(e) => {
                self.session
                    .apply(ClaimEvent::Failed(ClaimError::mint_failed(e.to_string())));
            }
        }
    }

    /// Check the wallet's chain against the registry's, attempting one
    /// automatic switch. Submitting to the wrong chain is unrecoverable,
    /// so on failure the mint transport is never reached.
    async fn verify_network(&mut self) -> bool {
        let required = self.network.chain_id;

        let actual = match self.wallet.chain_id().await {
            Ok(actual) => actual,
            Err(e) => {
                tracing::warn!(error = %e, "could not read wallet chain id");
                self.session
                    .apply(ClaimEvent::Failed(ClaimError::WalletUnavailable));
                return false;
            }
        };
        if actual == required {
            return true;
        }

        tracing::info!(required, actual, "wallet on wrong chain, requesting switch");
        let switched = match self.wallet.switch_network(required).await {
            // The wallet accepted the request; trust the re-read, not
            // the acknowledgement.
            Ok(()) => matches!(self.wallet.chain_id().await, Ok(now) if now == required),
            Err(e) => {
                tracing::warn!(error = %e, "network switch rejected");
                false
            }
        };

        if !switched {
            self.session
                .apply(ClaimEvent::Failed(ClaimError::WrongNetwork {
                    required,
                    actual,
                }));
        }
        switched
    }
}
