// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim session state and the transition function.
//!
//! A [`ClaimSession`] is the engine's only mutable state: one per claim
//! attempt, owned by one [`ClaimWorkflow`], discarded on cancellation or
//! after a terminal phase is acknowledged. All mutation funnels through
//! [`ClaimSession::apply`], which is pure and synchronous - the async
//! drivers in `claim::workflow` do the IO and feed events here, so the
//! whole phase diagram is testable without any transport.
//!
//! [`ClaimWorkflow`]: super::ClaimWorkflow

use serde::{Deserialize, Serialize};

use crate::identity::ProfileIdentity;

/// Phase of a claim attempt.
///
/// `Checking` and `Minting` only exist while a driver call is in flight;
/// between driver calls a session rests in `Idle`, `Connecting`,
/// `Success` or `Error`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClaimPhase {
    Idle,
    Checking,
    Connecting,
    Minting,
    Success,
    Error,
}

/// What the availability check has established for the session's key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Not checked yet, or the check could not be completed. Never
    /// treated as available.
    Unknown,
    Available,
    Claimed,
}

/// Typed claim failures, each mapping to a distinct recovery action in
/// the consuming UI (choose another URL, switch network, connect, retry).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClaimError {
    #[error("this profile has already been claimed")]
    AlreadyClaimed,

    #[error("wallet is on chain {actual}, the registry requires chain {required}")]
    WrongNetwork { required: u64, actual: u64 },

    #[error("no wallet connected")]
    WalletUnavailable,

    #[error("mint failed: {message}")]
    MintFailed { message: String },

    #[error("registry unreachable: {message}")]
    Transport { message: String },
}

impl ClaimError {
    pub(crate) fn mint_failed(message: impl Into<String>) -> Self {
        ClaimError::MintFailed {
            message: message.into(),
        }
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        ClaimError::Transport {
            message: message.into(),
        }
    }
}

/// Events fed into [`ClaimSession::apply`] by the workflow drivers.
#[derive(Debug, Clone)]
pub enum ClaimEvent {
    /// A claim attempt began for `source_url`.
    CheckStarted {
        source_url: String,
        identity: ProfileIdentity,
    },
    /// The availability check came back negative (key unclaimed).
    FoundAvailable,
    /// No wallet is connected; park until the user connects and continues.
    WalletRequired,
    /// Preconditions hold, the mint leg is starting.
    MintStarted,
    /// The mint transaction was broadcast.
    MintSubmitted { tx_hash: String },
    /// The mint transaction confirmed.
    MintConfirmed { token_id: Option<u64> },
    /// The current step failed.
    Failed(ClaimError),
    /// User cancellation; valid from any phase.
    Cancelled,
}

/// State of one claim attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimSession {
    source_url: String,
    identity: Option<ProfileIdentity>,
    phase: ClaimPhase,
    availability: Availability,
    tx_hash: Option<String>,
    token_id: Option<u64>,
    last_error: Option<ClaimError>,
}

impl ClaimSession {
    pub fn new() -> Self {
        Self {
            source_url: String::new(),
            identity: None,
            phase: ClaimPhase::Idle,
            availability: Availability::Unknown,
            tx_hash: None,
            token_id: None,
            last_error: None,
        }
    }

    /// URL the user asked to claim.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Canonical identity derived from the source URL.
    pub fn identity(&self) -> Option<&ProfileIdentity> {
        self.identity.as_ref()
    }

    pub fn phase(&self) -> ClaimPhase {
        self.phase
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    /// Hash of the mint transaction, once broadcast.
    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref()
    }

    /// Token id decoded from the registration event, once confirmed.
    pub fn token_id(&self) -> Option<u64> {
        self.token_id
    }

    pub fn last_error(&self) -> Option<&ClaimError> {
        self.last_error.as_ref()
    }

    /// Apply one event to the session.
    ///
    /// The single transition function: every legal phase change is a
    /// `(phase, event)` arm here. Events that are not legal for the
    /// current phase are ignored - a stale driver result cannot corrupt
    /// a session the user already cancelled or restarted.
    pub fn apply(&mut self, event: ClaimEvent) {
        use ClaimPhase::*;

        match (self.phase, event) {
            // A fresh attempt may begin from any at-rest phase, including
            // a parked Connecting (the user changed the URL mid-connect).
            (
                Idle | Connecting | Success | Error,
                ClaimEvent::CheckStarted {
                    source_url,
                    identity,
                },
            ) => {
                *self = Self::new();
                self.source_url = source_url;
                self.identity = Some(identity);
                self.phase = Checking;
            }

            (Checking, ClaimEvent::FoundAvailable) => {
                self.availability = Availability::Available;
            }

            (Checking, ClaimEvent::WalletRequired)
                if self.availability == Availability::Available =>
            {
                self.phase = Connecting;
            }

            (Checking | Connecting, ClaimEvent::MintStarted)
                if self.availability == Availability::Available =>
            {
                self.phase = Minting;
            }

            // Retry after a failed mint goes straight back to minting;
            // availability was already confirmed for this session.
            (Error, ClaimEvent::MintStarted)
                if matches!(self.last_error, Some(ClaimError::MintFailed { .. })) =>
            {
                self.last_error = None;
                self.phase = Minting;
            }

            (Minting, ClaimEvent::MintSubmitted { tx_hash }) => {
                self.tx_hash = Some(tx_hash);
            }

            (Minting, ClaimEvent::MintConfirmed { token_id }) => {
                self.token_id = token_id;
                self.phase = Success;
            }

            (Checking | Connecting | Minting, ClaimEvent::Failed(error)) => {
                if matches!(error, ClaimError::AlreadyClaimed) {
                    self.availability = Availability::Claimed;
                }
                self.last_error = Some(error);
                self.phase = Error;
            }

            (_, ClaimEvent::Cancelled) => {
                *self = Self::new();
            }

            (phase, event) => {
                tracing::debug!(?phase, ?event, "ignoring event not legal for phase");
            }
        }
    }
}

impl Default for ClaimSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::identify;

    fn started() -> ClaimSession {
        let mut session = ClaimSession::new();
        session.apply(ClaimEvent::CheckStarted {
            source_url: "https://x.com/alice".into(),
            identity: identify("https://x.com/alice"),
        });
        session
    }

    #[test]
    fn happy_path_with_connected_wallet() {
        let mut session = started();
        assert_eq!(session.phase(), ClaimPhase::Checking);

        session.apply(ClaimEvent::FoundAvailable);
        session.apply(ClaimEvent::MintStarted);
        assert_eq!(session.phase(), ClaimPhase::Minting);

        session.apply(ClaimEvent::MintSubmitted {
            tx_hash: "0xabc".into(),
        });
        assert_eq!(session.tx_hash(), Some("0xabc"));
        assert_eq!(session.phase(), ClaimPhase::Minting);

        session.apply(ClaimEvent::MintConfirmed { token_id: Some(7) });
        assert_eq!(session.phase(), ClaimPhase::Success);
        assert_eq!(session.token_id(), Some(7));
        assert!(session.last_error().is_none());
    }

    #[test]
    fn confirmation_without_event_is_still_success() {
        let mut session = started();
        session.apply(ClaimEvent::FoundAvailable);
        session.apply(ClaimEvent::MintStarted);
        session.apply(ClaimEvent::MintConfirmed { token_id: None });
        assert_eq!(session.phase(), ClaimPhase::Success);
        assert_eq!(session.token_id(), None);
    }

    #[test]
    fn wallet_required_parks_in_connecting() {
        let mut session = started();
        session.apply(ClaimEvent::FoundAvailable);
        session.apply(ClaimEvent::WalletRequired);
        assert_eq!(session.phase(), ClaimPhase::Connecting);

        session.apply(ClaimEvent::MintStarted);
        assert_eq!(session.phase(), ClaimPhase::Minting);
    }

    #[test]
    fn already_claimed_is_a_recoverable_error() {
        let mut session = started();
        session.apply(ClaimEvent::Failed(ClaimError::AlreadyClaimed));
        assert_eq!(session.phase(), ClaimPhase::Error);
        assert_eq!(session.availability(), Availability::Claimed);
        assert_eq!(session.last_error(), Some(&ClaimError::AlreadyClaimed));

        // Retrying with a different URL re-enters checking.
        session.apply(ClaimEvent::CheckStarted {
            source_url: "https://x.com/bob".into(),
            identity: identify("https://x.com/bob"),
        });
        assert_eq!(session.phase(), ClaimPhase::Checking);
        assert_eq!(session.availability(), Availability::Unknown);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn check_transport_failure_leaves_availability_unknown() {
        let mut session = started();
        session.apply(ClaimEvent::Failed(ClaimError::transport("rpc down")));
        assert_eq!(session.phase(), ClaimPhase::Error);
        assert_eq!(session.availability(), Availability::Unknown);
    }

    #[test]
    fn mint_cannot_start_without_confirmed_availability() {
        let mut session = started();
        session.apply(ClaimEvent::MintStarted);
        assert_eq!(session.phase(), ClaimPhase::Checking);

        session.apply(ClaimEvent::WalletRequired);
        assert_eq!(session.phase(), ClaimPhase::Checking);
    }

    #[test]
    fn mint_failure_then_retry_reenters_minting() {
        let mut session = started();
        session.apply(ClaimEvent::FoundAvailable);
        session.apply(ClaimEvent::MintStarted);
        session.apply(ClaimEvent::Failed(ClaimError::mint_failed("reverted")));
        assert_eq!(session.phase(), ClaimPhase::Error);

        session.apply(ClaimEvent::MintStarted);
        assert_eq!(session.phase(), ClaimPhase::Minting);
        assert!(session.last_error().is_none());
        // Availability survives the retry; no re-check is required.
        assert_eq!(session.availability(), Availability::Available);
    }

    #[test]
    fn non_mint_errors_do_not_allow_direct_retry() {
        let mut session = started();
        session.apply(ClaimEvent::Failed(ClaimError::AlreadyClaimed));
        session.apply(ClaimEvent::MintStarted);
        assert_eq!(session.phase(), ClaimPhase::Error);
    }

    #[test]
    fn cancel_resets_from_every_phase() {
        let builders: [fn() -> ClaimSession; 4] = [
            || started(),
            || {
                let mut s = started();
                s.apply(ClaimEvent::FoundAvailable);
                s.apply(ClaimEvent::WalletRequired);
                s
            },
            || {
                let mut s = started();
                s.apply(ClaimEvent::FoundAvailable);
                s.apply(ClaimEvent::MintStarted);
                s
            },
            || {
                let mut s = started();
                s.apply(ClaimEvent::Failed(ClaimError::AlreadyClaimed));
                s
            },
        ];
        for build in builders {
            let mut session = build();
            session.apply(ClaimEvent::Cancelled);
            assert_eq!(session.phase(), ClaimPhase::Idle);
            assert!(session.identity().is_none());
            assert!(session.tx_hash().is_none());
            assert!(session.last_error().is_none());
            assert_eq!(session.availability(), Availability::Unknown);
        }
    }

    #[test]
    fn stale_events_are_inert() {
        let mut session = ClaimSession::new();
        // Results of a cancelled driver call arrive after the reset.
        session.apply(ClaimEvent::FoundAvailable);
        session.apply(ClaimEvent::MintSubmitted {
            tx_hash: "0xstale".into(),
        });
        session.apply(ClaimEvent::MintConfirmed { token_id: Some(1) });
        assert_eq!(session.phase(), ClaimPhase::Idle);
        assert!(session.tx_hash().is_none());
    }

    #[test]
    fn url_change_resets_mid_connect() {
        let mut session = started();
        session.apply(ClaimEvent::FoundAvailable);
        session.apply(ClaimEvent::WalletRequired);

        session.apply(ClaimEvent::CheckStarted {
            source_url: "https://x.com/carol".into(),
            identity: identify("https://x.com/carol"),
        });
        assert_eq!(session.phase(), ClaimPhase::Checking);
        assert_eq!(session.source_url(), "https://x.com/carol");
        assert_eq!(session.availability(), Availability::Unknown);
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ClaimPhase::Connecting).unwrap(),
            r#""connecting""#
        );
    }

    #[test]
    fn errors_tag_their_kind() {
        let json = serde_json::to_value(ClaimError::WrongNetwork {
            required: 97,
            actual: 56,
        })
        .unwrap();
        assert_eq!(json["kind"], "wrong_network");
        assert_eq!(json["required"], 97);
    }
}
