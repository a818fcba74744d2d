// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mint transaction submission and confirmation.
//!
//! [`MintClient`] is the RPC-backed [`MintTransport`] for deployments
//! where the engine signs with its own key (service wallets, testing
//! against a live testnet). Browser-wallet deployments implement
//! [`MintTransport`] in the UI layer instead.

use std::str::FromStr;
use std::time::Duration;

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, TxHash},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, PendingTransactionBuilder, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;

use crate::wallet::{MintError, MintReceipt, MintTransport, SubmittedMint};

use super::contract::IDataOwnership;
use super::types::{LedgerError, LedgerResult, NetworkConfig};

/// Signing HTTP provider type (all fillers plus the wallet).
type SigningProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// How long to wait for a mint transaction to confirm.
const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Signing client for `mintOwnership` transactions.
pub struct MintClient {
    network: NetworkConfig,
    contract_address: Address,
    provider: SigningProvider,
    confirmation_timeout: Duration,
}

impl MintClient {
    /// Create a mint client signing with the given wallet.
    pub fn new(
        network: NetworkConfig,
        contract_address: &str,
        wallet: EthereumWallet,
    ) -> LedgerResult<Self> {
        let contract_address = Address::from_str(contract_address)
            .map_err(|e| LedgerError::InvalidAddress(e.to_string()))?;

        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| LedgerError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        Ok(Self {
            network,
            contract_address,
            provider,
            confirmation_timeout: CONFIRMATION_TIMEOUT,
        })
    }

    /// Create a mint client from a hex-encoded private key (no 0x prefix).
    pub fn from_private_key(
        network: NetworkConfig,
        contract_address: &str,
        private_key_hex: &str,
    ) -> LedgerResult<Self> {
        let key_bytes = alloy::hex::decode(private_key_hex)
            .map_err(|e| LedgerError::InvalidPrivateKey(e.to_string()))?;

        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| LedgerError::InvalidPrivateKey(e.to_string()))?;

        Self::new(network, contract_address, EthereumWallet::from(signer))
    }

    /// Network this client submits to.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

#[async_trait]
impl MintTransport for MintClient {
    async fn submit_mint(&self, to: Address, url: &str) -> Result<SubmittedMint, MintError> {
        let contract = IDataOwnership::new(self.contract_address, self.provider.clone());

        let pending = contract
            .mintOwnership(to, url.to_string())
            .send()
            .await
            .map_err(rejected_or_transport)?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        tracing::info!(
            tx_url = %self.network.tx_url(&tx_hash),
            url,
            "mint transaction submitted"
        );

        Ok(SubmittedMint { tx_hash })
    }

    async fn confirm_mint(&self, submitted: &SubmittedMint) -> Result<MintReceipt, MintError> {
        let hash: TxHash = submitted
            .tx_hash
            .parse()
            .map_err(|e| MintError::Transport(format!("invalid tx hash: {}", e)))?;

        let pending = PendingTransactionBuilder::new(self.provider.root().clone(), hash);

        let receipt = tokio::time::timeout(self.confirmation_timeout, pending.get_receipt())
            .await
            .map_err(|_| {
                MintError::Transport(format!("confirmation timed out for {}", submitted.tx_hash))
            })?
            .map_err(|e| MintError::Transport(e.to_string()))?;

        if !receipt.status() {
            return Err(MintError::Reverted(format!(
                "transaction {} reverted",
                submitted.tx_hash
            )));
        }

        let token_id = registered_token_id(&receipt);
        if token_id.is_none() {
            // The mint itself succeeded; an unparseable event only loses
            // the assigned id, not the claim.
            tracing::warn!(tx_hash = %submitted.tx_hash, "no UrlRegistered event in receipt");
        }

        Ok(MintReceipt {
            tx_hash: submitted.tx_hash.clone(),
            block_number: receipt.block_number.unwrap_or(0),
            token_id,
        })
    }
}

/// Best-effort decode of the assigned token id from the receipt logs.
fn registered_token_id(receipt: &TransactionReceipt) -> Option<u64> {
    receipt.inner.logs().iter().find_map(|log| {
        log.log_decode::<IDataOwnership::UrlRegistered>()
            .ok()
            .map(|event| event.inner.data.tokenId.saturating_to::<u64>())
    })
}

/// A JSON-RPC error response at submission time is the node or wallet
/// refusing the transaction; anything else is transport loss.
fn rejected_or_transport(error: alloy::contract::Error) -> MintError {
    match &error {
        alloy::contract::Error::TransportError(rpc) if rpc.as_error_resp().is_some() => {
            MintError::Rejected(error.to_string())
        }
        _ => MintError::Transport(error.to_string()),
    }
}
