// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DataOwnership registry contract binding and RPC-backed oracle.

use std::str::FromStr;

use alloy::{
    network::Ethereum,
    primitives::{Address, B256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    sol,
};
use async_trait::async_trait;

use super::oracle::RegistryOracle;
use super::types::{LedgerError, LedgerResult, NetworkConfig};

// DataOwnership registry interface (ERC721URIStorage with a urlRegistry
// uniqueness map keyed by keccak256 of the bound URL).
sol! {
    #[sol(rpc)]
    interface IDataOwnership {
        event UrlRegistered(uint256 indexed tokenId, address indexed owner, string url);

        function mintOwnership(address to, string targetUrl) external;
        function urlRegistry(bytes32 urlHash) external view returns (bool);
        function balanceOf(address owner) external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
        function tokenURI(uint256 tokenId) external view returns (string);
    }
}

/// HTTP provider type for registry reads (with all fillers).
pub type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Read client for the ownership registry contract.
pub struct RegistryContract<P> {
    contract: IDataOwnership::IDataOwnershipInstance<P>,
}

impl<P: Provider + Clone> RegistryContract<P> {
    /// Wrap an existing provider.
    pub fn new(provider: &P, contract_address: &str) -> LedgerResult<Self> {
        let address = Address::from_str(contract_address)
            .map_err(|e| LedgerError::InvalidAddress(e.to_string()))?;

        let contract = IDataOwnership::new(address, provider.clone());

        Ok(Self { contract })
    }
}

impl RegistryContract<HttpProvider> {
    /// Build an HTTP provider for `network` and connect to the registry.
    pub fn connect(network: &NetworkConfig, contract_address: &str) -> LedgerResult<Self> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| LedgerError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Self::new(&provider, contract_address)
    }
}

#[async_trait]
impl<P> RegistryOracle for RegistryContract<P>
where
    P: Provider + Clone + Send + Sync,
{
    async fn balance_of(&self, owner: Address) -> LedgerResult<u64> {
        let balance = self
            .contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        // The scanner's probe ceiling bounds the scan anyway; saturating
        // keeps a hostile uint256 from wrapping into a small count.
        Ok(balance.saturating_to::<u64>())
    }

    async fn owner_of(&self, token_id: u64) -> LedgerResult<Address> {
        self.contract
            .ownerOf(alloy::primitives::U256::from(token_id))
            .call()
            .await
            .map_err(|e| revert_means_missing(token_id, e))
    }

    async fn bound_url_of(&self, token_id: u64) -> LedgerResult<String> {
        self.contract
            .tokenURI(alloy::primitives::U256::from(token_id))
            .call()
            .await
            .map_err(|e| revert_means_missing(token_id, e))
    }

    async fn is_claimed(&self, identity_key: B256) -> LedgerResult<bool> {
        self.contract
            .urlRegistry(identity_key)
            .call()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))
    }
}

/// `ownerOf`/`tokenURI` revert for unminted ids. A JSON-RPC error response
/// carries the revert; anything else never reached the contract and is a
/// transport failure.
fn revert_means_missing(token_id: u64, error: alloy::contract::Error) -> LedgerError {
    match &error {
        alloy::contract::Error::TransportError(rpc) if rpc.as_error_resp().is_some() => {
            LedgerError::TokenNotFound(token_id)
        }
        _ => LedgerError::Transport(error.to_string()),
    }
}
