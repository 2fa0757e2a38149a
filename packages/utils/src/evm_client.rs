pub mod signing;

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder, WsConnect};
use alloy_signer_local::PrivateKeySigner;
use capability_types::Credential;
use signing::make_signer;
use std::{str::FromStr, sync::Arc, time::Duration};
use url::Url;

use crate::error::EvmClientError;

#[derive(Clone)]
pub struct EvmQueryClient {
    pub endpoint: EvmEndpoint,
    pub provider: DynProvider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvmEndpoint {
    WebSocket(Url),
    Http(Url),
}

impl FromStr for EvmEndpoint {
    type Err = EvmClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s).map_err(|e| EvmClientError::ParseEndpoint(e.to_string()))?;
        match url.scheme() {
            "ws" | "wss" => Ok(EvmEndpoint::WebSocket(url)),
            "http" | "https" => Ok(EvmEndpoint::Http(url)),
            scheme => Err(EvmClientError::ParseEndpoint(format!(
                "could not determine endpoint from scheme {scheme} (full url: {s})"
            ))),
        }
    }
}

impl std::fmt::Display for EvmEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvmEndpoint::WebSocket(url) => write!(f, "{}", url),
            EvmEndpoint::Http(url) => write!(f, "{}", url),
        }
    }
}

impl EvmEndpoint {
    pub fn new_http(url: &str) -> Result<Self, EvmClientError> {
        url.parse::<Self>().and_then(|endpoint| {
            if matches!(endpoint, EvmEndpoint::Http(_)) {
                Ok(endpoint)
            } else {
                Err(EvmClientError::ParseEndpoint(
                    "url scheme is not http or https".to_string(),
                ))
            }
        })
    }

    pub fn new_ws(url: &str) -> Result<Self, EvmClientError> {
        url.parse::<Self>().and_then(|endpoint| {
            if matches!(endpoint, EvmEndpoint::WebSocket(_)) {
                Ok(endpoint)
            } else {
                Err(EvmClientError::ParseEndpoint(
                    "url scheme is not ws or wss".to_string(),
                ))
            }
        })
    }

    pub async fn to_provider(&self) -> Result<DynProvider, EvmClientError> {
        Ok(match self {
            EvmEndpoint::WebSocket(url) => {
                let ws = WsConnect::new(url.clone());
                DynProvider::new(
                    ProviderBuilder::new()
                        .connect_ws(ws)
                        .await
                        .map_err(EvmClientError::WebSocketProvider)?,
                )
            }
            EvmEndpoint::Http(url) => {
                DynProvider::new(ProviderBuilder::new().connect_http(url.clone()))
            }
        })
    }
}

impl EvmQueryClient {
    pub async fn new(endpoint: EvmEndpoint) -> Result<Self, EvmClientError> {
        Ok(EvmQueryClient {
            provider: endpoint.to_provider().await?,
            endpoint,
        })
    }
}

impl std::fmt::Debug for EvmQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmQueryClient")
            .field("endpoint", &self.endpoint.to_string())
            .finish()
    }
}

/// An RPC handle plus the private key that signs everything sent through it
#[derive(Clone)]
pub struct EvmSigningClient {
    pub config: EvmSigningClientConfig,
    /// Fills nonce, gas and chain id, and signs with `signer`
    pub provider: DynProvider,
    pub signer: Arc<PrivateKeySigner>,
}

#[derive(Debug, Clone)]
pub struct EvmSigningClientConfig {
    pub endpoint: EvmEndpoint,
    pub credential: Credential,
    pub hd_index: Option<u32>,
    /// The interval at which to poll the provider for new blocks and receipts
    /// if unset, will use the default of the provider (which may differ across networks)
    pub poll_interval: Option<Duration>,
}

impl EvmSigningClientConfig {
    // the well-known anvil/hardhat dev mnemonic
    pub const ANVIL_MNEMONIC: &'static str =
        "test test test test test test test test test test test junk";

    pub fn new(endpoint: EvmEndpoint, credential: Credential) -> Self {
        Self {
            endpoint,
            credential,
            hd_index: None,
            poll_interval: None,
        }
    }

    pub fn new_anvil(endpoint_url: &str) -> Result<Self, EvmClientError> {
        Ok(Self::new(
            EvmEndpoint::from_str(endpoint_url)?,
            Credential::new(Self::ANVIL_MNEMONIC),
        ))
    }

    pub fn with_hd_index(mut self, hd_index: u32) -> Self {
        self.hd_index = Some(hd_index);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }
}

impl EvmSigningClient {
    pub async fn new(config: EvmSigningClientConfig) -> Result<Self, EvmClientError> {
        let signer = make_signer(&config.credential, config.hd_index)?;
        let wallet: EthereumWallet = signer.clone().into();

        let builder = ProviderBuilder::new().wallet(wallet);

        let provider = match &config.endpoint {
            EvmEndpoint::WebSocket(url) => {
                let ws = WsConnect::new(url.clone());
                DynProvider::new(
                    builder
                        .connect_ws(ws)
                        .await
                        .map_err(EvmClientError::WebSocketProvider)?,
                )
            }
            EvmEndpoint::Http(url) => DynProvider::new(builder.connect_http(url.clone())),
        };

        if let Some(poll_interval) = config.poll_interval {
            provider.client().set_poll_interval(poll_interval);
        }

        Ok(Self {
            config,
            provider,
            signer: Arc::new(signer),
        })
    }

    /// Wraps an already built provider, used to run against a mocked transport
    pub fn from_provider(
        config: EvmSigningClientConfig,
        provider: DynProvider,
    ) -> Result<Self, EvmClientError> {
        let signer = make_signer(&config.credential, config.hd_index)?;
        Ok(Self {
            config,
            provider,
            signer: Arc::new(signer),
        })
    }

    pub async fn new_anvil(endpoint_url: &str) -> Result<Self, EvmClientError> {
        Self::new(EvmSigningClientConfig::new_anvil(endpoint_url)?).await
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub async fn ensure_contract(&self, address: Address) -> Result<(), EvmClientError> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|e| EvmClientError::FailedGetCode(address, e))?;

        if code.is_empty() {
            return Err(EvmClientError::NotContract(address));
        }

        Ok(())
    }
}

impl std::fmt::Debug for EvmSigningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmSigningClient")
            .field("endpoint", &self.config.endpoint.to_string())
            .field("address", &self.address())
            .finish()
    }
}
