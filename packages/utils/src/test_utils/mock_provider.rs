//! A provider backed by alloy's mock transport.
//!
//! Responses are queued on the [`Asserter`] in the order the code under test will
//! issue requests. Fillers are disabled so nothing but the call itself hits the queue.

use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_transport::mock::Asserter;

use crate::evm_client::{EvmSigningClient, EvmSigningClientConfig};

pub fn mock_provider() -> (Asserter, DynProvider) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter.clone())
        .erased();

    (asserter, provider)
}

/// Signing client over a mocked provider, signer is the first anvil dev account
pub fn mock_signing_client() -> (Asserter, EvmSigningClient) {
    let (asserter, provider) = mock_provider();
    let config = EvmSigningClientConfig::new_anvil("http://127.0.0.1:8545").unwrap();
    let client = EvmSigningClient::from_provider(config, provider).unwrap();

    (asserter, client)
}
