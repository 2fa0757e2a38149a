use alloy_primitives::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvmClientError {
    #[error("HD index must be zero when using a private key (use mnemonic instead)")]
    DerivationWithPrivateKey,

    #[error("Invalid private key: {0}")]
    PrivateKey(String),

    #[error("Unable to derive key from mnemonic: {0}")]
    Mnemonic(String),

    #[error("Address is not a contract: {0}")]
    NotContract(Address),

    #[error("Could not get contract code at {0}: {1}")]
    FailedGetCode(Address, alloy_transport::TransportError),

    #[error("Unable to parse endpoint: {0}")]
    ParseEndpoint(String),

    #[error("Unable to create web socket provider: {0}")]
    WebSocketProvider(alloy_transport::TransportError),

    #[error("No signing credential configured")]
    MissingCredential,
}
