use alloy_primitives::B256;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("contract: {0}")]
    Contract(#[from] alloy_contract::Error),

    #[error("transport: {0}")]
    Transport(#[from] alloy_transport::TransportError),

    #[error("pending transaction: {0}")]
    PendingTransaction(#[from] alloy_provider::PendingTransactionError),

    #[error("abi decode: {0}")]
    Decode(#[from] alloy_sol_types::Error),

    #[error("abi json: {0}")]
    AbiJson(#[from] serde_json::Error),

    #[error("log has no topics")]
    MissingTopic,

    #[error("no event in {contract} has topic {topic}")]
    UnknownEvent { contract: &'static str, topic: B256 },

    #[error("artifact: {0}")]
    Artifact(String),

    #[error("artifact bytecode is not hex: {0}")]
    Hex(#[from] const_hex::FromHexError),

    #[error("artifact for {contract} is missing functions: {missing:?}")]
    ArtifactMismatch {
        contract: &'static str,
        missing: Vec<String>,
    },

    #[error("report is {0} bytes, shorter than its metadata header")]
    ReportTooShort(usize),

    #[error("deploy transaction {0} reverted")]
    DeployReverted(B256),

    #[error("deploy transaction {0} has no contract address")]
    NoContractAddress(B256),
}
