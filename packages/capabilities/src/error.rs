use capability_types::TriggerId;
use contract_bindings::BindingError;
use thiserror::Error;
use utils::error::EvmClientError;

#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("Trigger not registered: {0}")]
    NotRegistered(TriggerId),

    #[error("Trigger exists, cannot register again: {0}")]
    AlreadyRegistered(TriggerId),

    #[error("Cron scheduling error: {expression} / {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("Payload key is not authorized for trigger {0}")]
    Unauthorized(TriggerId),

    #[error("No forwarder address configured, cannot write reports")]
    NoForwarder,

    #[error("Triggers can only fire from within a tokio runtime")]
    NoRuntime,

    #[error("Log filter has {0} topic positions, at most 4 are allowed")]
    TooManyTopics(usize),

    #[error("EvmClient: {0}")]
    EvmClient(#[from] EvmClientError),

    #[error("rpc: {0}")]
    Rpc(#[from] alloy_transport::TransportError),

    #[error("binding: {0}")]
    Binding(#[from] BindingError),
}

