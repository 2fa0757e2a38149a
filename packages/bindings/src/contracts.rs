//! One module per contract.

pub mod balance_reader;
pub mod data_storage;
pub mod erc20;
pub mod keystone_forwarder;
pub mod message_emitter;
pub mod receiver;
pub mod reserve_manager;

use alloy_primitives::Address;
use alloy_provider::DynProvider;

use crate::{artifact::ContractArtifact, error::BindingError, ContractBinding};

pub use balance_reader::{BalanceReaderContract, BalanceReaderT};
pub use data_storage::{DataStorageContract, DataStorageT};
pub use erc20::{Erc20Contract, Erc20T};
pub use keystone_forwarder::{KeystoneForwarderContract, KeystoneForwarderT, ReportMetadata};
pub use message_emitter::{MessageEmitterContract, MessageEmitterT};
pub use receiver::{ReceiverContract, ReceiverT};
pub use reserve_manager::{ReserveManagerContract, ReserveManagerT};

/// Checks the artifact against binding `B`, then deploys it
pub(crate) async fn deploy_checked<B: ContractBinding>(
    provider: &DynProvider,
    artifact: &ContractArtifact,
    constructor_args: &[u8],
) -> Result<Address, BindingError> {
    B::check_artifact(artifact)?;
    artifact.deploy(provider, constructor_args).await
}
