use alloy_primitives::B256;
use alloy_provider::DynProvider;
use alloy_sol_macro::sol;
use alloy_sol_types::{SolEvent, SolType};

use crate::{artifact::ContractArtifact, error::BindingError, ContractBinding, EventBinding};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, abi)]
    #[derive(Debug, PartialEq, Eq)]
    interface ReserveManager {
        struct UpdateReserves {
            uint256 totalMinted;
            uint256 totalReserve;
        }

        event RequestReserveUpdate(UpdateReserves u);

        function onReport(bytes calldata metadata, bytes calldata report) external;
        function lastTotalMinted() external view returns (uint256);
        function lastTotalReserve() external view returns (uint256);
        function typeAndVersion() external pure returns (string memory);
    }
);

pub use ReserveManager::{
    RequestReserveUpdate, ReserveManagerCalls, ReserveManagerEvents, ReserveManagerInstance,
    UpdateReserves,
};

pub type ReserveManagerT = ReserveManagerInstance<DynProvider>;

pub struct ReserveManagerContract;

impl ContractBinding for ReserveManagerContract {
    const NAME: &'static str = "ReserveManager";
    const ABI: &'static str = include_str!("../../abi/ReserveManager.json");
    type Calls = ReserveManagerCalls;
}

impl EventBinding for ReserveManagerContract {
    type Events = ReserveManagerEvents;
    const EVENT_TOPICS: &'static [(&'static str, B256)] =
        &[("RequestReserveUpdate", RequestReserveUpdate::SIGNATURE_HASH)];
}

pub async fn deploy(
    provider: &DynProvider,
    artifact: &ContractArtifact,
) -> Result<ReserveManagerT, BindingError> {
    let address = super::deploy_checked::<ReserveManagerContract>(provider, artifact, &[]).await?;
    Ok(ReserveManager::new(address, provider.clone()))
}

/// Report body for `onReport`
pub fn encode_report(update: &UpdateReserves) -> Vec<u8> {
    UpdateReserves::abi_encode(update)
}

pub fn decode_report(report: &[u8]) -> Result<UpdateReserves, BindingError> {
    Ok(UpdateReserves::abi_decode(report)?)
}
