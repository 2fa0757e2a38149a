use alloy_primitives::{Address, U256};
use alloy_provider::DynProvider;
use alloy_sol_macro::sol;

use crate::{artifact::ContractArtifact, error::BindingError, ContractBinding};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, abi)]
    #[derive(Debug, PartialEq, Eq)]
    interface BalanceReader {
        function getNativeBalances(address[] calldata addresses) external view returns (uint256[] memory);
        function typeAndVersion() external pure returns (string memory);
    }
);

pub use BalanceReader::{BalanceReaderCalls, BalanceReaderInstance};

pub type BalanceReaderT = BalanceReaderInstance<DynProvider>;

pub struct BalanceReaderContract;

impl ContractBinding for BalanceReaderContract {
    const NAME: &'static str = "BalanceReader";
    const ABI: &'static str = include_str!("../../abi/BalanceReader.json");
    type Calls = BalanceReaderCalls;
}

pub async fn deploy(
    provider: &DynProvider,
    artifact: &ContractArtifact,
) -> Result<BalanceReaderT, BindingError> {
    let address = super::deploy_checked::<BalanceReaderContract>(provider, artifact, &[]).await?;
    Ok(BalanceReader::new(address, provider.clone()))
}

/// Native balances of `addresses`, in the same order
pub async fn native_balances(
    reader: &BalanceReaderT,
    addresses: Vec<Address>,
) -> Result<Vec<U256>, BindingError> {
    Ok(reader.getNativeBalances(addresses).call().await?)
}
