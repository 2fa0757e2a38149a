use alloy_primitives::{Address, FixedBytes};
use alloy_provider::DynProvider;
use alloy_sol_macro::sol;

use crate::ContractBinding;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, abi)]
    #[derive(Debug, PartialEq, Eq)]
    interface IReceiver {
        function onReport(bytes calldata metadata, bytes calldata report) external;
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }
);

pub use IReceiver::{IReceiverCalls, IReceiverInstance};

pub type ReceiverT = IReceiverInstance<DynProvider>;

/// ERC-165 id of `IReceiver`, the xor of its single function selector
pub const IRECEIVER_INTERFACE_ID: FixedBytes<4> = FixedBytes(
    <IReceiver::onReportCall as alloy_sol_types::SolCall>::SELECTOR,
);

pub struct ReceiverContract;

impl ContractBinding for ReceiverContract {
    const NAME: &'static str = "IReceiver";
    const ABI: &'static str = include_str!("../../abi/IReceiver.json");
    type Calls = IReceiverCalls;
}

/// Receivers are never deployed from this crate, only attached to
pub fn at(address: Address, provider: &DynProvider) -> ReceiverT {
    IReceiver::new(address, provider.clone())
}
