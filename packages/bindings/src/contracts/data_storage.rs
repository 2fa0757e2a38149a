//! Key/value store used by the write-target workflows, written through `onReport` or directly.

use alloy_primitives::B256;
use alloy_provider::DynProvider;
use alloy_sol_macro::sol;
use alloy_sol_types::{SolEvent, SolType};

use crate::{artifact::ContractArtifact, error::BindingError, ContractBinding, EventBinding};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, abi)]
    #[derive(Debug, PartialEq, Eq)]
    interface DataStorage {
        struct UserData {
            string key;
            string value;
        }

        error DataNotFound(address requester, string key);

        event DataStored(address indexed sender, string key, string value);
        event NoDataFound(address indexed caller, string key);

        function storeData(string calldata key, string calldata value) external;
        function storeUserData(UserData calldata userData) external;
        function onReport(bytes calldata metadata, bytes calldata report) external;
        function readData(address user, string calldata key) external view returns (string memory);
        function typeAndVersion() external pure returns (string memory);
    }
);

pub use DataStorage::{
    DataNotFound, DataStorageCalls, DataStorageErrors, DataStorageEvents, DataStorageInstance,
    DataStored, NoDataFound, UserData,
};

pub type DataStorageT = DataStorageInstance<DynProvider>;

pub struct DataStorageContract;

impl ContractBinding for DataStorageContract {
    const NAME: &'static str = "DataStorage";
    const ABI: &'static str = include_str!("../../abi/DataStorage.json");
    type Calls = DataStorageCalls;
}

impl EventBinding for DataStorageContract {
    type Events = DataStorageEvents;
    const EVENT_TOPICS: &'static [(&'static str, B256)] = &[
        ("DataStored", DataStored::SIGNATURE_HASH),
        ("NoDataFound", NoDataFound::SIGNATURE_HASH),
    ];
}

pub async fn deploy(
    provider: &DynProvider,
    artifact: &ContractArtifact,
) -> Result<DataStorageT, BindingError> {
    let address = super::deploy_checked::<DataStorageContract>(provider, artifact, &[]).await?;
    Ok(DataStorage::new(address, provider.clone()))
}

/// The report body `onReport` expects: an abi-encoded `UserData`
pub fn encode_report(data: &UserData) -> Vec<u8> {
    UserData::abi_encode(data)
}

pub fn decode_report(report: &[u8]) -> Result<UserData, BindingError> {
    Ok(UserData::abi_decode(report)?)
}
