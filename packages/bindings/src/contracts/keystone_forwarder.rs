//! The forwarder verifies DON signatures over a report and calls `onReport` on the receiver.
//!
//! Besides the generated binding, this module knows the layout of the metadata header that
//! prefixes every raw report.

use alloy_primitives::{Address, FixedBytes, Log, B256};
use alloy_provider::DynProvider;
use alloy_sol_macro::sol;
use alloy_sol_types::SolEvent;

use crate::{artifact::ContractArtifact, error::BindingError, ContractBinding, EventBinding};
sol!(
    #[allow(missing_docs)]
    #[sol(rpc, abi)]
    #[derive(Debug, PartialEq, Eq)]
    interface KeystoneForwarder {
        struct TransmissionInfo {
            bytes32 transmissionId;
            uint8 state;
            address transmitter;
            bool invalidReceiver;
            bool success;
            uint80 gasLimit;
        }

        error InvalidReport();
        error AlreadyAttempted(bytes32 transmissionId);
        error UnauthorizedForwarder();

        event ReportProcessed(address indexed receiver, bytes32 indexed workflowExecutionId, bytes2 indexed reportId, bool result);
        event ForwarderAdded(address indexed forwarder);
        event ForwarderRemoved(address indexed forwarder);
        event OwnershipTransferRequested(address indexed from, address indexed to);
        event OwnershipTransferred(address indexed from, address indexed to);

        function report(address receiver, bytes calldata rawReport, bytes calldata reportContext, bytes[] calldata signatures) external;
        function getTransmissionId(address receiver, bytes32 workflowExecutionId, bytes2 reportId) external pure returns (bytes32);
        function getTransmissionInfo(address receiver, bytes32 workflowExecutionId, bytes2 reportId) external view returns (TransmissionInfo memory);
        function getTransmitter(address receiver, bytes32 workflowExecutionId, bytes2 reportId) external view returns (address);
        function addForwarder(address forwarder) external;
        function removeForwarder(address forwarder) external;
        function isForwarder(address forwarder) external view returns (bool);
        function owner() external view returns (address);
        function transferOwnership(address to) external;
        function acceptOwnership() external;
        function typeAndVersion() external pure returns (string memory);
    }
);

pub use KeystoneForwarder::{
    KeystoneForwarderCalls, KeystoneForwarderErrors, KeystoneForwarderEvents,
    KeystoneForwarderInstance, ReportProcessed, TransmissionInfo,
};

pub type KeystoneForwarderT = KeystoneForwarderInstance<DynProvider>;

pub struct KeystoneForwarderContract;

impl ContractBinding for KeystoneForwarderContract {
    const NAME: &'static str = "KeystoneForwarder";
    const ABI: &'static str = include_str!("../../abi/KeystoneForwarder.json");
    type Calls = KeystoneForwarderCalls;
}

impl EventBinding for KeystoneForwarderContract {
    type Events = KeystoneForwarderEvents;
    const EVENT_TOPICS: &'static [(&'static str, B256)] = &[
        ("ReportProcessed", KeystoneForwarder::ReportProcessed::SIGNATURE_HASH),
        ("ForwarderAdded", KeystoneForwarder::ForwarderAdded::SIGNATURE_HASH),
        ("ForwarderRemoved", KeystoneForwarder::ForwarderRemoved::SIGNATURE_HASH),
        (
            "OwnershipTransferRequested",
            KeystoneForwarder::OwnershipTransferRequested::SIGNATURE_HASH,
        ),
        (
            "OwnershipTransferred",
            KeystoneForwarder::OwnershipTransferred::SIGNATURE_HASH,
        ),
    ];
}

pub async fn deploy(
    provider: &DynProvider,
    artifact: &ContractArtifact,
) -> Result<KeystoneForwarderT, BindingError> {
    let address =
        super::deploy_checked::<KeystoneForwarderContract>(provider, artifact, &[]).await?;
    Ok(KeystoneForwarder::new(address, provider.clone()))
}

/// Finds the `ReportProcessed` event for `receiver` among a receipt's logs
///
/// Only logs emitted by `forwarder` count, anything the receiver calls can emit the same event.
pub fn find_report_processed<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
    forwarder: Address,
    receiver: Address,
) -> Option<ReportProcessed> {
    logs.into_iter()
        .filter(|log| log.address == forwarder)
        .filter(|log| log.topics().first() == Some(&ReportProcessed::SIGNATURE_HASH))
        .filter_map(|log| ReportProcessed::decode_log(log).ok())
        .map(|log| log.data)
        .find(|event| event.receiver == receiver)
}

/// `TransmissionInfo.state` as stored by the forwarder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionState {
    NotAttempted,
    Succeeded,
    InvalidReceiver,
    Failed,
}

impl TryFrom<u8> for TransmissionState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NotAttempted),
            1 => Ok(Self::Succeeded),
            2 => Ok(Self::InvalidReceiver),
            3 => Ok(Self::Failed),
            other => Err(other),
        }
    }
}

/// The fixed-size header at the start of every raw report
///
/// ```text
/// version               offset   0, size  1
/// workflow_execution_id offset   1, size 32
/// timestamp             offset  33, size  4
/// don_id                offset  37, size  4
/// don_config_version    offset  41, size  4
/// workflow_cid          offset  45, size 32
/// workflow_name         offset  77, size 10
/// workflow_owner        offset  87, size 20
/// report_id             offset 107, size  2
/// ```
///
/// Integers are big-endian. The receiver gets bytes `45..109` as its `metadata` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetadata {
    pub version: u8,
    pub workflow_execution_id: B256,
    pub timestamp: u32,
    pub don_id: u32,
    pub don_config_version: u32,
    pub workflow_cid: B256,
    pub workflow_name: FixedBytes<10>,
    pub workflow_owner: Address,
    pub report_id: FixedBytes<2>,
}

impl ReportMetadata {
    pub const LEN: usize = 109;
    const RECEIVER_METADATA_START: usize = 45;

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::LEN);
        out.push(self.version);
        out.extend_from_slice(self.workflow_execution_id.as_slice());
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.don_id.to_be_bytes());
        out.extend_from_slice(&self.don_config_version.to_be_bytes());
        out.extend_from_slice(self.workflow_cid.as_slice());
        out.extend_from_slice(self.workflow_name.as_slice());
        out.extend_from_slice(self.workflow_owner.as_slice());
        out.extend_from_slice(self.report_id.as_slice());
        out
    }

    /// Header followed by the report body
    pub fn encode_report(&self, body: &[u8]) -> Vec<u8> {
        let mut out = self.encode();
        out.extend_from_slice(body);
        out
    }

    /// Splits a raw report into its header and body
    pub fn decode(raw_report: &[u8]) -> Result<(Self, &[u8]), BindingError> {
        if raw_report.len() < Self::LEN {
            return Err(BindingError::ReportTooShort(raw_report.len()));
        }

        let be_u32 = |at: usize| {
            u32::from_be_bytes([
                raw_report[at],
                raw_report[at + 1],
                raw_report[at + 2],
                raw_report[at + 3],
            ])
        };

        let metadata = Self {
            version: raw_report[0],
            workflow_execution_id: B256::from_slice(&raw_report[1..33]),
            timestamp: be_u32(33),
            don_id: be_u32(37),
            don_config_version: be_u32(41),
            workflow_cid: B256::from_slice(&raw_report[45..77]),
            workflow_name: FixedBytes::from_slice(&raw_report[77..87]),
            workflow_owner: Address::from_slice(&raw_report[87..107]),
            report_id: FixedBytes::from_slice(&raw_report[107..109]),
        };

        Ok((metadata, &raw_report[Self::LEN..]))
    }

    /// The slice of the header that the forwarder passes on to `IReceiver.onReport`
    pub fn receiver_metadata(&self) -> Vec<u8> {
        self.encode()[Self::RECEIVER_METADATA_START..].to_vec()
    }
}
