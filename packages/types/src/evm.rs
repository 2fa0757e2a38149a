//! Request and reply messages for the EVM chain capability.
//!
//! These mirror the shape of the capability's wire messages, flattened into plain
//! serde structs. Conversions from the RPC client's types live next to the client.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Which block a read should be evaluated against
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockSelector {
    #[default]
    Latest,
    Safe,
    Finalized,
    Number(u64),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CallMsg {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

impl CallMsg {
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from: None,
            to,
            data: data.into(),
        }
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CallContractRequest {
    pub call: CallMsg,
    #[serde(default)]
    pub block: BlockSelector,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CallContractReply {
    pub data: Bytes,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct FilterQuery {
    /// If set, `from_block` and `to_block` are ignored
    pub block_hash: Option<B256>,
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Positional topic filters, each position matches any of the listed values
    /// An empty position matches anything
    #[serde(default)]
    pub topics: Vec<Vec<B256>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FilterLogsRequest {
    pub filter_query: FilterQuery,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FilterLogsReply {
    pub logs: Vec<EvmLog>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct EvmLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: Option<u64>,
    pub block_hash: Option<B256>,
    pub tx_hash: Option<B256>,
    pub tx_index: Option<u64>,
    pub log_index: Option<u64>,
    #[serde(default)]
    pub removed: bool,
}

impl EvmLog {
    /// The event signature hash, if the log is not anonymous
    pub fn event_sig(&self) -> Option<&B256> {
        self.topics.first()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BalanceAtRequest {
    pub account: Address,
    #[serde(default)]
    pub block: BlockSelector,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BalanceAtReply {
    pub balance: U256,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EstimateGasRequest {
    pub msg: CallMsg,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EstimateGasReply {
    pub gas: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GetTransactionByHashRequest {
    pub hash: B256,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GetTransactionByHashReply {
    /// None if the node does not know the transaction
    pub transaction: Option<EvmTransaction>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EvmTransaction {
    pub hash: B256,
    pub nonce: u64,
    pub from: Address,
    /// None for contract creation
    pub to: Option<Address>,
    pub value: U256,
    pub gas: u64,
    pub gas_price: Option<u128>,
    pub data: Bytes,
    pub block_number: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GetTransactionReceiptRequest {
    pub hash: B256,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GetTransactionReceiptReply {
    /// None while the transaction is pending or unknown
    pub receipt: Option<EvmReceipt>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EvmReceipt {
    pub success: bool,
    pub logs: Vec<EvmLog>,
    pub gas_used: u64,
    pub tx_hash: B256,
    pub contract_address: Option<Address>,
    pub block_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub tx_index: Option<u64>,
    pub effective_gas_price: u128,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HeaderByNumberRequest {
    #[serde(default)]
    pub block: BlockSelector,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HeaderByNumberReply {
    pub header: Option<EvmHeader>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EvmHeader {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub timestamp: u64,
}

/// A consensus-signed report, ready to be handed to the forwarder contract
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SignedReport {
    pub raw_report: Bytes,
    pub report_context: Bytes,
    pub signatures: Vec<Bytes>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasConfig {
    pub gas_limit: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WriteReportRequest {
    pub receiver: Address,
    pub report: SignedReport,
    pub gas_config: Option<GasConfig>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Success,
    Reverted,
    /// Sent, but no receipt could be obtained
    Fatal,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverContractExecutionStatus {
    Success,
    Reverted,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WriteReportReply {
    pub tx_status: TxStatus,
    pub tx_hash: Option<B256>,
    pub receiver_contract_execution_status: Option<ReceiverContractExecutionStatus>,
    /// gas used multiplied by the effective gas price, in wei
    pub transaction_fee: Option<U256>,
    pub error_message: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    #[default]
    Latest,
    Safe,
    Finalized,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct LogTriggerConfig {
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub topics: Vec<Vec<B256>>,
    #[serde(default)]
    pub confidence: ConfidenceLevel,
}
