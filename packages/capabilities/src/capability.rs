use async_trait::async_trait;
use capability_types::{
    BalanceAtReply, BalanceAtRequest, CallContractReply, CallContractRequest, CapabilityInfo,
    EstimateGasReply, EstimateGasRequest, FilterLogsReply, FilterLogsRequest,
    GetTransactionByHashReply, GetTransactionByHashRequest, GetTransactionReceiptReply,
    GetTransactionReceiptRequest, HeaderByNumberReply, HeaderByNumberRequest, TriggerId,
    WriteReportReply, WriteReportRequest,
};

use crate::{error::CapabilityError, registry::TriggerReceiver};

pub trait Capability {
    fn info(&self) -> CapabilityInfo;
}

/// A capability that pushes events to workflows which registered for them
#[async_trait]
pub trait TriggerCapability: Capability {
    type Config: Send + 'static;
    type Payload: Send + 'static;

    async fn register_trigger(
        &self,
        id: TriggerId,
        config: Self::Config,
    ) -> Result<TriggerReceiver<Self::Payload>, CapabilityError>;

    async fn unregister_trigger(&self, id: &TriggerId) -> Result<(), CapabilityError>;
}

/// Read access to an EVM chain, plus writing signed reports through the forwarder
///
/// Every read maps to exactly one RPC request.
#[async_trait]
pub trait EvmClientCapability: Capability {
    async fn call_contract(
        &self,
        request: CallContractRequest,
    ) -> Result<CallContractReply, CapabilityError>;

    async fn filter_logs(
        &self,
        request: FilterLogsRequest,
    ) -> Result<FilterLogsReply, CapabilityError>;

    async fn balance_at(&self, request: BalanceAtRequest)
        -> Result<BalanceAtReply, CapabilityError>;

    async fn estimate_gas(
        &self,
        request: EstimateGasRequest,
    ) -> Result<EstimateGasReply, CapabilityError>;

    async fn get_transaction_by_hash(
        &self,
        request: GetTransactionByHashRequest,
    ) -> Result<GetTransactionByHashReply, CapabilityError>;

    async fn get_transaction_receipt(
        &self,
        request: GetTransactionReceiptRequest,
    ) -> Result<GetTransactionReceiptReply, CapabilityError>;

    async fn header_by_number(
        &self,
        request: HeaderByNumberRequest,
    ) -> Result<HeaderByNumberReply, CapabilityError>;

    async fn write_report(
        &self,
        request: WriteReportRequest,
    ) -> Result<WriteReportReply, CapabilityError>;
}
