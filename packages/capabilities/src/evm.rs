//! The chain capability: reads, report writes, and a manually fired log trigger.

pub mod convert;

use alloy_primitives::{Address, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionReceipt;
use async_trait::async_trait;
use capability_types::{
    BalanceAtReply, BalanceAtRequest, CallContractReply, CallContractRequest, CapabilityId,
    CapabilityInfo, CapabilityKind, EstimateGasReply, EstimateGasRequest, EvmLog,
    FilterLogsReply, FilterLogsRequest, GetTransactionByHashReply, GetTransactionByHashRequest,
    GetTransactionReceiptReply, GetTransactionReceiptRequest, HeaderByNumberReply,
    HeaderByNumberRequest, LogTriggerConfig, ReceiverContractExecutionStatus, TriggerId,
    TxStatus, WriteReportReply, WriteReportRequest,
};
use contract_bindings::{
    keystone_forwarder::{self, KeystoneForwarder},
    BindingError,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use utils::{config::Config, evm_client::EvmSigningClient};

use crate::{
    capability::{Capability, EvmClientCapability, TriggerCapability},
    error::CapabilityError,
    registry::{FireOutcome, TriggerReceiver, TriggerRegistry},
};

pub struct FakeEvmChain {
    client: EvmSigningClient,
    chain_id: u64,
    forwarder: Option<Address>,
    default_gas_limit: u64,
    log_triggers: TriggerRegistry<LogTriggerConfig, EvmLog>,
}

impl FakeEvmChain {
    pub const DEFAULT_GAS_LIMIT: u64 = 5_000_000;

    pub fn new(client: EvmSigningClient, chain_id: u64, forwarder: Option<Address>) -> Self {
        Self {
            client,
            chain_id,
            forwarder,
            default_gas_limit: Self::DEFAULT_GAS_LIMIT,
            log_triggers: TriggerRegistry::new("evm-log-trigger"),
        }
    }

    pub fn with_default_gas_limit(mut self, gas_limit: u64) -> Self {
        self.default_gas_limit = gas_limit;
        self
    }

    #[instrument(skip(config), fields(subsys = "FakeEvmChain"))]
    pub async fn from_config(config: &Config) -> Result<Self, CapabilityError> {
        let client = EvmSigningClient::new(config.signing_client_config()?).await?;

        tracing::info!(
            "Chain {} at {} signing as {}",
            config.chain.chain_id,
            client.config.endpoint,
            client.address()
        );

        Ok(Self::new(
            client,
            config.chain.chain_id,
            config.chain.forwarder_address,
        )
        .with_default_gas_limit(config.chain.default_gas_limit))
    }

    /// The account that signs report transactions
    pub fn address(&self) -> Address {
        self.client.address()
    }

    pub fn client(&self) -> &EvmSigningClient {
        &self.client
    }

    /// Hands `log` to the consumer registered under `id`
    #[instrument(skip(self, cancel, log), fields(subsys = "FakeEvmChain"))]
    pub fn manual_trigger(
        &self,
        cancel: CancellationToken,
        id: &TriggerId,
        log: EvmLog,
    ) -> Result<JoinHandle<FireOutcome>, CapabilityError> {
        self.log_triggers.fire(cancel, id, log)
    }
}

impl Capability for FakeEvmChain {
    fn info(&self) -> CapabilityInfo {
        let id = CapabilityId {
            name: format!("evm:chain-{}", self.chain_id),
            version: semver::Version::new(1, 0, 0),
        };
        CapabilityInfo::new(
            id,
            CapabilityKind::Target,
            "Reads from and writes reports to a local EVM chain",
        )
    }
}

#[async_trait]
impl TriggerCapability for FakeEvmChain {
    type Config = LogTriggerConfig;
    type Payload = EvmLog;

    #[instrument(skip(self, config), fields(subsys = "FakeEvmChain"))]
    async fn register_trigger(
        &self,
        id: TriggerId,
        config: LogTriggerConfig,
    ) -> Result<TriggerReceiver<EvmLog>, CapabilityError> {
        self.log_triggers.register(id, config)
    }

    #[instrument(skip(self), fields(subsys = "FakeEvmChain"))]
    async fn unregister_trigger(&self, id: &TriggerId) -> Result<(), CapabilityError> {
        self.log_triggers.unregister(id).map(|_| ())
    }
}

#[async_trait]
impl EvmClientCapability for FakeEvmChain {
    #[instrument(skip(self), fields(subsys = "FakeEvmChain"))]
    async fn call_contract(
        &self,
        request: CallContractRequest,
    ) -> Result<CallContractReply, CapabilityError> {
        let data = self
            .client
            .provider
            .call(convert::transaction_request(request.call))
            .block(convert::block_id(request.block))
            .await?;

        Ok(CallContractReply { data })
    }

    #[instrument(skip(self), fields(subsys = "FakeEvmChain"))]
    async fn filter_logs(
        &self,
        request: FilterLogsRequest,
    ) -> Result<FilterLogsReply, CapabilityError> {
        let filter = convert::filter(request.filter_query)?;
        let logs = self.client.provider.get_logs(&filter).await?;

        Ok(FilterLogsReply {
            logs: logs.into_iter().map(convert::evm_log).collect(),
        })
    }

    #[instrument(skip(self), fields(subsys = "FakeEvmChain"))]
    async fn balance_at(
        &self,
        request: BalanceAtRequest,
    ) -> Result<BalanceAtReply, CapabilityError> {
        let balance = self
            .client
            .provider
            .get_balance(request.account)
            .block_id(convert::block_id(request.block))
            .await?;

        Ok(BalanceAtReply { balance })
    }

    #[instrument(skip(self), fields(subsys = "FakeEvmChain"))]
    async fn estimate_gas(
        &self,
        request: EstimateGasRequest,
    ) -> Result<EstimateGasReply, CapabilityError> {
        let gas = self
            .client
            .provider
            .estimate_gas(convert::transaction_request(request.msg))
            .await?;

        Ok(EstimateGasReply { gas })
    }

    #[instrument(skip(self), fields(subsys = "FakeEvmChain"))]
    async fn get_transaction_by_hash(
        &self,
        request: GetTransactionByHashRequest,
    ) -> Result<GetTransactionByHashReply, CapabilityError> {
        let transaction = self
            .client
            .provider
            .get_transaction_by_hash(request.hash)
            .await?;

        Ok(GetTransactionByHashReply {
            transaction: transaction.map(convert::evm_transaction),
        })
    }

    #[instrument(skip(self), fields(subsys = "FakeEvmChain"))]
    async fn get_transaction_receipt(
        &self,
        request: GetTransactionReceiptRequest,
    ) -> Result<GetTransactionReceiptReply, CapabilityError> {
        let receipt = self
            .client
            .provider
            .get_transaction_receipt(request.hash)
            .await?;

        Ok(GetTransactionReceiptReply {
            receipt: receipt.map(convert::evm_receipt),
        })
    }

    #[instrument(skip(self), fields(subsys = "FakeEvmChain"))]
    async fn header_by_number(
        &self,
        request: HeaderByNumberRequest,
    ) -> Result<HeaderByNumberReply, CapabilityError> {
        let block = self
            .client
            .provider
            .get_block_by_number(convert::block_tag(request.block))
            .await?;

        Ok(HeaderByNumberReply {
            header: block.map(convert::evm_header),
        })
    }

    /// Sends the report through the forwarder and waits for the receipt
    ///
    /// A send failure is returned as an error. Once the transaction has a hash, the outcome
    /// is always a reply, with `TxStatus::Fatal` if no receipt could be fetched.
    #[instrument(skip(self, request), fields(subsys = "FakeEvmChain", receiver = %request.receiver))]
    async fn write_report(
        &self,
        request: WriteReportRequest,
    ) -> Result<WriteReportReply, CapabilityError> {
        let forwarder = self.forwarder.ok_or(CapabilityError::NoForwarder)?;
        let gas_limit = request
            .gas_config
            .map(|config| config.gas_limit)
            .unwrap_or(self.default_gas_limit);

        let report = request.report;
        let pending = KeystoneForwarder::new(forwarder, self.client.provider.clone())
            .report(
                request.receiver,
                report.raw_report,
                report.report_context,
                report.signatures,
            )
            .gas(gas_limit)
            .send()
            .await
            .map_err(BindingError::from)?;

        let tx_hash = *pending.tx_hash();
        let receipt = pending.get_receipt().await;

        Ok(report_reply(forwarder, request.receiver, tx_hash, receipt))
    }
}

/// Turns the outcome of waiting for a report transaction into the reply
fn report_reply<E: std::fmt::Display>(
    forwarder: Address,
    receiver: Address,
    tx_hash: B256,
    receipt: Result<TransactionReceipt, E>,
) -> WriteReportReply {
    let receipt = match receipt {
        Ok(receipt) => receipt,
        Err(err) => {
            tracing::warn!("No receipt for report transaction {}: {}", tx_hash, err);
            return WriteReportReply {
                tx_status: TxStatus::Fatal,
                tx_hash: Some(tx_hash),
                receiver_contract_execution_status: None,
                transaction_fee: None,
                error_message: Some(err.to_string()),
            };
        }
    };

    let transaction_fee = U256::from(receipt.gas_used) * U256::from(receipt.effective_gas_price);

    if !receipt.status() {
        tracing::warn!("Report transaction {} reverted", tx_hash);
        return WriteReportReply {
            tx_status: TxStatus::Reverted,
            tx_hash: Some(tx_hash),
            receiver_contract_execution_status: None,
            transaction_fee: Some(transaction_fee),
            error_message: Some("forwarder transaction reverted".to_string()),
        };
    }

    let processed = keystone_forwarder::find_report_processed(
        receipt.inner.logs().iter().map(|log| &log.inner),
        forwarder,
        receiver,
    );

    let receiver_contract_execution_status = processed.map(|event| match event.result {
        true => ReceiverContractExecutionStatus::Success,
        false => ReceiverContractExecutionStatus::Reverted,
    });

    tracing::info!(
        "Wrote report to {} via forwarder {} with tx {}",
        receiver,
        forwarder,
        tx_hash
    );

    WriteReportReply {
        tx_status: TxStatus::Success,
        tx_hash: Some(tx_hash),
        receiver_contract_execution_status,
        transaction_fee: Some(transaction_fee),
        error_message: None,
    }
}
