#![cfg(feature = "anvil")]

use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
use capability_types::{
    BalanceAtRequest, BlockSelector, CallMsg, EstimateGasRequest, GasConfig,
    GetTransactionByHashRequest, GetTransactionReceiptRequest, HeaderByNumberRequest,
    SignedReport, TxStatus, WriteReportRequest,
};
use contract_bindings::{
    keystone_forwarder, ContractArtifact, ContractBinding, KeystoneForwarderContract,
    ReportMetadata,
};
use local_capabilities::{EvmClientCapability, FakeEvmChain};
use utils::{
    init_tracing_tests,
    test_utils::anvil::{anvil_signing_client, safe_spawn_anvil},
};

// init code that deploys a single STOP byte, so every call succeeds without logs
const STOP_INIT_CODE: &str = "0x6001600c60003960016000f300";

fn stop_artifact<B: ContractBinding>() -> ContractArtifact {
    let json = format!(r#"{{"abi": {}, "bytecode": "{}"}}"#, B::ABI, STOP_INIT_CODE);
    ContractArtifact::from_json(&json).unwrap()
}

#[tokio::test]
async fn reads_against_anvil() {
    init_tracing_tests();
    let anvil = safe_spawn_anvil();
    let client = anvil_signing_client(&anvil).await;
    let chain = FakeEvmChain::new(client, anvil.chain_id(), None);

    let balance = chain
        .balance_at(BalanceAtRequest {
            account: chain.address(),
            block: BlockSelector::Latest,
        })
        .await
        .unwrap()
        .balance;
    assert!(balance > U256::ZERO);

    let header = chain
        .header_by_number(HeaderByNumberRequest {
            block: BlockSelector::Number(0),
        })
        .await
        .unwrap()
        .header
        .unwrap();
    assert_eq!(header.number, 0);

    let gas = chain
        .estimate_gas(EstimateGasRequest {
            msg: CallMsg::new(Address::repeat_byte(1), Vec::new()).with_from(chain.address()),
        })
        .await
        .unwrap()
        .gas;
    assert_eq!(gas, 21_000);
}

#[tokio::test]
async fn write_report_through_forwarder() {
    init_tracing_tests();
    let anvil = safe_spawn_anvil();
    let client = anvil_signing_client(&anvil).await;

    let forwarder = keystone_forwarder::deploy(
        &client.provider,
        &stop_artifact::<KeystoneForwarderContract>(),
    )
    .await
    .unwrap();
    let chain = FakeEvmChain::new(client, anvil.chain_id(), Some(*forwarder.address()));

    let metadata = ReportMetadata {
        version: 1,
        workflow_execution_id: B256::repeat_byte(0xaa),
        timestamp: 1_700_000_000,
        don_id: 1,
        don_config_version: 1,
        workflow_cid: B256::repeat_byte(0xbb),
        workflow_name: FixedBytes::repeat_byte(0x61),
        workflow_owner: Address::repeat_byte(0xcc),
        report_id: FixedBytes::new([0, 1]),
    };
    let reply = chain
        .write_report(WriteReportRequest {
            receiver: Address::repeat_byte(0x42),
            report: SignedReport {
                raw_report: metadata.encode_report(b"payload").into(),
                report_context: Bytes::from(vec![0u8; 96]),
                signatures: vec![Bytes::from(vec![1u8; 65])],
            },
            gas_config: Some(GasConfig { gas_limit: 200_000 }),
        })
        .await
        .unwrap();

    assert_eq!(reply.tx_status, TxStatus::Success);
    assert!(reply.error_message.is_none());
    // the stub emits nothing, so no receiver outcome is known
    assert!(reply.receiver_contract_execution_status.is_none());
    assert!(reply.transaction_fee.unwrap() > U256::ZERO);

    let tx_hash = reply.tx_hash.unwrap();
    let receipt = chain
        .get_transaction_receipt(GetTransactionReceiptRequest { hash: tx_hash })
        .await
        .unwrap()
        .receipt
        .unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.tx_hash, tx_hash);

    let tx = chain
        .get_transaction_by_hash(GetTransactionByHashRequest { hash: tx_hash })
        .await
        .unwrap()
        .transaction
        .unwrap();
    assert_eq!(tx.from, chain.address());
    assert_eq!(tx.to, Some(*forwarder.address()));
    assert_eq!(tx.gas, 200_000);
}
