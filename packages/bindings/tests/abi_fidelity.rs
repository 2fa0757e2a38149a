use std::collections::BTreeSet;

use alloy_json_abi::JsonAbi;
use alloy_primitives::{Selector, B256};
use contract_bindings::{
    balance_reader::BalanceReader, data_storage::DataStorage, erc20::IERC20,
    keystone_forwarder::KeystoneForwarder, message_emitter::MessageEmitter, receiver::IReceiver,
    reserve_manager::ReserveManager, BalanceReaderContract, ContractBinding, DataStorageContract,
    Erc20Contract, EventBinding, KeystoneForwarderContract, MessageEmitterContract,
    ReceiverContract, ReserveManagerContract,
};

fn checked_in_abi(file: &str) -> String {
    let path = format!("{}/abi/{file}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"))
}

fn function_selectors(abi: &JsonAbi) -> BTreeSet<Selector> {
    abi.functions().map(|f| f.selector()).collect()
}

fn function_signatures(abi: &JsonAbi) -> BTreeSet<String> {
    abi.functions().map(|f| f.signature()).collect()
}

fn event_topics(abi: &JsonAbi) -> BTreeSet<B256> {
    abi.events().map(|e| e.selector()).collect()
}

fn assert_calls_match<B: ContractBinding>(file: &str, generated: &JsonAbi, selectors: &[[u8; 4]]) {
    assert_eq!(B::ABI, checked_in_abi(file), "{} ABI text drifted", B::NAME);

    let abi = B::abi().unwrap();
    let bound: BTreeSet<Selector> = selectors.iter().copied().map(Selector::from).collect();

    assert_eq!(function_selectors(&abi), bound, "{} calls", B::NAME);
    assert_eq!(
        function_signatures(&abi),
        function_signatures(generated),
        "{} signatures",
        B::NAME
    );
    assert_eq!(abi.errors().count(), generated.errors().count());

    B::check_artifact(&contract_bindings::ContractArtifact {
        abi,
        bytecode: vec![0x00].into(),
        deployed_bytecode: None,
    })
    .unwrap();
}

fn assert_events_match<B: EventBinding>(selectors: &[[u8; 32]]) {
    let abi = B::abi().unwrap();
    let bound: BTreeSet<B256> = selectors.iter().copied().map(B256::from).collect();
    let table: BTreeSet<B256> = B::EVENT_TOPICS.iter().map(|(_, t)| *t).collect();

    assert_eq!(event_topics(&abi), bound, "{} events", B::NAME);
    assert_eq!(table, bound, "{} topic table", B::NAME);

    for event in abi.events() {
        assert_eq!(B::event_name(&event.selector()), Some(event.name.as_str()));
    }
}

#[test]
fn keystone_forwarder() {
    assert_calls_match::<KeystoneForwarderContract>(
        "KeystoneForwarder.json",
        &KeystoneForwarder::abi::contract(),
        KeystoneForwarder::KeystoneForwarderCalls::SELECTORS,
    );
    assert_events_match::<KeystoneForwarderContract>(
        KeystoneForwarder::KeystoneForwarderEvents::SELECTORS,
    );
}

#[test]
fn receiver() {
    assert_calls_match::<ReceiverContract>(
        "IReceiver.json",
        &IReceiver::abi::contract(),
        IReceiver::IReceiverCalls::SELECTORS,
    );
}

#[test]
fn balance_reader() {
    assert_calls_match::<BalanceReaderContract>(
        "BalanceReader.json",
        &BalanceReader::abi::contract(),
        BalanceReader::BalanceReaderCalls::SELECTORS,
    );
    assert_eq!(BalanceReaderContract::abi().unwrap().events().count(), 0);
}

#[test]
fn message_emitter() {
    assert_calls_match::<MessageEmitterContract>(
        "MessageEmitter.json",
        &MessageEmitter::abi::contract(),
        MessageEmitter::MessageEmitterCalls::SELECTORS,
    );
    assert_events_match::<MessageEmitterContract>(
        MessageEmitter::MessageEmitterEvents::SELECTORS,
    );
}

#[test]
fn data_storage() {
    assert_calls_match::<DataStorageContract>(
        "DataStorage.json",
        &DataStorage::abi::contract(),
        DataStorage::DataStorageCalls::SELECTORS,
    );
    assert_events_match::<DataStorageContract>(DataStorage::DataStorageEvents::SELECTORS);
}

#[test]
fn reserve_manager() {
    assert_calls_match::<ReserveManagerContract>(
        "ReserveManager.json",
        &ReserveManager::abi::contract(),
        ReserveManager::ReserveManagerCalls::SELECTORS,
    );
    assert_events_match::<ReserveManagerContract>(
        ReserveManager::ReserveManagerEvents::SELECTORS,
    );
}

#[test]
fn erc20() {
    assert_calls_match::<Erc20Contract>(
        "IERC20.json",
        &IERC20::abi::contract(),
        IERC20::IERC20Calls::SELECTORS,
    );
    assert_events_match::<Erc20Contract>(IERC20::IERC20Events::SELECTORS);
}

#[test]
fn artifact_missing_a_function_is_rejected() {
    let mut abi = MessageEmitterContract::abi().unwrap();
    abi.functions.remove("getMessage");

    let err = MessageEmitterContract::check_artifact(&contract_bindings::ContractArtifact {
        abi,
        bytecode: vec![0x00].into(),
        deployed_bytecode: None,
    })
    .unwrap_err();

    match err {
        contract_bindings::BindingError::ArtifactMismatch { contract, missing } => {
            assert_eq!(contract, "MessageEmitter");
            assert_eq!(missing, vec!["getMessage(address,uint256)".to_string()]);
        }
        other => panic!("unexpected error {other}"),
    }
}
