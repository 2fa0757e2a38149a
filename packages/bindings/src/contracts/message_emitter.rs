use alloy_primitives::B256;
use alloy_provider::DynProvider;
use alloy_sol_macro::sol;
use alloy_sol_types::SolEvent;

use crate::{artifact::ContractArtifact, error::BindingError, ContractBinding, EventBinding};

sol!(
    #[allow(missing_docs)]
    #[sol(rpc, abi)]
    #[derive(Debug, PartialEq, Eq)]
    interface MessageEmitter {
        event MessageEmitted(address indexed emitter, uint256 indexed timestamp, string message);

        function emitMessage(string calldata message) external;
        function getLastMessage(address emitter) external view returns (string memory);
        function getMessage(address emitter, uint256 timestamp) external view returns (string memory);
        function typeAndVersion() external pure returns (string memory);
    }
);

pub use MessageEmitter::{
    MessageEmitted, MessageEmitterCalls, MessageEmitterEvents, MessageEmitterInstance,
};

pub type MessageEmitterT = MessageEmitterInstance<DynProvider>;

pub struct MessageEmitterContract;

impl ContractBinding for MessageEmitterContract {
    const NAME: &'static str = "MessageEmitter";
    const ABI: &'static str = include_str!("../../abi/MessageEmitter.json");
    type Calls = MessageEmitterCalls;
}

impl EventBinding for MessageEmitterContract {
    type Events = MessageEmitterEvents;
    const EVENT_TOPICS: &'static [(&'static str, B256)] =
        &[("MessageEmitted", MessageEmitted::SIGNATURE_HASH)];
}

pub async fn deploy(
    provider: &DynProvider,
    artifact: &ContractArtifact,
) -> Result<MessageEmitterT, BindingError> {
    let address = super::deploy_checked::<MessageEmitterContract>(provider, artifact, &[]).await?;
    Ok(MessageEmitter::new(address, provider.clone()))
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy_primitives::{Address, Log, U256};

    #[test]
    fn message_emitted_round_trip() {
        let event = MessageEmitted {
            emitter: Address::repeat_byte(0x0e),
            timestamp: U256::from(1_717_000_000u64),
            message: "hello from a workflow".to_string(),
        };
        let log = Log {
            address: Address::repeat_byte(0x01),
            data: event.encode_log_data(),
        };

        // indexed fields ride in topics, the message in data
        assert_eq!(log.topics().len(), 3);

        match MessageEmitterContract::parse_log(&log).unwrap() {
            MessageEmitterEvents::MessageEmitted(decoded) => assert_eq!(decoded, event),
        }
    }

    #[test]
    fn topic_table() {
        assert_eq!(
            MessageEmitterContract::event_name(&MessageEmitted::SIGNATURE_HASH),
            Some("MessageEmitted")
        );
        assert_eq!(
            MessageEmitted::SIGNATURE_HASH,
            alloy_primitives::keccak256("MessageEmitted(address,uint256,string)")
        );
        assert_eq!(MessageEmitterContract::event_name(&B256::ZERO), None);
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let log = Log::new_unchecked(Address::ZERO, vec![B256::repeat_byte(3)], Default::default());
        let err = MessageEmitterContract::parse_log(&log).unwrap_err();
        assert!(matches!(err, BindingError::UnknownEvent { .. }));

        let log = Log::new_unchecked(Address::ZERO, vec![], Default::default());
        let err = MessageEmitterContract::parse_log(&log).unwrap_err();
        assert!(matches!(err, BindingError::MissingTopic));
    }
}
