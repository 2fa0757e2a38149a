//! Filter, watch and parse helpers shared by every event binding.

use alloy_contract::Event;
use alloy_primitives::Address;
use alloy_provider::DynProvider;
use alloy_rpc_types_eth::{BlockNumberOrTag, Filter, Log};
use alloy_sol_types::SolEvent;
use futures::{stream::BoxStream, StreamExt};

use crate::error::BindingError;

/// A filter that matches one event type emitted by one contract
pub fn event_filter<E: SolEvent>(address: Address) -> Filter {
    Filter::new()
        .address(address)
        .event_signature(E::SIGNATURE_HASH)
}

/// Historical query for one event type, `to_block` defaults to latest
pub async fn filter_events<E: SolEvent>(
    provider: &DynProvider,
    address: Address,
    from_block: u64,
    to_block: Option<u64>,
) -> Result<Vec<(E, Log)>, BindingError> {
    let filter = event_filter::<E>(address)
        .from_block(from_block)
        .to_block(to_block.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number));

    Ok(Event::<_, E>::new(provider, filter).query().await?)
}

/// Live stream of decoded events from a polling log filter
///
/// Decode failures are yielded as items, the stream keeps going.
pub async fn watch_events<E>(
    provider: &DynProvider,
    address: Address,
) -> Result<BoxStream<'static, Result<(E, Log), BindingError>>, BindingError>
where
    E: SolEvent + Send + 'static,
{
    let poller = Event::<_, E>::new(provider, event_filter::<E>(address))
        .watch()
        .await?;

    Ok(poller
        .into_stream()
        .map(|item| item.map_err(BindingError::from))
        .boxed())
}

/// Decodes a single log as `E`, failing if topic0 does not match
pub fn parse_event<E: SolEvent>(log: &Log) -> Result<E, BindingError> {
    Ok(E::decode_log(&log.inner)?.data)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::contracts::message_emitter::MessageEmitter::MessageEmitted;
    use alloy_primitives::{LogData, U256};

    #[test]
    fn filter_targets_one_event() {
        let address = Address::repeat_byte(7);
        let filter = event_filter::<MessageEmitted>(address);

        assert!(filter.address.matches(&address));
        assert!(filter.topics[0].matches(&MessageEmitted::SIGNATURE_HASH));
    }

    #[test]
    fn parse_event_checks_signature() {
        let event = MessageEmitted {
            emitter: Address::repeat_byte(1),
            timestamp: U256::from(1700000000u64),
            message: "gm".to_string(),
        };
        let log = Log {
            inner: alloy_primitives::Log {
                address: Address::repeat_byte(2),
                data: event.encode_log_data(),
            },
            ..Default::default()
        };

        let parsed: MessageEmitted = parse_event(&log).unwrap();
        assert_eq!(parsed, event);

        let mut wrong = log.clone();
        wrong.inner.data = LogData::new_unchecked(vec![], log.inner.data.data.clone());
        parse_event::<MessageEmitted>(&wrong).unwrap_err();
    }
}
