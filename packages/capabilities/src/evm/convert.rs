//! Conversions between the capability messages and alloy's RPC types.

use alloy_consensus::Transaction as _;
use alloy_network::{TransactionBuilder, TransactionResponse};
use alloy_rpc_types_eth::{
    Block, BlockId, BlockNumberOrTag, Filter, Log, Transaction, TransactionReceipt,
    TransactionRequest,
};
use capability_types::{
    BlockSelector, CallMsg, EvmHeader, EvmLog, EvmReceipt, EvmTransaction, FilterQuery,
};

use crate::error::CapabilityError;

pub fn block_id(block: BlockSelector) -> BlockId {
    match block {
        BlockSelector::Latest => BlockId::latest(),
        BlockSelector::Safe => BlockId::safe(),
        BlockSelector::Finalized => BlockId::finalized(),
        BlockSelector::Number(number) => BlockId::number(number),
    }
}

pub fn block_tag(block: BlockSelector) -> BlockNumberOrTag {
    match block {
        BlockSelector::Latest => BlockNumberOrTag::Latest,
        BlockSelector::Safe => BlockNumberOrTag::Safe,
        BlockSelector::Finalized => BlockNumberOrTag::Finalized,
        BlockSelector::Number(number) => BlockNumberOrTag::Number(number),
    }
}

pub fn transaction_request(msg: CallMsg) -> TransactionRequest {
    let tx = TransactionRequest::default()
        .with_to(msg.to)
        .with_input(msg.data);

    match msg.from {
        Some(from) => tx.with_from(from),
        None => tx,
    }
}

pub fn filter(query: FilterQuery) -> Result<Filter, CapabilityError> {
    if query.topics.len() > 4 {
        return Err(CapabilityError::TooManyTopics(query.topics.len()));
    }

    let mut filter = Filter::new();

    filter = match query.block_hash {
        Some(hash) => filter.at_block_hash(hash),
        None => {
            if let Some(from) = query.from_block {
                filter = filter.from_block(from);
            }
            if let Some(to) = query.to_block {
                filter = filter.to_block(to);
            }
            filter
        }
    };

    if !query.addresses.is_empty() {
        filter = filter.address(query.addresses);
    }

    for (position, topics) in query.topics.into_iter().enumerate() {
        // an empty position is a wildcard
        if !topics.is_empty() {
            filter.topics[position] = topics.into();
        }
    }

    Ok(filter)
}

pub fn evm_log(log: Log) -> EvmLog {
    EvmLog {
        address: log.inner.address,
        topics: log.inner.data.topics().to_vec(),
        data: log.inner.data.data.clone(),
        block_number: log.block_number,
        block_hash: log.block_hash,
        tx_hash: log.transaction_hash,
        tx_index: log.transaction_index,
        log_index: log.log_index,
        removed: log.removed,
    }
}

pub fn evm_transaction(tx: Transaction) -> EvmTransaction {
    EvmTransaction {
        hash: TransactionResponse::tx_hash(&tx),
        nonce: tx.nonce(),
        from: TransactionResponse::from(&tx),
        to: tx.to(),
        value: tx.value(),
        gas: tx.gas_limit(),
        gas_price: alloy_consensus::Transaction::gas_price(&tx),
        data: tx.input().clone(),
        block_number: tx.block_number,
    }
}

pub fn evm_receipt(receipt: TransactionReceipt) -> EvmReceipt {
    EvmReceipt {
        success: receipt.status(),
        logs: receipt.inner.logs().iter().cloned().map(evm_log).collect(),
        gas_used: receipt.gas_used,
        tx_hash: receipt.transaction_hash,
        contract_address: receipt.contract_address,
        block_hash: receipt.block_hash,
        block_number: receipt.block_number,
        tx_index: receipt.transaction_index,
        effective_gas_price: receipt.effective_gas_price,
    }
}

pub fn evm_header(block: Block) -> EvmHeader {
    EvmHeader {
        number: block.header.number,
        hash: block.header.hash,
        parent_hash: block.header.parent_hash,
        timestamp: block.header.timestamp,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy_primitives::{Address, Bytes, LogData, B256};

    #[test]
    fn filter_from_query() {
        let query = FilterQuery {
            block_hash: None,
            from_block: Some(10),
            to_block: Some(20),
            addresses: vec![Address::repeat_byte(1)],
            topics: vec![vec![B256::repeat_byte(2)], vec![], vec![B256::repeat_byte(3)]],
        };
        let filter = filter(query).unwrap();

        assert_eq!(filter.get_from_block(), Some(10));
        assert_eq!(filter.get_to_block(), Some(20));
        assert!(filter.address.matches(&Address::repeat_byte(1)));
        assert!(filter.topics[0].matches(&B256::repeat_byte(2)));
        assert!(filter.topics[1].is_empty());
        assert!(filter.topics[2].matches(&B256::repeat_byte(3)));
    }

    #[test]
    fn block_hash_wins_over_range() {
        let hash = B256::repeat_byte(9);
        let filter = filter(FilterQuery {
            block_hash: Some(hash),
            from_block: Some(1),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(filter.get_block_hash(), Some(hash));
        assert_eq!(filter.get_from_block(), None);
    }

    #[test]
    fn five_topic_positions_rejected() {
        let err = filter(FilterQuery {
            topics: vec![vec![]; 5],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, CapabilityError::TooManyTopics(5)));
    }

    #[test]
    fn log_fields_carry_over() {
        let log = Log {
            inner: alloy_primitives::Log {
                address: Address::repeat_byte(4),
                data: LogData::new_unchecked(
                    vec![B256::repeat_byte(5)],
                    Bytes::from_static(b"data"),
                ),
            },
            block_number: Some(12),
            log_index: Some(3),
            ..Default::default()
        };

        let converted = evm_log(log);
        assert_eq!(converted.address, Address::repeat_byte(4));
        assert_eq!(converted.event_sig(), Some(&B256::repeat_byte(5)));
        assert_eq!(converted.data, Bytes::from_static(b"data"));
        assert_eq!(converted.block_number, Some(12));
        assert_eq!(converted.log_index, Some(3));
        assert!(!converted.removed);
    }

    #[test]
    fn call_msg_to_request() {
        let msg = CallMsg::new(Address::repeat_byte(6), vec![0xde, 0xad])
            .with_from(Address::repeat_byte(7));
        let tx = transaction_request(msg);

        assert_eq!(tx.from, Some(Address::repeat_byte(7)));
        assert_eq!(tx.input.input(), Some(&Bytes::from(vec![0xde, 0xad])));

        assert_eq!(block_tag(BlockSelector::Number(5)), BlockNumberOrTag::Number(5));
        assert_eq!(block_id(BlockSelector::Finalized), BlockId::finalized());
    }
}
