use alloy_primitives::{Address, B256};
use rand::prelude::*;

pub fn rand_address_evm() -> Address {
    let bytes: [u8; 20] = rand::rng().random();
    Address::from(bytes)
}

pub fn rand_hash() -> B256 {
    let bytes: [u8; 32] = rand::rng().random();
    B256::from(bytes)
}
