use std::collections::HashSet;

use alloy_node_bindings::{Anvil, AnvilInstance};
use rand::Rng;

use crate::evm_client::{EvmSigningClient, EvmSigningClientConfig};

pub fn safe_spawn_anvil() -> AnvilInstance {
    let mut attempted_ports = HashSet::new();
    loop {
        // If the port is already in use, try a different one
        let mut rng = rand::rng();
        let port: u16 = rng.random_range(49152..=65535);
        if !attempted_ports.insert(port) {
            continue;
        }
        if attempted_ports.len() > 1000 {
            panic!("Failed to spawn Anvil after 1000 attempts");
        }
        if let Ok(instance) = Anvil::new().port(port).try_spawn() {
            return instance;
        }
    }
}

/// A signing client for the first dev account of a running anvil
pub async fn anvil_signing_client(anvil: &AnvilInstance) -> EvmSigningClient {
    let config = EvmSigningClientConfig::new_anvil(&anvil.endpoint())
        .unwrap()
        .with_poll_interval(std::time::Duration::from_millis(100));

    EvmSigningClient::new(config).await.unwrap()
}
