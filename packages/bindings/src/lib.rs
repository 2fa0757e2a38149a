//! Bindings for the contracts that local capability workflows read from and write to.
//!
//! Every contract module carries its ABI JSON, the `sol!` generated call/event types
//! and instance wrapper, and implements [`ContractBinding`] (plus [`EventBinding`] when
//! the contract emits events). Deploy bytecode is never baked in, it always comes from a
//! compiler artifact, see [`ContractArtifact`].

pub mod artifact;
pub mod contracts;
pub mod error;
pub mod events;

use std::collections::HashSet;

use alloy_json_abi::JsonAbi;
use alloy_primitives::{Log, Selector, B256};
use alloy_sol_types::{SolEventInterface, SolInterface};

pub use artifact::ContractArtifact;
pub use contracts::*;
pub use error::BindingError;

pub trait ContractBinding {
    /// Contract name, as it appears in the compiler artifact
    const NAME: &'static str;
    /// The ABI JSON text, exactly as emitted by the compiler
    const ABI: &'static str;

    /// The `sol!` generated enum over every callable function
    type Calls: SolInterface;

    fn abi() -> Result<JsonAbi, BindingError> {
        Ok(serde_json::from_str(Self::ABI)?)
    }

    /// Decodes raw calldata into the matching call
    fn decode_call(data: &[u8]) -> Result<Self::Calls, BindingError> {
        Ok(Self::Calls::abi_decode(data)?)
    }

    /// Fails if the artifact does not expose every function of this binding
    fn check_artifact(artifact: &ContractArtifact) -> Result<(), BindingError> {
        let available: HashSet<Selector> =
            artifact.abi.functions().map(|f| f.selector()).collect();

        let missing: Vec<String> = Self::abi()?
            .functions()
            .filter(|f| !available.contains(&f.selector()))
            .map(|f| f.signature())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BindingError::ArtifactMismatch {
                contract: Self::NAME,
                missing,
            })
        }
    }
}

pub trait EventBinding: ContractBinding {
    /// The `sol!` generated enum over every event
    type Events: SolEventInterface;

    /// Event name to topic0 (keccak256 of the canonical signature)
    const EVENT_TOPICS: &'static [(&'static str, B256)];

    fn event_name(topic: &B256) -> Option<&'static str> {
        Self::EVENT_TOPICS
            .iter()
            .find(|(_, t)| t == topic)
            .map(|(name, _)| *name)
    }

    /// Decodes any log emitted by this contract into the matching event
    fn parse_log(log: &Log) -> Result<Self::Events, BindingError> {
        let topic = log.topics().first().ok_or(BindingError::MissingTopic)?;
        if Self::event_name(topic).is_none() {
            return Err(BindingError::UnknownEvent {
                contract: Self::NAME,
                topic: *topic,
            });
        }

        Ok(Self::Events::decode_raw_log(log.topics(), &log.data.data)?)
    }

    fn parse_rpc_log(log: &alloy_rpc_types_eth::Log) -> Result<Self::Events, BindingError> {
        Self::parse_log(&log.inner)
    }
}
