//! In-process stand-ins for the capabilities a workflow talks to.
//!
//! The chain capability forwards every request to a real RPC endpoint (usually anvil).
//! Triggers never fire on their own, tests push events through `manual_trigger`.

pub mod capability;
pub mod cron;
pub mod error;
pub mod evm;
pub mod http;
pub mod registry;

pub use capability::{Capability, EvmClientCapability, TriggerCapability};
pub use self::cron::FakeCronTrigger;
pub use error::CapabilityError;
pub use evm::FakeEvmChain;
pub use http::FakeHttpTrigger;
pub use registry::{FireOutcome, TriggerReceiver, TriggerRegistry};
