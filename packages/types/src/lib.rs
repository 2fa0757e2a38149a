mod capability;
mod credential;
mod evm;
mod id;
mod trigger;

pub use capability::*;
pub use credential::*;
pub use evm::*;
pub use id::*;
pub use trigger::*;
