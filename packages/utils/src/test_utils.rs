pub mod address;
pub mod anvil;
pub mod mock_provider;
