#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod error;
pub mod evm_client;
pub mod serde;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Installs the global subscriber, filtered by the config's log levels
///
/// Fails if a subscriber is already installed or a log directive does not parse.
pub fn init_tracing(config: &config::Config) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.tracing_env_filter()?)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::debug!("Tracing initialized");
    Ok(())
}

// the test version of init_tracing does not take a config
// since config itself is tested and modified from different parallel tests
// so this only uses the default tracing settings
#[cfg(debug_assertions)]
pub fn init_tracing_tests() {
    use std::sync::LazyLock;

    // tests run on many threads, the mutex makes sure we only initialize once globally
    static INIT: LazyLock<std::sync::Mutex<bool>> = LazyLock::new(|| std::sync::Mutex::new(false));

    let mut init = match INIT.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if !*init {
        *init = true;

        tracing_subscriber::fmt::init();
        tracing::debug!("Tracing initialized for tests");
    }
}
