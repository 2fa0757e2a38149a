use alloy_primitives::Address;
use anyhow::{bail, Result};
use capability_types::Credential;
use figment::{providers::Format, Figment};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::{
    error::EvmClientError,
    evm_client::{EvmEndpoint, EvmSigningClientConfig},
    serde::deserialize_vec_string,
};

// e.g. LOCAL_CAPS_HOME, LOCAL_CAPS_CHAIN__HTTP_ENDPOINT
pub const ENV_VAR_PREFIX: &str = "LOCAL_CAPS";

pub const CONFIG_FILENAME: &str = "local-capabilities.toml";

const DIRNAME: &str = "local-capabilities";

/// Settings that can be passed on the command line or through env vars
///
/// These are resolved first, since they decide where the config file and dotenv file are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliEnvArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "deserialize_vec_string")]
    pub log_level: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
}

impl CliEnvArgs {
    /// Fills unset fields from `LOCAL_CAPS_*` env vars, explicit values win
    pub fn merge_cli_env_args(&self) -> Result<Self> {
        let env_prefix = format!("{}_", ENV_VAR_PREFIX);

        let merged = Figment::new()
            .merge(figment::providers::Env::prefixed(&env_prefix))
            .merge(figment::providers::Serialized::defaults(self))
            .extract()?;

        Ok(merged)
    }

    fn env_var(name: &str) -> Option<String> {
        std::env::var(format!("{}_{name}", ENV_VAR_PREFIX)).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing directives, e.g. `["info", "local_capabilities=debug"]`
    #[serde(deserialize_with = "deserialize_vec_string")]
    pub log_level: Vec<String>,
    /// Mnemonic or `0x` private key used by the chain fake to sign transactions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    pub chain: ChainConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: vec!["info".to_string()],
            credential: None,
            chain: ChainConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub http_endpoint: Option<String>,
    pub ws_endpoint: Option<String>,
    /// The KeystoneForwarder that reports are written through
    pub forwarder_address: Option<Address>,
    /// Used by `write_report` when the request carries no gas config
    pub default_gas_limit: u64,
    pub poll_interval_ms: Option<u64>,
    pub hd_index: Option<u32>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 31337,
            http_endpoint: Some("http://127.0.0.1:8545".to_string()),
            ws_endpoint: None,
            forwarder_address: None,
            default_gas_limit: 5_000_000,
            poll_interval_ms: None,
            hd_index: None,
        }
    }
}

impl Config {
    pub fn load(cli_env_args: CliEnvArgs) -> Result<Self> {
        ConfigBuilder::new(cli_env_args).build()
    }

    pub fn tracing_env_filter(&self) -> Result<tracing_subscriber::EnvFilter> {
        let mut filter = tracing_subscriber::EnvFilter::from_default_env();
        for directive in &self.log_level {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => bail!("{}: {}", err, directive),
            }
        }

        Ok(filter)
    }

    pub fn signing_client_config(&self) -> Result<EvmSigningClientConfig, EvmClientError> {
        let credential = self
            .credential
            .clone()
            .ok_or(EvmClientError::MissingCredential)?;

        let mut config = EvmSigningClientConfig::new(self.chain.signing_endpoint()?, credential);
        config.hd_index = self.chain.hd_index;
        config.poll_interval = self.chain.poll_interval_ms.map(Duration::from_millis);

        Ok(config)
    }
}

impl ChainConfig {
    // prefer HTTP for signing clients
    pub fn signing_endpoint(&self) -> Result<EvmEndpoint, EvmClientError> {
        match (&self.http_endpoint, &self.ws_endpoint) {
            (Some(url), _) => EvmEndpoint::new_http(url),
            (None, Some(url)) => EvmEndpoint::new_ws(url),
            (None, None) => Err(EvmClientError::ParseEndpoint(
                "No endpoint provided".to_string(),
            )),
        }
    }

    // prefer WS for query clients, log filters can then be backed by subscriptions
    pub fn query_endpoint(&self) -> Result<EvmEndpoint, EvmClientError> {
        match (&self.ws_endpoint, &self.http_endpoint) {
            (Some(url), _) => EvmEndpoint::new_ws(url),
            (None, Some(url)) => EvmEndpoint::new_http(url),
            (None, None) => Err(EvmClientError::ParseEndpoint(
                "No endpoint provided".to_string(),
            )),
        }
    }
}

/// Layers defaults, the TOML file, `LOCAL_CAPS_*` env vars and finally cli args
#[derive(Debug)]
pub struct ConfigBuilder {
    pub cli_env_args: CliEnvArgs,
}

impl ConfigBuilder {
    pub fn new(cli_env_args: CliEnvArgs) -> Self {
        Self { cli_env_args }
    }

    pub fn build(self) -> Result<Config> {
        // dotenv first, it may set the env vars that locate the config file
        let mut dotenv_paths = Vec::new();

        if let Some(dotenv_path) = &self.cli_env_args.dotenv {
            dotenv_paths.push(expand_tilde(dotenv_path));
        }

        if let Some(dotenv_path) = CliEnvArgs::env_var("DOTENV") {
            dotenv_paths.push(expand_tilde(&PathBuf::from(dotenv_path)));
        }

        dotenv_paths.push(std::env::current_dir()?.join(".env"));

        for dotenv_path in dotenv_paths {
            if dotenv_path.exists() {
                if let Err(e) = dotenvy::from_path(&dotenv_path) {
                    bail!("Error loading dotenv file {}: {}", dotenv_path.display(), e);
                }
            }
        }

        let cli_env_args = self.cli_env_args.merge_cli_env_args()?;

        let mut figment =
            Figment::new().merge(figment::providers::Serialized::defaults(Config::default()));

        match ConfigFilePath::new(CONFIG_FILENAME, cli_env_args.home.clone()).into_path() {
            Some(filepath) => {
                tracing::debug!("Loading config from {}", filepath.display());
                figment = figment.merge(figment::providers::Toml::file(filepath));
            }
            None => tracing::debug!("No {} found, using defaults", CONFIG_FILENAME),
        }

        let config = figment
            .merge(figment::providers::Env::prefixed(&format!("{}_", ENV_VAR_PREFIX)).split("__"))
            .merge(figment::providers::Serialized::defaults(cli_env_args))
            .extract()?;

        Ok(config)
    }
}

fn expand_tilde(path: &std::path::Path) -> PathBuf {
    shellexpand::tilde(&path.to_string_lossy()).to_string().into()
}

// tries a series of fallback directories, looking for the config file
#[derive(Clone, Debug)]
pub struct ConfigFilePath {
    pub filename: String,
    // the optional directory set via direct args or env
    pub arg_env_dir: Option<PathBuf>,
}

impl ConfigFilePath {
    pub fn new(filename: impl ToString, arg_env_dir: Option<PathBuf>) -> Self {
        Self {
            filename: filename.to_string(),
            arg_env_dir,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        self.into_possible().into_iter().find(|path| path.exists())
    }

    pub fn into_possible(self) -> Vec<PathBuf> {
        let Self {
            filename,
            arg_env_dir,
        } = self;

        let mut dirs = Vec::new();

        // explicit, e.g. --home /foo or LOCAL_CAPS_HOME=/foo
        if let Some(dir) = arg_env_dir {
            dirs.push(expand_tilde(&dir));
        }

        // wherever the command is run from
        if let Ok(dir) = std::env::current_dir() {
            dirs.push(dir);
        }

        // ~/.local-capabilities/local-capabilities.toml
        if let Some(dir) = dirs::home_dir().map(|dir| dir.join(format!(".{DIRNAME}"))) {
            dirs.push(dir);
        }

        // e.g. ~/.config/local-capabilities on linux
        if let Some(dir) = dirs::config_dir().map(|dir| dir.join(DIRNAME)) {
            dirs.push(dir);
        }

        let mut all_files: Vec<PathBuf> = dirs.into_iter().map(|dir| dir.join(&filename)).collect();

        all_files.dedup();

        all_files
    }
}

#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use super::*;

    fn cli_args(home: &Path) -> CliEnvArgs {
        CliEnvArgs {
            home: Some(home.to_path_buf()),
            // purposefully points at a missing file so a real .env is never picked up
            dotenv: Some(home.join("does-not-exist")),
            ..Default::default()
        }
    }

    fn write_config(dir: &Path, contents: &str) {
        std::fs::write(dir.join(CONFIG_FILENAME), contents).unwrap();
    }

    #[test]
    fn config_filepath() {
        fn filepaths(home: Option<PathBuf>) -> Vec<PathBuf> {
            let home = CliEnvArgs {
                home,
                ..Default::default()
            }
            .merge_cli_env_args()
            .unwrap()
            .home;

            ConfigFilePath::new(CONFIG_FILENAME, home).into_possible()
        }

        // an explicit home directory is tried first
        assert_eq!(
            filepaths(Some("/tmp1".into())).first().unwrap(),
            &PathBuf::from("/tmp1").join(CONFIG_FILENAME)
        );

        // and wins over the env var
        temp_env::with_vars(
            [(format!("{}_HOME", ENV_VAR_PREFIX), Some("/tmp2"))],
            || {
                assert_eq!(
                    filepaths(Some("/tmp3".into())).first().unwrap(),
                    &PathBuf::from("/tmp3").join(CONFIG_FILENAME)
                );
            },
        );

        // without one, the env var comes first
        temp_env::with_vars(
            [(format!("{}_HOME", ENV_VAR_PREFIX), Some("/tmp2"))],
            || {
                assert_eq!(
                    filepaths(None).first().unwrap(),
                    &PathBuf::from("/tmp2").join(CONFIG_FILENAME)
                );
            },
        );
    }

    #[test]
    fn config_layers() {
        let home = tempfile::tempdir().unwrap();
        write_config(
            home.path(),
            r#"
            log_level = ["debug"]

            [chain]
            chain_id = 11155111
            http_endpoint = "http://10.0.0.1:8545"
            forwarder_address = "0x15fC6ae953E024d975e77382eEeC56A9101f9F88"
            "#,
        );

        let config = temp_env::with_vars(
            [(format!("{}_CHAIN__CHAIN_ID", ENV_VAR_PREFIX), Some("1"))],
            || Config::load(cli_args(home.path())).unwrap(),
        );

        // env beats the file
        assert_eq!(config.chain.chain_id, 1);
        // file beats the defaults
        assert_eq!(
            config.chain.http_endpoint.as_deref(),
            Some("http://10.0.0.1:8545")
        );
        assert_eq!(
            config.chain.forwarder_address,
            Some(alloy_primitives::address!(
                "0x15fC6ae953E024d975e77382eEeC56A9101f9F88"
            ))
        );
        assert_eq!(config.log_level, ["debug"]);
        // untouched defaults survive
        assert_eq!(
            config.chain.default_gas_limit,
            ChainConfig::default().default_gas_limit
        );
    }

    #[test]
    fn config_log_level_overrides() {
        let home = tempfile::tempdir().unwrap();

        let config = temp_env::with_vars(
            [(
                format!("{}_LOG_LEVEL", ENV_VAR_PREFIX),
                Some("info, local_capabilities=debug"),
            )],
            || Config::load(cli_args(home.path())).unwrap(),
        );
        assert_eq!(config.log_level, ["info", "local_capabilities=debug"]);

        // cli args beat the env var
        let config = temp_env::with_vars(
            [(format!("{}_LOG_LEVEL", ENV_VAR_PREFIX), Some("info"))],
            || {
                let mut args = cli_args(home.path());
                args.log_level = vec!["trace".to_string()];
                Config::load(args).unwrap()
            },
        );
        assert_eq!(config.log_level, ["trace"]);
        config.tracing_env_filter().unwrap();

        let config = Config {
            log_level: vec!["foo=notalevel".to_string()],
            ..Default::default()
        };
        config.tracing_env_filter().unwrap_err();
    }

    #[test]
    fn config_dotenv() {
        let home = tempfile::tempdir().unwrap();
        let dotenv = home.path().join(".env.test");
        std::fs::write(&dotenv, "LOCAL_CAPS_RANDOM_TEST_VALUE=\"hello world\"\n").unwrap();

        let mut args = cli_args(home.path());
        args.dotenv = Some(dotenv);
        Config::load(args).unwrap();

        let var = format!("{}_RANDOM_TEST_VALUE", ENV_VAR_PREFIX);
        assert_eq!(std::env::var(&var).unwrap(), "hello world");
        std::env::remove_var(var);
    }

    #[test]
    fn signing_client_config() {
        let mut config = Config::default();
        let err = config.signing_client_config().unwrap_err();
        assert!(matches!(err, EvmClientError::MissingCredential));

        config.credential = Some(Credential::new(EvmSigningClientConfig::ANVIL_MNEMONIC));
        config.chain.ws_endpoint = Some("ws://127.0.0.1:8546".to_string());
        config.chain.poll_interval_ms = Some(50);

        let signing = config.signing_client_config().unwrap();
        assert!(matches!(signing.endpoint, EvmEndpoint::Http(_)));
        assert_eq!(signing.poll_interval, Some(Duration::from_millis(50)));
        assert!(matches!(
            config.chain.query_endpoint().unwrap(),
            EvmEndpoint::WebSocket(_)
        ));

        config.chain.http_endpoint = None;
        config.chain.ws_endpoint = None;
        config.signing_client_config().unwrap_err();
    }
}
