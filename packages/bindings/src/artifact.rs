use std::path::Path;

use alloy_json_abi::JsonAbi;
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types_eth::TransactionRequest;
use serde::Deserialize;

use crate::error::BindingError;

/// Compiler output for one contract: its ABI and deploy bytecode
///
/// Accepts Foundry artifacts (`bytecode.object`), Hardhat artifacts (`bytecode` as a hex string)
/// and solc combined-json entries (`bin`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    pub abi: JsonAbi,
    /// Creation (init) code
    pub bytecode: Bytes,
    /// Runtime code, as stored on chain after deployment
    pub deployed_bytecode: Option<Bytes>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

impl RawBytecode {
    fn into_bytes(self) -> Result<Bytes, BindingError> {
        let hex = match self {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        };
        Ok(const_hex::decode(hex.trim())?.into())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    abi: JsonAbi,
    #[serde(alias = "bin")]
    bytecode: Option<RawBytecode>,
    #[serde(alias = "bin-runtime")]
    deployed_bytecode: Option<RawBytecode>,
}

impl ContractArtifact {
    pub fn from_json(json: &str) -> Result<Self, BindingError> {
        let raw: RawArtifact = serde_json::from_str(json)?;

        let bytecode = raw
            .bytecode
            .ok_or_else(|| BindingError::Artifact("missing bytecode".to_string()))?
            .into_bytes()?;

        if bytecode.is_empty() {
            return Err(BindingError::Artifact(
                "empty bytecode, is this an interface or abstract contract?".to_string(),
            ));
        }

        let deployed_bytecode = raw
            .deployed_bytecode
            .map(RawBytecode::into_bytes)
            .transpose()?;

        Ok(Self {
            abi: raw.abi,
            bytecode,
            deployed_bytecode,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BindingError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| BindingError::Artifact(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Creation code followed by the ABI-encoded constructor arguments
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }

    /// Sends a create transaction and waits for its receipt
    pub async fn deploy(
        &self,
        provider: &DynProvider,
        constructor_args: &[u8],
    ) -> Result<Address, BindingError> {
        let tx = TransactionRequest::default().with_deploy_code(self.deploy_code(constructor_args));

        let receipt = provider.send_transaction(tx).await?.get_receipt().await?;

        if !receipt.status() {
            return Err(BindingError::DeployReverted(receipt.transaction_hash));
        }

        let address = receipt
            .contract_address
            .ok_or(BindingError::NoContractAddress(receipt.transaction_hash))?;

        tracing::info!(
            "Deployed contract at {} with tx {}",
            address,
            receipt.transaction_hash
        );

        Ok(address)
    }
}
