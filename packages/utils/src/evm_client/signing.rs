use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};

use crate::error::EvmClientError;

pub fn make_signer(
    credentials: &str,
    hd_index: Option<u32>,
) -> Result<PrivateKeySigner, EvmClientError> {
    let hd_index = hd_index.unwrap_or_default();

    match credentials.strip_prefix("0x") {
        Some(stripped) => {
            // a raw private key, nothing to derive from
            if hd_index > 0 {
                return Err(EvmClientError::DerivationWithPrivateKey);
            }
            let private_key = const_hex::decode(stripped)
                .map_err(|e| EvmClientError::PrivateKey(e.to_string()))?;
            PrivateKeySigner::from_slice(&private_key)
                .map_err(|e| EvmClientError::PrivateKey(e.to_string()))
        }
        None => MnemonicBuilder::<English>::default()
            .phrase(credentials)
            .index(hd_index)
            .map_err(|e| EvmClientError::Mnemonic(e.to_string()))?
            .build()
            .map_err(|e| EvmClientError::Mnemonic(e.to_string())),
    }
}
