// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

use config::{Config, ConfigError, File};
use lazy_static::*;
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs::{create_dir_all, metadata, File as FsFile};
use std::io::Write;
use struct_field_names_as_array::FieldNamesAsArray;

use crate::primitives::Address;
use crate::vault::TxSigner;

/// The zero address disables live mode everywhere it appears.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

lazy_static! {
    pub static ref SETTINGS: Settings = Settings::new().unwrap();
}

#[derive(Debug, Serialize, Deserialize, Default, FieldNamesAsArray)]
pub struct Settings {
    /// Network settings.
    pub network: Network,

    /// Node settings.
    pub node: Node,

    /// Yield vault settings.
    pub vault: Vault,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut config_path = dirs::config_dir().unwrap();
        config_path.push("GuardianChain");
        let default_settings = Settings::default();
        if metadata(&config_path).is_err() {
            let _ = create_dir_all(&config_path);
        }
        config_path.push("config.toml");
        if metadata(&config_path).is_err() {
            // Create default configuration
            let settings_str = toml::ser::to_string_pretty(&default_settings).unwrap();

            match FsFile::create(&config_path) {
                Ok(mut file) => {
                    file.write_all(settings_str.as_bytes()).unwrap_or(());
                }
                Err(err) => {
                    // If this fails, do nothing and fall back to environment variables
                    error!("Failed to create configuration! Reason: {:#?}", err);
                }
            }
        }

        let prefix = "guardianchain";
        let env_source: Vec<_> = env::vars().collect();
        let mut s = Config::builder().add_source(
            File::with_name(&config_path.into_os_string().into_string().unwrap()).required(false),
        );

        // Set defaults
        let defaults: HashMap<String, HashMap<String, DynamicConfVal>> =
            serde_yaml::from_value(serde_yaml::to_value(&default_settings).unwrap()).unwrap();
        for (k1, inner) in &defaults {
            for (k2, v) in inner {
                match v {
                    DynamicConfVal::String(v) => {
                        s = s.set_default(format!("{k1}.{k2}"), v.as_str())?;
                    }

                    DynamicConfVal::Bool(v) => {
                        s = s.set_default(format!("{k1}.{k2}"), v.to_string())?;
                    }

                    DynamicConfVal::Uint(v) => {
                        s = s.set_default(format!("{k1}.{k2}"), v.to_string())?;
                    }

                    DynamicConfVal::Option(v) => {
                        if let Some(v) = v {
                            s = s.set_default(format!("{k1}.{k2}"), v.as_str())?;
                        }
                    }
                }
            }
        }

        // Make sure to list these in order
        let settings_modules: Vec<_> = vec![
            Network::FIELD_NAMES_AS_ARRAY,
            Node::FIELD_NAMES_AS_ARRAY,
            Vault::FIELD_NAMES_AS_ARRAY,
        ];

        // Gather all possible settings keys
        let possible_keys: HashMap<String, &str> = Settings::FIELD_NAMES_AS_ARRAY
            .iter()
            .enumerate()
            .flat_map(|(i, field)| {
                settings_modules[i].iter().map(|nested| {
                    (
                        format!(
                            "{}_{}_{}",
                            prefix,
                            field.to_owned(),
                            nested.split('_').collect::<Vec<_>>().join("")
                        ),
                        *nested,
                    )
                })
            })
            .collect();

        // Parse env vars manually and set overrides if they exist as the
        // config package `Environment` module seems to behave poorly.
        for (k, v) in env_source.iter() {
            let k = k.to_lowercase();

            if let Some(k_postfix) = possible_keys.get(&k) {
                let mut k: Vec<_> = k.split('_').filter(|x| x != &prefix).collect();
                *k.last_mut().unwrap() = k_postfix;
                let k = k.join(".");

                // Filter empty values
                if v.as_str() == "" {
                    continue;
                }

                s = s.set_override(k, v.as_str())?;
            }
        }

        // The canonical GuardianChain deployment variables take
        // precedence over everything else.
        let canonical = [
            ("GTT_YIELD_VAULT_ADDRESS", "vault.vault_address"),
            ("GTT_TOKEN_ADDRESS", "vault.token_address"),
            ("POLYGON_RPC_URL", "vault.provider_url"),
            ("ETH_PRIVATE_KEY", "vault.private_key"),
        ];
        for (var, key) in canonical {
            if let Ok(v) = env::var(var) {
                if !v.is_empty() {
                    s = s.set_override(key, v)?;
                }
            }
        }

        s.build()?.try_deserialize()
    }

    /// Aborts startup on nonsensical configuration.
    pub fn validate(&self) {
        match self.node.network_name.as_str() {
            "mainnet" | "testnet" | "devnet" => {}
            other => panic!("Invalid network name: {other}"),
        }

        let vault_address = Address::from_hex(&self.vault.vault_address)
            .unwrap_or_else(|err| panic!("Invalid vault address: {err}"));
        Address::from_hex(&self.vault.token_address)
            .unwrap_or_else(|err| panic!("Invalid token address: {err}"));
        Address::from_hex(&self.vault.claim_address)
            .unwrap_or_else(|err| panic!("Invalid claim address: {err}"));

        if !vault_address.is_zero() {
            if self.vault.provider_url.is_empty() {
                panic!("A provider url is required when a vault address is configured");
            }
            match &self.vault.private_key {
                Some(key) => {
                    TxSigner::from_hex(key)
                        .unwrap_or_else(|err| panic!("Invalid private key: {err}"));
                }
                None => panic!("ETH_PRIVATE_KEY is required when a vault address is configured"),
            }
            if self.vault.gas_limit < 21_000 {
                panic!("Gas limit is below the intrinsic transaction cost");
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FieldNamesAsArray)]
pub struct Network {
    /// Enable the HTTP RPC interface.
    #[serde(alias = "rpcenabled")]
    pub rpc_enabled: bool,

    /// RPC listen port on mainnet.
    #[serde(alias = "rpclistenportmainnet")]
    pub rpc_listen_port_mainnet: u16,

    /// RPC listen port on testnet.
    #[serde(alias = "rpclistenporttestnet")]
    pub rpc_listen_port_testnet: u16,

    /// RPC listen port on devnet.
    #[serde(alias = "rpclistenportdevnet")]
    pub rpc_listen_port_devnet: u16,

    /// RPC username.
    #[serde(alias = "rpcusername")]
    pub rpc_username: String,

    /// RPC password.
    #[serde(alias = "rpcpassword")]
    pub rpc_password: String,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            rpc_enabled: true,
            rpc_listen_port_mainnet: 7433,
            rpc_listen_port_testnet: 7434,
            rpc_listen_port_devnet: 7435,
            rpc_username: "guardianchain".to_owned(),
            rpc_password: "guardianchain".to_owned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FieldNamesAsArray)]
pub struct Node {
    /// The network the daemon is serving: mainnet, testnet or devnet.
    #[serde(alias = "networkname")]
    pub network_name: String,

    /// Number of threads used for network communication and the RPC
    /// interface.
    ///
    /// Default is 0 which means the number of cores of the system
    #[serde(alias = "networkthreads")]
    pub network_threads: u16,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            // Use devnet as default so a bare daemon runs simulated
            network_name: "devnet".to_owned(),
            network_threads: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FieldNamesAsArray)]
pub struct Vault {
    /// The GTT yield vault contract. The zero address short-circuits
    /// every endpoint into the simulated branch.
    #[serde(alias = "vaultaddress")]
    pub vault_address: String,

    /// The GTT token contract.
    #[serde(alias = "tokenaddress")]
    pub token_address: String,

    /// The address claims are distributed to.
    #[serde(alias = "claimaddress")]
    pub claim_address: String,

    /// JSON-RPC endpoint of the chain provider.
    #[serde(alias = "providerurl")]
    pub provider_url: String,

    /// EIP-155 chain id. 137 is Polygon mainnet.
    #[serde(alias = "chainid")]
    pub chain_id: u64,

    /// Fixed gas limit for vault transactions.
    #[serde(alias = "gaslimit")]
    pub gas_limit: u64,

    /// Fixed gas price in gwei. No dynamic fee estimation is performed.
    #[serde(alias = "gaspricegwei")]
    pub gas_price_gwei: u64,

    /// Milliseconds between receipt polls.
    #[serde(alias = "receiptpollintervalms")]
    pub receipt_poll_interval_ms: u64,

    /// Receipt polls before a submission is reported as timed out.
    #[serde(alias = "receiptpollattempts")]
    pub receipt_poll_attempts: u32,

    /// Hex encoded signing key of the distribution wallet.
    #[serde(alias = "privatekey")]
    pub private_key: Option<String>,
}

impl Default for Vault {
    fn default() -> Self {
        Self {
            vault_address: ZERO_ADDRESS.to_owned(),
            token_address: ZERO_ADDRESS.to_owned(),
            claim_address: ZERO_ADDRESS.to_owned(),
            provider_url: String::new(),
            chain_id: 137,
            gas_limit: 300_000,
            gas_price_gwei: 60,
            receipt_poll_interval_ms: 2_000,
            receipt_poll_attempts: 90,
            private_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DynamicConfVal {
    String(String),
    Bool(bool),
    Uint(u64),
    Option(Option<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_simulated_and_valid() {
        let settings = Settings::default();
        assert_eq!(settings.vault.vault_address, ZERO_ADDRESS);
        assert_eq!(settings.node.network_name, "devnet");
        assert!(settings.vault.private_key.is_none());
        // Must not panic: the zero vault address skips the live checks
        settings.validate();
    }

    #[test]
    #[should_panic(expected = "Invalid network name")]
    fn bogus_network_names_are_rejected() {
        let mut settings = Settings::default();
        settings.node.network_name = "betanet".to_owned();
        settings.validate();
    }

    #[test]
    #[should_panic(expected = "ETH_PRIVATE_KEY is required")]
    fn live_mode_requires_a_signing_key() {
        let mut settings = Settings::default();
        settings.vault.vault_address =
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_owned();
        settings.vault.provider_url = "https://polygon-rpc.com".to_owned();
        settings.validate();
    }

    #[test]
    #[should_panic(expected = "Invalid vault address")]
    fn malformed_vault_addresses_are_rejected() {
        let mut settings = Settings::default();
        settings.vault.vault_address = "0xnope".to_owned();
        settings.validate();
    }
}
