//! Deployment configuration: contract addresses and launch limits
//!
//! Loaded from TOML. Every key is optional; missing keys keep the
//! built-in deployment values.
//!
//! ```toml
//! crowdfunding_address = "0x0b11251987217fE348E68A1308D9746C104AEFBA"
//! token_address = "0x0bBB9cbe749207d91fa0928633600Cb95930496B"
//! launch_max_duration_secs = 7776000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::wallet::Address;
use crate::{Error, Result};

pub const DEFAULT_CROWDFUNDING_ADDRESS: &str = "0x0b11251987217fE348E68A1308D9746C104AEFBA";
pub const DEFAULT_TOKEN_ADDRESS: &str = "0x0bBB9cbe749207d91fa0928633600Cb95930496B";

/// 90 days
pub const DEFAULT_LAUNCH_MAX_DURATION_SECS: u64 = 90 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct DappConfig {
    /// Crowdfunding contract: campaign reads, `launch`, `pledge`
    pub crowdfunding_address: Address,
    /// ERC-20 token pledged to campaigns: `allowance`, `approve`
    pub token_address: Address,
    /// Longest allowed span between now and a campaign's end
    pub launch_max_duration_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    crowdfunding_address: Option<String>,
    token_address: Option<String>,
    launch_max_duration_secs: Option<u64>,
}

impl Default for DappConfig {
    fn default() -> Self {
        DappConfig {
            crowdfunding_address: Address::from_trusted(DEFAULT_CROWDFUNDING_ADDRESS),
            token_address: Address::from_trusted(DEFAULT_TOKEN_ADDRESS),
            launch_max_duration_secs: DEFAULT_LAUNCH_MAX_DURATION_SECS,
        }
    }
}

impl DappConfig {
    /// Parse configuration from TOML text.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        let defaults = DappConfig::default();

        let config = DappConfig {
            crowdfunding_address: match raw.crowdfunding_address {
                Some(text) => config_address("crowdfunding_address", &text)?,
                None => defaults.crowdfunding_address,
            },
            token_address: match raw.token_address {
                Some(text) => config_address("token_address", &text)?,
                None => defaults.token_address,
            },
            launch_max_duration_secs: raw
                .launch_max_duration_secs
                .unwrap_or(defaults.launch_max_duration_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading config");
        Self::parse_toml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.crowdfunding_address == self.token_address {
            return Err(Error::Config(
                "crowdfunding_address and token_address must differ".into(),
            ));
        }
        if self.launch_max_duration_secs == 0 {
            return Err(Error::Config(
                "launch_max_duration_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// A bad address in the config file is a config error, not user input
fn config_address(key: &str, text: &str) -> Result<Address> {
    Address::parse(text).map_err(|e| Error::Config(format!("{}: {}", key, e)))
}
