//! Account addresses and the connected-wallet session

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A `0x`-prefixed 20-byte account address.
///
/// Kept as given for display; equality ignores hex case.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let hex = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .ok_or_else(|| Error::InvalidAddress(format!("'{}' must start with 0x", text)))?;
        if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidAddress(format!(
                "'{}' must be 40 hex digits after 0x",
                text
            )));
        }
        Ok(Address(text.to_string()))
    }

    /// Built-in constants only; skips validation
    pub(crate) fn from_trusted(text: &str) -> Self {
        Address(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Address::parse(text)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(text: String) -> Result<Self> {
        Address::parse(&text)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the wallet connector reports about the current user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletSession {
    address: Option<Address>,
}

impl WalletSession {
    pub fn connected(address: Address) -> Self {
        WalletSession {
            address: Some(address),
        }
    }

    pub fn disconnected() -> Self {
        WalletSession { address: None }
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// The connected account, or the blocking notice shown before any write
    pub fn require_connected(&self) -> Result<&Address> {
        self.address.as_ref().ok_or(Error::WalletNotConnected)
    }
}
