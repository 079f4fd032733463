//! Ledger addresses: accounts (`G…`) and contracts (`C…`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Length of an encoded account or contract address.
const ENCODED_LEN: usize = 56;

/// Checks the shape of an encoded address: prefix, length and base32 alphabet.
fn validate_shape(raw: &str, prefix: char) -> Result<(), TypesError> {
    if raw.len() != ENCODED_LEN {
        return Err(TypesError::InvalidAddress(format!(
            "expected {ENCODED_LEN} characters, got {}",
            raw.len()
        )));
    }
    if !raw.starts_with(prefix) {
        return Err(TypesError::InvalidAddress(format!(
            "expected prefix '{prefix}': {raw}"
        )));
    }
    if let Some(c) = raw
        .chars()
        .find(|c| !matches!(c, 'A'..='Z' | '2'..='7'))
    {
        return Err(TypesError::InvalidAddress(format!(
            "invalid character '{c}' in {raw}"
        )));
    }
    Ok(())
}

fn bad_checksum(raw: &str) -> TypesError {
    TypesError::InvalidAddress(format!("version byte or checksum mismatch: {raw}"))
}

/// A ledger account address, always prefixed with `G`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// The standard prefix for account addresses.
    pub const PREFIX: char = 'G';

    /// Parse an account address, verifying its checksum.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let raw = raw.into();
        validate_shape(&raw, Self::PREFIX)?;
        stellar_strkey::ed25519::PublicKey::from_string(&raw).map_err(|_| bad_checksum(&raw))?;
        Ok(Self(raw))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display: first four and last four characters.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..4], &self.0[ENCODED_LEN - 4..])
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AccountAddress> for String {
    fn from(addr: AccountAddress) -> Self {
        addr.0
    }
}

/// A deployed contract identifier, always prefixed with `C`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractId(String);

impl ContractId {
    /// The standard prefix for contract identifiers.
    pub const PREFIX: char = 'C';

    /// Parse a contract identifier, verifying its checksum.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let raw = raw.into();
        validate_shape(&raw, Self::PREFIX)?;
        stellar_strkey::Contract::from_string(&raw).map_err(|_| bad_checksum(&raw))?;
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContractId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContractId {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ContractId> for String {
    fn from(id: ContractId) -> Self {
        id.0
    }
}
