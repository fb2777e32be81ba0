//! Content addresses.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ADDRESS_LEN;
use crate::error::KernelError;

/// A 32-byte content address.
///
/// Also used as the resume token exchanged with the mint service, where the
/// all-zero value means "no resume in progress".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parses an address received as raw bytes over the wire.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KernelError> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            KernelError::InvalidAddress(format!("expected {} bytes, got {}", ADDRESS_LEN, bytes.len()))
        })?;
        Ok(Address(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self, KernelError> {
        let raw = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| KernelError::InvalidAddress(e.to_string()))?;
        Self::from_slice(&raw)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
