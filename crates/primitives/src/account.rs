//! Account identities.

use std::{fmt, str::FromStr};

use arbitrary::{Arbitrary, Unstructured};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::PrimitiveError;

/// Size of an [`AccountId`] in bytes.
pub const ACCOUNT_ID_SIZE: usize = 32;

/// A 32-byte account identity.
///
/// Three values are reserved and never correspond to a real account:
///
/// - [`AccountId::NULL`], the all-zero identity;
/// - [`AccountId::HEAD`] and [`AccountId::TAIL`], the sentinel markers that anchor both ends of
///   every delegation list.
///
/// Callers are identified by an [`AccountId`] that the host has already authenticated; this type
/// carries no proof of that.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; ACCOUNT_ID_SIZE]);

impl AccountId {
    /// The null identity.
    pub const NULL: Self = Self([0; ACCOUNT_ID_SIZE]);

    /// Marker for the first position of a delegation list.
    pub const HEAD: Self = Self::marker(1);

    /// Marker for the position past the last entry of a delegation list.
    pub const TAIL: Self = Self::marker(2);

    const fn marker(tag: u8) -> Self {
        let mut bytes = [0; ACCOUNT_ID_SIZE];
        bytes[ACCOUNT_ID_SIZE - 1] = tag;
        Self(bytes)
    }

    /// Creates an identity from raw bytes.
    pub const fn new(bytes: [u8; ACCOUNT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ACCOUNT_ID_SIZE] {
        &self.0
    }

    /// Whether this is one of the list sentinels.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::HEAD || *self == Self::TAIL
    }

    /// Whether this identity is reserved, i.e. null or a sentinel.
    ///
    /// Reserved identities can never stake, receive a delegation or appear as a list member.
    pub fn is_reserved(&self) -> bool {
        *self == Self::NULL || self.is_sentinel()
    }
}

impl From<[u8; ACCOUNT_ID_SIZE]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<AccountId> for [u8; ACCOUNT_ID_SIZE] {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::HEAD => f.write_str("HEAD"),
            Self::TAIL => f.write_str("TAIL"),
            _ => f.write_str(&hex::encode(self.0)),
        }
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::HEAD | Self::TAIL => write!(f, "AccountId({self})"),
            // the first four bytes are plenty to tell accounts apart in logs
            _ => write!(f, "AccountId({}..)", hex::encode(&self.0[..4])),
        }
    }
}

impl FromStr for AccountId {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);

        let mut bytes = [0u8; ACCOUNT_ID_SIZE];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| PrimitiveError::InvalidAccountId(e.to_string()))?;

        Ok(Self(bytes))
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl<'a> Arbitrary<'a> for AccountId {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let bytes: [u8; ACCOUNT_ID_SIZE] = u.arbitrary()?;
        let id = Self(bytes);

        // reserved identities are never handed out as real accounts
        if id.is_reserved() {
            return Err(arbitrary::Error::IncorrectFormat);
        }

        Ok(id)
    }
}
