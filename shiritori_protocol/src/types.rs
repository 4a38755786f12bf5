// Identifier types for the chat platform.
//
// Rooms and accounts are opaque to the referee; it only compares and
// echoes them. Platforms disagree on whether these are JSON numbers or
// strings, so both deserialize into the same string-backed newtype and
// always serialize back out as strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw identifier as it appears on the wire: `123` or `"123"`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum IdRepr {
    Number(u64),
    Text(String),
}

impl From<IdRepr> for String {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Number(n) => n.to_string(),
            IdRepr::Text(s) => s,
        }
    }
}

/// Chat room identifier. One game per room.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct RoomId(pub String);

/// Chat account identifier (human players and the bot itself).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct AccountId(pub String);

impl From<IdRepr> for RoomId {
    fn from(repr: IdRepr) -> Self {
        RoomId(repr.into())
    }
}

impl From<IdRepr> for AccountId {
    fn from(repr: IdRepr) -> Self {
        AccountId(repr.into())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
