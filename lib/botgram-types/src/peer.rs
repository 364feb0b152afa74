// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat the bot can address.
///
/// The API accepts either the numeric chat identifier or, for public chats
/// and channels, the `@username`. Numeric identifiers are the only form that
/// works for private conversations, and the form every received
/// [`Chat`](crate::Chat) carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Peer {
    /// The unique identifier of a user, group or channel.
    Id(i64),
    /// The public `@username` of a chat or channel.
    Username(String),
}

impl Peer {
    /// Addresses a chat by its public username. A missing leading `@` is
    /// added, since the API rejects bare usernames.
    pub fn username(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        if name.starts_with('@') {
            Self::Username(name.to_string())
        } else {
            Self::Username(format!("@{name}"))
        }
    }
}

impl From<i64> for Peer {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Peer {
    fn from(name: &str) -> Self {
        Self::username(name)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_username_normalization() {
        assert_eq!(Peer::from("durov"), Peer::Username("@durov".to_string()));
        assert_eq!(Peer::from("@durov"), Peer::Username("@durov".to_string()));
    }

    #[test]
    fn check_wire_forms() {
        assert_eq!(serde_json::to_string(&Peer::Id(-1000123)).unwrap(), "-1000123");
        assert_eq!(
            serde_json::to_string(&Peer::username("durov")).unwrap(),
            "\"@durov\""
        );
    }
}
