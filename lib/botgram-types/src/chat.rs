// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use serde::{Deserialize, Serialize};

/// The kind of chat a message belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// A one-to-one conversation with a user.
    Private,
    /// A basic group of up to 200 members.
    Group,
    /// A large group.
    Supergroup,
    /// A broadcast channel.
    Channel,
}

/// A conversation the bot takes part in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    /// Title, for groups, supergroups and channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// First name of the other party in a private chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Chat {
    /// A human-readable name for the chat, regardless of its kind.
    pub fn name(&self) -> String {
        if let Some(title) = &self.title {
            title.clone()
        } else {
            match (&self.first_name, &self.last_name) {
                (Some(first), Some(last)) => format!("{first} {last}"),
                (Some(first), None) => first.clone(),
                _ => self.username.clone().unwrap_or_else(|| self.id.to_string()),
            }
        }
    }
}
