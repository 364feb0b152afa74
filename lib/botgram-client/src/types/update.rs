// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use botgram_types::{Message, RawUpdate};

/// An event reported by the bot API which may be of interest to the bot.
///
/// Channel posts are folded into the message variants; the distinction is
/// recoverable from the message's [`chat.kind`](botgram_types::Chat).
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum Update {
    /// Occurs whenever a new text message or a message with media is
    /// produced, in any chat the bot can see.
    NewMessage(Message),
    /// Occurs when a message is edited.
    MessageEdited(Message),
}

impl Update {
    /// Maps a raw `getUpdates` entry into its friendly form. Update kinds
    /// the library does not handle yield `None` and are skipped.
    pub(crate) fn from_raw(raw: RawUpdate) -> Option<Self> {
        if let Some(message) = raw.message.or(raw.channel_post) {
            Some(Self::NewMessage(message))
        } else {
            raw.edited_message
                .or(raw.edited_channel_post)
                .map(Self::MessageEdited)
        }
    }

    /// The message this update is about.
    pub fn message(&self) -> &Message {
        match self {
            Self::NewMessage(message) | Self::MessageEdited(message) => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botgram_types::{Chat, ChatKind};
    use chrono::{TimeZone, Utc};

    fn message(id: i32) -> Message {
        Message {
            id,
            chat: Chat {
                id: 10,
                kind: ChatKind::Private,
                title: None,
                username: None,
                first_name: Some("Ada".to_string()),
                last_name: None,
            },
            from: None,
            date: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            text: Some("hi".to_string()),
            caption: None,
            photo: None,
            video: None,
            document: None,
            reply_to_message: None,
        }
    }

    fn raw(update_id: i64) -> RawUpdate {
        RawUpdate {
            update_id,
            message: None,
            edited_message: None,
            channel_post: None,
            edited_channel_post: None,
        }
    }

    #[test]
    fn check_raw_mapping() {
        let update = Update::from_raw(RawUpdate {
            message: Some(message(1)),
            ..raw(100)
        })
        .unwrap();
        assert!(matches!(update, Update::NewMessage(ref m) if m.id == 1));

        let update = Update::from_raw(RawUpdate {
            edited_channel_post: Some(message(2)),
            ..raw(101)
        })
        .unwrap();
        assert!(matches!(update, Update::MessageEdited(ref m) if m.id == 2));

        assert!(Update::from_raw(raw(102)).is_none());
    }
}
