// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::{Chat, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message delivered to or sent by the bot.
///
/// Only the fields this library acts upon are mapped; the API sends many
/// more, which are ignored during deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "message_id")]
    pub id: i32,
    pub chat: Chat,
    /// Absent for messages posted in channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Available sizes of the photo, smallest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message: Option<Box<Message>>,
}

/// One rendition of a photo or thumbnail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// A video file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    /// Duration in seconds, as reported by the sender.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PhotoSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// A general file, sent uncompressed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PhotoSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatKind;

    #[test]
    fn check_message_parsing() {
        let message: Message = serde_json::from_str(
            r#"{
                "message_id": 42,
                "from": {"id": 7, "is_bot": true, "first_name": "Echo", "username": "echobot"},
                "chat": {"id": 10, "type": "private", "first_name": "Ada"},
                "date": 1700000000,
                "text": "hello",
                "entities": [{"type": "bold", "offset": 0, "length": 5}]
            }"#,
        )
        .unwrap();

        assert_eq!(message.id, 42);
        assert_eq!(message.chat.id, 10);
        assert_eq!(message.chat.kind, ChatKind::Private);
        assert_eq!(message.text.as_deref(), Some("hello"));
        assert_eq!(message.date.timestamp(), 1_700_000_000);
        assert!(message.photo.is_none());
    }

    #[test]
    fn check_media_message_parsing() {
        let message: Message = serde_json::from_str(
            r#"{
                "message_id": 43,
                "chat": {"id": -100200, "type": "channel", "title": "News"},
                "date": 1700000001,
                "caption": "clip",
                "video": {
                    "file_id": "abc", "file_unique_id": "u1",
                    "width": 640, "height": 360, "duration": 12,
                    "thumbnail": {"file_id": "t", "file_unique_id": "u2", "width": 90, "height": 51}
                }
            }"#,
        )
        .unwrap();

        let video = message.video.unwrap();
        assert_eq!(video.duration, 12);
        assert_eq!(video.thumbnail.unwrap().width, 90);
    }
}
