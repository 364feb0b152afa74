// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Methods related to sending, editing and deleting messages.

use super::Client;
use crate::methods::{
    DeleteMessage, DeleteMessages, EditMessageText, SendDocument, SendMessage, SendPhoto,
    SendVideo,
};
use botgram_types::{Message, Peer};
use std::path::Path;

impl Client {
    /// Returns a builder to send a text message to the desired chat.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: botgram_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use std::time::Duration;
    ///
    /// client
    ///     .send_message(10, "see you in a bit")
    ///     .silent(true)
    ///     .delete_after(Duration::from_secs(60))
    ///     .send()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn send_message(&self, chat: impl Into<Peer>, text: impl Into<String>) -> SendMessage {
        SendMessage::new(self, text).to(chat)
    }

    /// Returns a builder to send a photo from the local disk.
    pub fn send_photo(&self, chat: impl Into<Peer>, path: impl AsRef<Path>) -> SendPhoto {
        SendPhoto::new(self, path).to(chat)
    }

    /// Returns a builder to send a video from the local disk.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: botgram_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// client
    ///     .send_video(10, "clip.mp4")
    ///     .probe()
    ///     .auto_thumbnail()
    ///     .caption("from today")
    ///     .send()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn send_video(&self, chat: impl Into<Peer>, path: impl AsRef<Path>) -> SendVideo {
        SendVideo::new(self, path).to(chat)
    }

    /// Returns a builder to send any file from the local disk,
    /// uncompressed.
    pub fn send_document(&self, chat: impl Into<Peer>, path: impl AsRef<Path>) -> SendDocument {
        SendDocument::new(self, path).to(chat)
    }

    /// Returns a builder to send a text message replying to the given one,
    /// in the chat it came from.
    pub fn reply_to(&self, message: &Message, text: impl Into<String>) -> SendMessage {
        SendMessage::new(self, text)
            .to(message.chat.id)
            .reply_to(Some(message.id))
    }

    /// Returns a builder to edit the text of an existing message.
    pub fn edit_message(
        &self,
        chat: impl Into<Peer>,
        message_id: i32,
        text: impl Into<String>,
    ) -> EditMessageText {
        EditMessageText::new(self, chat, message_id, text)
    }

    /// Returns a builder to delete a single message.
    ///
    /// The messages are deleted for both ends.
    pub fn delete_message(&self, chat: impl Into<Peer>, message_id: i32) -> DeleteMessage {
        DeleteMessage::new(self, chat, message_id)
    }

    /// Returns a builder to delete up to 100 messages of one chat at once.
    ///
    /// The messages are deleted for both ends.
    pub fn delete_messages(&self, chat: impl Into<Peer>, message_ids: Vec<i32>) -> DeleteMessages {
        DeleteMessages::new(self, chat, message_ids)
    }
}
