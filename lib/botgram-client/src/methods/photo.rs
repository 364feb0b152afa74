// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::deleter;
use crate::client::dispatch;
use crate::errors::SendError;
use crate::types::{Attachment, Envelope};
use crate::{Client, Sent};
use botgram_types::{Message, Method, ParseMode, Peer};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

#[derive(Serialize)]
struct SendPhotoRequest {
    chat_id: Peer,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_spoiler: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i32>,
}

impl Method for SendPhotoRequest {
    const NAME: &'static str = "sendPhoto";
    type Response = Message;
}

/// Builder for the `sendPhoto` call: a picture from the local disk,
/// compressed by the server.
///
/// The file is opened when [`send`](Self::send) runs and released on
/// whichever path the call takes, including a delayed one.
pub struct SendPhoto {
    client: Client,
    envelope: Envelope,
    caption: Option<String>,
    parse_mode: Option<ParseMode>,
    spoiler: bool,
    silent: bool,
    reply_to: Option<i32>,
}

impl SendPhoto {
    /// Builds a new photo message from the file at `path`. A target chat
    /// must be set with [`to`](Self::to) before sending.
    pub fn new(client: &Client, path: impl AsRef<Path>) -> Self {
        let mut envelope = Envelope::new();
        envelope.attach(Attachment::new("photo", path.as_ref()));

        Self {
            client: client.clone(),
            envelope,
            caption: None,
            parse_mode: None,
            spoiler: false,
            silent: false,
            reply_to: None,
        }
    }

    /// The chat the photo is sent to.
    pub fn to(mut self, peer: impl Into<Peer>) -> Self {
        self.envelope.peer = Some(peer.into());
        self
    }

    /// The caption shown below the photo, which may be empty for none.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Parses the caption for formatting entities, server-side.
    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    /// Blurs the photo until the recipient chooses to reveal it.
    pub fn spoiler(mut self, spoiler: bool) -> Self {
        self.spoiler = spoiler;
        self
    }

    /// Whether the message should be delivered without sounding a
    /// notification on the receiving devices.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// The message identifier this photo should reply to, if any.
    pub fn reply_to(mut self, reply_to: Option<i32>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// Holds the photo back and sends it only once `delay` has passed. The
    /// caller gets a placeholder back right away; see
    /// [`SendMessage::after`](super::SendMessage::after).
    pub fn after(mut self, delay: Duration) -> Self {
        self.envelope.after = Some(delay);
        self
    }

    /// Deletes the photo message once `delay` has passed, measured from
    /// the moment it was delivered.
    pub fn delete_after(mut self, delay: Duration) -> Self {
        self.envelope.delete_after = Some(delay);
        self
    }

    /// Issues the call.
    pub async fn send(self) -> Result<Sent, SendError> {
        let Self {
            client,
            mut envelope,
            caption,
            parse_mode,
            spoiler,
            silent,
            reply_to,
        } = self;

        let Some(peer) = envelope.peer.clone() else {
            envelope.discard();
            return Err(SendError::Invalid("missing target chat"));
        };

        envelope.open_attachments().await;
        if let Some(defect) = envelope.take_defect() {
            envelope.discard();
            return Err(defect);
        }

        let request = SendPhotoRequest {
            chat_id: peer,
            caption,
            parse_mode,
            has_spoiler: spoiler.then_some(true),
            disable_notification: silent.then_some(true),
            reply_to_message_id: reply_to,
        };

        let invoke = client.clone();
        dispatch(
            envelope,
            move |parts| async move { invoke.invoke_with_parts(&request, parts).await },
            deleter(client),
        )
        .await
    }
}
