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
use crate::types::Envelope;
use crate::{Client, Sent};
use botgram_sender::InvocationError;
use botgram_types::{Message, Method, ParseMode, Peer};
use serde::Serialize;
use std::time::Duration;

/// Up to this many messages can be deleted with one call.
const MAX_BATCH_DELETE: usize = 100;

#[derive(Serialize)]
struct SendMessageRequest {
    chat_id: Peer,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disable_web_page_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    protect_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i32>,
}

impl Method for SendMessageRequest {
    const NAME: &'static str = "sendMessage";
    type Response = Message;
}

/// Builder for the `sendMessage` call: plain (or server-side formatted)
/// text.
pub struct SendMessage {
    client: Client,
    envelope: Envelope,
    text: String,
    parse_mode: Option<ParseMode>,
    link_preview: bool,
    silent: bool,
    protect: bool,
    reply_to: Option<i32>,
}

impl SendMessage {
    /// Builds a new message using the given plaintext as the message
    /// contents. A target chat must be set with [`to`](Self::to) before
    /// sending.
    pub fn new(client: &Client, text: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            envelope: Envelope::new(),
            text: text.into(),
            parse_mode: None,
            link_preview: true,
            silent: false,
            protect: false,
            reply_to: None,
        }
    }

    /// The chat the message is sent to.
    pub fn to(mut self, peer: impl Into<Peer>) -> Self {
        self.envelope.peer = Some(peer.into());
        self
    }

    /// Parses the text for formatting entities, server-side.
    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    /// Whether a link preview should be shown for links in the message.
    ///
    /// Defaults to `true`, mirroring the server's behaviour.
    pub fn link_preview(mut self, link_preview: bool) -> Self {
        self.link_preview = link_preview;
        self
    }

    /// Whether the message should be delivered without sounding a
    /// notification on the receiving devices.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Forbids forwarding and saving of the delivered message.
    pub fn protect_content(mut self, protect: bool) -> Self {
        self.protect = protect;
        self
    }

    /// The message identifier this message should reply to, if any.
    pub fn reply_to(mut self, reply_to: Option<i32>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// Holds the message back and sends it only once `delay` has passed.
    ///
    /// With a delay set, [`send`](Self::send) returns a
    /// [`Sent::Scheduled`] placeholder right away and the actual delivery
    /// happens on a detached task; its result (or failure) never reaches
    /// the caller.
    pub fn after(mut self, delay: Duration) -> Self {
        self.envelope.after = Some(delay);
        self
    }

    /// Deletes the message again once `delay` has passed, measured from
    /// the moment it was delivered. The deletion is fire-and-forget.
    pub fn delete_after(mut self, delay: Duration) -> Self {
        self.envelope.delete_after = Some(delay);
        self
    }

    /// Issues the call.
    pub async fn send(self) -> Result<Sent, SendError> {
        let Self {
            client,
            mut envelope,
            text,
            parse_mode,
            link_preview,
            silent,
            protect,
            reply_to,
        } = self;

        if let Some(defect) = envelope.take_defect() {
            envelope.discard();
            return Err(defect);
        }
        let Some(peer) = envelope.peer.clone() else {
            envelope.discard();
            return Err(SendError::Invalid("missing target chat"));
        };
        if text.is_empty() {
            envelope.discard();
            return Err(SendError::Invalid("empty message text"));
        }

        let request = SendMessageRequest {
            chat_id: peer,
            text,
            parse_mode,
            disable_web_page_preview: (!link_preview).then_some(true),
            disable_notification: silent.then_some(true),
            protect_content: protect.then_some(true),
            reply_to_message_id: reply_to,
        };

        let invoke = client.clone();
        dispatch(
            envelope,
            move |_parts| async move { invoke.invoke(&request).await },
            deleter(client),
        )
        .await
    }
}

#[derive(Serialize)]
struct EditMessageTextRequest {
    chat_id: Peer,
    message_id: i32,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disable_web_page_preview: Option<bool>,
}

impl Method for EditMessageTextRequest {
    const NAME: &'static str = "editMessageText";
    type Response = Message;
}

/// Builder for the `editMessageText` call: replace the text of a message
/// that was already delivered.
pub struct EditMessageText {
    client: Client,
    chat_id: Peer,
    message_id: i32,
    text: String,
    parse_mode: Option<ParseMode>,
    link_preview: bool,
}

impl EditMessageText {
    pub fn new(
        client: &Client,
        chat: impl Into<Peer>,
        message_id: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            client: client.clone(),
            chat_id: chat.into(),
            message_id,
            text: text.into(),
            parse_mode: None,
            link_preview: true,
        }
    }

    /// Parses the new text for formatting entities, server-side.
    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    /// Whether a link preview should be shown for links in the new text.
    pub fn link_preview(mut self, link_preview: bool) -> Self {
        self.link_preview = link_preview;
        self
    }

    /// Issues the call, returning the edited message.
    pub async fn send(self) -> Result<Message, InvocationError> {
        self.client
            .invoke(&EditMessageTextRequest {
                chat_id: self.chat_id,
                message_id: self.message_id,
                text: self.text,
                parse_mode: self.parse_mode,
                disable_web_page_preview: (!self.link_preview).then_some(true),
            })
            .await
    }
}

#[derive(Serialize)]
pub(crate) struct DeleteMessageRequest {
    pub(crate) chat_id: Peer,
    pub(crate) message_id: i32,
}

impl Method for DeleteMessageRequest {
    const NAME: &'static str = "deleteMessage";
    type Response = bool;
}

/// Builder for the `deleteMessage` call.
///
/// Deletion is also what a send builder's
/// [`delete_after`](SendMessage::delete_after) performs once its timer
/// fires.
pub struct DeleteMessage {
    client: Client,
    chat_id: Peer,
    message_id: i32,
}

impl DeleteMessage {
    pub fn new(client: &Client, chat: impl Into<Peer>, message_id: i32) -> Self {
        Self {
            client: client.clone(),
            chat_id: chat.into(),
            message_id,
        }
    }

    /// Issues the call.
    pub async fn send(self) -> Result<(), InvocationError> {
        self.client
            .invoke(&DeleteMessageRequest {
                chat_id: self.chat_id,
                message_id: self.message_id,
            })
            .await
            .map(|_| ())
    }
}

#[derive(Serialize)]
struct DeleteMessagesRequest {
    chat_id: Peer,
    message_ids: Vec<i32>,
}

impl Method for DeleteMessagesRequest {
    const NAME: &'static str = "deleteMessages";
    type Response = bool;
}

/// Builder for the `deleteMessages` call: delete up to 100 messages of one
/// chat at once.
pub struct DeleteMessages {
    client: Client,
    chat_id: Peer,
    message_ids: Vec<i32>,
}

impl DeleteMessages {
    pub fn new(client: &Client, chat: impl Into<Peer>, message_ids: Vec<i32>) -> Self {
        Self {
            client: client.clone(),
            chat_id: chat.into(),
            message_ids,
        }
    }

    /// Issues the call. Fails without touching the network when the batch
    /// is empty or larger than the server accepts.
    pub async fn send(self) -> Result<(), SendError> {
        if self.message_ids.is_empty() {
            return Err(SendError::Invalid("empty message batch"));
        }
        if self.message_ids.len() > MAX_BATCH_DELETE {
            return Err(SendError::Invalid("more than 100 messages in a batch"));
        }

        self.client
            .invoke(&DeleteMessagesRequest {
                chat_id: self.chat_id,
                message_ids: self.message_ids,
            })
            .await
            .map(|_| ())
            .map_err(SendError::Invoke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn client() -> Client {
        Client::new(Config {
            token: "123:abc".to_string(),
            params: Default::default(),
        })
    }

    #[tokio::test]
    async fn message_without_target_fails_validation() {
        let result = SendMessage::new(&client(), "hello").send().await;
        assert!(matches!(
            result,
            Err(SendError::Invalid("missing target chat"))
        ));
    }

    #[tokio::test]
    async fn empty_message_fails_validation() {
        let result = SendMessage::new(&client(), "").to(10).send().await;
        assert!(matches!(
            result,
            Err(SendError::Invalid("empty message text"))
        ));
    }

    #[tokio::test]
    async fn oversized_delete_batch_fails_validation() {
        let ids = (1..=101).collect::<Vec<_>>();
        let result = DeleteMessages::new(&client(), 10, ids).send().await;
        assert!(matches!(result, Err(SendError::Invalid(_))));

        let result = DeleteMessages::new(&client(), 10, Vec::new()).send().await;
        assert!(matches!(
            result,
            Err(SendError::Invalid("empty message batch"))
        ));
    }

    #[test]
    fn optional_fields_stay_off_the_wire() {
        let request = SendMessageRequest {
            chat_id: Peer::Id(10),
            text: "hi".to_string(),
            parse_mode: None,
            disable_web_page_preview: None,
            disable_notification: Some(true),
            protect_content: None,
            reply_to_message_id: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chat_id": 10,
                "text": "hi",
                "disable_notification": true,
            })
        );
    }
}
