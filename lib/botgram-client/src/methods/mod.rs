// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! One builder per API call.
//!
//! Every builder accumulates options with consuming setters and performs a
//! single network call on [`send`](SendMessage::send). The send builders
//! additionally understand [`after`](SendMessage::after) and
//! [`delete_after`](SendMessage::delete_after), which move the call (or a
//! follow-up deletion) onto a detached timer.

mod document;
mod message;
mod photo;
mod video;

pub use document::SendDocument;
pub use message::{DeleteMessage, DeleteMessages, EditMessageText, SendMessage};
pub use photo::SendPhoto;
pub use video::SendVideo;

use crate::Client;
use botgram_sender::InvocationError;
use botgram_types::Peer;
use std::future::Future;
use std::pin::Pin;

type DeleteFuture = Pin<Box<dyn Future<Output = Result<(), InvocationError>> + Send>>;

/// The delete operation the dispatcher chains after a delivery, with the
/// client captured and the identifiers left for the dispatcher to fill in.
pub(crate) fn deleter(client: Client) -> impl FnOnce(Peer, i32) -> DeleteFuture + Send + 'static {
    move |peer, message_id| {
        Box::pin(async move {
            client
                .invoke(&message::DeleteMessageRequest {
                    chat_id: peer,
                    message_id,
                })
                .await
                .map(|_| ())
        })
    }
}
