// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A high level, fluent client for Telegram's HTTP bot API.
//!
//! One builder per API call: start it from a [`Client`] method, chain the
//! options you care about, and finish with `send()`. Media builders stream
//! local files into the request and release them on whichever path the
//! call ends up taking; every send builder also accepts an `after` delay
//! (deliver later, without blocking the caller) and a `delete_after` delay
//! (make the delivered message disappear again).
//!
//! ```no_run
//! use botgram_client::{Client, Config, Update};
//! use std::time::Duration;
//!
//! # async fn f() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(Config {
//!     token: std::env::var("BOT_TOKEN")?,
//!     params: Default::default(),
//! });
//!
//! loop {
//!     match client.next_update().await? {
//!         Update::NewMessage(message) => {
//!             client
//!                 .reply_to(&message, "this will self-destruct")
//!                 .delete_after(Duration::from_secs(30))
//!                 .send()
//!                 .await?;
//!         }
//!         _ => {}
//!     }
//! }
//! # }
//! ```

mod client;
pub mod errors;
pub mod media;
pub mod methods;
pub mod types;
mod utils;

pub use botgram_sender::{ApiError, InvocationError};
pub use botgram_types::{Chat, ChatKind, Message, ParseMode, Peer, User};
pub use client::{Client, Config, InitParams, ScheduledSend, Sent};
pub use errors::SendError;
pub use types::{Attachment, Update};
