// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Methods to fetch what happened while the bot was looking away.

use super::Client;
use crate::types::Update;
use botgram_sender::InvocationError;
use botgram_types::{Method, RawUpdate};
use serde::Serialize;
use std::sync::atomic::Ordering;

#[derive(Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u32>,
}

impl Method for GetUpdatesRequest {
    const NAME: &'static str = "getUpdates";
    type Response = Vec<RawUpdate>;
}

impl Client {
    /// Returns the next update the bot should act on.
    ///
    /// Long-polls the server when the internal buffer runs dry, which means
    /// the future may stay pending for up to
    /// [`poll_timeout`](crate::InitParams::poll_timeout) when nothing is
    /// happening. Update kinds the library does not map are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// # async fn f(client: botgram_client::Client) -> Result<(), Box<dyn std::error::Error>> {
    /// use botgram_client::Update;
    ///
    /// loop {
    ///     match client.next_update().await? {
    ///         Update::NewMessage(message) => println!("{:?}", message.text),
    ///         _ => {}
    ///     }
    /// }
    /// # }
    /// ```
    pub async fn next_update(&self) -> Result<Update, InvocationError> {
        loop {
            if let Some(update) = self.0.updates.lock().unwrap().pop_front() {
                return Ok(update);
            }

            let seen = self.0.last_update_id.load(Ordering::SeqCst);
            let batch = self
                .invoke(&GetUpdatesRequest {
                    // Anything at or below the last seen ID is acknowledged
                    // and dropped server-side.
                    offset: (seen != 0).then_some(seen + 1),
                    timeout: Some(self.0.params.poll_timeout.as_secs() as u32),
                })
                .await?;

            let mut updates = self.0.updates.lock().unwrap();
            for raw in batch {
                self.0
                    .last_update_id
                    .fetch_max(raw.update_id, Ordering::SeqCst);
                if let Some(update) = Update::from_raw(raw) {
                    updates.push_back(update);
                }
            }
        }
    }
}
