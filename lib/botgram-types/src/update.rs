// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::Message;
use serde::Deserialize;

/// A raw `getUpdates` entry, exactly as the API sends it.
///
/// At most one of the optional payload fields is present per entry. Kinds
/// this library does not handle simply deserialize with all of them `None`.
#[derive(Clone, Debug, Deserialize)]
pub struct RawUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub edited_message: Option<Message>,
    #[serde(default)]
    pub channel_post: Option<Message>,
    #[serde(default)]
    pub edited_channel_post: Option<Message>,
}
