// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A bot API method.
///
/// Implementors are the request bodies themselves: the serialized fields of
/// the value become the call's parameters, [`NAME`] is the URL path segment
/// the call is posted to, and `result` in the response envelope
/// deserializes into [`Response`].
///
/// [`NAME`]: Method::NAME
/// [`Response`]: Method::Response
pub trait Method: Serialize {
    /// The method name as it appears in the request URL, e.g. `sendMessage`.
    const NAME: &'static str;

    /// The type of the `result` field of a successful response.
    type Response: DeserializeOwned;
}

/// How the text or caption of an outgoing message should be parsed for
/// formatting entities. Parsing happens server-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    /// The `MarkdownV2` dialect. Reserved characters must be escaped.
    #[serde(rename = "MarkdownV2")]
    Markdown,
    /// A small subset of HTML tags.
    #[serde(rename = "HTML")]
    Html,
}
