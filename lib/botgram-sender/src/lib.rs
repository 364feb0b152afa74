// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTTP transport used to invoke Telegram bot API methods.
//!
//! The whole crate boils down to [`Sender::invoke`]: serialize a
//! [`Method`], post it to `https://.../bot<TOKEN>/<methodName>`, and unwrap
//! the response envelope into the method's result or an
//! [`InvocationError`]. Calls that upload files go through
//! [`Sender::invoke_with_parts`] instead, which switches the body to
//! `multipart/form-data` and streams each part from its open file handle.

mod errors;

pub use errors::{ApiError, InvocationError};

use botgram_types::{Method, Response};
use log::info;
use std::time::Duration;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// One file streamed as part of a multipart request.
///
/// The field `name` is the parameter the file stands in for (`"photo"`,
/// `"video"`, `"thumbnail"`, ...). The handle is consumed by the request;
/// a part cannot be reused.
pub struct Part {
    name: String,
    file_name: String,
    mime: Option<String>,
    file: File,
}

impl Part {
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        file: File,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            mime,
            file,
        }
    }

    /// The parameter name this part stands in for.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// A sender capable of invoking bot API methods over HTTP.
///
/// Cheap to clone; clones share the same connection pool.
#[derive(Clone)]
pub struct Sender {
    http: reqwest::Client,
    base: String,
    flood_sleep_threshold: Option<u32>,
}

impl Sender {
    /// Creates a sender for the bot identified by `token`, talking to the
    /// API server at `server_url` (usually `https://api.telegram.org`).
    ///
    /// When a flood error asks for a wait below or equal to
    /// `flood_sleep_threshold` seconds, the sender sleeps and retries the
    /// call once instead of surfacing the error. This only applies to
    /// body-less invocations; a consumed file stream cannot be replayed.
    pub fn new(server_url: &str, token: &str, flood_sleep_threshold: Option<u32>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}/bot{}", server_url.trim_end_matches('/'), token),
            flood_sleep_threshold,
        }
    }

    /// Invokes a method, and returns its result.
    pub async fn invoke<M: Method>(&self, request: &M) -> Result<M::Response, InvocationError> {
        let mut slept_flood = false;

        loop {
            match self.post_json(request).await {
                Err(InvocationError::Api(error))
                    if !slept_flood
                        && error
                            .retry_after
                            .zip(self.flood_sleep_threshold)
                            .is_some_and(|(wait, threshold)| wait <= threshold) =>
                {
                    let delay = Duration::from_secs(error.retry_after.unwrap_or(0) as _);
                    info!(
                        "sleeping for {:?} before retrying {}: {}",
                        delay,
                        M::NAME,
                        error.description
                    );
                    tokio::time::sleep(delay).await;
                    slept_flood = true;
                }
                result => break result,
            }
        }
    }

    /// Invokes a method whose parameters include files, streaming each part
    /// as `multipart/form-data`. The parts are consumed; flood errors are
    /// never retried on this path.
    pub async fn invoke_with_parts<M: Method>(
        &self,
        request: &M,
        parts: Vec<Part>,
    ) -> Result<M::Response, InvocationError> {
        let mut form = reqwest::multipart::Form::new();

        if let serde_json::Value::Object(fields) = serde_json::to_value(request)? {
            for (key, value) in fields {
                let text = match value {
                    serde_json::Value::Null => continue,
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                form = form.text(key, text);
            }
        }

        for part in parts {
            let body = reqwest::Body::wrap_stream(ReaderStream::new(part.file));
            let mut piece = reqwest::multipart::Part::stream(body).file_name(part.file_name);
            if let Some(mime) = &part.mime {
                piece = piece.mime_str(mime)?;
            }
            form = form.part(part.name, piece);
        }

        let response = self
            .http
            .post(self.url::<M>())
            .multipart(form)
            .send()
            .await?;
        Self::flatten(serde_json::from_slice(&response.bytes().await?)?)
    }

    async fn post_json<M: Method>(&self, request: &M) -> Result<M::Response, InvocationError> {
        let response = self.http.post(self.url::<M>()).json(request).send().await?;
        Self::flatten(serde_json::from_slice(&response.bytes().await?)?)
    }

    fn url<M: Method>(&self) -> String {
        format!("{}/{}", self.base, M::NAME)
    }

    fn flatten<T>(envelope: Response<T>) -> Result<T, InvocationError> {
        if envelope.ok {
            envelope.result.ok_or(InvocationError::Empty)
        } else {
            Err(ApiError::from_envelope(
                envelope.error_code,
                envelope.description,
                envelope.parameters,
            )
            .into())
        }
    }
}

impl std::fmt::Debug for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The base URL embeds the bot token; don't leak it.
        f.debug_struct("Sender")
            .field("flood_sleep_threshold", &self.flood_sleep_threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope<T>(body: &str) -> Response<T>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn check_flatten_success() {
        let result: Result<i32, _> = Sender::flatten(envelope(r#"{"ok": true, "result": 7}"#));
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn check_flatten_missing_result() {
        let result: Result<i32, _> = Sender::flatten(envelope(r#"{"ok": true}"#));
        assert!(matches!(result, Err(InvocationError::Empty)));
    }

    #[test]
    fn check_flatten_failure() {
        let result: Result<i32, _> = Sender::flatten(envelope(
            r#"{"ok": false, "error_code": 403, "description": "Forbidden: bot was blocked by the user"}"#,
        ));
        match result {
            Err(InvocationError::Api(error)) => {
                assert_eq!(error.code, 403);
                assert!(error.is("Forbidden*"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn check_token_not_leaked_by_debug() {
        let sender = Sender::new("https://api.telegram.org", "123:secret", Some(60));
        assert!(!format!("{sender:?}").contains("secret"));
    }
}
