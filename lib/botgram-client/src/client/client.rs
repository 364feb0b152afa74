// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::types::Update;
use crate::utils;
use botgram_sender::{InvocationError, Part, Sender};
use botgram_types::{Method, User};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::AtomicI64;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Configuration required to create a [`Client`] instance.
pub struct Config {
    /// The bot token, as issued by `@BotFather`.
    pub token: String,

    /// Additional initialization parameters that have sane defaults.
    pub params: InitParams,
}

/// Optional initialization parameters with sane defaults.
pub struct InitParams {
    /// Base URL of the API server to talk to. This is most commonly changed
    /// to point at a locally hosted bot API server.
    pub server_url: String,

    /// The threshold below which the library should automatically sleep on
    /// flood-wait errors (inclusive). For instance, if the server answers
    /// "retry after 17" and `flood_sleep_threshold` is 20 (seconds), the
    /// library will `sleep` automatically for 17 seconds.
    ///
    /// By default, the library will sleep on flood-waits below or equal to
    /// one minute, but this can be disabled by passing `None`.
    ///
    /// On flood, the library will retry *once*. If the flood error occurs a
    /// second time after sleeping, the error will be returned. Calls that
    /// upload files are never retried automatically.
    pub flood_sleep_threshold: Option<u32>,

    /// How long the server may hold a [`next_update`] poll open before
    /// answering with an empty batch. Longer is cheaper.
    ///
    /// [`next_update`]: crate::Client::next_update
    pub poll_timeout: Duration,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            server_url: "https://api.telegram.org".to_string(),
            flood_sleep_threshold: Some(60),
            poll_timeout: Duration::from_secs(30),
        }
    }
}

pub(crate) struct ClientInner {
    // Used to implement `PartialEq`.
    pub(crate) id: i64,
    pub(crate) sender: Sender,
    pub(crate) params: InitParams,
    pub(crate) last_update_id: AtomicI64,
    pub(crate) updates: Mutex<VecDeque<Update>>,
}

/// A client capable of invoking bot API methods.
///
/// This structure is the "entry point" of the library, from which you can
/// start using the rest.
///
/// It is cheap to clone, and clones can be freely moved across tasks to
/// invoke requests concurrently. No network traffic happens on creation;
/// the first call (commonly [`get_me`]) is what proves the token works.
///
/// [`get_me`]: Client::get_me
#[derive(Clone)]
pub struct Client(pub(crate) Arc<ClientInner>);

impl Client {
    /// Creates and returns a new client instance from the given
    /// configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use botgram_client::{Client, Config};
    ///
    /// let client = Client::new(Config {
    ///     token: "123456:aaaabbbbcccc".to_string(),
    ///     params: Default::default(),
    /// });
    /// ```
    pub fn new(config: Config) -> Self {
        let sender = Sender::new(
            &config.params.server_url,
            &config.token,
            config.params.flood_sleep_threshold,
        );

        Self(Arc::new(ClientInner {
            id: utils::generate_random_id(),
            sender,
            params: config.params,
            last_update_id: AtomicI64::new(0),
            updates: Mutex::new(VecDeque::new()),
        }))
    }

    /// Invokes a raw API method. This directly posts the request to the
    /// server and is what every higher-level call funnels through.
    pub async fn invoke<M: Method>(&self, request: &M) -> Result<M::Response, InvocationError> {
        self.0.sender.invoke(request).await
    }

    pub(crate) async fn invoke_with_parts<M: Method>(
        &self,
        request: &M,
        parts: Vec<Part>,
    ) -> Result<M::Response, InvocationError> {
        self.0.sender.invoke_with_parts(request, parts).await
    }

    /// Returns basic information about the bot the token belongs to. Handy
    /// to check that the token is valid at startup.
    pub async fn get_me(&self) -> Result<User, InvocationError> {
        self.invoke(&GetMeRequest {}).await
    }
}

#[derive(Serialize)]
struct GetMeRequest {}

impl Method for GetMeRequest {
    const NAME: &'static str = "getMe";
    type Response = User;
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The sender holds the token; neither is shown.
        f.debug_struct("Client").field("id", &self.0.id).finish()
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_compare_equal_and_instances_do_not() {
        let config = || Config {
            token: "123:abc".to_string(),
            params: Default::default(),
        };

        let first = Client::new(config());
        let second = Client::new(config());

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
    }
}
