// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors reported while building and sending outgoing messages.

use crate::media::MediaError;
use botgram_sender::InvocationError;
use std::fmt;
use std::io;

/// This error occurs when an outgoing message could not be built or sent.
///
/// Everything that goes wrong before the network is reached (a file that
/// fails to open, a failed thumbnail extraction, a request that fails
/// validation) is reported through its own variant, so callers can tell a
/// local mistake from a server rejection.
#[derive(Debug)]
pub enum SendError {
    /// A local file meant to be attached could not be opened.
    Attachment(io::Error),

    /// Probing or thumbnailing a media file failed.
    Media(MediaError),

    /// The request failed validation before any network call was made.
    Invalid(&'static str),

    /// The transport call itself failed.
    Invoke(InvocationError),
}

impl std::error::Error for SendError {}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attachment(err) => write!(f, "send error, attachment failed: {err}"),
            Self::Media(err) => write!(f, "send error, media tooling failed: {err}"),
            Self::Invalid(reason) => write!(f, "send error, invalid request: {reason}"),
            Self::Invoke(err) => write!(f, "send error: {err}"),
        }
    }
}

impl From<io::Error> for SendError {
    fn from(error: io::Error) -> Self {
        Self::Attachment(error)
    }
}

impl From<MediaError> for SendError {
    fn from(error: MediaError) -> Self {
        Self::Media(error)
    }
}

impl From<InvocationError> for SendError {
    fn from(error: InvocationError) -> Self {
        Self::Invoke(error)
    }
}

impl SendError {
    /// Matches on the description of the underlying API error
    /// (case-sensitive), with the same rules as
    /// [`ApiError::is`](botgram_sender::ApiError::is). Returns `false` for
    /// anything that never reached the server.
    #[inline]
    pub fn is(&self, description: &str) -> bool {
        match self {
            Self::Invoke(error) => error.is(description),
            _ => false,
        }
    }
}
