// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use botgram_types::ResponseParameters;
use std::fmt;

/// The error type reported by the server when a request is rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
    /// A numerical value similar to HTTP status codes (and often equal to
    /// one).
    pub code: i32,

    /// Human-readable explanation, e.g. `"Bad Request: chat not found"`.
    pub description: String,

    /// For flood errors, how many seconds to wait before retrying.
    pub retry_after: Option<u32>,

    /// The group was migrated to a supergroup with this identifier.
    pub migrate_to_chat_id: Option<i64>,
}

impl std::error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error {}: {}", self.code, self.description)?;
        if let Some(seconds) = self.retry_after {
            write!(f, " (retry after {seconds}s)")?;
        }
        Ok(())
    }
}

impl ApiError {
    pub(crate) fn from_envelope(
        code: Option<i32>,
        description: Option<String>,
        parameters: Option<ResponseParameters>,
    ) -> Self {
        Self {
            code: code.unwrap_or(0),
            description: description.unwrap_or_else(|| "unknown error".to_string()),
            retry_after: parameters.and_then(|p| p.retry_after),
            migrate_to_chat_id: parameters.and_then(|p| p.migrate_to_chat_id),
        }
    }

    /// Matches on the description of the API error (case-sensitive).
    ///
    /// Useful in `match` arm guards. A single trailing or leading asterisk
    /// (`'*'`) is allowed, and will instead check if the description starts
    /// (or ends with) the input parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// # let request_result = Result::<(), _>::Err(botgram_sender::ApiError {
    /// #     code: 400, description: "Bad Request: chat not found".to_string(),
    /// #     retry_after: None, migrate_to_chat_id: None });
    /// #
    /// match request_result {
    ///     Err(err) if err.is("Forbidden*") => panic!(),
    ///     Err(err) if err.is("*chat not found") => {}
    ///     _ => panic!(),
    /// }
    /// ```
    pub fn is(&self, description: &str) -> bool {
        if let Some(description) = description.strip_suffix('*') {
            self.description.starts_with(description)
        } else if let Some(description) = description.strip_prefix('*') {
            self.description.ends_with(description)
        } else {
            self.description == description
        }
    }
}

/// This error occurs when invoking a method was unsuccessful.
#[derive(Debug)]
pub enum InvocationError {
    /// The server understood the request and rejected it.
    Api(ApiError),

    /// The HTTP exchange itself failed (connection, TLS, timeout).
    Http(reqwest::Error),

    /// The response body was not the expected envelope, or the request
    /// parameters could not be serialized.
    Json(serde_json::Error),

    /// The server reported success but the envelope carried no payload.
    Empty,
}

impl std::error::Error for InvocationError {}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(err) => write!(f, "request error: {err}"),
            Self::Http(err) => write!(f, "request error: transport failed: {err}"),
            Self::Json(err) => write!(f, "request error: bad body: {err}"),
            Self::Empty => write!(f, "request error: success without a result"),
        }
    }
}

impl From<ApiError> for InvocationError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}

impl From<reqwest::Error> for InvocationError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error)
    }
}

impl From<serde_json::Error> for InvocationError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl InvocationError {
    /// Matches on the description of the API error (case-sensitive).
    ///
    /// If the error is not an API error, returns `false`. See
    /// [`ApiError::is`] for the matching rules.
    #[inline]
    pub fn is(&self, description: &str) -> bool {
        match self {
            Self::Api(api) => api.is(description),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_envelope_conversion() {
        let error = ApiError::from_envelope(
            Some(429),
            Some("Too Many Requests: retry after 31".to_string()),
            Some(ResponseParameters {
                migrate_to_chat_id: None,
                retry_after: Some(31),
            }),
        );
        assert_eq!(error.code, 429);
        assert_eq!(error.retry_after, Some(31));

        let error = ApiError::from_envelope(None, None, None);
        assert_eq!(error.code, 0);
        assert_eq!(error.description, "unknown error");
    }

    #[test]
    fn check_description_matching() {
        let error = ApiError {
            code: 400,
            description: "Bad Request: message to delete not found".to_string(),
            retry_after: None,
            migrate_to_chat_id: None,
        };

        assert!(error.is("Bad Request: message to delete not found"));
        assert!(error.is("Bad Request*"));
        assert!(error.is("*not found"));
        assert!(!error.is("Forbidden*"));
    }
}
