// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use serde::Deserialize;

/// The envelope every bot API response is wrapped in.
///
/// On success `ok` is `true` and `result` holds the payload; on failure
/// `ok` is `false` and `description`/`error_code` explain the rejection.
#[derive(Clone, Debug, Deserialize)]
pub struct Response<T> {
    pub ok: bool,
    #[serde(default = "none")]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i32>,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

// `#[serde(default)]` alone would require `T: Default`.
fn none<T>() -> Option<T> {
    None
}

/// Extra information some failures carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ResponseParameters {
    /// The group was migrated; repeat the request against this chat instead.
    #[serde(default)]
    pub migrate_to_chat_id: Option<i64>,
    /// Flood control; wait this many seconds before retrying.
    #[serde(default)]
    pub retry_after: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_ok_envelope() {
        let response: Response<bool> = serde_json::from_str(r#"{"ok": true, "result": true}"#).unwrap();
        assert!(response.ok);
        assert_eq!(response.result, Some(true));
        assert!(response.description.is_none());
    }

    #[test]
    fn check_error_envelope() {
        let response: Response<bool> = serde_json::from_str(
            r#"{
                "ok": false,
                "error_code": 429,
                "description": "Too Many Requests: retry after 31",
                "parameters": {"retry_after": 31}
            }"#,
        )
        .unwrap();

        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.error_code, Some(429));
        assert_eq!(response.parameters.unwrap().retry_after, Some(31));
    }
}
