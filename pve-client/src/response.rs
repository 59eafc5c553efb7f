use std::collections::HashMap;

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::Error;

/// The outcome of a single API call: the HTTP status and the decoded body.
///
/// Error statuses are not turned into errors here, use
/// [`is_success_status_code`](ApiResult::is_success_status_code) or
/// [`into_data`](ApiResult::into_data) for that.
#[derive(Clone, Debug)]
pub struct ApiResult {
    status: StatusCode,
    reason: String,
    response: Value,
}

impl ApiResult {
    /// Create a result with the canonical reason phrase of `status`.
    pub fn new(status: StatusCode, response: Value) -> Self {
        Self {
            status,
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            response,
        }
    }

    /// Replace the reason phrase, the API reports parameter errors this way.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    pub fn is_success_status_code(&self) -> bool {
        self.status.is_success()
    }

    /// The complete decoded body.
    pub fn response(&self) -> &Value {
        &self.response
    }

    pub fn into_response(self) -> Value {
        self.response
    }

    /// The `data` member of the body, `null` if there is none.
    pub fn data(&self) -> &Value {
        self.response.get("data").unwrap_or(&Value::Null)
    }

    /// Whether the body carries per-parameter error messages.
    pub fn response_in_error(&self) -> bool {
        match self.response.get("errors") {
            Some(Value::Object(errors)) => !errors.is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }

    /// The per-parameter error messages as `name : message` lines.
    pub fn get_error(&self) -> String {
        let mut out = String::new();
        match self.response.get("errors") {
            Some(Value::Object(errors)) => {
                for (name, message) in errors {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(name);
                    out.push_str(" : ");
                    match message {
                        Value::String(message) => out.push_str(message.trim_end()),
                        other => out.push_str(&other.to_string()),
                    }
                }
            }
            Some(Value::Null) | None => (),
            Some(other) => out.push_str(&other.to_string()),
        }
        out
    }

    /// Check the status and deserialize the `data` member.
    ///
    /// Fails with [`Error::Api`] on an error status, and on extjs style responses reporting
    /// `success: 0`.
    pub fn into_data<T>(self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.check()?.decode()
    }

    /// Like [`into_data`](ApiResult::into_data), for calls which return nothing.
    pub fn nodata(self) -> Result<(), Error> {
        self.check().map(drop)
    }

    fn check(self) -> Result<RawApiResponse, Error> {
        if !self.status.is_success() {
            let message = match self.get_error() {
                errors if errors.is_empty() => self.reason,
                errors => format!("{}\n{errors}", self.reason),
            };
            return Err(Error::api(self.status, message));
        }

        let raw: RawApiResponse = match self.response {
            Value::Object(_) => serde_json::from_value(self.response)
                .map_err(|err| Error::bad_api("failed to parse api response", err))?,
            // png and other raw bodies
            other => RawApiResponse {
                data: Some(other),
                ..Default::default()
            },
        };

        raw.check_success()
    }
}

#[derive(Default, Deserialize)]
struct RawApiResponse {
    #[serde(default, deserialize_with = "pve_login::parse::deserialize_u16")]
    status: Option<u16>,
    message: Option<String>,
    #[serde(default, deserialize_with = "pve_login::parse::deserialize_bool")]
    success: Option<bool>,
    data: Option<Value>,
    #[serde(default)]
    errors: Option<HashMap<String, String>>,
}

impl RawApiResponse {
    fn check_success(mut self) -> Result<Self, Error> {
        if self.success != Some(false) {
            return Ok(self);
        }

        let status = StatusCode::from_u16(self.status.unwrap_or(400))
            .unwrap_or(StatusCode::BAD_REQUEST);
        let mut message = self
            .message
            .take()
            .unwrap_or_else(|| "no message provided".to_string());
        for (param, error) in self.errors.into_iter().flatten() {
            use std::fmt::Write;
            let _ = write!(message, "\n{param}: {error}");
        }

        Err(Error::api(status, message))
    }

    fn decode<T: DeserializeOwned>(self) -> Result<T, Error> {
        // a missing `data` member might still be a valid `T`, like `()` or `Option<_>`
        serde_json::from_value(self.data.unwrap_or(Value::Null))
            .map_err(|err| Error::bad_api("unexpected api response data", err))
    }
}
