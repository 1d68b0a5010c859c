//! Buffered HTTP response and Salesforce error-body handling.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// A fully-read HTTP response.
///
/// Header names are stored lower-cased.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Create a response from its parts.
    pub fn new<I, K, V>(status: u16, headers: I, body: impl Into<Bytes>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
            body: body.into(),
        }
    }

    /// Create a JSON response with no headers.
    pub fn from_json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(
            status,
            [("content-type", "application/json")],
            body.to_string(),
        )
    }

    pub(crate) async fn read(inner: reqwest::Response) -> Result<Self> {
        let status = inner.status().as_u16();
        let headers: Vec<(String, String)> = inner
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = inner.bytes().await?;
        Ok(Self::new(status, headers, body))
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response was successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get the raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Get the body as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the JSON body.
    ///
    /// An empty body (HTTP 204) deserializes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Get API usage limits from response headers.
    pub fn api_usage(&self) -> Option<ApiUsage> {
        // Format: "api-usage=25/15000"
        let info = self.header("sforce-limit-info")?;

        for part in info.split(',') {
            if let Some(usage) = part.trim().strip_prefix("api-usage=") {
                let (used, limit) = usage.split_once('/')?;
                return Some(ApiUsage {
                    used: used.trim().parse().ok()?,
                    limit: limit.trim().parse().ok()?,
                });
            }
        }

        None
    }

    /// Turn a non-2xx response into an error.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(parse_error_response(self.status, &self.text()))
        }
    }
}

/// API usage information from response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiUsage {
    /// Number of API calls used.
    pub used: u64,
    /// Total API call limit.
    pub limit: u64,
}

impl ApiUsage {
    /// Get the remaining API calls.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }

    /// Get the usage percentage.
    pub fn percentage(&self) -> f64 {
        if self.limit == 0 {
            100.0
        } else {
            (self.used as f64 / self.limit as f64) * 100.0
        }
    }

    /// Returns true if API usage is at or above the given percentage.
    pub fn is_above_threshold(&self, threshold_percent: f64) -> bool {
        self.percentage() >= threshold_percent
    }
}

/// Map a non-success body to an error kind.
fn parse_error_response(status: u16, body: &str) -> Error {
    if status == 429 {
        return Error::new(ErrorKind::RateLimited);
    }

    // Salesforce usually answers with an array of errors
    if let Ok(errors) = serde_json::from_str::<Vec<SalesforceErrorResponse>>(body) {
        if let Some(err) = errors.into_iter().next() {
            return err.into_error();
        }
    }

    if let Ok(err) = serde_json::from_str::<SalesforceErrorResponse>(body) {
        return err.into_error();
    }

    let message = sanitize_error_message(body);
    let kind = match status {
        401 => ErrorKind::SessionExpired(message),
        _ => ErrorKind::Status { status, message },
    };

    Error::new(kind)
}

/// Strip tokens and session ids from a message and cap its length.
fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = message.to_string();

    if let Ok(token_pattern) = regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+") {
        sanitized = token_pattern
            .replace_all(&sanitized, "[REDACTED_TOKEN]")
            .to_string();
    }

    if let Ok(session_pattern) = regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}") {
        sanitized = session_pattern
            .replace_all(&sanitized, "sid=[REDACTED]")
            .to_string();
    }

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

#[derive(Debug, serde::Deserialize)]
struct SalesforceErrorResponse {
    #[serde(alias = "errorCode")]
    error_code: String,
    message: String,
    fields: Option<Vec<String>>,
}

impl SalesforceErrorResponse {
    fn into_error(self) -> Error {
        let message = sanitize_error_message(&self.message);
        match self.error_code.as_str() {
            "INVALID_SESSION_ID" => return Error::new(ErrorKind::SessionExpired(message)),
            "REQUEST_LIMIT_EXCEEDED" => return Error::new(ErrorKind::RateLimited),
            _ => {}
        }
        Error::new(ErrorKind::SalesforceApi {
            error_code: self.error_code,
            message,
            fields: self.fields.unwrap_or_default(),
        })
    }
}
