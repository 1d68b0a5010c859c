//! Transport-neutral request description.

use serde::Serialize;

use crate::error::Result;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Patch,
}

impl RequestMethod {
    /// Upper-case method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Patch => "PATCH",
        }
    }

    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request handed to a [`Transport`](crate::Transport).
///
/// `path` is either instance-relative (`/services/data/...`) or an absolute
/// URL; the transport resolves it.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: RequestMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub query_params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    /// Create a new request.
    pub fn new(method: RequestMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post, path)
    }

    /// Create a PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(RequestMethod::Patch, path)
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add several headers at once.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set a JSON body from an already-built value.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a header value (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = Request::patch("/services/data/v60.0/sobjects/Account/001")
            .header("Sforce-Mru", "updateMru=false")
            .headers([("Sforce-Auto-Assign", "false")])
            .query("q", "SELECT Id FROM Account");

        assert_eq!(request.method, RequestMethod::Patch);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.header_value("sforce-mru"), Some("updateMru=false"));
        assert_eq!(request.query_params[0].1, "SELECT Id FROM Account");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Body {
            name: String,
        }

        let request = Request::post("/x")
            .json(&Body {
                name: "Acme".to_string(),
            })
            .unwrap();

        assert_eq!(request.body, Some(serde_json::json!({"name": "Acme"})));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(RequestMethod::Get.as_str(), "GET");
        assert_eq!(RequestMethod::Post.to_string(), "POST");
        assert_eq!(RequestMethod::Patch.to_reqwest(), reqwest::Method::PATCH);
    }
}
