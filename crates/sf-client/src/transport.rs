//! The seam between the connector and the network.

use std::future::Future;

use crate::error::Result;
use crate::request::Request;
use crate::response::{ApiUsage, Response};

/// Executes one authenticated request against a Salesforce org.
///
/// Implementations resolve `request.path` against the org's instance URL,
/// attach credentials, and turn non-2xx answers into errors. Anything that
/// can do that is a valid transport; tests typically point
/// [`SalesforceClient`](crate::SalesforceClient) at a mock server.
pub trait Transport: Send + Sync {
    /// Base URL of the org, without a trailing slash.
    fn instance_url(&self) -> &str;

    /// Send the request and return the successful response.
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;

    /// API usage reported by the most recent response, if known.
    fn api_usage(&self) -> Option<ApiUsage> {
        None
    }
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn instance_url(&self) -> &str {
        (**self).instance_url()
    }

    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(request)
    }

    fn api_usage(&self) -> Option<ApiUsage> {
        (**self).api_usage()
    }
}
