//! Common test utilities and mocks

use std::sync::Arc;

use async_trait::async_trait;
use gridkit_services::{ExecRequest, ExecResponse, QueryTransport, ServiceError, ServiceResult};

/// Transport that records every request and answers from a canned response.
///
/// Responses can be keyed on a substring of the query; the first matching
/// pattern wins, otherwise `default_response` is returned.
pub struct MockTransport {
    pub default_response: ExecResponse,
    pub query_responses: Vec<(String, ExecResponse)>,
    pub should_fail: bool,
    /// Log of all requests sent, for assertion in tests
    pub request_log: Arc<parking_lot::Mutex<Vec<ExecRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            default_response: ExecResponse::success(Vec::new()),
            query_responses: Vec::new(),
            should_fail: false,
            request_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(mut self, response: ExecResponse) -> Self {
        self.default_response = response;
        self
    }

    /// Register a response for queries containing the given pattern
    pub fn with_query_response(
        mut self,
        query_contains: impl Into<String>,
        response: ExecResponse,
    ) -> Self {
        self.query_responses.push((query_contains.into(), response));
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn request_log(&self) -> Vec<ExecRequest> {
        self.request_log.lock().clone()
    }
}

#[async_trait]
impl QueryTransport for MockTransport {
    async fn exec(&self, request: &ExecRequest) -> ServiceResult<ExecResponse> {
        self.request_log.lock().push(request.clone());
        if self.should_fail {
            return Err(ServiceError::RequestFailed("connection refused".to_string()));
        }
        let response = self
            .query_responses
            .iter()
            .find(|(pattern, _)| request.query.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone());
        Ok(response)
    }
}
