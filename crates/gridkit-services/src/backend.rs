//! Backend exec endpoint client
//!
//! The backend accepts a fully assembled statement in a JSON envelope and
//! answers with `{ ok, data, error }`. Statement assembly happens in
//! `gridkit-query`; this module only ships it and unpacks the answer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gridkit_core::Row;
use gridkit_query::{QueryTemplate, SelectionFields, SelectionPreset, embed_for_exec};
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::{ServiceError, ServiceResult};

/// Request body of the exec endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecRequest {
    pub backend_point: String,
    pub user: String,
    pub restore: Vec<String>,
    pub query: String,
}

/// Response body of the exec endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecResponse {
    pub ok: bool,
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecResponse {
    pub fn success(data: Vec<Row>) -> Self {
        Self {
            ok: true,
            data,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Carries an [`ExecRequest`] to the backend
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn exec(&self, request: &ExecRequest) -> ServiceResult<ExecResponse>;
}

/// JSON-over-HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> ServiceResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.exec_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn exec(&self, request: &ExecRequest) -> ServiceResult<ExecResponse> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<ExecResponse>().await?)
    }
}

/// Runs statements against the configured backend point
pub struct BackendClient {
    config: BackendConfig,
    transport: Arc<dyn QueryTransport>,
}

impl BackendClient {
    pub fn new(config: BackendConfig, transport: Arc<dyn QueryTransport>) -> Self {
        Self { config, transport }
    }

    /// Client using [`HttpTransport`]
    pub fn http(config: BackendConfig) -> ServiceResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Wrap a statement in the request envelope
    pub fn build_request(&self, statement: &str) -> ExecRequest {
        let query = if self.config.embed_quoted {
            embed_for_exec(statement)
        } else {
            statement.to_string()
        };
        ExecRequest {
            backend_point: self.config.backend_point.clone(),
            user: self.config.user_name.clone(),
            restore: self.config.restore.clone(),
            query,
        }
    }

    /// Execute a statement and return its rows
    #[tracing::instrument(skip(self, statement), fields(backend_point = %self.config.backend_point))]
    pub async fn exec(&self, statement: &str) -> ServiceResult<Vec<Row>> {
        let request = self.build_request(statement);
        tracing::debug!(query = %request.query, "Sending statement");

        let response = self.transport.exec(&request).await?;
        if !response.ok {
            let reason = response
                .error
                .unwrap_or_else(|| "no error message".to_string());
            tracing::warn!(%reason, "Backend rejected statement");
            return Err(ServiceError::Rejected(reason));
        }

        tracing::info!(rows = response.data.len(), "Statement executed");
        Ok(response.data)
    }

    /// Render `template` around the preset's WHERE clause and execute it
    pub async fn fetch_selection(
        &self,
        template: &QueryTemplate,
        preset: &SelectionPreset,
        fields: &SelectionFields,
    ) -> ServiceResult<Vec<Row>> {
        let statement = template.render(&preset.where_clause(fields))?;
        self.exec(&statement).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct NoopTransport;

    #[async_trait]
    impl QueryTransport for NoopTransport {
        async fn exec(&self, _request: &ExecRequest) -> ServiceResult<ExecResponse> {
            Ok(ExecResponse::success(Vec::new()))
        }
    }

    fn client(embed_quoted: bool) -> BackendClient {
        let config = BackendConfig {
            backend_point: "shop".to_string(),
            user_name: "jdoe".to_string(),
            restore: vec!["prices".to_string()],
            embed_quoted,
            ..Default::default()
        };
        BackendClient::new(config, Arc::new(NoopTransport))
    }

    #[test]
    fn test_build_request_doubles_quotes_when_embedding() {
        let request = client(true).build_request("select * from t where a = 'x'");
        assert_eq!(
            request,
            ExecRequest {
                backend_point: "shop".to_string(),
                user: "jdoe".to_string(),
                restore: vec!["prices".to_string()],
                query: "select * from t where a = ''x''".to_string(),
            }
        );

        let request = client(false).build_request("select 'x'");
        assert_eq!(request.query, "select 'x'");
    }

    #[test]
    fn test_response_wire_format() {
        let response: ExecResponse =
            serde_json::from_str(r#"{ "ok": true, "data": [{ "article": "A1", "price": 10 }] }"#)
                .unwrap();
        assert!(response.ok);
        assert_eq!(
            response.data,
            vec![Row::new().with("article", "A1").with("price", 10)]
        );

        let response: ExecResponse = serde_json::from_str(r#"{ "ok": false }"#).unwrap();
        assert!(response.data.is_empty());
        assert_eq!(response.error, None);
    }

    #[test]
    fn test_http_transport_rejects_bad_config() {
        let config = BackendConfig {
            base_url: "localhost".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpTransport::new(&config),
            Err(ServiceError::InvalidConfig(_))
        ));
    }
}
