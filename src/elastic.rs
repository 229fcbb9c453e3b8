//! Elasticsearch REST client.
//!
//! A thin `reqwest` wrapper over the handful of endpoints the data manager
//! uses. Every request is bounded by `cluster.timeout_secs`.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | ping | `GET /` |
//! | index exists | `HEAD /{index}` |
//! | create index | `PUT /{index}` |
//! | delete index | `DELETE /{index}` |
//! | put document | `PUT /{index}/{type}/{id}` |
//! | search | `POST /{index}/{type}/_search` |

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClusterConfig;
use crate::error::{DataError, Result};
use crate::traits::{DocumentIndex, SearchBackend};

/// Client bound to one cluster, index and document type.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    base_url: String,
    index: String,
    type_name: String,
}

#[derive(Deserialize)]
struct Acknowledged {
    #[serde(default)]
    acknowledged: bool,
}

impl ElasticClient {
    /// Build a client for the configured cluster. No request is sent.
    pub fn new(config: &ClusterConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index_name.clone(),
            type_name: config.type_name.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, self.index)
    }

    fn type_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.index, self.type_name)
    }

    async fn send(
        &self,
        op: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        request.send().await.map_err(|e| transport_error(op, e))
    }
}

fn transport_error(op: &str, err: reqwest::Error) -> DataError {
    if err.is_timeout() {
        DataError::Timeout(op.to_string())
    } else {
        DataError::Connectivity(err)
    }
}

/// Read a response body. Failures are classified like send failures.
async fn read_body(op: &str, response: reqwest::Response) -> Result<String> {
    response.text().await.map_err(|e| transport_error(op, e))
}

/// Decode a JSON body, reporting anything else as [`DataError::UnexpectedShape`].
fn decode_body<T: serde::de::DeserializeOwned>(op: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| DataError::UnexpectedShape(format!("{} response is not valid: {}", op, e)))
}

/// Turn a non-success response into [`DataError::Remote`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DataError::Remote {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl DocumentIndex for ElasticClient {
    async fn ping(&self) -> Result<()> {
        let resp = self.send("ping", self.http.get(&self.base_url)).await?;
        check_status(resp).await?;
        debug!(url = %self.base_url, "cluster ping ok");
        Ok(())
    }

    async fn index_exists(&self) -> Result<bool> {
        let resp = self
            .send("index exists", self.http.head(self.index_url()))
            .await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            _ => check_status(resp).await.map(|_| true),
        }
    }

    async fn create_index(&self) -> Result<bool> {
        let resp = self
            .send("create index", self.http.put(self.index_url()))
            .await?;
        let body = read_body("create index", check_status(resp).await?).await?;
        let ack: Acknowledged = decode_body("create index", &body)?;
        Ok(ack.acknowledged)
    }

    async fn delete_index(&self) -> Result<()> {
        let resp = self
            .send("delete index", self.http.delete(self.index_url()))
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(resp).await?;
        Ok(())
    }

    async fn put_document(&self, id: &str, doc: &Value) -> Result<()> {
        let url = format!("{}/{}", self.type_url(), id);
        let resp = self
            .send("index document", self.http.put(url).json(doc))
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for ElasticClient {
    async fn search(&self, body: &Value) -> Result<Value> {
        let url = format!("{}/_search", self.type_url());
        let resp = self.send("search", self.http.post(url).json(body)).await?;
        let body = read_body("search", check_status(resp).await?).await?;
        decode_body("search", &body)
    }
}
