use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::{AnalysisError, AnalysisOutcome, MarkdownRenderer, ResultFormatter};

/// Body of the analysis endpoint. Either field may be absent.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AnalysisReply {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self) -> Result<AnalysisReply, AnalysisError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAnalysisClient {
    base_url: String,
    timeout: Duration,
}

impl ReqwestAnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn analyze_url(&self) -> Result<url::Url, AnalysisError> {
        url::Url::parse(&self.base_url)
            .and_then(|base| base.join("/api/analyze"))
            .map_err(|err| AnalysisError::InvalidUrl(err.to_string()))
    }
}

#[async_trait::async_trait]
impl AnalysisClient for ReqwestAnalysisClient {
    async fn analyze(&self) -> Result<AnalysisReply, AnalysisError> {
        let url = self.analyze_url()?;
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        // The status code does not decide the outcome; the body does.
        let body = client.post(url).send().await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Maps a reply (or the failure to get one) to what the analysis section shows.
pub fn resolve_outcome<R: MarkdownRenderer>(
    reply: Result<AnalysisReply, AnalysisError>,
    formatter: &ResultFormatter<R>,
) -> AnalysisOutcome {
    let reply = match reply {
        Ok(reply) => reply,
        Err(err) => return AnalysisOutcome::Failed(err.to_string()),
    };

    if let Some(error) = reply.error.filter(is_set) {
        return AnalysisOutcome::Rejected(value_text(error));
    }
    match reply.result {
        Some(result) => AnalysisOutcome::Rendered(formatter.format(&value_text(result))),
        None => AnalysisOutcome::Failed("response carried neither result nor error".to_string()),
    }
}

/// `false`, `0` and `""` carry no error, the same as a missing field.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
