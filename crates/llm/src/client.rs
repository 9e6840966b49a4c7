use common::CiConfig;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

pub const INFERENCE_ENDPOINT_BASE: &str = "https://api-inference.huggingface.co/models";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from the inference client. Per-file callers log these and move
/// on; only client construction failures abort a run.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("inference request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("inference endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

/// Default generation parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenParams {
    pub max_length: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub do_sample: bool,
    pub return_full_text: bool,
    pub wait_for_model: bool,
    pub use_cache: bool,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            max_length: 500,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: true,
            return_full_text: false,
            wait_for_model: true,
            use_cache: true,
        }
    }
}

/// Caller overrides merged into the defaults per request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenOverrides {
    pub max_length: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub do_sample: Option<bool>,
}

impl GenOverrides {
    pub fn max_length(value: u32) -> Self {
        Self {
            max_length: Some(value),
            ..Default::default()
        }
    }
}

impl GenParams {
    pub fn merged(&self, overrides: &GenOverrides) -> GenParams {
        GenParams {
            max_length: overrides.max_length.unwrap_or(self.max_length),
            temperature: overrides.temperature.unwrap_or(self.temperature),
            top_p: overrides.top_p.unwrap_or(self.top_p),
            do_sample: overrides.do_sample.unwrap_or(self.do_sample),
            ..self.clone()
        }
    }
}

#[derive(Serialize)]
struct WireParameters {
    max_length: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Serialize)]
struct WireOptions {
    wait_for_model: bool,
    use_cache: bool,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    inputs: &'a str,
    parameters: WireParameters,
    options: WireOptions,
}

/// Thin client for the hosted text-generation endpoint: one synchronous
/// POST per request, bearer authorization, JSON body in, JSON body out.
#[derive(Debug, Clone)]
pub struct HfClient {
    api_url: String,
    token: String,
    defaults: GenParams,
    http: reqwest::Client,
}

impl HfClient {
    pub fn new(config: &CiConfig) -> anyhow::Result<Self> {
        Self::with_endpoint_base(config, INFERENCE_ENDPOINT_BASE)
    }

    /// Endpoint base is parameterizable so tests can point the client at a
    /// local mock server.
    pub fn with_endpoint_base(config: &CiConfig, base: &str) -> anyhow::Result<Self> {
        if config.api_token.is_empty() {
            anyhow::bail!("inference API token cannot be empty");
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            api_url: format!("{}/{}", base.trim_end_matches('/'), config.model),
            token: config.api_token.clone(),
            defaults: GenParams::default(),
            http,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue one inference request and return the parsed JSON body.
    pub async fn query(&self, prompt: &str, overrides: &GenOverrides) -> Result<Value, LlmError> {
        let params = self.defaults.merged(overrides);
        let body = WireRequest {
            inputs: prompt,
            parameters: WireParameters {
                max_length: params.max_length,
                temperature: params.temperature,
                top_p: params.top_p,
                do_sample: params.do_sample,
                return_full_text: params.return_full_text,
            },
            options: WireOptions {
                wait_for_model: params.wait_for_model,
                use_cache: params.use_cache,
            },
        };

        debug!(
            "querying {} ({} prompt chars, max_length {})",
            self.api_url,
            prompt.chars().count(),
            params.max_length
        );

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("inference endpoint returned {status}: {body}");
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value = response.json::<Value>().await?;
        info!("inference response received ({} bytes)", value.to_string().len());
        Ok(value)
    }
}

/// Pull the generated text out of either response shape the endpoint uses:
/// a list of generation objects or a single object. Anything else falls
/// back to the stringified raw body.
pub fn extract_generated_text(value: &Value) -> String {
    let from_object = |obj: &Value| {
        obj.get("generated_text")
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    match value {
        Value::Array(items) => items.first().and_then(from_object),
        Value::Object(_) => from_object(value),
        _ => None,
    }
    .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_endpoint_contract() {
        let params = GenParams::default();
        assert_eq!(params.max_length, 500);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.9);
        assert!(params.do_sample);
        assert!(!params.return_full_text);
        assert!(params.wait_for_model);
        assert!(params.use_cache);
    }

    #[test]
    fn test_overrides_merge_into_defaults() {
        let merged = GenParams::default().merged(&GenOverrides {
            max_length: Some(1500),
            temperature: Some(0.2),
            ..Default::default()
        });
        assert_eq!(merged.max_length, 1500);
        assert_eq!(merged.temperature, 0.2);
        assert_eq!(merged.top_p, 0.9);
        assert!(merged.use_cache);
    }

    #[test]
    fn test_extracts_from_list_shape() {
        let value = json!([{ "generated_text": "looks good" }]);
        assert_eq!(extract_generated_text(&value), "looks good");
    }

    #[test]
    fn test_extracts_from_single_object_shape() {
        let value = json!({ "generated_text": "one object" });
        assert_eq!(extract_generated_text(&value), "one object");
    }

    #[test]
    fn test_falls_back_to_raw_body() {
        let value = json!({ "estimated_time": 20.0 });
        assert_eq!(extract_generated_text(&value), value.to_string());
    }
}
