//! AI Horde generation backend implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::HordeConfig;
use crate::trips::TripMode;

use super::{GenerationClient, GenerationError, JobId, JobStatus};

/// Client-Agent header sent with every Horde API request.
const CLIENT_AGENT: &str = "unknown:0:unknown";

/// AI Horde generation backend.
pub struct HordeClient {
    client: Client,
    config: HordeConfig,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    generations: Vec<GenerationEntry>,
}

#[derive(Debug, Deserialize)]
struct GenerationEntry {
    #[serde(default)]
    img: Option<String>,
}

impl StatusResponse {
    fn into_job_status(self) -> JobStatus {
        let result_url = self
            .generations
            .into_iter()
            .find_map(|g| g.img.filter(|url| !url.is_empty()));

        JobStatus {
            done: self.done,
            result_url,
        }
    }
}

impl HordeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HordeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn prompt_for(&self, mode: TripMode) -> String {
        self.config.prompt_template.replace("{mode}", mode.as_str())
    }

    async fn read_body<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Service(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GenerationError::Service(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl GenerationClient for HordeClient {
    fn name(&self) -> &str {
        "horde"
    }

    async fn submit(&self, mode: TripMode) -> Result<JobId, GenerationError> {
        let url = format!("{}/api/v2/generate/async", self.base_url());
        let body = serde_json::json!({
            "prompt": self.prompt_for(mode),
            "params": {
                "cfg_scale": 7.5,
                "denoising_strength": 0.75,
                "seed": "312912",
                "height": 512,
                "width": 512,
                "seed_variation": 1,
                "steps": 10,
            },
        });

        debug!(mode = %mode, "Submitting generation job");

        let response = self
            .client
            .post(&url)
            .header("apikey", self.config.api_key.as_str())
            .header("Client-Agent", CLIENT_AGENT)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let submit: SubmitResponse = Self::read_body(response).await?;

        let id = submit
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GenerationError::Service("response carried no job id".to_string()))?;

        debug!(mode = %mode, job_id = %id, "Generation job queued");

        Ok(JobId(id))
    }

    async fn status(&self, job: &JobId) -> Result<JobStatus, GenerationError> {
        let url = format!("{}/api/v2/generate/status/{}", self.base_url(), job);

        let response = self
            .client
            .get(&url)
            .header("Client-Agent", CLIENT_AGENT)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status: StatusResponse = Self::read_body(response).await?;

        Ok(status.into_job_status())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Service(format!(
                "download failed with HTTP {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HordeConfig;

    #[test]
    fn test_prompt_template_substitution() {
        let client = HordeClient::new(HordeConfig::default());
        assert_eq!(
            client.prompt_for(TripMode::Foot),
            "The best trip in Ireland foot"
        );
        assert_eq!(
            client.prompt_for(TripMode::Car),
            "The best trip in Ireland car"
        );
    }

    #[test]
    fn test_status_response_not_done() {
        let raw = r#"{"done": false, "generations": []}"#;
        let parsed: StatusResponse = serde_json::from_str(raw).unwrap();
        let status = parsed.into_job_status();
        assert!(!status.done);
        assert!(status.ready_url().is_none());
    }

    #[test]
    fn test_status_response_done_without_generations() {
        // The completion flag can flip before the result reference shows up
        let raw = r#"{"done": true}"#;
        let parsed: StatusResponse = serde_json::from_str(raw).unwrap();
        let status = parsed.into_job_status();
        assert!(status.done);
        assert!(status.ready_url().is_none());
    }

    #[test]
    fn test_status_response_empty_img_is_not_ready() {
        let raw = r#"{"done": true, "generations": [{"img": ""}]}"#;
        let parsed: StatusResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.into_job_status().ready_url().is_none());
    }

    #[test]
    fn test_status_response_ready() {
        let raw = r#"{"done": true, "generations": [{"img": "http://x/img.jpg"}]}"#;
        let parsed: StatusResponse = serde_json::from_str(raw).unwrap();
        let status = parsed.into_job_status();
        assert_eq!(status.ready_url(), Some("http://x/img.jpg"));
    }

    #[test]
    fn test_submit_response_missing_id() {
        let raw = r#"{"message": "queue full"}"#;
        let parsed: SubmitResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.id.is_none());
    }
}
