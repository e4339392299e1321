// DashScope text-generation client.
// Calls the qwen-max model with an architect-persona prompt; any failure
// degrades to the description-based fallback summary.

use std::time::Duration;

use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DigestError, Result};
use crate::trending::Project;

use super::{Summarize, fallback_summary};

const GENERATION_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";
const MODEL: &str = "qwen-max";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    input: GenerationInput<'a>,
    parameters: GenerationParameters<'a>,
}

#[derive(Serialize)]
struct GenerationInput<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct GenerationParameters<'a> {
    result_format: &'a str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    output: Option<GenerationOutput>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct GenerationOutput {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// DashScope generation API client.
///
/// Constructed even without an API key so the pipeline still runs and every
/// summary falls back to the project description.
pub struct DashScope {
    client: Option<Client>,
}

impl DashScope {
    pub fn new(api_key: Option<&str>) -> Self {
        let client = api_key.and_then(|key| Self::build_client(key).ok());
        if client.is_none() {
            warn!("DASHSCOPE_API_KEY not configured, summaries fall back to project descriptions");
        }
        Self { client }
    }

    fn build_client(api_key: &str) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| DigestError::Other(e.to_string()))?,
        );

        Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DigestError::Http)
    }

    fn prompt(project: &Project) -> String {
        format!(
            "你是一个资深架构师。请深入分析GitHub项目 '{}'。描述：{}。\n\
             请严格按以下格式输出（中文）：\n\
             【项目背景】一句话说明该项目解决了什么行业痛点。\n\
             【核心介绍】两句话说明其技术实现方案或定位。\n\
             【关键特性】列举2个核心技术亮点，重要词汇请用双星号加粗。",
            project.name, project.desc
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or(DigestError::MissingEnv("DASHSCOPE_API_KEY"))?;

        let request = GenerationRequest {
            model: MODEL,
            input: GenerationInput { prompt },
            parameters: GenerationParameters {
                result_format: "message",
            },
        };

        let response = client
            .post(GENERATION_URL)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerationResponse = response.json().await?;
        body.output
            .and_then(|output| output.choices.into_iter().next())
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                DigestError::Other(format!(
                    "generation returned no choices: {}",
                    body.message.unwrap_or_default()
                ))
            })
    }
}

impl Summarize for DashScope {
    async fn summarize(&self, project: &Project) -> String {
        match self.generate(&Self::prompt(project)).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, project = %project.name, "summary generation failed, using fallback");
                fallback_summary(project)
            }
        }
    }
}
