/// Gemini text generation provider
///
/// One prompt in, one text blob out. The answer is returned untouched;
/// callers are responsible for repairing and parsing it.
use crate::{
    error::{AppError, AppResult},
    models::{GeminiRequest, GeminiResponse},
    services::providers::TextGenerator,
};
use reqwest::Client as HttpClient;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GeminiRequest::from_prompt(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let generated: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize Gemini response"
            );
            AppError::MalformedResponse(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = generated.text().ok_or_else(|| {
            AppError::MalformedResponse("Gemini response contained no candidates".to_string())
        })?;

        tracing::debug!(
            model = %self.model,
            response = %text,
            provider = "gemini",
            "Generation completed"
        );

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
