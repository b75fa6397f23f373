//! Gemini API HTTP client

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::i18n::Language;
use crate::llm::ReplyGenerator;
use crate::session::{Message, Role};

use super::types::*;

/// How many trailing messages are sent as conversational context.
/// Keeps the token budget small on rural connections.
const HISTORY_WINDOW: usize = 6;

/// Returned when the model produced a candidate with no text
pub const REPLY_FALLBACK: &str = "Sorry, I could not generate a response.";

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a `generateContent` request
    pub async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        debug!("Sending request to Gemini API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Gemini API error: {} - {}", status, body);
            return Err(Error::Api(format!("{}: {}", status, body)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Api(format!("Failed to parse response: {} - {}", e, body)))?;

        Ok(parsed)
    }

    /// Analyze a crop photo. `base64_image` may be raw base64 or a data URL.
    ///
    /// Returns the raw model text; the caller parses it into a
    /// [`DiagnosticResult`](crate::diagnostic::DiagnosticResult).
    pub async fn analyze_crop_image(
        &self,
        base64_image: &str,
        language: Language,
    ) -> Result<String> {
        let clean_base64 = strip_data_url(base64_image);

        let image = InlineData::base64(InlineData::MIME_TYPE_JPEG, clean_base64);
        let request = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::user_with_image(image, diagnosis_prompt(language))],
        };

        let response = self.generate(request).await?;
        Ok(response.text().unwrap_or_else(|| "{}".to_string()))
    }
}

/// Build the chat request: the last [`HISTORY_WINDOW`] messages as context,
/// the persona system instruction with a language directive, and the raw
/// input text as the final user turn.
pub fn build_chat_request(
    history: &[Message],
    new_message: &str,
    language: Language,
) -> GenerateContentRequest {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut contents: Vec<Content> = history[start..]
        .iter()
        .map(|msg| match msg.role {
            Role::User => Content::user(&msg.text),
            _ => Content::model(&msg.text),
        })
        .collect();
    contents.push(Content::user(new_message));

    let language_instruction = format!(
        "IMPORTANT: Please respond in {}.",
        language.display_name()
    );
    let system = format!(
        "{}\n{}",
        crate::advisory::system_instruction(),
        language_instruction
    );

    GenerateContentRequest::new(system, contents)
}

/// Prompt for the crop-doctor vision call
fn diagnosis_prompt(language: Language) -> String {
    format!(
        "\
Analyze this crop image.
1. Identify the crop.
2. Detect any disease, pest, or deficiency. If healthy, say so.
3. Provide a treatment plan (medicines, dosage).
4. Suggest prevention methods.

Format the output as a JSON object with keys:
\"cropDetected\", \"disease\", \"severity\", \"treatment\" (array of strings), \"prevention\" (array of strings), \"confidence\" (number 0-100).

Translate the CONTENT of the values into {}.
Return ONLY valid JSON.",
        language.display_name()
    )
}

#[async_trait]
impl ReplyGenerator for GeminiClient {
    async fn generate_reply(
        &self,
        history: &[Message],
        new_message: &str,
        language: Language,
    ) -> Result<String> {
        let request = build_chat_request(history, new_message, language);
        let response = self.generate(request).await?;
        Ok(response.text().unwrap_or_else(|| REPLY_FALLBACK.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("question {}", i))
                } else {
                    Message::model(format!("answer {}", i))
                }
            })
            .collect()
    }

    #[test]
    fn test_chat_request_windows_history() {
        let history = history_of(10);
        let request = build_chat_request(&history, "latest", Language::English);

        // 6 context turns + the new user turn
        assert_eq!(request.contents.len(), HISTORY_WINDOW + 1);
        assert_eq!(request.contents[0].text(), "question 4");
        assert_eq!(request.contents.last().unwrap().text(), "latest");
        assert_eq!(
            request.contents.last().unwrap().role.as_deref(),
            Some("user")
        );
    }

    #[test]
    fn test_chat_request_short_history() {
        let history = history_of(2);
        let request = build_chat_request(&history, "next", Language::English);
        assert_eq!(request.contents.len(), 3);
    }

    #[test]
    fn test_chat_request_role_mapping() {
        let history = vec![Message::model("greeting"), Message::user("hi")];
        let request = build_chat_request(&history, "next", Language::English);
        assert_eq!(request.contents[0].role.as_deref(), Some("model"));
        assert_eq!(request.contents[1].role.as_deref(), Some("user"));
    }

    #[test]
    fn test_chat_request_language_directive() {
        let request = build_chat_request(&[], "hello", Language::Urdu);
        let system = request.system_instruction.unwrap().text();
        assert!(system.contains("Please respond in Urdu."));
        assert!(system.contains("Kissan Dost"));
    }

    #[test]
    fn test_diagnosis_prompt_mentions_keys_and_language() {
        let prompt = diagnosis_prompt(Language::Punjabi);
        assert!(prompt.contains("cropDetected"));
        assert!(prompt.contains("confidence"));
        assert!(prompt.contains("Punjabi"));
    }
}
