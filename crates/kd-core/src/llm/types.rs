//! Gemini API wire types

use serde::{Deserialize, Serialize};

/// `generateContent` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn new(system_instruction: impl Into<String>, contents: Vec<Content>) -> Self {
        Self {
            system_instruction: Some(Content::system(system_instruction)),
            contents,
        }
    }
}

/// One conversational turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn with text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a model turn with text
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// System instructions carry no role
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a user turn with an image followed by text
    pub fn user_with_image(image: InlineData, text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::inline(image), Part::text(text)],
        }
    }

    /// Concatenated text of all parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Content block in a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(data: InlineData) -> Self {
        Self {
            text: None,
            inline_data: Some(data),
        }
    }
}

/// Inline image payload for multimodal input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub const MIME_TYPE_JPEG: &'static str = "image/jpeg";
    pub const MIME_TYPE_PNG: &'static str = "image/png";

    /// Create from already base64-encoded data
    pub fn base64(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Create from raw bytes (encodes to base64)
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, bytes),
        }
    }

    /// Decode base64 data to bytes
    pub fn decode(&self) -> Option<Vec<u8>> {
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &self.data).ok()
    }
}

/// Strip a `data:image/...;base64,` prefix if present, leaving raw base64
pub fn strip_data_url(data: &str) -> &str {
    if !data.starts_with("data:") {
        return data;
    }
    match data.find(',') {
        Some(comma_pos) => &data[comma_pos + 1..],
        None => data,
    }
}

/// `generateContent` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "finishReason")]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, if any
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text = content.text();
        if text.is_empty() { None } else { Some(text) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request =
            GenerateContentRequest::new("You are a helper.", vec![Content::user("hello")]);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"parts\""));
        // the system turn carries no role
        assert!(!json.contains("\"role\":null"));
    }

    #[test]
    fn test_inline_data_serializes_mime_type() {
        let content = Content::user_with_image(
            InlineData::base64(InlineData::MIME_TYPE_JPEG, "dGVzdA=="),
            "what is this?",
        );
        let json = serde_json::to_string(&content).unwrap();
        assert!(json.contains("\"inlineData\""));
        assert!(json.contains("\"mimeType\":\"image/jpeg\""));
    }

    #[test]
    fn test_inline_data_round_trip() {
        let original = b"crop photo bytes";
        let data = InlineData::from_bytes(InlineData::MIME_TYPE_PNG, original);
        assert_eq!(data.decode().unwrap().as_slice(), original);
    }

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/png;base64,dGVzdA=="), "dGVzdA==");
        assert_eq!(strip_data_url("dGVzdA=="), "dGVzdA==");
        assert_eq!(strip_data_url("data:no-comma"), "data:no-comma");
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{"text": "Use "}, {"text": "urea."}]
                    },
                    "finishReason": "STOP"
                }
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().unwrap(), "Use urea.");
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }
}
