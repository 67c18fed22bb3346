use crate::error::{ShotlistError, ShotlistResult};
use crate::plan::ScenePlanRequest;
use crate::refs::ReferenceImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Text-generation seam: one structured call producing the raw scene-list JSON.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate_plan_text(&self, request: &ScenePlanRequest) -> ShotlistResult<String>;
}

/// Image-generation seam: one prompt plus the ordered reference images,
/// returning a single base64-encoded image.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn generate_image(
        &self,
        prompt: &str,
        refs: &[ReferenceImage],
    ) -> ShotlistResult<String>;
}

/// REST client for the Gemini `generateContent` endpoints, implementing both
/// model seams.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, text_model: &str, image_model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            text_model: text_model.into(),
            image_model: image_model.into(),
        }
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, String> {
        let url = format!("{API_BASE}/models/{model}:generateContent?key={}", self.api_key);
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?
            .error_for_status()
            .map_err(|e| format!("service returned an error: {e}"))?;
        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| format!("unreadable response: {e}"))
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate_plan_text(&self, request: &ScenePlanRequest) -> ShotlistResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part::text(request.prompt_text())],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: Some(request.response_schema()),
            }),
        };
        tracing::debug!(model = %self.text_model, scenes = request.target_scene_count, "requesting scene plan");
        let response = self
            .generate_content(&self.text_model, &body)
            .await
            .map_err(ShotlistError::Other)?;
        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ShotlistError::EmptyResponse),
        }
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn generate_image(
        &self,
        prompt: &str,
        refs: &[ReferenceImage],
    ) -> ShotlistResult<String> {
        // Reference images go first, in store order, then the scene prompt.
        let mut parts: Vec<Part> = refs.iter().map(Part::inline_image).collect();
        parts.push(Part::text(prompt.to_string()));

        let body = GenerateRequest {
            contents: vec![Content { role: "user", parts }],
            generation_config: None,
        };
        tracing::debug!(model = %self.image_model, refs = refs.len(), "requesting preview image");
        let response = self
            .generate_content(&self.image_model, &body)
            .await
            .map_err(ShotlistError::ImageService)?;
        response
            .first_inline_data()
            .ok_or_else(|| ShotlistError::ImageService("no image in response".into()))
    }
}

// Wire structs for `models/{model}:generateContent`.

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline_image(image: &ReferenceImage) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any.
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut text = String::new();
        for part in &content.parts {
            if let Some(t) = &part.text {
                text.push_str(t);
            }
        }
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Base64 payload of the first inline-data part, if any.
    fn first_inline_data(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref().map(|d| d.data.clone()))
    }
}
