use std::fs;

use reqwest::Client;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    info,
    warn,
};

use super::parse_vocabulary;
use crate::{
    core::{
        http::{
            ensure_success,
            http_client,
        },
        FlicktionaryError,
        VocabularyItem,
    },
    settings::Settings,
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_PROMPT: &str = "You are an expert linguist. Below is the full subtitle transcript of a film or episode. \
Identify every word, idiom, phrasal verb and cultural reference that a proficient (C1) non-native English \
speaker whose native language is Turkish would likely not understand. Answer with a JSON array only, no prose. \
Each element must have exactly these string fields: \"term\", \"beginTimestamp\" and \"endTimestamp\" (the SRT \
timestamps, HH:MM:SS,mmm, of the cue where the term first appears), \"englishMeaning\", \"turkishMeaning\", \
\"sampleSentenceInEnglish\" and \"sampleSentenceInTurkish\".";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    prompt: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, prompt: String) -> Result<Self, FlicktionaryError> {
        Ok(Self { client: http_client()?, api_key, model, prompt })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FlicktionaryError> {
        let api_key = settings.api_key().ok_or(FlicktionaryError::MissingApiKey)?;
        Self::new(api_key, settings.gemini_model.clone(), load_prompt(settings))
    }

    pub fn build_prompt(&self, subtitles: &str) -> String {
        format!("{}\n\n{}", self.prompt, subtitles)
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }

    pub async fn generate(&self, subtitles: &str) -> Result<Vec<VocabularyItem>, FlicktionaryError> {
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![RequestPart { text: self.build_prompt(subtitles) }] }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        info!(model = %self.model, "[Gemini] Requesting vocabulary");

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let body: GenerateResponse = resp.json().await?;

        let words = parse_vocabulary(&response_text(body)?)?;
        info!(words = words.len(), "[Gemini] Vocabulary generated");
        Ok(words)
    }
}

fn load_prompt(settings: &Settings) -> String {
    let Some(path) = &settings.prompt_path else {
        return DEFAULT_PROMPT.to_string();
    };

    match fs::read_to_string(path) {
        Ok(prompt) if !prompt.trim().is_empty() => prompt.trim().to_string(),
        Ok(_) => DEFAULT_PROMPT.to_string(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "[Gemini] Prompt file unreadable, using built-in prompt");
            DEFAULT_PROMPT.to_string()
        }
    }
}

fn response_text(body: GenerateResponse) -> Result<String, FlicktionaryError> {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(FlicktionaryError::Generation("Empty response from model".to_string()));
    }
    Ok(text)
}
