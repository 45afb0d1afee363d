//! Google translation backends.

use super::{TranslationError, Translator};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const GTX_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const CLOUD_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";
const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

fn http_client() -> Result<Client, TranslationError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// The keyless public endpoint used by the `googletrans` provider.
pub struct GoogleTransTranslator {
    client: Client,
}

impl GoogleTransTranslator {
    pub fn new() -> Result<Self, TranslationError> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl Translator for GoogleTransTranslator {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        let body: Value = self
            .client
            .get(GTX_ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", from),
                ("tl", to),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        parse_gtx_response(&body)
    }
}

/// Concatenate the translated segments of a `translate_a/single` response.
fn parse_gtx_response(body: &Value) -> Result<String, TranslationError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::InvalidResponse("missing segment list".into()))?;
    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    if translated.is_empty() {
        return Err(TranslationError::InvalidResponse(
            "no translated segments".into(),
        ));
    }
    Ok(translated)
}

/// Cloud Translation v2, authenticated with an API key from the environment.
pub struct GCloudTranslator {
    client: Client,
    api_key: String,
}

#[derive(Serialize)]
struct CloudRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Deserialize)]
struct CloudResponse {
    data: CloudData,
}

#[derive(Deserialize)]
struct CloudData {
    translations: Vec<CloudTranslation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloudTranslation {
    translated_text: String,
}

impl GCloudTranslator {
    pub fn from_env() -> Result<Self, TranslationError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| TranslationError::Unavailable {
                provider: "gcloud".to_string(),
                reason: format!("{API_KEY_ENV} is not set"),
            })?;
        Ok(Self {
            client: http_client()?,
            api_key,
        })
    }
}

impl Translator for GCloudTranslator {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        let response: CloudResponse = self
            .client
            .post(CLOUD_ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&CloudRequest {
                q: text,
                source: from,
                target: to,
                format: "text",
            })
            .send()?
            .error_for_status()?
            .json()?;
        response
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| TranslationError::InvalidResponse("empty translation list".into()))
    }
}
