use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{SpeechSynthesizer, VoiceParams};

#[derive(Clone)]
pub struct HttpSpeechService {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice: &'a str,
    rate: f32,
}

#[derive(Deserialize)]
struct SynthesizeResponse {
    handle: String,
}

impl HttpSpeechService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechService {
    async fn synthesize(&self, text: &str, params: &VoiceParams) -> Result<String> {
        let request = SynthesizeRequest { text, voice: &params.voice, rate: params.rate };

        let response = self
            .client
            .post(format!("{}/synthesize", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("TTS server error: {}", response.status()));
        }

        let body: SynthesizeResponse = response.json().await?;
        Ok(body.handle)
    }
}
