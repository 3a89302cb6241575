//! Streaming client for DeepSeek-compatible chat-completion endpoints.
//!
//! The request asks for a streamed response; each `data:` line carries one
//! delta chunk and the terminal line is `[DONE]`. Tokens are echoed to
//! stdout as they arrive so long generations stay visible, and the full
//! reply is accumulated for the caller.

use std::env;
use std::io::{BufRead, BufReader, Read, Write};

use serde::Deserialize;
use serde_json::json;

use super::{ChatModel, TransportError};
use crate::config::RunConfig;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

pub struct DeepSeekClient {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    echo: bool,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

impl DeepSeekClient {
    /// Build a client from config values, reading the credential from the
    /// environment. Fails fast when the credential is missing so the run
    /// aborts before any stage executes.
    pub fn from_env(config: &RunConfig) -> Result<Self, TransportError> {
        let api_key =
            env::var(API_KEY_ENV).map_err(|_| TransportError::MissingCredential(API_KEY_ENV))?;
        Ok(Self {
            api_key,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            echo: true,
        })
    }
}

impl ChatModel for DeepSeekClient {
    fn complete(&self, prompt: &str) -> Result<String, TransportError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": true,
        });
        let mut response = ureq::post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send_json(&body)?;
        decode_stream(response.body_mut().as_reader(), self.echo)
    }
}

/// Accumulate the delta contents of an SSE chat stream.
fn decode_stream(reader: impl Read, echo: bool) -> Result<String, TransportError> {
    let mut reply = String::new();
    let mut stdout = std::io::stdout();
    for line in BufReader::new(reader).lines() {
        let line = line.map_err(|err| TransportError::Malformed(err.to_string()))?;
        let Some(payload) = line.strip_prefix("data: ") else {
            continue;
        };
        if payload.trim() == "[DONE]" {
            break;
        }
        let chunk: StreamChunk = match serde_json::from_str(payload) {
            Ok(chunk) => chunk,
            Err(err) => {
                // One bad line should not sink the whole call.
                tracing::warn!(%err, "skipping unparseable stream line");
                continue;
            }
        };
        if let Some(content) = chunk
            .choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
        {
            if echo {
                print!("{content}");
                let _ = stdout.flush();
            }
            reply.push_str(content);
        }
    }
    if echo {
        println!();
    }
    Ok(reply)
}
