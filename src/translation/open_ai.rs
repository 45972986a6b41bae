use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::config::ProviderConfig;
use crate::error::CookscaleError;
use crate::llm::ChatClient;
use crate::translation::{build_translation_prompt, Translator};

pub struct OpenAiTranslator {
    client: ChatClient,
}

impl OpenAiTranslator {
    /// Create a new translator from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, CookscaleError> {
        Ok(OpenAiTranslator {
            client: ChatClient::new(config, timeout)?,
        })
    }

    pub fn with_client(client: ChatClient) -> Self {
        OpenAiTranslator { client }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    fn translator_name(&self) -> &str {
        "openai"
    }

    async fn translate_batch(
        &self,
        sentences: &[String],
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, CookscaleError> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Translating {} sentences from {} to {} with {}",
            sentences.len(),
            source,
            target,
            self.client.model()
        );
        let content = self
            .client
            .complete(
                &build_translation_prompt(source, target),
                &serde_json::to_string(sentences)?,
            )
            .await?;

        let translated: Vec<String> = serde_json::from_str(&content)?;
        debug!("Received {} translated sentences", translated.len());
        if translated.len() != sentences.len() {
            return Err(CookscaleError::Translation(format!(
                "sent {} sentences but received {}",
                sentences.len(),
                translated.len()
            )));
        }
        Ok(translated)
    }
}
