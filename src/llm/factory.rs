use anyhow::Result;

use super::client::{LlmClient, MockLlmClient};
use super::client_impl::{AnthropicClient, GeminiClient, OpenAIClient};
use crate::config::{LlmConfig, Provider};

/// Create a generative client from config. `dry_run` swaps in the mock.
pub fn create_client(llm_config: &LlmConfig, dry_run: bool) -> Result<Box<dyn LlmClient>> {
    if dry_run {
        return Ok(Box::new(MockLlmClient::new()));
    }

    let api_key = llm_config.get_api_key()?;
    let max_tokens = llm_config.get_max_tokens();
    let model = llm_config.model.clone();
    let timeout = llm_config.timeout_secs;

    let client: Box<dyn LlmClient> = match (llm_config.provider, llm_config.base_url.clone()) {
        (Provider::Gemini, Some(base_url)) => Box::new(GeminiClient::with_base_url(
            api_key, model, base_url, max_tokens, timeout,
        )?),
        (Provider::Gemini, None) => {
            Box::new(GeminiClient::new(api_key, model, max_tokens, timeout)?)
        }
        (Provider::Anthropic, Some(base_url)) => Box::new(AnthropicClient::with_base_url(
            api_key, model, base_url, max_tokens, timeout,
        )?),
        (Provider::Anthropic, None) => {
            Box::new(AnthropicClient::new(api_key, model, max_tokens, timeout)?)
        }
        (Provider::OpenAI, Some(base_url)) => Box::new(OpenAIClient::with_base_url(
            api_key, model, base_url, max_tokens, timeout,
        )?),
        (Provider::OpenAI, None) => {
            Box::new(OpenAIClient::new(api_key, model, max_tokens, timeout)?)
        }
        (Provider::OpenAICompatible, base_url) => Box::new(OpenAIClient::with_base_url(
            api_key,
            model,
            base_url.unwrap_or_else(|| "http://localhost:11434/v1".to_string()),
            max_tokens,
            timeout,
        )?),
    };
    Ok(client)
}
