use anyhow::{bail, Result};
use tracing::warn;

use super::client::{CompletionClient, MockCompletionClient};
use super::client_impl::{AzureOpenAiClient, OllamaClient, OpenAiCompatibleClient};
use crate::config::{Config, Provider};

/// Default chat-completion gateway when no base_url is configured.
const DEFAULT_OPENAI_COMPATIBLE_BASE_URL: &str = "https://router.huggingface.co/v1";
const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
const DEFAULT_AZURE_API_VERSION: &str = "2024-12-01-preview";

/// Create a completion client based on configuration.
///
/// Returns Ok(None) when the provider needs a credential and none is
/// resolvable from the environment — the pipeline then degrades to
/// fallback annotations instead of failing. Misconfiguration that a
/// credential cannot fix (azure without an endpoint or deployment) is a
/// hard error.
pub fn create_client(config: &Config, dry_run: bool) -> Result<Option<Box<dyn CompletionClient>>> {
    if dry_run {
        return Ok(Some(Box::new(MockCompletionClient::new())));
    }

    let llm = &config.llm;
    match llm.provider {
        Provider::OpenaiCompatible => {
            let Some(api_key) = config.resolve_api_key() else {
                warn!(
                    "No API credential configured ({:?}); all annotations will use the local fallback",
                    llm.api_key_env
                );
                return Ok(None);
            };
            let base_url = llm
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_COMPATIBLE_BASE_URL.to_string());
            Ok(Some(Box::new(OpenAiCompatibleClient::new(
                api_key,
                llm.model.clone(),
                base_url,
                llm.timeout_secs,
            )?)))
        }

        Provider::AzureOpenai => {
            let Some(endpoint) = llm.base_url.clone() else {
                bail!("azure-openai provider requires base_url (the Azure endpoint)");
            };
            let Some(deployment) = llm.deployment.clone() else {
                bail!("azure-openai provider requires a deployment name");
            };
            let Some(api_key) = config.resolve_api_key() else {
                warn!(
                    "No API credential configured ({:?}); all annotations will use the local fallback",
                    llm.api_key_env
                );
                return Ok(None);
            };
            let api_version = llm
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string());
            Ok(Some(Box::new(AzureOpenAiClient::new(
                api_key,
                endpoint,
                deployment,
                api_version,
                llm.timeout_secs,
            )?)))
        }

        // Local models need no credential.
        Provider::Ollama => {
            let endpoint = llm
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string());
            Ok(Some(Box::new(OllamaClient::new(
                endpoint,
                llm.model.clone(),
                llm.timeout_secs,
            )?)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_create_mock_client_for_dry_run() {
        let config = Config::default();
        let client = create_client(&config, true).unwrap();
        assert!(client.is_some());
    }

    #[test]
    #[serial]
    fn test_create_openai_compatible_client() {
        env::set_var("LEGACYLENS_TEST_FACTORY_KEY", "test_key");
        let mut config = Config::default();
        config.llm.api_key_env = Some("LEGACYLENS_TEST_FACTORY_KEY".to_string());
        let client = create_client(&config, false).unwrap();
        assert!(client.is_some());
        env::remove_var("LEGACYLENS_TEST_FACTORY_KEY");
    }

    #[test]
    fn test_missing_credential_degrades_to_none() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("LEGACYLENS_NONEXISTENT_FACTORY_KEY_99".to_string());
        let client = create_client(&config, false).unwrap();
        assert!(client.is_none());
    }

    #[test]
    fn test_ollama_needs_no_credential() {
        let mut config = Config::default();
        config.llm.provider = Provider::Ollama;
        config.llm.model = "llama3".to_string();
        config.llm.api_key_env = None;
        let client = create_client(&config, false).unwrap();
        assert!(client.is_some());
    }

    #[test]
    #[serial]
    fn test_azure_without_deployment_errors() {
        env::set_var("LEGACYLENS_TEST_AZURE_KEY", "test_key");
        let mut config = Config::default();
        config.llm.provider = Provider::AzureOpenai;
        config.llm.api_key_env = Some("LEGACYLENS_TEST_AZURE_KEY".to_string());
        config.llm.base_url = Some("https://example.openai.azure.com".to_string());
        config.llm.deployment = None;
        let result = create_client(&config, false);
        env::remove_var("LEGACYLENS_TEST_AZURE_KEY");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("deployment"));
    }

    #[test]
    fn test_azure_without_endpoint_errors() {
        let mut config = Config::default();
        config.llm.provider = Provider::AzureOpenai;
        config.llm.base_url = None;
        config.llm.deployment = Some("analysis".to_string());
        let result = create_client(&config, false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn test_azure_without_credential_degrades_to_none() {
        let mut config = Config::default();
        config.llm.provider = Provider::AzureOpenai;
        config.llm.api_key_env = Some("LEGACYLENS_NONEXISTENT_AZURE_KEY_99".to_string());
        config.llm.base_url = Some("https://example.openai.azure.com".to_string());
        config.llm.deployment = Some("analysis".to_string());
        let client = create_client(&config, false).unwrap();
        assert!(client.is_none());
    }
}
