//! Placeholder for integrations that are declared in the chain but not wired.

use async_trait::async_trait;
use secrecy::SecretString;

use super::{CredentialSlot, GenerationRequest, QuizProvider};
use crate::types::{QuizError, Result};

#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    name: String,
}

impl UnconfiguredProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl QuizProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "none"
    }

    fn credential(&self) -> Option<CredentialSlot> {
        None
    }

    async fn generate(
        &self,
        _request: &GenerationRequest,
        _credential: Option<&SecretString>,
    ) -> Result<String> {
        Err(QuizError::ProviderNotConfigured {
            provider: self.name.clone(),
        })
    }
}
