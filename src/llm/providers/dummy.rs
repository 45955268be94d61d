//! Dummy LLM provider — echoes input back prefixed with `[echo]`.
//! Used for testing the full request round-trip without a real endpoint.

use crate::llm::ProviderError;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, content: &str) -> Result<String, ProviderError> {
        Ok(format!("[echo] {content}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_prefixes_echo() {
        let p = DummyProvider;
        assert_eq!(p.complete("hello").await.unwrap(), "[echo] hello");
    }
}
