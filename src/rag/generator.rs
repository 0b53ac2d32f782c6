//! Answer generation from retrieved context.

use super::LanguageModel;
use crate::config::Prompts;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Builds the answer prompt and asks the language model.
#[derive(Clone)]
pub struct AnswerGenerator {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
    document_kind: String,
}

impl AnswerGenerator {
    /// Create a generator with the default prompt.
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
            document_kind: "resume".to_string(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set what the document is called in the prompt.
    pub fn with_document_kind(mut self, kind: &str) -> Self {
        self.document_kind = kind.to_string();
        self
    }

    /// Render the prompt for a question and its context.
    pub fn build_prompt(&self, query: &str, context: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), query.to_string());
        vars.insert("context".to_string(), context.to_string());
        vars.insert("document_kind".to_string(), self.document_kind.clone());

        self.prompts.render_with_custom(&self.prompts.answer.user, &vars)
    }

    /// Answer `query` from `context` in one round trip.
    #[instrument(skip(self, context), fields(question = %query, model = self.model.name()))]
    pub async fn generate(&self, query: &str, context: &str) -> Result<String> {
        info!("Generating answer");
        let prompt = self.build_prompt(query, context);
        debug!("Prompt is {} characters", prompt.len());

        let answer = self.model.complete(&prompt).await?;
        debug!("Answer is {} characters", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EkkoError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and replies with a fixed answer.
    struct CannedModel {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    struct DownModel;

    #[async_trait]
    impl LanguageModel for DownModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(EkkoError::ModelUnavailable("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_answer_returned_unchanged() {
        let model = Arc::new(CannedModel {
            reply: "I have 5 years of experience in backend systems.".to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let generator = AnswerGenerator::new(model.clone());

        let context = "Alice is a software engineer with 5 years of experience in backend systems.";
        let answer = generator
            .generate("What is your experience?", context)
            .await
            .unwrap();

        assert_eq!(answer, "I have 5 years of experience in backend systems.");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(context));
        assert!(prompts[0].contains("What is your experience?"));
        assert!(prompts[0].contains("first-person"));
    }

    #[test]
    fn test_document_kind_in_prompt() {
        let model = Arc::new(DownModel);
        let generator = AnswerGenerator::new(model).with_document_kind("biography");
        let prompt = generator.build_prompt("Where were you born?", "Born in Oslo.");
        assert!(prompt.contains("whose biography is given"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_custom_variables_fill_custom_template() {
        let mut prompts = Prompts::default();
        prompts.answer.user = "{{persona}}: {{question}} / {{context}}".to_string();
        prompts
            .variables
            .insert("persona".to_string(), "Candidate".to_string());

        let generator = AnswerGenerator::new(Arc::new(DownModel)).with_prompts(prompts);
        assert_eq!(generator.build_prompt("Why?", "Because."), "Candidate: Why? / Because.");
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let generator = AnswerGenerator::new(Arc::new(DownModel));
        let err = generator.generate("q", "c").await.unwrap_err();
        assert!(matches!(err, EkkoError::ModelUnavailable(_)));
    }
}
