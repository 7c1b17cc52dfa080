//! Prompt templates for knowledge answers.

use crate::domain::foundation::DomainError;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a helpful customer support assistant.";

/// Default answer template with `{context}` and `{question}` placeholders.
pub const DEFAULT_TEMPLATE: &str = "You are a helpful customer support assistant. Use the following information to answer the customer's question.

{context}

Customer Question: {question}

Provide a helpful, concise response. If the information provided doesn't fully answer the question, acknowledge this and offer to escalate to a human agent.";

/// A validated prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl Default for PromptTemplate {
    fn default() -> Self {
        Self(DEFAULT_TEMPLATE.to_string())
    }
}

impl PromptTemplate {
    /// Creates a template; it must reference `{question}`.
    pub fn new(template: impl Into<String>) -> Result<Self, DomainError> {
        let template = template.into();
        if !template.contains("{question}") {
            return Err(DomainError::invalid_configuration(
                "prompt_template",
                "Prompt template must contain a {question} placeholder",
            ));
        }
        Ok(Self(template))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes context and question.
    pub fn render(&self, context: &str, question: &str) -> String {
        self.0.replace("{context}", context).replace("{question}", question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_placeholders() {
        let template = PromptTemplate::new("Q={question} C={context}").unwrap();
        assert_eq!(template.render("ctx", "why?"), "Q=why? C=ctx");
    }

    #[test]
    fn template_without_question_is_rejected() {
        assert!(PromptTemplate::new("Only {context}").is_err());
    }

    #[test]
    fn default_template_mentions_both_placeholders() {
        let rendered = PromptTemplate::default().render("Relevant information", "Where is it?");
        assert!(rendered.contains("Relevant information"));
        assert!(rendered.contains("Customer Question: Where is it?"));
    }
}
