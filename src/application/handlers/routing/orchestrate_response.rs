//! OrchestrateResponseHandler - routes one inbound customer message.
//!
//! Classify, decide escalate vs. answer, compose, persist. Model backends
//! are never allowed to fail the request: classification, retrieval and
//! composition all degrade to their fallbacks. Only storage errors surface.

use std::sync::Arc;

use thiserror::Error;

use crate::application::services::{IntentClassifier, KnowledgeRetriever, ResponseComposer};
use crate::domain::foundation::{Confidence, ConversationId, CustomerId, DomainError, ErrorCode};
use crate::domain::routing::{
    Decision, DecisionState, DecisionThresholds, EscalationPolicy, IntentClassification,
    PromptTemplate,
};
use crate::domain::support::{AgentType, Conversation, Message, ResponseMeta, VariantAssignment};
use crate::ports::{ConversationRepository, ExperimentRepository};

/// Command to route a customer message.
#[derive(Debug, Clone)]
pub struct OrchestrateResponseCommand {
    /// Existing conversation; a new one is started when absent.
    pub conversation_id: Option<ConversationId>,
    pub customer_id: CustomerId,
    pub content: String,
}

impl OrchestrateResponseCommand {
    pub fn new(customer_id: CustomerId, content: impl Into<String>) -> Self {
        Self {
            conversation_id: None,
            customer_id,
            content: content.into(),
        }
    }

    pub fn in_conversation(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }
}

/// Everything produced for one inbound message.
#[derive(Debug, Clone)]
pub struct OrchestrateResponseResult {
    pub conversation: Conversation,
    pub customer_message: Message,
    pub response: Message,
    /// Internal note for the human agent; present on escalation.
    pub agent_note: Option<Message>,
    pub classification: IntentClassification,
    pub decision: Decision,
    pub state: DecisionState,
    pub should_auto_send: bool,
    /// Variant whose configuration was applied.
    pub variant: Option<VariantAssignment>,
}

impl OrchestrateResponseResult {
    pub fn confidence(&self) -> Confidence {
        self.decision.confidence()
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrchestrateResponseError {
    #[error("Validation error: message content cannot be empty")]
    EmptyContent,

    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Conversation is resolved: {0}")]
    ConversationArchived(ConversationId),

    #[error("Storage error: {0}")]
    Storage(DomainError),
}

impl From<DomainError> for OrchestrateResponseError {
    fn from(err: DomainError) -> Self {
        OrchestrateResponseError::Storage(err)
    }
}

/// Routing configuration in force for one message.
struct EffectiveConfig {
    thresholds: DecisionThresholds,
    template: PromptTemplate,
    variant: Option<VariantAssignment>,
}

pub struct OrchestrateResponseHandler {
    conversations: Arc<dyn ConversationRepository>,
    experiments: Arc<dyn ExperimentRepository>,
    classifier: Arc<IntentClassifier>,
    retriever: Arc<KnowledgeRetriever>,
    composer: Arc<ResponseComposer>,
    policy: EscalationPolicy,
    thresholds: DecisionThresholds,
    template: PromptTemplate,
}

impl OrchestrateResponseHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        experiments: Arc<dyn ExperimentRepository>,
        classifier: Arc<IntentClassifier>,
        retriever: Arc<KnowledgeRetriever>,
        composer: Arc<ResponseComposer>,
        policy: EscalationPolicy,
        thresholds: DecisionThresholds,
        template: PromptTemplate,
    ) -> Self {
        Self {
            conversations,
            experiments,
            classifier,
            retriever,
            composer,
            policy,
            thresholds,
            template,
        }
    }

    pub async fn handle(
        &self,
        cmd: OrchestrateResponseCommand,
    ) -> Result<OrchestrateResponseResult, OrchestrateResponseError> {
        let content = cmd.content.trim();
        if content.is_empty() {
            return Err(OrchestrateResponseError::EmptyContent);
        }

        // 1. Load or start the conversation and store the inbound message
        let mut conversation = self.load_conversation(&cmd).await?;
        let conversation_id = *conversation.id();
        let customer_message = Message::customer(conversation_id, content)?;
        self.conversations.add_message(&customer_message).await?;

        let config = self.effective_config(&conversation).await?;

        // 2. Classify
        let classification = self.classifier.classify(content).await;

        // 3. Decide and compose
        let (decision, response, agent_note) =
            match self.policy.evaluate(&classification, content, &config.thresholds) {
                Some(reason) => {
                    conversation.escalate()?;
                    self.conversations.update(&conversation).await?;

                    let response = Message::response(
                        conversation_id,
                        reason.customer_message(),
                        ResponseMeta {
                            reply_to: *customer_message.id(),
                            confidence: Confidence::CERTAIN,
                            intent: classification.intent,
                            agent_type: AgentType::Escalation,
                            articles: Vec::new(),
                            auto_sent: true,
                        },
                    )?;
                    let note = Message::agent_note(conversation_id, reason.agent_note(), AgentType::Escalation)?;
                    tracing::info!(
                        conversation_id = %conversation_id,
                        reason = %reason,
                        "Conversation escalated"
                    );
                    (Decision::Escalation { reason }, response, Some(note))
                }
                None => {
                    let retrieval = self
                        .retriever
                        .retrieve(content, self.retriever.settings().top_k, &config.thresholds.bands)
                        .await?;
                    let (text, source) = self
                        .composer
                        .compose(content, &retrieval, &config.template, conversation_id)
                        .await;
                    let auto_sent = config.thresholds.should_auto_send(retrieval.confidence);

                    let response = Message::response(
                        conversation_id,
                        text,
                        ResponseMeta {
                            reply_to: *customer_message.id(),
                            confidence: retrieval.confidence,
                            intent: classification.intent,
                            agent_type: AgentType::Knowledge,
                            articles: retrieval.article_ids(),
                            auto_sent,
                        },
                    )?;
                    (Decision::KnowledgeAnswer { retrieval, source }, response, None)
                }
            };

        // 4. Persist the response
        self.conversations.add_message(&response).await?;
        if let Some(note) = &agent_note {
            self.conversations.add_message(note).await?;
        }

        let state = decision.state(&config.thresholds);
        let should_auto_send = decision.should_auto_send(&config.thresholds);
        tracing::debug!(
            conversation_id = %conversation_id,
            intent = %classification.intent,
            confidence = %decision.confidence(),
            state = ?state,
            "Message routed"
        );

        Ok(OrchestrateResponseResult {
            conversation,
            customer_message,
            response,
            agent_note,
            classification,
            decision,
            state,
            should_auto_send,
            variant: config.variant,
        })
    }

    async fn load_conversation(
        &self,
        cmd: &OrchestrateResponseCommand,
    ) -> Result<Conversation, OrchestrateResponseError> {
        match cmd.conversation_id {
            Some(id) => {
                let conversation = self
                    .conversations
                    .find_by_id(&id)
                    .await?
                    .ok_or(OrchestrateResponseError::ConversationNotFound(id))?;
                if conversation.is_archived() {
                    return Err(OrchestrateResponseError::ConversationArchived(id));
                }
                Ok(conversation)
            }
            None => {
                let conversation = Conversation::start(cmd.customer_id.clone());
                self.conversations.save(&conversation).await?;
                tracing::debug!(conversation_id = %conversation.id(), "Conversation started");
                Ok(conversation)
            }
        }
    }

    /// Variant configuration when the conversation belongs to a running
    /// experiment, the handler defaults otherwise.
    async fn effective_config(&self, conversation: &Conversation) -> Result<EffectiveConfig, DomainError> {
        let defaults = EffectiveConfig {
            thresholds: self.thresholds,
            template: self.template.clone(),
            variant: None,
        };
        let Some(assignment) = conversation.assignment().copied() else {
            return Ok(defaults);
        };

        let running = self
            .experiments
            .find_experiment(&assignment.experiment_id)
            .await?
            .map_or(false, |e| e.is_running());
        if !running {
            return Ok(defaults);
        }

        let Some(variant) = self.experiments.find_variant(&assignment.variant_id).await? else {
            tracing::warn!(variant_id = %assignment.variant_id, "Assigned variant missing, using defaults");
            return Ok(defaults);
        };
        let template = match variant.prompt() {
            Ok(template) => template,
            Err(err) => {
                tracing::warn!(variant_id = %variant.id, error = %err, "Invalid variant prompt, using default");
                self.template.clone()
            }
        };

        Ok(EffectiveConfig {
            thresholds: variant.thresholds,
            template,
            variant: Some(assignment),
        })
    }
}

/// Maps handler errors to coded domain errors for callers that only speak
/// `DomainError`.
impl From<OrchestrateResponseError> for DomainError {
    fn from(err: OrchestrateResponseError) -> Self {
        match err {
            OrchestrateResponseError::EmptyContent => {
                DomainError::validation("content", "Message content cannot be empty")
            }
            OrchestrateResponseError::ConversationNotFound(id) => {
                DomainError::new(ErrorCode::ConversationNotFound, "Conversation not found")
                    .with_detail("conversation_id", id.to_string())
            }
            OrchestrateResponseError::ConversationArchived(id) => {
                DomainError::new(ErrorCode::ConversationArchived, "Conversation is resolved")
                    .with_detail("conversation_id", id.to_string())
            }
            OrchestrateResponseError::Storage(err) => err,
        }
    }
}
