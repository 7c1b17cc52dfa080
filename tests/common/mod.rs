//! Shared wiring for the integration tests: every handler over in-memory
//! adapters with a scriptable embedding backend.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use support_router::adapters::ai::ScriptedGenerator;
use support_router::adapters::memory::{
    InMemoryAgentActivityRepository, InMemoryConversationRepository, InMemoryEvaluationRepository,
    InMemoryExperimentRepository, InMemoryFeedbackRepository, InMemoryKnowledgeRepository,
    InMemoryVectorIndex,
};
use support_router::application::handlers::evaluation::{
    ComputeEvaluationMetricsHandler, DailyMetricsHandler, ProductMetricsHandler,
};
use support_router::application::handlers::experiments::{
    AssignVariantHandler, CompareVariantsHandler, ConcludeExperimentHandler,
    CreateExperimentHandler, RegisterVariantHandler, StartExperimentHandler,
};
use support_router::application::handlers::feedback::{
    ExportTrainingDataHandler, ProcessRetrainingHandler, SubmitFeedbackHandler,
};
use support_router::application::handlers::knowledge::{
    IndexArticleCommand, IndexArticleHandler, RemoveArticleHandler,
};
use support_router::application::handlers::review::{
    AgentPerformanceHandler, ExportConversationHandler, RecordAgentActionHandler,
    RecordCorrectionHandler,
};
use support_router::application::handlers::routing::{
    ClassifyIntentHandler, OrchestrateResponseHandler, RetrieveKnowledgeHandler,
};
use support_router::application::services::{
    FeedbackConverter, IntentClassifier, IntentExampleCache, KnowledgeIndex, KnowledgeRetriever,
    ResponseComposer, ResponseEvaluator, RetrievalSettings, SimilarityEngine,
};
use support_router::domain::foundation::CustomerId;
use support_router::domain::routing::{
    DecisionThresholds, EscalationPolicy, PromptTemplate, DEFAULT_EXAMPLES,
};
use support_router::domain::support::KnowledgeArticle;
use support_router::ports::EmbeddingProvider;

pub const RETURN_POLICY_BODY: &str =
    "Items bought in store or online: you can return your purchase within 30 days.";

pub struct Router {
    pub conversations: Arc<InMemoryConversationRepository>,
    pub articles: Arc<InMemoryKnowledgeRepository>,
    pub index: Arc<InMemoryVectorIndex>,
    pub feedback: Arc<InMemoryFeedbackRepository>,
    pub evaluations: Arc<InMemoryEvaluationRepository>,
    pub experiments: Arc<InMemoryExperimentRepository>,
    pub activity: Arc<InMemoryAgentActivityRepository>,
    pub examples: Arc<IntentExampleCache>,

    pub classify: ClassifyIntentHandler,
    pub retrieve: RetrieveKnowledgeHandler,
    pub orchestrate: OrchestrateResponseHandler,
    pub index_article: IndexArticleHandler,
    pub remove_article: RemoveArticleHandler,
    pub submit_feedback: SubmitFeedbackHandler,
    pub retrain: Arc<ProcessRetrainingHandler>,
    pub export_training: ExportTrainingDataHandler,
    pub metrics: ComputeEvaluationMetricsHandler,
    pub product_metrics: ProductMetricsHandler,
    pub daily_metrics: DailyMetricsHandler,
    pub register_variant: RegisterVariantHandler,
    pub create_experiment: CreateExperimentHandler,
    pub start_experiment: StartExperimentHandler,
    pub conclude_experiment: ConcludeExperimentHandler,
    pub assign_variant: AssignVariantHandler,
    pub compare_variants: CompareVariantsHandler,
    pub record_action: RecordAgentActionHandler,
    pub record_correction: RecordCorrectionHandler,
    pub performance: AgentPerformanceHandler,
    pub export_conversation: ExportConversationHandler,
}

impl Router {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, generator: ScriptedGenerator) -> Self {
        let conversations = Arc::new(InMemoryConversationRepository::new());
        let articles = Arc::new(InMemoryKnowledgeRepository::new());
        let index = Arc::new(InMemoryVectorIndex::new());
        let feedback = Arc::new(InMemoryFeedbackRepository::new());
        let evaluations = Arc::new(InMemoryEvaluationRepository::new());
        let experiments = Arc::new(InMemoryExperimentRepository::new());
        let activity = Arc::new(InMemoryAgentActivityRepository::new());
        let examples = Arc::new(IntentExampleCache::new(DEFAULT_EXAMPLES.clone()));

        let thresholds = DecisionThresholds::default();
        let engine = Arc::new(SimilarityEngine::new(
            embedder,
            examples.clone(),
            Duration::from_secs(1),
        ));
        let classifier = Arc::new(IntentClassifier::new(engine.clone()));
        let retriever = Arc::new(KnowledgeRetriever::new(
            articles.clone(),
            index.clone(),
            engine.clone(),
            RetrievalSettings::default(),
        ));
        let knowledge = Arc::new(KnowledgeIndex::new(articles.clone(), index.clone(), engine.clone()));
        let converter = Arc::new(FeedbackConverter::new(conversations.clone(), feedback.clone()));
        let evaluator = Arc::new(ResponseEvaluator::new(engine));

        Self {
            classify: ClassifyIntentHandler::new(classifier.clone()),
            retrieve: RetrieveKnowledgeHandler::new(retriever.clone(), thresholds.bands),
            orchestrate: OrchestrateResponseHandler::new(
                conversations.clone(),
                experiments.clone(),
                classifier,
                retriever,
                Arc::new(ResponseComposer::new(
                    vec![Arc::new(generator)],
                    Duration::from_secs(1),
                    200,
                )),
                EscalationPolicy::default(),
                thresholds,
                PromptTemplate::default(),
            ),
            index_article: IndexArticleHandler::new(articles.clone(), knowledge.clone()),
            remove_article: RemoveArticleHandler::new(knowledge.clone()),
            submit_feedback: SubmitFeedbackHandler::new(
                conversations.clone(),
                feedback.clone(),
                evaluations.clone(),
                converter.clone(),
                evaluator.clone(),
            ),
            retrain: Arc::new(ProcessRetrainingHandler::new(
                feedback.clone(),
                articles.clone(),
                knowledge,
                examples.clone(),
                converter,
            )),
            export_training: ExportTrainingDataHandler::new(feedback.clone()),
            metrics: ComputeEvaluationMetricsHandler::new(
                conversations.clone(),
                feedback.clone(),
                evaluations.clone(),
                evaluator,
            ),
            product_metrics: ProductMetricsHandler::new(conversations.clone(), feedback.clone()),
            daily_metrics: DailyMetricsHandler::new(conversations.clone(), feedback.clone()),
            register_variant: RegisterVariantHandler::new(experiments.clone()),
            create_experiment: CreateExperimentHandler::new(experiments.clone()),
            start_experiment: StartExperimentHandler::new(experiments.clone()),
            conclude_experiment: ConcludeExperimentHandler::new(experiments.clone()),
            assign_variant: AssignVariantHandler::new(conversations.clone(), experiments.clone()),
            compare_variants: CompareVariantsHandler::new(conversations.clone(), experiments.clone()),
            record_action: RecordAgentActionHandler::new(conversations.clone(), activity.clone()),
            record_correction: RecordCorrectionHandler::new(conversations.clone(), activity.clone()),
            performance: AgentPerformanceHandler::new(activity.clone()),
            export_conversation: ExportConversationHandler::new(conversations.clone(), activity.clone()),
            conversations,
            articles,
            index,
            feedback,
            evaluations,
            experiments,
            activity,
            examples,
        }
    }

    /// Indexes the return policy article and returns it.
    pub async fn with_return_policy(&self) -> KnowledgeArticle {
        self.index_article
            .handle(IndexArticleCommand::create(
                "Return Policy",
                RETURN_POLICY_BODY,
                "returns",
                vec!["policy".into()],
            ))
            .await
            .unwrap()
            .article
    }
}

pub fn customer() -> CustomerId {
    CustomerId::new("customer-7").unwrap()
}
