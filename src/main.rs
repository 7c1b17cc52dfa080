//! Demo entry point: routes each command-line message through the router
//! over an in-memory knowledge base and prints the outcome as JSON.

use std::sync::Arc;

use serde_json::json;

use support_router::adapters::ai::{HashingEmbedder, OllamaClient};
use support_router::adapters::memory::{
    InMemoryConversationRepository, InMemoryExperimentRepository, InMemoryKnowledgeRepository,
    InMemoryVectorIndex,
};
use support_router::adapters::resilience::{GuardedGenerator, InMemoryCircuitBreaker};
use support_router::application::handlers::knowledge::{IndexArticleCommand, IndexArticleHandler};
use support_router::application::handlers::routing::{
    OrchestrateResponseCommand, OrchestrateResponseHandler,
};
use support_router::application::services::{
    IntentClassifier, IntentExampleCache, KnowledgeIndex, KnowledgeRetriever, ResponseComposer,
    SimilarityEngine,
};
use support_router::config::AppConfig;
use support_router::domain::foundation::CustomerId;
use support_router::domain::routing::{PromptTemplate, DEFAULT_EXAMPLES};
use support_router::ports::{CircuitBreakerConfig, EmbeddingProvider, TextGenerator};
use support_router::telemetry::init_tracing;

const DEMO_MESSAGES: [&str; 4] = [
    "What's your return policy?",
    "Where is my order?",
    "I want to speak to a human agent",
    "The app shows an error when I log in",
];

const SEED_ARTICLES: [(&str, &str, &str, &[&str]); 4] = [
    (
        "Return Policy",
        "Items can be returned within 30 days of purchase for a full refund. Items must be unused and in original packaging.",
        "returns",
        &["return", "refund", "policy"],
    ),
    (
        "Shipping Times",
        "Standard shipping takes 3-5 business days. Express shipping takes 1-2 business days.",
        "shipping",
        &["shipping", "delivery"],
    ),
    (
        "Order Tracking",
        "Track your order with the tracking link in your confirmation email or on the orders page.",
        "orders",
        &["order", "track"],
    ),
    (
        "Login Problems",
        "If you cannot log in, reset your password with the forgot password link and clear your browser cache.",
        "technical",
        &["login", "password", "error"],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    let (embedder, composer): (Arc<dyn EmbeddingProvider>, ResponseComposer) = if config.ai.enabled {
        let client = Arc::new(OllamaClient::new(config.ai.ollama())?);
        let breaker = Arc::new(InMemoryCircuitBreaker::new(CircuitBreakerConfig::for_ai_provider()));
        let generator: Arc<dyn TextGenerator> = Arc::new(GuardedGenerator::new(client.clone(), breaker));
        let composer = ResponseComposer::new(
            vec![generator],
            config.ai.generation_timeout(),
            config.retrieval.snippet_chars,
        );
        let embedder: Arc<dyn EmbeddingProvider> = client;
        (embedder, composer)
    } else {
        tracing::info!("Model backend disabled, using offline embeddings and rule-based answers");
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::default());
        (embedder, ResponseComposer::rules_only(config.retrieval.snippet_chars))
    };

    let articles = Arc::new(InMemoryKnowledgeRepository::new());
    let index = Arc::new(InMemoryVectorIndex::new());
    let engine = Arc::new(SimilarityEngine::new(
        embedder,
        Arc::new(IntentExampleCache::new(DEFAULT_EXAMPLES.clone())),
        config.ai.embedding_timeout(),
    ));

    let indexer = IndexArticleHandler::new(
        articles.clone(),
        Arc::new(KnowledgeIndex::new(articles.clone(), index.clone(), engine.clone())),
    );
    for (title, body, category, tags) in SEED_ARTICLES {
        let cmd = IndexArticleCommand::create(
            title,
            body,
            category,
            tags.iter().map(|t| t.to_string()).collect(),
        );
        indexer.handle(cmd).await?;
    }

    let orchestrator = OrchestrateResponseHandler::new(
        Arc::new(InMemoryConversationRepository::new()),
        Arc::new(InMemoryExperimentRepository::new()),
        Arc::new(IntentClassifier::new(engine.clone())),
        Arc::new(KnowledgeRetriever::new(
            articles,
            index,
            engine,
            config.retrieval.settings(),
        )),
        Arc::new(composer),
        config.engine.escalation_policy(),
        config.engine.thresholds,
        PromptTemplate::default(),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let messages: Vec<String> = if args.is_empty() {
        DEMO_MESSAGES.iter().map(|m| m.to_string()).collect()
    } else {
        args
    };

    let customer = CustomerId::new("demo-customer")?;
    for message in messages {
        let result = orchestrator
            .handle(OrchestrateResponseCommand::new(customer.clone(), message.as_str()))
            .await?;
        let outcome = json!({
            "message": message,
            "intent": result.classification.intent,
            "intent_confidence": result.classification.confidence,
            "state": result.state,
            "confidence": result.confidence(),
            "should_auto_send": result.should_auto_send,
            "response": result.response.content(),
            "escalated": result.conversation.is_escalated(),
        });
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    Ok(())
}
