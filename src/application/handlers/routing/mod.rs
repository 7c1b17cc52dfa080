//! Routing handlers - classify, retrieve and answer customer messages.

mod classify_intent;
mod orchestrate_response;
mod retrieve_knowledge;

pub use classify_intent::{ClassifyIntentHandler, ClassifyIntentQuery};
pub use orchestrate_response::{
    OrchestrateResponseCommand, OrchestrateResponseError, OrchestrateResponseHandler,
    OrchestrateResponseResult,
};
pub use retrieve_knowledge::{RetrieveKnowledgeHandler, RetrieveKnowledgeQuery};
