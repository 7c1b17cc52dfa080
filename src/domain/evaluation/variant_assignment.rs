//! Deterministic traffic bucketing for experiments.

use sha2::{Digest, Sha256};

use crate::domain::foundation::{ConversationId, ExperimentId, VariantId};
use crate::domain::support::Experiment;

/// Maps an experiment/conversation pair to a point in `[0, 1)`.
///
/// SHA-256 of `"{experiment_id}:{conversation_id}"`; the first eight bytes
/// are read big-endian and scaled down, keeping the 53 bits an `f64` holds
/// exactly so the result never rounds up to 1.
pub fn bucket(experiment_id: &ExperimentId, conversation_id: &ConversationId) -> f64 {
    let digest = Sha256::digest(format!("{}:{}", experiment_id, conversation_id).as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) >> 11) as f64 / (1u64 << 53) as f64
}

/// Variant a conversation belongs to. Pure: same inputs, same variant.
pub fn assign(experiment: &Experiment, conversation_id: &ConversationId) -> VariantId {
    if bucket(experiment.id(), conversation_id) < experiment.traffic_split() {
        *experiment.variant_a()
    } else {
        *experiment.variant_b()
    }
}
