//! A/B experiment lifecycle: variants from bundles and YAML, deterministic
//! assignment, per-variant routing thresholds and comparison.

mod common;

use std::sync::Arc;

use common::{customer, Router};
use support_router::adapters::ai::{ScriptedEmbedder, ScriptedGenerator};
use support_router::application::handlers::experiments::{
    AssignVariantCommand, CompareVariantsQuery, ConcludeExperimentCommand, CreateExperimentCommand,
    RegisterVariantCommand, StartExperimentCommand,
};
use support_router::application::handlers::feedback::SubmitFeedbackCommand;
use support_router::application::handlers::routing::OrchestrateResponseCommand;
use support_router::domain::evaluation::{assign, Leader};
use support_router::domain::foundation::{ConversationId, ErrorCode};
use support_router::domain::routing::{DecisionState, DecisionThresholds};
use support_router::domain::support::{ConfigVariant, Conversation, Experiment, FeedbackRating};
use support_router::ports::ConversationRepository;

const STRICT_YAML: &str = "\
name: strict
description: Only near-certain answers go out unreviewed
thresholds:
  auto_send: 0.9
";

struct Setup {
    router: Router,
    control: ConfigVariant,
    strict: ConfigVariant,
    experiment: Experiment,
}

async fn running_experiment() -> Setup {
    let router = Router::new(Arc::new(ScriptedEmbedder::unavailable()), ScriptedGenerator::unavailable());
    router.with_return_policy().await;

    let control = router
        .register_variant
        .handle(RegisterVariantCommand::Bundle(ConfigVariant::new(
            "control",
            DecisionThresholds::default(),
        )))
        .await
        .unwrap();
    let strict = router
        .register_variant
        .handle(RegisterVariantCommand::Yaml(STRICT_YAML.to_string()))
        .await
        .unwrap();
    assert_eq!(strict.thresholds.auto_send, 0.9);
    assert_eq!(strict.thresholds.escalation_floor, 0.4);

    let experiment = router
        .create_experiment
        .handle(CreateExperimentCommand {
            name: "auto-send bar".into(),
            description: None,
            variant_a: control.id,
            variant_b: strict.id,
            traffic_split: 0.5,
        })
        .await
        .unwrap();
    let experiment = router
        .start_experiment
        .handle(StartExperimentCommand {
            experiment_id: *experiment.id(),
        })
        .await
        .unwrap();

    Setup {
        router,
        control,
        strict,
        experiment,
    }
}

async fn new_conversation(router: &Router) -> ConversationId {
    let conversation = Conversation::start(customer());
    router.conversations.save(&conversation).await.unwrap();
    *conversation.id()
}

#[tokio::test]
async fn assignment_is_deterministic_and_recorded_once() {
    let s = running_experiment().await;
    let conversation_id = new_conversation(&s.router).await;
    let cmd = AssignVariantCommand {
        experiment_id: *s.experiment.id(),
        conversation_id,
    };

    let first = s.router.assign_variant.handle(cmd.clone()).await.unwrap();
    let second = s.router.assign_variant.handle(cmd).await.unwrap();

    assert!(first.newly_assigned);
    assert!(!second.newly_assigned);
    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.assignment.variant_id, assign(&s.experiment, &conversation_id));

    let stored = s.router.conversations.find_by_id(&conversation_id).await.unwrap().unwrap();
    assert_eq!(stored.assignment(), Some(&first.assignment));
}

#[tokio::test]
async fn variants_route_with_their_own_thresholds_and_are_compared() {
    let s = running_experiment().await;
    let experiment_id = *s.experiment.id();

    let (mut control_seen, mut strict_seen) = (0, 0);
    for _ in 0..200 {
        if control_seen >= 2 && strict_seen >= 2 {
            break;
        }
        let conversation_id = new_conversation(&s.router).await;
        let assigned = s
            .router
            .assign_variant
            .handle(AssignVariantCommand {
                experiment_id,
                conversation_id,
            })
            .await
            .unwrap()
            .assignment
            .variant_id;

        let routed = s
            .router
            .orchestrate
            .handle(
                OrchestrateResponseCommand::new(customer(), "What's your return policy?")
                    .in_conversation(conversation_id),
            )
            .await
            .unwrap();
        assert_eq!(routed.variant.map(|v| v.variant_id), Some(assigned));
        assert_eq!(routed.confidence().value(), 0.65);

        // Control customers are delighted, strict ones wait and are not
        let satisfaction = if assigned == s.control.id {
            control_seen += 1;
            assert_eq!(routed.state, DecisionState::AnsweredAutoSent);
            5
        } else {
            strict_seen += 1;
            assert_eq!(routed.state, DecisionState::AnsweredPendingReview);
            1
        };
        s.router
            .submit_feedback
            .handle(SubmitFeedbackCommand::new(conversation_id, FeedbackRating::Helpful).with_satisfaction(satisfaction))
            .await
            .unwrap();
    }
    assert!(control_seen >= 2 && strict_seen >= 2);

    let comparison = s
        .router
        .compare_variants
        .handle(CompareVariantsQuery { experiment_id })
        .await
        .unwrap();

    assert_eq!(comparison.variant_a.variant_id, s.control.id);
    assert_eq!(comparison.variant_a.conversations, control_seen);
    assert_eq!(comparison.variant_b.conversations, strict_seen);
    assert_eq!(comparison.variant_a.mean_satisfaction, Some(5.0));
    assert_eq!(comparison.variant_b.mean_satisfaction, Some(1.0));
    assert_eq!(comparison.variant_a.deflection_rate, Some(1.0));
    assert_eq!(comparison.leader, Leader::Variant(s.control.id));
}

#[tokio::test]
async fn concluded_experiment_stops_assigning_and_applying_variants() {
    let s = running_experiment().await;
    let experiment_id = *s.experiment.id();

    // Find a conversation routed to the strict variant
    let mut strict_conversation = None;
    for _ in 0..200 {
        let conversation_id = new_conversation(&s.router).await;
        let result = s
            .router
            .assign_variant
            .handle(AssignVariantCommand {
                experiment_id,
                conversation_id,
            })
            .await
            .unwrap();
        if result.assignment.variant_id == s.strict.id {
            strict_conversation = Some(conversation_id);
            break;
        }
    }
    let strict_conversation = strict_conversation.expect("a strict assignment within 200 draws");

    s.router
        .conclude_experiment
        .handle(ConcludeExperimentCommand { experiment_id })
        .await
        .unwrap();

    let routed = s
        .router
        .orchestrate
        .handle(
            OrchestrateResponseCommand::new(customer(), "What's your return policy?")
                .in_conversation(strict_conversation),
        )
        .await
        .unwrap();
    assert_eq!(routed.variant, None);
    assert_eq!(routed.state, DecisionState::AnsweredAutoSent);

    let late = new_conversation(&s.router).await;
    let err = s
        .router
        .assign_variant
        .handle(AssignVariantCommand {
            experiment_id,
            conversation_id: late,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ExperimentNotRunning);
}

#[tokio::test]
async fn experiment_with_identical_variants_is_rejected() {
    let s = running_experiment().await;
    let err = s
        .router
        .create_experiment
        .handle(CreateExperimentCommand {
            name: "self test".into(),
            description: None,
            variant_a: s.control.id,
            variant_b: s.control.id,
            traffic_split: 0.5,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidConfiguration);
}
