//! Support Router - routes inbound customer support messages.
//!
//! Each message is classified by intent, then either escalated to a human
//! or answered from the knowledge base with a calibrated confidence that
//! decides whether the answer is sent automatically. Agent feedback flows
//! back as training records that drive retraining, offline evaluation and
//! A/B experiments between configuration variants.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
