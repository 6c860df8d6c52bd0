//! Keyword-based message classification.
//!
//! Plain substring matching against fixed phrase tables. There is no
//! scoring, weighting, or negation handling: "I am not suicidal" still
//! rates high. That limitation is part of the contract and must not be
//! "fixed" here without changing the contract.

use crate::models::Severity;

/// Phrases that force a high severity rating.
const HIGH_SEVERITY_PHRASES: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "want to die",
    "better off dead",
    "overdose",
    "end it all",
    "give up completely",
    "no point living",
];

/// Phrases that rate medium severity when no high phrase matches.
const MEDIUM_SEVERITY_PHRASES: &[&str] = &[
    "harm myself",
    "hurt myself",
    "self harm",
    "cutting",
    "hopeless",
    "worthless",
    "nobody cares",
    "can't go on",
    "trapped",
    "desperate",
];

/// Survival-need phrases that switch the reply wrapper to the strict
/// resource-first instruction.
const IMMEDIATE_NEED_PHRASES: &[&str] = &[
    "homeless",
    "hungry",
    "starving",
    "nowhere to go",
    "need shelter",
    "need food",
    "evicted",
    "kicked out",
];

/// Rate the urgency of a message. High phrases win over medium; neither
/// matching rates low.
pub fn classify_severity(message: &str) -> Severity {
    let lowered = message.to_lowercase();

    if HIGH_SEVERITY_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Severity::High;
    }
    if MEDIUM_SEVERITY_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Severity::Medium;
    }
    Severity::Low
}

/// Whether the message discloses an immediate survival need.
pub fn has_immediate_need(message: &str) -> bool {
    let lowered = message.to_lowercase();
    IMMEDIATE_NEED_PHRASES.iter().any(|p| lowered.contains(p))
}
