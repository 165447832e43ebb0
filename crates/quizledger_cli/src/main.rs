//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quizledger_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Keep a tiny CLI probe to validate core crate wiring independently from
    // the wallet/UI collaborator layer.
    println!("quizledger_core ping={}", quizledger_core::ping());
    println!("quizledger_core version={}", quizledger_core::core_version());
    println!("quizledger_core questions={}", quizledger_core::QUESTION_COUNT);
}
