//! dmeter-scoring
//!
//! The two pure calculators: per-submission trust in [0, 1] and the token
//! reward. Both are synchronous, allocation-free and deterministic.

pub mod reward;
pub mod trust;

#[cfg(test)]
mod proptests;

pub use reward::{calculate_reward, reward_amount, RewardBreakdown};
pub use trust::trust_score;
