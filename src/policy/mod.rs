//! Attacker and defender policies.
//!
//! Policies are closed sum types with a single `sample_action` dispatch;
//! the factory in [`descriptor`] builds them from strings, and
//! [`descriptor::MixedStrategy`] mixes them per episode.

pub mod attacker;
pub mod defender;
pub mod descriptor;
pub mod value_propagation;

pub use attacker::{Attacker, UniformAttacker, ValuePropagationAttacker};
pub use defender::{Defender, MinCutDefender, UniformDefender};
pub use descriptor::{
    attacker_from_descriptor, defender_from_descriptor, parse_mixed_attackers,
    parse_mixed_defenders, MixedStrategy, StrategyDescriptor,
};

/// How many candidate units to act on this step.
///
/// `ceil(ratio * n + noise)` clamped to `[min_num, max_num]`, except that a
/// candidate set smaller than `min_num` is taken whole. Never exceeds `n`.
pub(crate) fn select_count(
    n: usize,
    min_num: usize,
    max_num: usize,
    ratio: f64,
    noise: f64,
) -> usize {
    if n < min_num {
        return n;
    }
    let raw = (ratio * n as f64 + noise).ceil();
    let clamped = raw.clamp(min_num as f64, max_num as f64) as usize;
    clamped.min(n)
}
