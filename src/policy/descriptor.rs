//! Strategy descriptors and mixed strategies.
//!
//! A descriptor is `"Name:key1=val1,key2=val2"`. A mixed-strategy file is
//! newline-delimited `"<descriptor>\t<weight>"` records whose weights sum
//! to 1 (within 1e-3); one entry is drawn per episode reset.

use rustc_hash::FxHashMap;

use crate::core::{GameError, GameRng, GameResult};

use super::attacker::{Attacker, UniformAttacker, ValuePropagationAttacker};
use super::defender::{Defender, MinCutDefender, UniformDefender};

const WEIGHT_TOLERANCE: f64 = 1e-3;

/// A parsed `"Name:key=val,..."` descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyDescriptor {
    pub name: String,
    pub params: FxHashMap<String, f64>,
}

impl StrategyDescriptor {
    /// Parse a descriptor string. The parameter list may be absent.
    pub fn parse(text: &str) -> GameResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GameError::config("empty strategy descriptor"));
        }

        let (name, param_text) = match text.split_once(':') {
            Some((name, rest)) => (name, rest),
            None => (text, ""),
        };

        let mut params = FxHashMap::default();
        for pair in param_text.split(',').filter(|p| !p.trim().is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                GameError::config(format!("malformed parameter {pair:?} in {text:?}"))
            })?;
            let value: f64 = value.trim().parse().map_err(|_| {
                GameError::config(format!("non-numeric value for {key:?} in {text:?}"))
            })?;
            params.insert(key.trim().to_string(), value);
        }

        Ok(Self {
            name: name.trim().to_string(),
            params,
        })
    }

    fn required(&self, key: &str) -> GameResult<f64> {
        self.params.get(key).copied().ok_or_else(|| {
            GameError::config(format!("{} is missing parameter {key}", self.name))
        })
    }

    fn optional(&self, key: &str, default: f64) -> f64 {
        self.params.get(key).copied().unwrap_or(default)
    }

    fn required_count(&self, key: &str) -> GameResult<usize> {
        let value = self.required(key)?;
        if value < 0.0 || value.fract() != 0.0 {
            return Err(GameError::config(format!(
                "{key} must be a non-negative integer, got {value}"
            )));
        }
        Ok(value as usize)
    }
}

/// Build an attacker from its descriptor.
pub fn attacker_from_descriptor(text: &str) -> GameResult<Attacker> {
    let desc = StrategyDescriptor::parse(text)?;
    match desc.name.as_str() {
        "Uniform" => Ok(Attacker::Uniform(UniformAttacker::new(
            desc.required_count("minNum")?,
            desc.required_count("maxNum")?,
            desc.required("ratio")?,
        )?)),
        "ValuePropagation" => Ok(Attacker::ValuePropagation(ValuePropagationAttacker::new(
            desc.required_count("minNum")?,
            desc.required_count("maxNum")?,
            desc.required("ratio")?,
            desc.optional("qrParam", 5.0),
            desc.optional("discFact", 0.9),
            desc.optional("stdev", 0.0),
        )?)),
        other => Err(GameError::config(format!("unknown attacker {other:?}"))),
    }
}

/// Build a defender from its descriptor.
pub fn defender_from_descriptor(text: &str) -> GameResult<Defender> {
    let desc = StrategyDescriptor::parse(text)?;
    match desc.name.as_str() {
        "Uniform" => Ok(Defender::Uniform(UniformDefender::new(
            desc.required_count("minNum")?,
            desc.required_count("maxNum")?,
            desc.required("ratio")?,
        )?)),
        "MinCut" => Ok(Defender::MinCut(MinCutDefender::new(
            desc.required_count("minNum")?,
            desc.required_count("maxNum")?,
            desc.required("ratio")?,
        )?)),
        other => Err(GameError::config(format!("unknown defender {other:?}"))),
    }
}

/// A discrete distribution over policies, drawn from at episode reset.
#[derive(Clone, Debug)]
pub struct MixedStrategy<T> {
    entries: Vec<(T, f64)>,
}

impl<T> MixedStrategy<T> {
    /// Build a mixture, checking that weights are positive and sum to 1.
    pub fn new(entries: Vec<(T, f64)>) -> GameResult<Self> {
        if entries.is_empty() {
            return Err(GameError::config("mixed strategy has no entries"));
        }
        let mut total = 0.0;
        for (_, weight) in &entries {
            if !(*weight > 0.0) {
                return Err(GameError::config(format!(
                    "mixed-strategy weight must be positive, got {weight}"
                )));
            }
            total += weight;
        }
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(GameError::config(format!(
                "mixed-strategy weights sum to {total}, expected 1"
            )));
        }
        Ok(Self { entries })
    }

    /// A degenerate mixture holding a single policy.
    #[must_use]
    pub fn pure(item: T) -> Self {
        Self {
            entries: vec![(item, 1.0)],
        }
    }

    /// Draw one entry according to the weights.
    pub fn sample(&self, rng: &mut GameRng) -> &T {
        let weights: Vec<f64> = self.entries.iter().map(|(_, w)| *w).collect();
        let idx = rng
            .choose_weighted(&weights)
            .expect("weights validated positive");
        &self.entries[idx].0
    }

    #[must_use]
    pub fn entries(&self) -> &[(T, f64)] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_mixed_lines<T>(
    text: &str,
    build: impl Fn(&str) -> GameResult<T>,
) -> GameResult<MixedStrategy<T>> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (descriptor, weight) = line.split_once('\t').ok_or_else(|| {
            GameError::config(format!("mixed-strategy line {line:?} has no weight"))
        })?;
        let weight: f64 = weight.trim().parse().map_err(|_| {
            GameError::config(format!("non-numeric weight in line {line:?}"))
        })?;
        entries.push((build(descriptor)?, weight));
    }
    MixedStrategy::new(entries)
}

/// Parse a newline-delimited attacker mixture.
pub fn parse_mixed_attackers(text: &str) -> GameResult<MixedStrategy<Attacker>> {
    parse_mixed_lines(text, attacker_from_descriptor)
}

/// Parse a newline-delimited defender mixture.
pub fn parse_mixed_defenders(text: &str) -> GameResult<MixedStrategy<Defender>> {
    parse_mixed_lines(text, defender_from_descriptor)
}
