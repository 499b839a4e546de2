//! Defender policies.

use crate::core::{GameError, GameRng, GameResult};
use crate::game::DefenderAction;
use crate::graph::{DependencyGraph, NodeId};

use super::select_count;

/// Uniform random defender over all nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformDefender {
    min_num: usize,
    max_num: usize,
    ratio: f64,
}

impl UniformDefender {
    pub fn new(min_num: usize, max_num: usize, ratio: f64) -> GameResult<Self> {
        validate_selection(min_num, max_num, ratio)?;
        Ok(Self {
            min_num,
            max_num,
            ratio,
        })
    }

    fn sample(&self, graph: &DependencyGraph, rng: &mut GameRng) -> DefenderAction {
        let n = graph.node_count();
        let k = select_count(n, self.min_num, self.max_num, self.ratio, 0.0);
        rng.sample_distinct_uniform(k, n)
            .into_iter()
            .map(|i| NodeId::new(i as u32 + 1))
            .collect()
    }
}

/// Uniform random defender restricted to the graph's vertex min-cut.
#[derive(Clone, Debug, PartialEq)]
pub struct MinCutDefender {
    min_num: usize,
    max_num: usize,
    ratio: f64,
}

impl MinCutDefender {
    pub fn new(min_num: usize, max_num: usize, ratio: f64) -> GameResult<Self> {
        validate_selection(min_num, max_num, ratio)?;
        Ok(Self {
            min_num,
            max_num,
            ratio,
        })
    }

    fn sample(&self, graph: &DependencyGraph, rng: &mut GameRng) -> DefenderAction {
        let cut = graph.min_cut();
        let k = select_count(cut.len(), self.min_num, self.max_num, self.ratio, 0.0);
        rng.sample_distinct_uniform(k, cut.len())
            .into_iter()
            .map(|i| cut[i])
            .collect()
    }
}

/// The defender policy space.
#[derive(Clone, Debug, PartialEq)]
pub enum Defender {
    Uniform(UniformDefender),
    MinCut(MinCutDefender),
}

impl Defender {
    /// Draw one defense.
    pub fn sample_action(&self, graph: &DependencyGraph, rng: &mut GameRng) -> DefenderAction {
        match self {
            Defender::Uniform(policy) => policy.sample(graph, rng),
            Defender::MinCut(policy) => policy.sample(graph, rng),
        }
    }
}

fn validate_selection(min_num: usize, max_num: usize, ratio: f64) -> GameResult<()> {
    if min_num > max_num {
        return Err(GameError::config(format!(
            "minNum {min_num} exceeds maxNum {max_num}"
        )));
    }
    if !(0.0..=1.0).contains(&ratio) {
        return Err(GameError::config(format!(
            "ratio must be in [0, 1], got {ratio}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_graphs;

    #[test]
    fn test_uniform_defender_count_clamping() {
        // ratio 0.3 of 5 nodes = ceil(1.5) = 2, within [2, 5].
        let graph = test_graphs::and_or_mix();
        let defender = Defender::Uniform(UniformDefender::new(2, 5, 0.3).unwrap());

        let mut rng = GameRng::new(1);
        for _ in 0..50 {
            let action = defender.sample_action(&graph, &mut rng);
            assert_eq!(action.len(), 2);
            for id in action.nodes() {
                assert!(graph.node(id).is_some());
            }
        }
    }

    #[test]
    fn test_small_candidate_set_caps_count() {
        // min_num 2 but the chain min-cut has a single node.
        let graph = test_graphs::or_chain(3);
        assert_eq!(graph.min_cut().len(), 1);

        let defender = Defender::MinCut(MinCutDefender::new(2, 5, 0.5).unwrap());
        let mut rng = GameRng::new(1);
        let action = defender.sample_action(&graph, &mut rng);
        assert_eq!(action.len(), 1);
    }

    #[test]
    fn test_min_cut_defender_stays_on_cut() {
        let graph = test_graphs::diamond();
        let cut = graph.min_cut().to_vec();
        let defender = Defender::MinCut(MinCutDefender::new(1, 3, 1.0).unwrap());

        let mut rng = GameRng::new(8);
        for _ in 0..50 {
            let action = defender.sample_action(&graph, &mut rng);
            for id in action.nodes() {
                assert!(cut.contains(&id), "{id} is not on the min-cut");
            }
        }
    }

    #[test]
    fn test_defender_validates_params() {
        assert!(UniformDefender::new(4, 2, 0.5).is_err());
        assert!(MinCutDefender::new(1, 2, -0.1).is_err());
        assert!(UniformDefender::new(0, 3, 0.0).is_ok());
    }
}
