//! Full-episode engine integration tests with real policies on both sides.

use std::sync::Arc;

use attackgraph::graph::test_graphs;
use attackgraph::{
    Attacker, AttackerAction, Defender, DefenderAction, GameError, NodeId, SimulationEngine,
    UniformAttacker, UniformDefender,
};

fn uniform_attacker() -> Attacker {
    Attacker::Uniform(UniformAttacker::new(1, 2, 0.5).unwrap())
}

fn uniform_defender() -> Defender {
    Defender::Uniform(UniformDefender::new(0, 2, 0.3).unwrap())
}

/// Drive one full episode with policy-sampled actions on both sides,
/// returning the sum of the attacker's marginal payoffs.
fn play_episode(engine: &mut SimulationEngine) -> f64 {
    let attacker = uniform_attacker();
    let defender = uniform_defender();
    let mut attacker_marginals = 0.0;

    while !engine.is_game_over() {
        let graph = Arc::clone(engine.graph());
        let state = engine.game_state().clone();
        let cur = engine.cur_time_step();
        let total = engine.num_time_step();

        let attack = attacker.sample_action(&graph, &state, cur, total, engine.rng_mut());
        let defense = defender.sample_action(&graph, engine.rng_mut());
        engine.step(&attack, &defense).unwrap();
        attacker_marginals += engine.attacker_marginal_payoff();
    }
    attacker_marginals
}

// =============================================================================
// Episode Accounting
// =============================================================================

#[test]
fn test_marginals_sum_to_totals() {
    let graph = Arc::new(test_graphs::and_or_mix());
    let mut engine = SimulationEngine::new(graph, 6, 0.9, 42).unwrap();

    let summed = play_episode(&mut engine);
    assert!((summed - engine.attacker_total_payoff()).abs() < 1e-9);
    assert!(engine.is_game_over());
}

#[test]
fn test_reset_between_episodes() {
    let graph = Arc::new(test_graphs::and_or_mix());
    let mut engine = SimulationEngine::new(graph, 5, 0.9, 42).unwrap();

    play_episode(&mut engine);
    let first_total = engine.attacker_total_payoff();

    engine.reset();
    assert_eq!(engine.attacker_total_payoff(), 0.0);
    assert_eq!(engine.time_steps_left(), 5);

    play_episode(&mut engine);
    // Independent episodes; totals need not match, but both are finite.
    assert!(first_total.is_finite());
    assert!(engine.attacker_total_payoff().is_finite());
}

#[test]
fn test_same_seed_same_trajectory() {
    let graph = Arc::new(test_graphs::and_or_mix());

    let mut engine1 = SimulationEngine::new(Arc::clone(&graph), 6, 0.9, 1234).unwrap();
    let mut engine2 = SimulationEngine::new(graph, 6, 0.9, 1234).unwrap();

    play_episode(&mut engine1);
    play_episode(&mut engine2);

    assert_eq!(engine1.attacker_total_payoff(), engine2.attacker_total_payoff());
    assert_eq!(engine1.defender_total_payoff(), engine2.defender_total_payoff());
    assert_eq!(engine1.game_state().identity(), engine2.game_state().identity());
}

// =============================================================================
// Activation Closure
// =============================================================================

/// Every node that is ACTIVE after a step was either ACTIVE before and not
/// protected, or was struck this step.
#[test]
fn test_activation_closure_over_many_steps() {
    let graph = Arc::new(test_graphs::and_or_mix());
    let mut engine = SimulationEngine::new(Arc::clone(&graph), 8, 1.0, 7).unwrap();
    let attacker = uniform_attacker();
    let defender = uniform_defender();

    while !engine.is_game_over() {
        let state_before = engine.game_state().clone();
        let arc = Arc::clone(engine.graph());
        let cur = engine.cur_time_step();
        let total = engine.num_time_step();
        let snapshot = engine.game_state().clone();

        let attack = attacker.sample_action(&arc, &snapshot, cur, total, engine.rng_mut());
        let defense = defender.sample_action(&arc, engine.rng_mut());
        engine.step(&attack, &defense).unwrap();

        let struck: Vec<NodeId> = attack
            .attacked_and_node_ids()
            .into_iter()
            .chain(attack.attacked_or_node_ids())
            .collect();

        for node in graph.nodes() {
            if engine.game_state().is_enabled(node.id) {
                let was_active = state_before.is_enabled(node.id) && !defense.protects(node.id);
                let was_struck = struck.contains(&node.id);
                assert!(
                    was_active || was_struck,
                    "{} became ACTIVE without cause",
                    node.id
                );
            }
        }

        // Growth bound: at most one new activation per struck node.
        assert!(
            engine.game_state().enabled_count() <= state_before.enabled_count() + struck.len()
        );
    }
}

// =============================================================================
// Error Paths
// =============================================================================

#[test]
fn test_direct_invalid_moves_are_fatal() {
    let graph = Arc::new(test_graphs::diamond());
    let mut engine = SimulationEngine::new(graph, 3, 0.9, 1).unwrap();

    // Unknown node.
    let mut attack = AttackerAction::empty();
    attack.add_and_strike(NodeId::new(77));
    assert!(matches!(
        engine.step(&attack, &DefenderAction::empty()),
        Err(GameError::InvalidMove(_))
    ));

    // Node strike against an OR node.
    let mut attack = AttackerAction::empty();
    attack.add_and_strike(NodeId::new(3));
    assert!(engine.step(&attack, &DefenderAction::empty()).is_err());

    // The failures consumed no time.
    assert_eq!(engine.time_steps_left(), 3);
}

#[test]
fn test_empty_actions_are_always_legal() {
    let graph = Arc::new(test_graphs::or_chain(4));
    let mut engine = SimulationEngine::new(graph, 3, 0.9, 1).unwrap();

    while !engine.is_game_over() {
        engine
            .step(&AttackerAction::empty(), &DefenderAction::empty())
            .unwrap();
    }
    // Nothing struck, nothing protected: no payoffs on a target-free run.
    assert_eq!(engine.attacker_total_payoff(), 0.0);
    assert_eq!(engine.defender_total_payoff(), 0.0);
}
