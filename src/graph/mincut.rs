//! Vertex min-cut between the graph's entry points and its targets.
//!
//! Standard node-splitting reduction: every non-target node becomes a
//! unit-capacity `in -> out` pair, targets and structural edges get
//! effectively unbounded capacity, and a BFS max-flow (Edmonds-Karp) over
//! the split network yields the cut. Protecting every cut node disconnects
//! all targets from their inactive ancestors.

use super::graph::DependencyGraph;
use super::node::NodeId;

struct FlowEdge {
    to: usize,
    rev: usize,
    cap: i64,
}

struct FlowNetwork {
    adj: Vec<Vec<FlowEdge>>,
}

impl FlowNetwork {
    fn new(vertex_count: usize) -> Self {
        Self {
            adj: (0..vertex_count).map(|_| Vec::new()).collect(),
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, cap: i64) {
        let rev_from = self.adj[to].len();
        let rev_to = self.adj[from].len();
        self.adj[from].push(FlowEdge { to, rev: rev_from, cap });
        self.adj[to].push(FlowEdge {
            to: from,
            rev: rev_to,
            cap: 0,
        });
    }

    /// One BFS augmentation; returns the bottleneck pushed (0 when done).
    fn augment(&mut self, source: usize, sink: usize) -> i64 {
        let n = self.adj.len();
        // parent[v] = (vertex we came from, edge index within its list)
        let mut parent: Vec<Option<(usize, usize)>> = vec![None; n];
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(source);
        parent[source] = Some((source, usize::MAX));

        while let Some(u) = queue.pop_front() {
            if u == sink {
                break;
            }
            for (i, edge) in self.adj[u].iter().enumerate() {
                if edge.cap > 0 && parent[edge.to].is_none() {
                    parent[edge.to] = Some((u, i));
                    queue.push_back(edge.to);
                }
            }
        }

        if parent[sink].is_none() {
            return 0;
        }

        // Bottleneck along the path.
        let mut bottleneck = i64::MAX;
        let mut v = sink;
        while v != source {
            let (u, i) = parent[v].expect("path reconstructed from BFS");
            bottleneck = bottleneck.min(self.adj[u][i].cap);
            v = u;
        }

        // Apply.
        let mut v = sink;
        while v != source {
            let (u, i) = parent[v].expect("path reconstructed from BFS");
            self.adj[u][i].cap -= bottleneck;
            let rev = self.adj[u][i].rev;
            self.adj[v][rev].cap += bottleneck;
            v = u;
        }
        bottleneck
    }

    fn max_flow(&mut self, source: usize, sink: usize) -> i64 {
        let mut total = 0;
        loop {
            let pushed = self.augment(source, sink);
            if pushed == 0 {
                return total;
            }
            total += pushed;
        }
    }

    /// Vertices reachable from `source` through positive residual capacity.
    fn residual_reachable(&self, source: usize) -> Vec<bool> {
        let mut seen = vec![false; self.adj.len()];
        let mut stack = vec![source];
        seen[source] = true;
        while let Some(u) = stack.pop() {
            for edge in &self.adj[u] {
                if edge.cap > 0 && !seen[edge.to] {
                    seen[edge.to] = true;
                    stack.push(edge.to);
                }
            }
        }
        seen
    }
}

/// Compute the vertex min-cut of non-target nodes separating every target
/// from the graph's entry points (parentless or initially ACTIVE nodes).
///
/// Returns an empty cut when a target is itself an entry point (no set of
/// non-target protections can isolate it).
#[must_use]
pub fn vertex_min_cut(graph: &DependencyGraph) -> Vec<NodeId> {
    let n = graph.node_count();
    // Every augmenting path crosses at least one unit edge, so flow <= n.
    let inf = n as i64 + 1;

    let v_in = |i: usize| 2 * i;
    let v_out = |i: usize| 2 * i + 1;
    let source = 2 * n;
    let sink = 2 * n + 1;

    let is_entry = |id: NodeId| {
        let node = graph.node(id).expect("iterating own nodes");
        graph.in_degree(id) == 0 || node.starts_active()
    };

    for node in graph.nodes() {
        if node.is_target() && is_entry(node.id) {
            log::warn!("target {} is an entry point; no vertex cut exists", node.id);
            return Vec::new();
        }
    }

    let mut net = FlowNetwork::new(2 * n + 2);
    for node in graph.nodes() {
        let i = (node.id.raw() - 1) as usize;
        let through = if node.is_target() { inf } else { 1 };
        net.add_edge(v_in(i), v_out(i), through);
        if node.is_target() {
            net.add_edge(v_out(i), sink, inf);
        }
        if is_entry(node.id) {
            net.add_edge(source, v_in(i), inf);
        }
    }
    for edge in graph.edges() {
        let u = (edge.source.raw() - 1) as usize;
        let w = (edge.target.raw() - 1) as usize;
        net.add_edge(v_out(u), v_in(w), inf);
    }

    let flow = net.max_flow(source, sink);
    log::debug!("vertex min-cut flow value: {flow}");

    let reach = net.residual_reachable(source);
    let mut cut: Vec<NodeId> = graph
        .nodes()
        .filter(|node| {
            let i = (node.id.raw() - 1) as usize;
            !node.is_target() && reach[v_in(i)] && !reach[v_out(i)]
        })
        .map(|node| node.id)
        .collect();
    cut.sort_unstable();
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_graphs;

    #[test]
    fn test_chain_cut_is_single_node() {
        // 1 -> 2 -> 3 (target): any single interior node separates.
        let graph = test_graphs::or_chain(3);
        let cut = vertex_min_cut(&graph);
        assert_eq!(cut.len(), 1);
        assert!(cut[0] == NodeId::new(1) || cut[0] == NodeId::new(2));
    }

    #[test]
    fn test_diamond_cut_prefers_bottleneck() {
        // 1 -> {2, 3} -> 4 (target): cutting node 1 beats cutting {2, 3}.
        let graph = test_graphs::diamond();
        let cut = vertex_min_cut(&graph);
        assert_eq!(cut, vec![NodeId::new(1)]);
    }

    #[test]
    fn test_cut_disconnects_targets() {
        for graph in [
            test_graphs::or_chain(4),
            test_graphs::diamond(),
            test_graphs::and_or_mix(),
        ] {
            let cut = vertex_min_cut(&graph);
            assert!(!cut.is_empty());

            // BFS from entries avoiding the cut must reach no target.
            let mut seen = std::collections::BTreeSet::new();
            let mut stack: Vec<NodeId> = graph
                .nodes()
                .filter(|n| graph.in_degree(n.id) == 0 || n.starts_active())
                .map(|n| n.id)
                .filter(|id| !cut.contains(id))
                .collect();
            while let Some(id) = stack.pop() {
                if !seen.insert(id) {
                    continue;
                }
                for edge in graph.outgoing_edges_of(id) {
                    if !cut.contains(&edge.target) {
                        stack.push(edge.target);
                    }
                }
            }
            for target in graph.target_set() {
                assert!(!seen.contains(target), "target {target} not separated");
            }
        }
    }
}
