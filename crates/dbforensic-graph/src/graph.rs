// Copyright (c) 2025 dbforensic Contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The dependency multigraph itself: construction, reverse traversal for
//! impact analysis, Tarjan SCC for cycle detection, and in-degree hotspot
//! ranking.
//!
//! The graph is the sole owner of the `ObjectRef` arena ("graph owns the
//! arena, everyone else borrows"); petgraph's own `NodeIndex` stability
//! gives us that for free. We keep a `HashMap<ObjectRef, NodeIndex>`
//! alongside it only to look nodes up by identity when building or
//! querying.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::edge::{Edge, ObjectKind, ObjectRef};

/// Risk ordinal shared by hotspot labeling and the diff engine's
/// risk assignment: `None < Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Result of a reverse-reachability query (`impact`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub nodes: HashSet<ObjectRef>,
    pub by_kind: HashMap<ObjectKind, usize>,
}

impl ImpactResult {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_view(&self) -> bool {
        self.nodes.iter().any(|n| n.kind == ObjectKind::View)
    }
}

/// One entry of [`DependencyGraph::hotspots`]: a table ranked by incoming
/// edge count, with the risk band already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub object: ObjectRef,
    pub in_degree: usize,
    pub risk: RiskLevel,
}

fn hotspot_risk(in_degree: usize) -> RiskLevel {
    match in_degree {
        0..=4 => RiskLevel::Low,
        5..=9 => RiskLevel::Medium,
        10..=19 => RiskLevel::High,
        _ => RiskLevel::Critical,
    }
}

/// The typed directed multigraph over schema objects.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: StableDiGraph<ObjectRef, Edge>,
    index: HashMap<ObjectRef, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    fn node_index(&mut self, object: ObjectRef) -> NodeIndex {
        if let Some(idx) = self.index.get(&object) {
            return *idx;
        }
        let idx = self.graph.add_node(object.clone());
        self.index.insert(object, idx);
        idx
    }

    /// Build a graph from an edge list (order need not be sorted; callers
    /// of [`DependencyGraph::edges`] get them back in the canonical
    /// `(source, target, origin)` order regardless).
    pub fn build(edges: Vec<Edge>) -> Self {
        let mut g = Self::new();
        for edge in edges {
            let s = g.node_index(edge.source.clone());
            let t = g.node_index(edge.target.clone());
            g.graph.add_edge(s, t, edge);
        }
        tracing::info!(nodes = g.graph.node_count(), edges = g.graph.edge_count(), "dependency graph built");
        g
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains_node(&self, object: &ObjectRef) -> bool {
        self.index.contains_key(object)
    }

    /// All edges, ordered `(source, target, origin)` per the determinism
    /// guarantee.
    pub fn edges(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.graph.edge_weights().collect();
        edges.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        edges
    }

    pub fn neighbors_out(&self, object: &ObjectRef) -> Vec<&ObjectRef> {
        let Some(&idx) = self.index.get(object) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| &self.graph[n])
            .collect()
    }

    pub fn neighbors_in(&self, object: &ObjectRef) -> Vec<&ObjectRef> {
        let Some(&idx) = self.index.get(object) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| &self.graph[n])
            .collect()
    }

    /// Reverse-reachable closure from `object`: every node that
    /// transitively depends on it. `object` itself is never included.
    pub fn impact(&self, object: &ObjectRef) -> ImpactResult {
        let mut result = ImpactResult::default();
        let Some(&start) = self.index.get(object) else {
            return result;
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        for n in self.graph.neighbors_directed(start, Direction::Incoming) {
            if visited.insert(n) {
                queue.push_back(n);
            }
        }

        while let Some(idx) = queue.pop_front() {
            let node = &self.graph[idx];
            *result.by_kind.entry(node.kind).or_insert(0) += 1;
            result.nodes.insert(node.clone());
            for n in self.graph.neighbors_directed(idx, Direction::Incoming) {
                if visited.insert(n) {
                    queue.push_back(n);
                }
            }
        }

        result
    }

    /// Strongly-connected components of size ≥ 2, plus singleton nodes
    /// with a self-loop, each rotated so its lexicographically smallest
    /// FQN comes first.
    pub fn cycles(&self) -> Vec<Vec<ObjectRef>> {
        let sccs = tarjan_scc(&self.graph);
        let mut out = Vec::new();
        for scc in sccs {
            let is_cycle = scc.len() >= 2
                || (scc.len() == 1 && self.graph.find_edge(scc[0], scc[0]).is_some());
            if !is_cycle {
                continue;
            }
            let mut nodes: Vec<ObjectRef> = scc.iter().map(|&idx| self.graph[idx].clone()).collect();
            let min_pos = nodes
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.fqn.cmp(&b.fqn))
                .map(|(i, _)| i)
                .unwrap_or(0);
            nodes.rotate_left(min_pos);
            out.push(nodes);
        }
        out.sort_by(|a, b| a[0].fqn.cmp(&b[0].fqn));
        out
    }

    /// Top `top_n` table nodes by in-degree, descending, ties broken by
    /// FQN.
    pub fn hotspots(&self, top_n: usize) -> Vec<Hotspot> {
        let mut ranked: Vec<Hotspot> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph[idx].kind == ObjectKind::Table)
            .map(|idx| {
                let in_degree = self.graph.neighbors_directed(idx, Direction::Incoming).count();
                Hotspot {
                    object: self.graph[idx].clone(),
                    in_degree,
                    risk: hotspot_risk(in_degree),
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.in_degree.cmp(&a.in_degree).then_with(|| a.object.fqn.cmp(&b.object.fqn)));
        ranked.truncate(top_n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbforensic_catalog::Fqn;

    fn t(name: &str) -> ObjectRef {
        ObjectRef::table(Fqn::new("dbo", name))
    }

    #[test]
    fn impact_excludes_self() {
        let g = DependencyGraph::build(vec![Edge::foreign_key(t("B"), t("A"))]);
        let impact = g.impact(&t("A"));
        assert!(!impact.nodes.contains(&t("A")));
        assert!(impact.nodes.contains(&t("B")));
    }

    #[test]
    fn impact_is_transitive() {
        let g = DependencyGraph::build(vec![
            Edge::foreign_key(t("B"), t("A")),
            Edge::foreign_key(t("C"), t("B")),
        ]);
        let impact = g.impact(&t("A"));
        assert_eq!(impact.len(), 2);
        assert!(impact.nodes.contains(&t("C")));
    }

    #[test]
    fn no_cycles_in_dag() {
        let g = DependencyGraph::build(vec![Edge::foreign_key(t("B"), t("A"))]);
        assert!(g.cycles().is_empty());
    }

    #[test]
    fn detects_three_node_cycle_rotated_to_smallest() {
        let g = DependencyGraph::build(vec![
            Edge::calls(t("C"), t("A")),
            Edge::calls(t("A"), t("B")),
            Edge::calls(t("B"), t("C")),
        ]);
        let cycles = g.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0][0], t("A"));
    }

    #[test]
    fn hotspots_rank_by_in_degree_descending() {
        let g = DependencyGraph::build(vec![
            Edge::foreign_key(t("B"), t("A")),
            Edge::foreign_key(t("C"), t("A")),
            Edge::foreign_key(t("D"), t("A")),
            Edge::foreign_key(t("E"), t("B")),
        ]);
        let hotspots = g.hotspots(2);
        assert_eq!(hotspots[0].object, t("A"));
        assert_eq!(hotspots[0].in_degree, 3);
    }

    #[test]
    fn hotspot_risk_bands() {
        assert_eq!(hotspot_risk(0), RiskLevel::Low);
        assert_eq!(hotspot_risk(5), RiskLevel::Medium);
        assert_eq!(hotspot_risk(10), RiskLevel::High);
        assert_eq!(hotspot_risk(20), RiskLevel::Critical);
    }

    #[test]
    fn edges_are_sorted_deterministically() {
        let g = DependencyGraph::build(vec![
            Edge::foreign_key(t("Z"), t("A")),
            Edge::foreign_key(t("B"), t("A")),
        ]);
        let edges = g.edges();
        assert_eq!(edges[0].source.fqn, Fqn::new("dbo", "B"));
    }
}
