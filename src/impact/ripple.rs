//! Transitive dependents of a file

use crate::graph::DependencyGraph;
use std::collections::{BTreeSet, VecDeque};

/// Every node that transitively depends on `file`, plus `file` itself.
///
/// Breadth-first over reverse adjacency; each node is enqueued at most
/// once, so cycles terminate.
pub fn ripple_effect(graph: &DependencyGraph, file: &str) -> BTreeSet<String> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    visited.insert(file.to_string());
    queue.push_back(file.to_string());

    while let Some(current) = queue.pop_front() {
        let Some(dependents) = graph.dependents(&current) else {
            continue;
        };
        for dependent in dependents {
            if visited.insert(dependent.clone()) {
                queue.push_back(dependent.clone());
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphEdge, ReferenceKind};

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            source: source.into(),
            target: target.into(),
            kind: ReferenceKind::Import,
            element: target.trim_end_matches(".java").into(),
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_chain_of_imports() {
        let graph = DependencyGraph::from_edges(
            ["X.java", "Y.java", "Z.java"].map(String::from),
            vec![edge("X.java", "Y.java"), edge("Y.java", "Z.java")],
        );
        assert_eq!(ripple_effect(&graph, "Z.java"), set(&["X.java", "Y.java", "Z.java"]));
        assert_eq!(ripple_effect(&graph, "Y.java"), set(&["X.java", "Y.java"]));
        assert_eq!(ripple_effect(&graph, "X.java"), set(&["X.java"]));
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = DependencyGraph::from_edges(
            ["A.java", "B.java", "C.java"].map(String::from),
            vec![edge("A.java", "B.java"), edge("B.java", "A.java"), edge("C.java", "A.java")],
        );
        assert_eq!(ripple_effect(&graph, "B.java"), set(&["A.java", "B.java", "C.java"]));
    }

    #[test]
    fn test_unknown_file_contains_itself() {
        let graph = DependencyGraph::default();
        assert_eq!(ripple_effect(&graph, "Nowhere.java"), set(&["Nowhere.java"]));
    }
}
