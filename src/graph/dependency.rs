//! File-level dependency graph
//!
//! Forward adjacency maps each project file to the nodes it depends on;
//! reverse adjacency is derived by inverting it. External nodes
//! (`external/<SimpleName>.java`) only ever appear as targets.

use crate::detectors::{load_sources, FileProvider};
use crate::graph::references::{extract_references, FileReferences, ReferenceKind};
use crate::graph::resolver::{is_external, TypeResolver};
use crate::scanner::{ScanOptions, SourceFile};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One resolved reference between two nodes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: ReferenceKind,
    /// The name as written in the source file
    pub element: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphMetrics {
    pub total_files: usize,
    pub total_edges: usize,
    pub external_nodes: usize,
    pub avg_out_degree: f64,
    /// Project file with the highest out-degree
    pub most_coupled_file: Option<String>,
    /// Project file with the highest in-degree
    pub most_depended_on_file: Option<String>,
    /// Out-degree → number of project files with that out-degree
    pub degree_distribution: BTreeMap<usize, usize>,
    /// Strongly connected groups of project files, largest first
    pub cycles: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    pub forward: BTreeMap<String, BTreeSet<String>>,
    pub reverse: BTreeMap<String, BTreeSet<String>>,
    pub edges: Vec<GraphEdge>,
    pub metrics: GraphMetrics,
}

impl DependencyGraph {
    /// Assemble a graph over `files` from resolved edges.
    ///
    /// Every file gets a forward entry even without dependencies.
    /// Self-references are ignored.
    pub fn from_edges(files: impl IntoIterator<Item = String>, edges: Vec<GraphEdge>) -> Self {
        let mut forward: BTreeMap<String, BTreeSet<String>> =
            files.into_iter().map(|f| (f, BTreeSet::new())).collect();

        let mut edges: Vec<GraphEdge> = edges
            .into_iter()
            .filter(|e| e.source != e.target)
            .collect();
        edges.sort();
        edges.dedup();

        for edge in &edges {
            forward
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());
        }

        let mut reverse: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (source, targets) in &forward {
            for target in targets {
                reverse
                    .entry(target.clone())
                    .or_default()
                    .insert(source.clone());
            }
        }

        let mut graph = Self {
            forward,
            reverse,
            edges,
            metrics: GraphMetrics::default(),
        };
        graph.metrics = graph.compute_metrics();
        graph
    }

    /// Nodes `file` depends on
    pub fn dependencies(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.forward.get(file)
    }

    /// Nodes that depend on `file`
    pub fn dependents(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.reverse.get(file)
    }

    pub fn contains(&self, node: &str) -> bool {
        self.forward.contains_key(node) || self.reverse.contains_key(node)
    }

    /// Project files, in path order
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(|k| k.as_str())
    }

    /// Edges leaving `file`
    pub fn edges_from<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.source == file)
    }

    fn compute_metrics(&self) -> GraphMetrics {
        let total_files = self.forward.len();
        let total_edges: usize = self.forward.values().map(|t| t.len()).sum();
        let external_nodes = self.reverse.keys().filter(|n| is_external(n)).count();

        let mut degree_distribution = BTreeMap::new();
        for targets in self.forward.values() {
            *degree_distribution.entry(targets.len()).or_insert(0) += 1;
        }

        // Ties go to the first file in path order
        let most_coupled_file = self
            .forward
            .iter()
            .filter(|(_, t)| !t.is_empty())
            .fold(None::<(&String, usize)>, |best, (file, t)| match best {
                Some((_, n)) if n >= t.len() => best,
                _ => Some((file, t.len())),
            })
            .map(|(f, _)| f.clone());

        let most_depended_on_file = self
            .reverse
            .iter()
            .filter(|(node, s)| !is_external(node) && !s.is_empty())
            .fold(None::<(&String, usize)>, |best, (file, s)| match best {
                Some((_, n)) if n >= s.len() => best,
                _ => Some((file, s.len())),
            })
            .map(|(f, _)| f.clone());

        GraphMetrics {
            total_files,
            total_edges,
            external_nodes,
            avg_out_degree: if total_files == 0 {
                0.0
            } else {
                total_edges as f64 / total_files as f64
            },
            most_coupled_file,
            most_depended_on_file,
            degree_distribution,
            cycles: self.find_cycles(),
        }
    }

    /// Dependency cycles among project files via Tarjan's SCC algorithm
    fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
        for file in self.forward.keys() {
            nodes.insert(file.as_str(), graph.add_node(file.as_str()));
        }
        for (source, targets) in &self.forward {
            for target in targets {
                if let (Some(&from), Some(&to)) =
                    (nodes.get(source.as_str()), nodes.get(target.as_str()))
                {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut names: Vec<String> = scc.iter().map(|&i| graph[i].to_string()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles.sort_by_key(|c| std::cmp::Reverse(c.len()));
        cycles
    }
}

/// Builds a [`DependencyGraph`] from Java sources
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: ScanOptions,
}

impl GraphBuilder {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Read, parse and link every file of `provider`.
    ///
    /// Unreadable files still appear as nodes without dependencies.
    pub fn build(&self, provider: &dyn FileProvider) -> DependencyGraph {
        let loaded = load_sources(provider, provider.files(), &self.options);
        let mut sources = Vec::with_capacity(loaded.len());
        let mut unreadable = Vec::new();
        for entry in loaded {
            match entry.source {
                Ok(source) => sources.push(source),
                Err(e) => {
                    warn!("Graph node {} has no content: {}", entry.path, e);
                    unreadable.push(entry.path);
                }
            }
        }
        let mut graph = self.build_from_sources(&sources);
        if !unreadable.is_empty() {
            let files: Vec<String> = graph.forward.keys().cloned().chain(unreadable).collect();
            graph = DependencyGraph::from_edges(files, graph.edges);
        }
        graph
    }

    /// Link already-parsed files
    pub fn build_from_sources(&self, sources: &[Arc<SourceFile>]) -> DependencyGraph {
        let references: Vec<FileReferences> =
            sources.par_iter().map(|s| extract_references(s)).collect();
        let resolver = TypeResolver::new(&references);
        debug!("Resolver knows {} project types", resolver.type_count());

        let edges: Vec<GraphEdge> = references
            .par_iter()
            .flat_map_iter(|refs| {
                let resolver = &resolver;
                refs.references.iter().filter_map(move |reference| {
                    let resolution = resolver.resolve(&reference.name, refs);
                    if resolution.is_external() && !reference.kind.records_external() {
                        return None;
                    }
                    Some(GraphEdge {
                        source: refs.file.clone(),
                        target: resolution.node().to_string(),
                        kind: reference.kind,
                        element: reference.name.clone(),
                    })
                })
            })
            .collect();

        let graph = DependencyGraph::from_edges(references.into_iter().map(|r| r.file), edges);
        info!(
            "Dependency graph: {} files, {} edges, {} external nodes, {} cycles",
            graph.metrics.total_files,
            graph.metrics.total_edges,
            graph.metrics.external_nodes,
            graph.metrics.cycles.len()
        );
        graph
    }
}
