//! File-level dependency graph for Java sources
//!
//! References are extracted per file, resolved against the declared types
//! of the whole project, and linked into forward and reverse adjacency.

pub mod dependency;
pub mod references;
pub mod resolver;

pub use dependency::{DependencyGraph, GraphBuilder, GraphEdge, GraphMetrics};
pub use references::{extract_references, FileReferences, ReferenceKind, TypeReference};
pub use resolver::{external_node, is_external, Resolution, TypeResolver, EXTERNAL_PREFIX};
