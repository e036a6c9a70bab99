//! Transient knowledge graphs.
//!
//! Graphs are synthesised per request from a domain name and a concept list and are
//! never stored.

pub mod graph;

pub use graph::{generate_knowledge_graph, KnowledgeGraph};
