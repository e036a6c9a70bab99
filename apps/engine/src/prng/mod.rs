//! Deterministic hashing, seeded pseudo-randomness and fingerprint embeddings.
//!
//! Nothing here is cryptographic. These utilities exist so the same input text always
//! produces the same artwork, graph weights and embedding vector.

pub mod embeddings;
pub mod hash;

pub use embeddings::{cosine_similarity, generate_embeddings};
pub use hash::SeededRng;
