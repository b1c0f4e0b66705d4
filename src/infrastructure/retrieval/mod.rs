//! Document store implementations

pub mod in_memory;
pub mod qdrant;

pub use in_memory::InMemoryDocumentStore;
pub use qdrant::QdrantDocumentStore;
