pub mod engine;
pub mod memory;
pub mod partition;

pub use engine::TableEngine;
pub use memory::InMemoryTables;
pub use partition::PartitionStore;
