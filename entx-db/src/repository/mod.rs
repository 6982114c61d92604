pub mod memory;
pub mod paginate;
pub mod pagination;

// Re-exports
pub use memory::*;
pub use paginate::*;
pub use pagination::*;
