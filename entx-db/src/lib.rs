pub mod config;
pub mod context;
pub mod links;
pub mod paginator;
pub mod repository;

pub use config::PaginationConfig;
pub use context::QueryContext;
pub use links::{url_without_page_params, PageLinks};
pub use paginator::Paginator;
pub use repository::*;
