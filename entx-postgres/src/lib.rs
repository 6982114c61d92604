pub mod repository;
pub mod utils;

pub use repository::page_query::{OrderDirection, PgPageQuery};

#[cfg(test)]
pub mod test_helper;
