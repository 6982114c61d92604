pub mod db_init;
pub mod page_query;

#[cfg(test)]
pub mod test_utils;
