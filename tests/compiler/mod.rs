//! Grammar compiler integration tests

pub mod tests_build;
