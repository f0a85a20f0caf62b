//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{contract_home, expand_tilde, get_data_dir, DATA_DIR_ENV};
