//! Command-line interface definitions and handlers for the readshare CLI.

pub mod args;
pub mod bv;
pub mod compare;
pub mod extract;
pub mod filter;
pub mod helpers;
pub mod matrix;
pub mod random;
pub mod search;

pub use args::{Cli, Commands};
pub use bv::run_bv;
pub use compare::run_compare;
pub use extract::run_extract;
pub use filter::run_filter;
pub use matrix::run_matrix;
pub use random::run_random;
pub use search::run_search;
