pub mod calculations;
pub mod models;
pub mod tables;

pub use calculations::{Simulator, compute_tax, max_deductible_contribution, simulate};
pub use models::*;
pub use tables::default_tables;
