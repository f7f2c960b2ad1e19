pub mod filter;
pub mod stats;
pub mod types;

pub use filter::IssueFilter;
pub use stats::IssueStats;
pub use types::*;
