//! TRPO agent.
//!
//! A natural policy gradient step with a diagonal Fisher information matrix,
//! scaled by a backtracking line search on the KL divergence between the
//! sampling-time and the updated policy.
mod base;
mod config;
pub use base::{fisher_diagonal, kl_divergence, line_search, natural_gradient, LineSearch, Trpo};
pub use config::TrpoConfig;
