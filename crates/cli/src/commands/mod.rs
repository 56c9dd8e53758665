//! Command implementations.

mod analyze;
mod inspect;
mod validate;

pub use analyze::run_analyze;
pub use inspect::run_inspect;
pub use validate::run_validate;
