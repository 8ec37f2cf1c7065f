//! Record filtering — a conjunction of typed predicates over ad records.

pub mod engine;
pub mod spec;

pub use engine::apply_filters;
pub use spec::{DateRange, FilterSpec, NumericRange};
