//! Cycle definitions for the workflow engine.
//!
//! This crate provides:
//! - [`CronCycle`]: cycles generated by cron field sets, with the
//!   day-of-month / weekday disjunction rule and leap-year aware carries
//! - [`IntervalCycle`]: cycles at a fixed period between a start and an end
//! - [`CycleSpec`]: the shared `next` / `previous` / `first` / `last` /
//!   `contains` / `each` capability
//! - [`Cycle`]: the closed enum of both, used for active cycle lists

pub mod cron;
pub mod cycle;
pub mod field;
pub mod interval;
pub mod spec;

pub use cron::{CronCycle, CronDefinition};
pub use cycle::{any_contains, Cycle};
pub use field::{FieldKind, FieldSet};
pub use interval::{IntervalCycle, IntervalDefinition};
pub use spec::{CycleSpec, Occurrence, Occurrences};
