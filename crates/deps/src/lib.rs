//! Dependency resolution for cycle tasks.
//!
//! A task's dependencies form a tree of [`DependencyNode`]s: leaves check
//! job states, cycle existence, data files, wall-clock times and strings;
//! operators (NOT, AND, OR, NAND, NOR, XOR, SOME) combine them with
//! short-circuit evaluation. Every tree answers two questions from the
//! same walk:
//! - `resolved`: may the task run for this cycle?
//! - `query`: a [`QueryResult`] trace explaining the answer
//!
//! Facts come from an [`EvaluationContext`]; this crate never submits,
//! persists or retries anything.

pub mod context;
pub mod dependency;
pub mod evaluator;
pub mod jobs;
pub mod node;
pub mod probe;
pub mod query;
pub mod render;

pub use context::{EvaluationContext, IoProbe, JobLookup, JobRecord, TemplateRenderer};
pub use dependency::Dependency;
pub use jobs::{JobOrder, JobTable};
pub use node::{Comparator, DependencyNode};
pub use probe::FsProbe;
pub use query::QueryResult;
pub use render::{PassThrough, StrftimeRenderer};
