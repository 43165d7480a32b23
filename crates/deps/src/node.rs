//! Dependency tree node types.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use wfm_core::config::DEFAULT_DATA_AGE_SECS;
use wfm_core::time::format_duration;
use wfm_core::{ConfigError, EngineConfig, Result};

/// One node of a task's dependency tree: an operator over child nodes or a
/// leaf predicate.
///
/// Trees own their children outright and are immutable once validated by
/// [`Dependency::new`](crate::Dependency::new).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencyNode {
    /// Resolved iff the operand is not.
    Not { operand: Box<DependencyNode> },
    /// Resolved iff every operand is.
    And { operands: Vec<DependencyNode> },
    /// Resolved iff any operand is.
    Or { operands: Vec<DependencyNode> },
    /// Resolved iff at least one operand is not.
    Nand { operands: Vec<DependencyNode> },
    /// Resolved iff no operand is.
    Nor { operands: Vec<DependencyNode> },
    /// Resolved iff exactly one operand is.
    Xor { operands: Vec<DependencyNode> },
    /// Resolved once the resolved fraction of operands reaches `threshold`.
    #[serde(rename = "some")]
    Threshold {
        #[serde(default = "default_threshold")]
        threshold: f64,
        operands: Vec<DependencyNode>,
    },
    /// A job of `task` for `cycle + cycle_offset` is in `state`.
    TaskState {
        task: String,
        state: String,
        #[serde(default, with = "wfm_core::time::serde_duration")]
        cycle_offset: Duration,
    },
    /// `cycle + cycle_offset` is an occurrence of an active cycle.
    CycleExists {
        #[serde(default, with = "wfm_core::time::serde_duration")]
        cycle_offset: Duration,
    },
    /// The rendered path exists, is at least `min_size` bytes and at least `age` old.
    Data {
        path: String,
        #[serde(default = "default_data_age", with = "wfm_core::time::serde_duration")]
        age: Duration,
        #[serde(default)]
        min_size: u64,
    },
    /// The wall clock is past the rendered time stamp.
    Time { time: String },
    /// Two rendered strings compare as requested.
    #[serde(rename = "string")]
    Compare {
        left: String,
        right: String,
        #[serde(default)]
        comparator: Comparator,
    },
    /// A fixed answer.
    Const { value: bool },
}

/// Comparison applied by [`DependencyNode::Compare`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    #[default]
    Eq,
    Ne,
}

fn default_threshold() -> f64 {
    1.0
}

fn default_data_age() -> Duration {
    Duration::seconds(DEFAULT_DATA_AGE_SECS)
}

impl DependencyNode {
    // ── operators ───────────────────────────────────────────────

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: DependencyNode) -> Self {
        Self::Not {
            operand: Box::new(operand),
        }
    }

    pub fn and(operands: Vec<DependencyNode>) -> Self {
        Self::And { operands }
    }

    pub fn or(operands: Vec<DependencyNode>) -> Self {
        Self::Or { operands }
    }

    pub fn nand(operands: Vec<DependencyNode>) -> Self {
        Self::Nand { operands }
    }

    pub fn nor(operands: Vec<DependencyNode>) -> Self {
        Self::Nor { operands }
    }

    pub fn xor(operands: Vec<DependencyNode>) -> Self {
        Self::Xor { operands }
    }

    /// SOME operator; fails unless `threshold` lies within `[0, 1]`.
    pub fn some(threshold: f64, operands: Vec<DependencyNode>) -> Result<Self> {
        check_threshold(threshold)?;
        Ok(Self::Threshold {
            threshold,
            operands,
        })
    }

    // ── leaves ──────────────────────────────────────────────────

    pub fn task_state(task: impl Into<String>, state: &str, cycle_offset: Duration) -> Self {
        Self::TaskState {
            task: task.into(),
            state: state.trim().to_ascii_lowercase(),
            cycle_offset,
        }
    }

    pub fn cycle_exists(cycle_offset: Duration) -> Self {
        Self::CycleExists { cycle_offset }
    }

    pub fn data(path: impl Into<String>, age: Duration, min_size: u64) -> Self {
        Self::Data {
            path: path.into(),
            age,
            min_size,
        }
    }

    /// Data dependency using the configured default age and size.
    pub fn data_with_defaults(path: impl Into<String>, config: &EngineConfig) -> Self {
        Self::data(path, config.data_age, config.data_min_size)
    }

    pub fn time(time: impl Into<String>) -> Self {
        Self::Time { time: time.into() }
    }

    pub fn string_eq(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Compare {
            left: left.into(),
            right: right.into(),
            comparator: Comparator::Eq,
        }
    }

    pub fn string_ne(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Compare {
            left: left.into(),
            right: right.into(),
            comparator: Comparator::Ne,
        }
    }

    pub fn constant(value: bool) -> Self {
        Self::Const { value }
    }

    // ── inspection ──────────────────────────────────────────────

    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            Self::Not { .. }
                | Self::And { .. }
                | Self::Or { .. }
                | Self::Nand { .. }
                | Self::Nor { .. }
                | Self::Xor { .. }
                | Self::Threshold { .. }
        )
    }

    /// Short, context-free description used as the diagnostic label.
    pub fn label(&self) -> String {
        match self {
            Self::Not { .. } => "NOT".to_string(),
            Self::And { .. } => "AND".to_string(),
            Self::Or { .. } => "OR".to_string(),
            Self::Nand { .. } => "NAND".to_string(),
            Self::Nor { .. } => "NOR".to_string(),
            Self::Xor { .. } => "XOR".to_string(),
            Self::Threshold { threshold, .. } => format!("SOME({threshold})"),
            Self::TaskState {
                task,
                state,
                cycle_offset,
            } => format!("task '{task}' is {state}{}", offset_suffix(*cycle_offset)),
            Self::CycleExists { cycle_offset } => {
                format!("cycle exists{}", offset_suffix(*cycle_offset))
            }
            Self::Data { path, .. } => format!("data '{path}'"),
            Self::Time { time } => format!("time '{time}'"),
            Self::Compare {
                left,
                right,
                comparator,
            } => {
                let op = match comparator {
                    Comparator::Eq => "==",
                    Comparator::Ne => "!=",
                };
                format!("'{left}' {op} '{right}'")
            }
            Self::Const { value } => format!("{value}"),
        }
    }

    /// Validate arities and thresholds and normalize task states, recursively.
    pub fn validated(self) -> Result<Self> {
        Ok(match self {
            Self::Not { operand } => Self::Not {
                operand: Box::new(operand.validated()?),
            },
            Self::And { operands } => Self::And {
                operands: validate_operands("AND", operands)?,
            },
            Self::Or { operands } => Self::Or {
                operands: validate_operands("OR", operands)?,
            },
            Self::Nand { operands } => Self::Nand {
                operands: validate_operands("NAND", operands)?,
            },
            Self::Nor { operands } => Self::Nor {
                operands: validate_operands("NOR", operands)?,
            },
            Self::Xor { operands } => Self::Xor {
                operands: validate_operands("XOR", operands)?,
            },
            Self::Threshold {
                threshold,
                operands,
            } => {
                check_threshold(threshold)?;
                Self::Threshold {
                    threshold,
                    operands: validate_operands("SOME", operands)?,
                }
            }
            Self::TaskState {
                task,
                state,
                cycle_offset,
            } => {
                if task.trim().is_empty() {
                    return Err(ConfigError::InvalidField {
                        field: "task",
                        value: task,
                        reason: "task name must not be empty".to_string(),
                    });
                }
                Self::task_state(task, &state, cycle_offset)
            }
            leaf => leaf,
        })
    }
}

fn offset_suffix(offset: Duration) -> String {
    if offset == Duration::zero() {
        String::new()
    } else {
        format!(" (offset {})", format_duration(offset))
    }
}

fn check_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold(threshold))
    }
}

fn validate_operands(
    operator: &'static str,
    operands: Vec<DependencyNode>,
) -> Result<Vec<DependencyNode>> {
    if operands.is_empty() {
        return Err(ConfigError::InvalidArity {
            operator,
            expected: "at least one operand",
            actual: 0,
        });
    }
    operands.into_iter().map(DependencyNode::validated).collect()
}
