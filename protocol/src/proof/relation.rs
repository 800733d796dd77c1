//! Comparison relations and the remainder each one implies.
//!
//! Every comparison is proved as an exact balance equation with a remainder
//! note `R`:
//!
//! | relation | tag   | equation       | remainder value       |
//! |----------|-------|----------------|-----------------------|
//! | equal    | `eq`  | `O = C + R`    | `0`                   |
//! | greater  | `gt`  | `O = C + R`    | `O − C`, strictly > 0 |
//! | ≥        | `gte` | `O = C + R`    | `O − C`               |
//! | less     | `lt`  | `C = O + R`    | `C − O`, strictly > 0 |
//! | ≤        | `lte` | `C = O + R`    | `C − O`               |
//!
//! where `O` is the original note and `C` the comparison note. A mislabeled
//! relation proves a different claim, so the tag travels with every request
//! and every proof.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five comparison relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
    #[serde(rename = "lte")]
    LessThanOrEqual,
}

impl Relation {
    pub const ALL: [Relation; 5] = [
        Relation::Equal,
        Relation::GreaterThan,
        Relation::LessThan,
        Relation::GreaterThanOrEqual,
        Relation::LessThanOrEqual,
    ];

    /// Wire tag passed to the prover.
    pub fn tag(&self) -> &'static str {
        match self {
            Relation::Equal => "eq",
            Relation::GreaterThan => "gt",
            Relation::LessThan => "lt",
            Relation::GreaterThanOrEqual => "gte",
            Relation::LessThanOrEqual => "lte",
        }
    }

    /// The original note is the larger side of the equation.
    pub fn original_is_larger(&self) -> bool {
        matches!(
            self,
            Relation::Equal | Relation::GreaterThan | Relation::GreaterThanOrEqual
        )
    }

    /// The remainder must be at least one.
    pub fn is_strict(&self) -> bool {
        matches!(self, Relation::GreaterThan | Relation::LessThan)
    }

    /// The remainder must be exactly zero.
    pub fn is_exact(&self) -> bool {
        matches!(self, Relation::Equal)
    }

    /// The remainder value that makes the relation an exact equation, or
    /// `None` when the relation does not hold for these values.
    pub fn remainder_value(&self, original: u64, comparison: u64) -> Option<u64> {
        let (larger, smaller) = if self.original_is_larger() {
            (original, comparison)
        } else {
            (comparison, original)
        };
        let remainder = larger.checked_sub(smaller)?;

        if self.is_exact() && remainder != 0 {
            return None;
        }
        if self.is_strict() && remainder == 0 {
            return None;
        }
        Some(remainder)
    }

    /// Whether the relation holds between two plain values.
    pub fn holds(&self, original: u64, comparison: u64) -> bool {
        self.remainder_value(original, comparison).is_some()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Relation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .into_iter()
            .find(|relation| relation.tag() == s)
            .ok_or_else(|| format!("unknown relation {s:?} (expected eq, gt, lt, gte or lte)"))
    }
}
