//! Per-field merge decisions.

use crate::value::ParamValue;

/// Which source a merged field is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeDecision {
    /// Take the value from the first source.
    Left,
    /// Take the value from the second source.
    Right,
    /// Omit the field; it decodes to its default.
    Drop,
}

impl From<bool> for MergeDecision {
    /// `true` prefers the first source, `false` the second.
    fn from(prefer_left: bool) -> Self {
        if prefer_left {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Decoded value of one field in each merge source.
///
/// `None` means the source does not carry the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInput {
    pub left: Option<ParamValue>,
    pub right: Option<ParamValue>,
}

impl MergeInput {
    /// Returns the value the decision selects, if that source has one.
    #[must_use]
    pub fn pick(&self, decision: MergeDecision) -> Option<&ParamValue> {
        match decision {
            MergeDecision::Left => self.left.as_ref(),
            MergeDecision::Right => self.right.as_ref(),
            MergeDecision::Drop => None,
        }
    }
}
