//! Mutation outcomes.

use std::fmt;

/// Outcome of a holder mutation.
///
/// These are normal results, not faults. Callers branch on them to pick the
/// message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataMutateResult {
    /// The collection changed.
    Success,
    /// The holder already has an equal node; nothing was added.
    AlreadyHas,
    /// No matching node was found; nothing was removed.
    Fail,
}

impl DataMutateResult {
    /// Whether a change occurred.
    pub fn as_bool(self) -> bool {
        matches!(self, DataMutateResult::Success)
    }
}

impl From<DataMutateResult> for bool {
    fn from(result: DataMutateResult) -> Self {
        result.as_bool()
    }
}

impl fmt::Display for DataMutateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataMutateResult::Success => "success",
            DataMutateResult::AlreadyHas => "already has",
            DataMutateResult::Fail => "fail",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_bool() {
        assert!(DataMutateResult::Success.as_bool());
        assert!(!DataMutateResult::AlreadyHas.as_bool());
        assert!(!bool::from(DataMutateResult::Fail));
    }
}
