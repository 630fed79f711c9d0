use thiserror::Error;

/// Failures of the structural lookups of the syntax tree.
///
/// These are only raised by operations that expect a construct to be present (`..._or_throw`,
/// `single_child`, ...). The tree builder itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("construct not found: ({keyword} ...)")]
    ConstructNotFound { keyword: String },
    #[error("expected exactly one {expected} child but found {found}")]
    NotSingleChild { expected: &'static str, found: usize },
}

impl SyntaxError {
    pub fn not_found(keyword: impl Into<String>) -> Self {
        SyntaxError::ConstructNotFound {
            keyword: keyword.into(),
        }
    }
}
