use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction field: {0}")]
pub struct UnknownField(pub String);

impl UnknownField {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
