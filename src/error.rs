#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("{reason}: pattern = {pattern:?}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("invalid filter name {name:?}: {reason}")]
    InvalidFilter { name: String, reason: &'static str },

    #[error("invalid http verb {verb:?}")]
    InvalidVerb { verb: String },

    #[error("invalid constraint on {name:?}: {source}")]
    InvalidConstraint { name: String, source: regex::Error },

    #[error("invalid group attributes: {0}")]
    InvalidAttributes(#[from] serde_json::Error),

    #[error("filter {name:?} is not registered")]
    UnknownFilter { name: String },
}
