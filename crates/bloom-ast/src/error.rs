//! Syntax tree error types.

use thiserror::Error;

/// Errors raised while working with rule-block syntax trees.
#[derive(Debug, Error)]
pub enum AstError {
    /// The tree contains a construct that cannot be printed back as source.
    #[error("Cannot render syntax tree: {0}")]
    Unrenderable(String),

    /// An AST source was handed a block it cannot accept.
    #[error("Invalid rule block '{block}' on '{type_name}': {reason}")]
    InvalidBlock {
        type_name: String,
        block: String,
        reason: String,
    },
}

/// Result type for syntax tree operations.
pub type AstResult<T> = Result<T, AstError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = AstError::Unrenderable("opaque node".into());
        assert!(e.to_string().contains("opaque node"));

        let e = AstError::InvalidBlock {
            type_name: "Delivery".into(),
            block: "snd".into(),
            reason: "name mismatch".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("snd"));
        assert!(msg.contains("Delivery"));
    }
}
