/// Errors produced while binding arguments or deriving a cache key.
///
/// These are programmer errors (a call that does not match the declared
/// signature, or a key rule that asks for a parameter that does not exist).
/// They surface from the call that triggers them, never at wrap time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoError {
    #[error("{function}() takes {expected} arguments but {given} were given")]
    TooManyArguments {
        function: String,
        expected: usize,
        given: usize,
    },

    #[error("{function}() got an unexpected keyword argument `{name}`")]
    UnexpectedKeyword { function: String, name: String },

    #[error("{function}() got multiple values for argument `{name}`")]
    DuplicateArgument { function: String, name: String },

    #[error("{function}() missing required argument `{name}`")]
    MissingArgument { function: String, name: String },

    #[error("key rule references undeclared parameter `{name}`")]
    UnknownParameter { name: String },

    #[error("failed to derive cache key: {message}")]
    KeyDerivation { message: String },
}

impl MemoError {
    /// Convenience constructor for key extractors that need to reject an argument.
    pub fn key_derivation(message: impl Into<String>) -> Self {
        Self::KeyDerivation {
            message: message.into(),
        }
    }
}
