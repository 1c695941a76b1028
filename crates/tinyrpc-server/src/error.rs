use thiserror::Error;

/// Why a method could not be registered. Failed registrations leave the
/// registry untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("method registry is full ({capacity} methods)")]
    Full { capacity: usize },

    #[error("method name is {len} bytes, limit is {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("method name is empty")]
    EmptyName,

    #[error("method name '{0}' is in the reserved __rpc. namespace")]
    Reserved(String),
}
