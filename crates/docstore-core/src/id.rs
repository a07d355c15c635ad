//! Resource identifier generation
//!
//! Identifiers are 32 lowercase hexadecimal characters. The default source
//! is a v4 UUID (OS randomness) rendered without hyphens.

use uuid::Uuid;

/// Length of every generated identifier
pub const ID_LEN: usize = 32;

/// Source of fresh resource identifiers
///
/// Implementations must return `ID_LEN` lowercase hex characters with
/// negligible collision probability at the expected table scale.
pub trait IdGenerator {
    fn generate(&self) -> String;
}

/// Default generator backed by random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        generate_id()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Generate a fresh identifier
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Check that a string has the shape of a generated identifier
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
