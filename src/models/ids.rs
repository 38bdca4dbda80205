//! Transaction identifiers and their generator.

use serde::{Deserialize, Deserializer, Serialize};

/// Default prefix for generated identifiers.
const DEFAULT_PREFIX: &str = "TX";

/// Number of base36 digits kept from the random component.
const RANDOM_DIGITS: u32 = 4;

/// Digits used for base36 rendering.
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Unique identifier for a transaction.
///
/// Always a string. Older persisted data may carry numeric identifiers;
/// those are accepted on deserialization and converted to their decimal
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Creates a new identifier from the given string.
    #[inline]
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string.
    #[inline]
    #[must_use]
    pub fn as_inner(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for TransactionId {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<String> for TransactionId {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TransactionId {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Wire forms an identifier may take in persisted data.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    /// Current string form.
    Text(String),
    /// Legacy numeric form.
    Number(u64),
}

impl<'de> Deserialize<'de> for TransactionId {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Generates [`TransactionId`]s of the form `<prefix>-<time>-<seq><rand>`.
///
/// The time component is the current Unix time in milliseconds, the
/// sequence component increments on every call, and the random component
/// separates generators started in the same millisecond. All components
/// are rendered in base36. Within one generator no identifier repeats.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    /// Leading tag of every identifier.
    prefix: String,
    /// Calls made so far.
    sequence: u64,
}

impl Default for IdGenerator {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl IdGenerator {
    /// Creates a generator using the given prefix.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>>(prefix: T) -> Self {
        Self {
            prefix: prefix.into(),
            sequence: 0,
        }
    }

    /// Returns the next identifier.
    #[inline]
    pub fn next_id(&mut self) -> TransactionId {
        let millis = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        self.sequence = self.sequence.wrapping_add(1);
        let random = uuid::Uuid::new_v4().as_u128() % 36_u128.pow(RANDOM_DIGITS);
        TransactionId(format!(
            "{}-{}-{}{:0>width$}",
            self.prefix,
            base36(u128::from(millis)),
            base36(u128::from(self.sequence)),
            base36(random),
            width = RANDOM_DIGITS as usize,
        ))
    }
}

/// Renders `value` in lowercase base36.
fn base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or_default();
        digits.push(BASE36_DIGITS.get(digit).copied().unwrap_or(b'0'));
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn string_id_serde_roundtrip() {
        let id = TransactionId::new("TX-lq2x8k3a-1abcd".to_owned());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""TX-lq2x8k3a-1abcd""#);
        let deserialized: TransactionId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn numeric_id_is_read_as_text() {
        let id: TransactionId = serde_json::from_str("1700000000123").unwrap();
        assert_eq!(id.as_inner(), "1700000000123");
    }

    #[test]
    fn id_display() {
        let id = TransactionId::from("abc-123");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(id.into_inner(), "abc-123");
    }

    #[test]
    fn base36_rendering() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1_295), "zz");
    }

    #[test]
    fn generated_ids_have_prefix_and_parts() {
        let mut generator = IdGenerator::new("TX");
        let id = generator.next_id();
        let parts: Vec<&str> = id.as_inner().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TX");
        assert!(parts[2].starts_with('1'));
    }

    #[test]
    fn thousand_ids_are_distinct() {
        let mut generator = IdGenerator::default();
        let ids: HashSet<TransactionId> = (0..1000).map(|_| generator.next_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
