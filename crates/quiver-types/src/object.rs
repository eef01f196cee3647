use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of an object within a world.
///
/// Valid identifiers are strictly positive. The value `0` is reserved as the
/// "unset" sentinel used by link records for plain nodes; see
/// [`ObjectId::null`]. Identifiers render as zero-padded, 8-digit lowercase
/// hex (wider values keep all their digits).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    /// The null identifier. Represents "no object".
    pub const fn null() -> Self {
        Self(0)
    }

    /// Wrap a raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns `true` if this is the null identifier.
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// The raw integer value.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The identifier following this one.
    ///
    /// Panics if the identifier space is exhausted.
    pub fn next(&self) -> Self {
        self.checked_next()
            .expect("object identifier space exhausted")
    }

    /// The identifier following this one, or `None` at `u64::MAX`.
    pub const fn checked_next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    /// Fixed-width hex rendering, e.g. `0000002a`.
    pub fn to_hex(&self) -> String {
        format!("{:08x}", self.0)
    }

    /// Parse from hex text of any width. Upper and lower case are accepted.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHex(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| TypeError::OutOfRange(s.to_string()))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<u64> for ObjectId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<ObjectId> for u64 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn null_is_zero() {
        assert!(ObjectId::null().is_null());
        assert!(!ObjectId::new(1).is_null());
        assert_eq!(ObjectId::default(), ObjectId::null());
    }

    #[test]
    fn hex_is_zero_padded_to_eight_digits() {
        assert_eq!(ObjectId::new(1).to_hex(), "00000001");
        assert_eq!(ObjectId::new(0xabc).to_hex(), "00000abc");
        assert_eq!(ObjectId::null().to_hex(), "00000000");
    }

    #[test]
    fn wide_values_keep_all_digits() {
        assert_eq!(ObjectId::new(0x1_0000_0000).to_hex(), "100000000");
    }

    #[test]
    fn display_matches_hex() {
        let id = ObjectId::new(42);
        assert_eq!(format!("{id}"), "0000002a");
        assert_eq!(format!("{id:?}"), "ObjectId(0000002a)");
    }

    #[test]
    fn parse_accepts_any_width_and_case() {
        assert_eq!(ObjectId::from_hex("2a").unwrap(), ObjectId::new(42));
        assert_eq!(ObjectId::from_hex("0000002A").unwrap(), ObjectId::new(42));
        assert_eq!("ff".parse::<ObjectId>().unwrap(), ObjectId::new(255));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(ObjectId::from_hex(""), Err(TypeError::InvalidHex(_))));
        assert!(matches!(ObjectId::from_hex("xyz"), Err(TypeError::InvalidHex(_))));
        assert!(matches!(ObjectId::from_hex("+1"), Err(TypeError::InvalidHex(_))));
        assert!(matches!(ObjectId::from_hex(".meta"), Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn parse_rejects_overflow() {
        let too_wide = "1".repeat(17);
        assert!(matches!(
            ObjectId::from_hex(&too_wide),
            Err(TypeError::OutOfRange(_))
        ));
    }

    #[test]
    fn next_increments() {
        assert_eq!(ObjectId::null().next(), ObjectId::new(1));
        assert_eq!(ObjectId::new(9).next(), ObjectId::new(10));
    }

    #[test]
    fn checked_next_stops_at_the_last_identifier() {
        assert_eq!(ObjectId::new(1).checked_next(), Some(ObjectId::new(2)));
        assert_eq!(ObjectId::new(u64::MAX).checked_next(), None);
    }

    #[test]
    fn ordering_follows_value() {
        assert!(ObjectId::new(2) < ObjectId::new(0x10));
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&ObjectId::new(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ObjectId::new(7));
    }

    proptest! {
        #[test]
        fn hex_rendering_parses_back(raw in any::<u64>()) {
            let id = ObjectId::new(raw);
            prop_assert_eq!(ObjectId::from_hex(&id.to_hex()).unwrap(), id);
        }
    }
}
