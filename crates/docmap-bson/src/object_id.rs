//! 12-byte object identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// ObjectId (12 bytes: 4-byte timestamp + 5-byte process id + 3-byte counter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Assembles an id from its three components. `process` keeps its low
    /// 40 bits and `counter` its low 24 bits.
    pub fn from_parts(timestamp: u32, process: u64, counter: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(&process.to_be_bytes()[3..8]);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Seconds since the Unix epoch encoded in the leading four bytes.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Parses 24 hex characters (either case).
    pub fn parse_str(s: &str) -> Result<Self, ValueError> {
        if s.len() != 24 {
            return Err(ValueError::InvalidObjectId(s.to_owned()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ValueError::InvalidObjectId(s.to_owned()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_packs_big_endian_components() {
        let id = ObjectId::from_parts(0x5f3a_1b2c, 0x0102_0304_05, 0x0a0b0c);
        assert_eq!(id.to_hex(), "5f3a1b2c01020304050a0b0c");
        assert_eq!(id.timestamp(), 0x5f3a_1b2c);
    }

    #[test]
    fn parse_accepts_upper_case_and_renders_lower_case() {
        let id: ObjectId = "5F3A1B2C01020304050A0B0C".parse().unwrap();
        assert_eq!(id.to_string(), "5f3a1b2c01020304050a0b0c");
    }

    #[test]
    fn parse_rejects_bad_length_and_digits() {
        assert!(ObjectId::parse_str("abc").is_err());
        assert!(ObjectId::parse_str("zz3a1b2c01020304050a0b0c").is_err());
    }
}
