//! Bitmap commands

use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::Arg;

/// Index unit of `BITCOUNT` / `BITPOS` ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitUnit {
    /// Byte offsets (server default)
    #[default]
    Byte,
    /// Bit offsets
    Bit,
}

/// Range of `BITCOUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCount {
    /// First index
    pub start: i64,
    /// Last index, inclusive
    pub end: i64,
    /// Unit of `start` / `end`; `None` leaves it to the server
    pub unit: Option<BitUnit>,
}

impl BitCount {
    /// A byte range
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            unit: None,
        }
    }

    /// Interpret the range in `unit`
    #[must_use]
    pub fn unit(mut self, unit: BitUnit) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// Bitwise operation of `BITOP`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `XOR`
    Xor,
    /// `NOT`, single source
    Not,
}

/// Optional range of `BITPOS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitPos {
    /// First index
    pub start: Option<i64>,
    /// Last index, requires `start`
    pub end: Option<i64>,
    /// Unit, requires `end`
    pub unit: Option<BitUnit>,
}

fn unit_arg(cmd: Cmd, unit: Option<BitUnit>) -> Cmd {
    match unit {
        Some(BitUnit::Byte) => cmd.arg("BYTE"),
        Some(BitUnit::Bit) => cmd.arg("BIT"),
        None => cmd,
    }
}

/// Count set bits, optionally within a range
pub fn bitcount(key: &str, range: Option<BitCount>) -> Cmd {
    let cmd = Cmd::new(&registry::BITCOUNT).key(key);
    match range {
        Some(r) => unit_arg(cmd.arg(r.start).arg(r.end), r.unit),
        None => cmd,
    }
}

/// `BITFIELD key` followed by raw sub-command arguments (`GET u8 0`, `INCRBY i5 100 1`)
pub fn bitfield<V: Into<Arg> + Clone>(key: &str, args: &[V]) -> Cmd {
    Cmd::new(&registry::BITFIELD)
        .key(key)
        .args(args.iter().cloned())
}

/// # Panics
///
/// When `NOT` is given other than exactly one source key.
pub fn bitop(op: BitOp, destination: &str, keys: &[&str]) -> Cmd {
    let op = match op {
        BitOp::And => "AND",
        BitOp::Or => "OR",
        BitOp::Xor => "XOR",
        BitOp::Not => {
            assert_eq!(keys.len(), 1, "BITOP NOT takes exactly one source key");
            "NOT"
        }
    };
    Cmd::new(&registry::BITOP)
        .arg(op)
        .key(destination)
        .keys(keys.iter().copied())
}

/// # Panics
///
/// When `end` is given without `start`, or `unit` without `end`.
pub fn bitpos(key: &str, bit: bool, range: BitPos) -> Cmd {
    assert!(
        range.end.is_none() || range.start.is_some(),
        "BITPOS: end requires start"
    );
    assert!(
        range.unit.is_none() || range.end.is_some(),
        "BITPOS: BYTE|BIT requires end"
    );
    let cmd = Cmd::new(&registry::BITPOS)
        .key(key)
        .arg(bit)
        .args(range.start)
        .args(range.end);
    unit_arg(cmd, range.unit)
}

/// Bit value at `offset`
pub fn getbit(key: &str, offset: i64) -> Cmd {
    Cmd::new(&registry::GETBIT).key(key).arg(offset)
}

/// Set or clear the bit at `offset`
pub fn setbit(key: &str, offset: i64, value: bool) -> Cmd {
    Cmd::new(&registry::SETBIT).key(key).arg(offset).arg(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitcount_ranges() {
        assert_eq!(bitcount("b", None).to_string(), "BITCOUNT b");
        assert_eq!(
            bitcount("b", Some(BitCount::new(1, 5).unit(BitUnit::Bit))).to_string(),
            "BITCOUNT b 1 5 BIT"
        );
    }

    #[test]
    fn test_bitop_keys() {
        let cmd = bitop(BitOp::Xor, "dst", &["a", "b"]);
        assert_eq!(cmd.to_string(), "BITOP XOR dst a b");
        assert_eq!(cmd.key_strings(), vec!["dst", "a", "b"]);
    }

    #[test]
    #[should_panic(expected = "exactly one")]
    fn test_bitop_not_arity() {
        let _ = bitop(BitOp::Not, "dst", &["a", "b"]);
    }

    #[test]
    fn test_bitpos() {
        assert_eq!(bitpos("b", true, BitPos::default()).to_string(), "BITPOS b 1");
        let range = BitPos {
            start: Some(2),
            end: Some(-1),
            unit: Some(BitUnit::Byte),
        };
        assert_eq!(bitpos("b", false, range).to_string(), "BITPOS b 0 2 -1 BYTE");
    }
}
