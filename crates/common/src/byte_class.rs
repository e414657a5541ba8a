//! Byte classes: immutable sets of byte values tested one input byte at a time.
//!
//! A class is a 256-bit bitmap. Every constructor is a `const fn`, so grammars
//! declare their classes as constants instead of generating tables at runtime.

use std::fmt;

/// An immutable set of allowed byte values.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteClass {
    bits: [u64; 4],
}

impl ByteClass {
    /// The class containing no bytes.
    pub const EMPTY: ByteClass = ByteClass { bits: [0; 4] };

    /// The class containing every byte.
    pub const ANY: ByteClass = ByteClass {
        bits: [u64::MAX; 4],
    };

    /// ASCII decimal digits `0-9`.
    pub const DIGIT: ByteClass = ByteClass::range(b'0', b'9');

    /// ASCII hex digits, either case.
    pub const HEX_DIGIT: ByteClass = ByteClass::range(b'0', b'9')
        .union(ByteClass::range(b'a', b'f'))
        .union(ByteClass::range(b'A', b'F'));

    /// The inclusive range `lo..=hi`. Empty when `lo > hi`.
    pub const fn range(lo: u8, hi: u8) -> Self {
        let mut bits = [0u64; 4];
        let mut b = lo as usize;
        while b <= hi as usize {
            bits[b >> 6] |= 1 << (b & 63);
            b += 1;
        }
        ByteClass { bits }
    }

    /// Exactly the bytes listed.
    pub const fn from_bytes(bytes: &[u8]) -> Self {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i] as usize;
            bits[b >> 6] |= 1 << (b & 63);
            i += 1;
        }
        ByteClass { bits }
    }

    /// A class holding the single byte `b`.
    pub const fn single(b: u8) -> Self {
        ByteClass::range(b, b)
    }

    /// Every byte in `self` or `other`.
    pub const fn union(self, other: ByteClass) -> Self {
        ByteClass {
            bits: [
                self.bits[0] | other.bits[0],
                self.bits[1] | other.bits[1],
                self.bits[2] | other.bits[2],
                self.bits[3] | other.bits[3],
            ],
        }
    }

    /// `self` with every byte of `other` removed.
    pub const fn without(self, other: ByteClass) -> Self {
        ByteClass {
            bits: [
                self.bits[0] & !other.bits[0],
                self.bits[1] & !other.bits[1],
                self.bits[2] & !other.bits[2],
                self.bits[3] & !other.bits[3],
            ],
        }
    }

    /// `self` with the listed bytes removed.
    pub const fn without_bytes(self, bytes: &[u8]) -> Self {
        self.without(ByteClass::from_bytes(bytes))
    }

    /// `self` with the inclusive range `lo..=hi` removed.
    pub const fn without_range(self, lo: u8, hi: u8) -> Self {
        self.without(ByteClass::range(lo, hi))
    }

    /// Whether `b` is a member.
    #[inline]
    pub const fn contains(&self, b: u8) -> bool {
        self.bits[(b >> 6) as usize] & (1 << (b & 63)) != 0
    }

    /// Number of member bytes.
    pub const fn len(&self) -> usize {
        (self.bits[0].count_ones()
            + self.bits[1].count_ones()
            + self.bits[2].count_ones()
            + self.bits[3].count_ones()) as usize
    }

    /// Whether the class has no members.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether no byte belongs to both classes.
    pub const fn is_disjoint(&self, other: &ByteClass) -> bool {
        self.bits[0] & other.bits[0] == 0
            && self.bits[1] & other.bits[1] == 0
            && self.bits[2] & other.bits[2] == 0
            && self.bits[3] & other.bits[3] == 0
    }

    /// Member bytes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=255u8).filter(move |&b| self.contains(b))
    }

    /// Length of the run of member bytes at the start of `input`.
    #[inline]
    pub fn run_len(&self, input: &[u8]) -> usize {
        input.iter().take_while(|&&b| self.contains(b)).count()
    }
}

impl Default for ByteClass {
    fn default() -> Self {
        ByteClass::EMPTY
    }
}

/// Prints members as compact ranges, e.g. `[0x30-0x39 0x41]`.
impl fmt::Debug for ByteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut first = true;
        let mut b: u16 = 0;
        while b < 256 {
            if !self.contains(b as u8) {
                b += 1;
                continue;
            }
            let start = b;
            while b + 1 < 256 && self.contains((b + 1) as u8) {
                b += 1;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if start == b {
                write!(f, "{start:#04x}")?;
            } else {
                write!(f, "{start:#04x}-{b:#04x}")?;
            }
            b += 1;
        }
        write!(f, "]")
    }
}
