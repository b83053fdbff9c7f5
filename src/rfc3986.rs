//! Character classes from [RFC 3986 section 2].
//!
//! [RFC 3986 section 2]: https://datatracker.ietf.org/doc/html/rfc3986#section-2

/// A table of allowed ASCII characters.
///
/// Non-ASCII characters are never in a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table(u64, u64);

impl Table {
    /// Creates a table that allows the given ASCII bytes.
    ///
    /// # Panics
    ///
    /// Panics at compile time if any byte is not ASCII.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut table = 0u128;
        while let [cur, rem @ ..] = bytes {
            assert!(cur.is_ascii(), "cannot allow non-ASCII byte");
            table |= 1u128 << (*cur as u32);
            bytes = rem;
        }
        Self(table as u64, (table >> 64) as u64)
    }

    /// Returns a table allowing everything allowed by `self` or `other`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    /// Checks whether the ASCII byte is allowed.
    #[inline]
    #[must_use]
    pub const fn allows_ascii(self, x: u8) -> bool {
        match x {
            0..64 => self.0 & (1 << (x as u32)) != 0,
            64..128 => self.1 & (1 << ((x - 64) as u32)) != 0,
            _ => false,
        }
    }

    /// Checks whether the character is allowed.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn allows(self, ch: char) -> bool {
        ch.is_ascii() && self.allows_ascii(ch as u8)
    }
}

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: Table = Table::new(b":/?#[]@");

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")" / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: Table = Table::new(b"!$&'()*+,;=");

/// `reserved = gen-delims / sub-delims`
pub const RESERVED: Table = GEN_DELIMS.or(SUB_DELIMS);

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: Table =
    Table::new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~");

/// Returns true if `ch` is a reserved character.
#[inline]
#[must_use]
pub const fn is_reserved(ch: char) -> bool {
    RESERVED.allows(ch)
}

/// Returns true if `ch` is an unreserved character.
#[inline]
#[must_use]
pub const fn is_unreserved(ch: char) -> bool {
    UNRESERVED.allows(ch)
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Returns the two uppercase hex digits of an octet.
#[inline]
pub(crate) const fn hex_pair(x: u8) -> [char; 2] {
    [
        HEX_DIGITS[(x >> 4) as usize] as char,
        HEX_DIGITS[(x & 15) as usize] as char,
    ]
}

#[inline]
const fn hex_value(x: u8) -> Option<u8> {
    match x {
        b'0'..=b'9' => Some(x - b'0'),
        b'A'..=b'F' => Some(x - b'A' + 10),
        b'a'..=b'f' => Some(x - b'a' + 10),
        _ => None,
    }
}

/// Decodes the octet of a `%XX` escape from its two hex digits.
#[inline]
pub(crate) const fn decode_octet(hi: u8, lo: u8) -> Option<u8> {
    match (hex_value(hi), hex_value(lo)) {
        (Some(hi), Some(lo)) => Some((hi << 4) | lo),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_is_gen_and_sub_delims() {
        for ch in ":/?#[]@!$&'()*+,;=".chars() {
            assert!(is_reserved(ch), "{ch} should be reserved");
            assert!(!is_unreserved(ch), "{ch} should not be unreserved");
        }
    }

    #[test]
    fn percent_is_neither_reserved_nor_unreserved() {
        assert!(!is_reserved('%'));
        assert!(!is_unreserved('%'));
    }

    #[test]
    fn unreserved_characters() {
        for ch in "azAZ09-._~".chars() {
            assert!(is_unreserved(ch));
            assert!(!is_reserved(ch));
        }
        assert!(!is_unreserved(' '));
        assert!(!is_unreserved('é'));
        assert!(!is_reserved('é'));
    }

    #[test]
    fn high_ascii_table_half() {
        assert!(GEN_DELIMS.allows('@'));
        assert!(GEN_DELIMS.allows('['));
        assert!(!GEN_DELIMS.allows('\\'));
        assert!(!RESERVED.allows_ascii(0x7f));
        assert!(!RESERVED.allows_ascii(0xc3));
    }

    #[test]
    fn decode_octet_accepts_both_cases() {
        assert_eq!(decode_octet(b'2', b'F'), Some(0x2f));
        assert_eq!(decode_octet(b'2', b'f'), Some(0x2f));
        assert_eq!(decode_octet(b'G', b'0'), None);
        assert_eq!(decode_octet(b'%', b'0'), None);
    }

    #[test]
    fn hex_pair_is_uppercase() {
        assert_eq!(hex_pair(0x2f), ['2', 'F']);
        assert_eq!(hex_pair(0x00), ['0', '0']);
        assert_eq!(hex_pair(0xff), ['F', 'F']);
    }
}
