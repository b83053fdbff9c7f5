//! IP address families.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::constants::{INET6_BYTE_LENGTH, INET6_MAX_PREFIX, INET_BYTE_LENGTH, INET_MAX_PREFIX};
use crate::error::ValidationError;
use crate::validation::{InvalidResult, MessageArg};

/// The family of an IP address.
///
/// # Examples
///
/// ```
/// use std::net::IpAddr;
/// use netid::AddressFamily;
///
/// let addr: IpAddr = "192.0.2.1".parse().unwrap();
/// assert_eq!(AddressFamily::of(&addr), AddressFamily::Inet);
/// assert_eq!(AddressFamily::Inet.max_prefix(), 32);
/// assert_eq!(AddressFamily::Inet6.byte_len(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum AddressFamily {
    /// Internet Protocol Version 4 (IPv4).
    Inet,
    /// Internet Protocol Version 6 (IPv6).
    Inet6,
}

impl AddressFamily {
    /// Returns the family of an address.
    #[must_use]
    pub const fn of(address: &IpAddr) -> Self {
        match address {
            IpAddr::V4(_) => Self::Inet,
            IpAddr::V6(_) => Self::Inet6,
        }
    }

    /// Returns the maximum network prefix length in bits.
    #[must_use]
    pub const fn max_prefix(self) -> u8 {
        match self {
            Self::Inet => INET_MAX_PREFIX,
            Self::Inet6 => INET6_MAX_PREFIX,
        }
    }

    /// Returns the length of an address in bytes.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        match self {
            Self::Inet => INET_BYTE_LENGTH,
            Self::Inet6 => INET6_BYTE_LENGTH,
        }
    }

    /// Returns the family name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inet => "INET",
            Self::Inet6 => "INET6",
        }
    }
}

impl From<&IpAddr> for AddressFamily {
    fn from(address: &IpAddr) -> Self {
        Self::of(address)
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressFamily {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("INET") {
            Ok(Self::Inet)
        } else if s.eq_ignore_ascii_case("INET6") {
            Ok(Self::Inet6)
        } else {
            Err(ValidationError::new(InvalidResult::new(
                "AddressFamily.validate.unknown",
                vec![MessageArg::from(s)],
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_of_address() {
        let v4: IpAddr = "10.0.0.1".parse().unwrap();
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(AddressFamily::of(&v4), AddressFamily::Inet);
        assert_eq!(AddressFamily::from(&v6), AddressFamily::Inet6);
    }

    #[test]
    fn derived_constants() {
        assert_eq!(AddressFamily::Inet.max_prefix(), 32);
        assert_eq!(AddressFamily::Inet6.max_prefix(), 128);
        assert_eq!(AddressFamily::Inet.byte_len(), 4);
        assert_eq!(AddressFamily::Inet6.byte_len(), 16);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("inet6".parse::<AddressFamily>().unwrap(), AddressFamily::Inet6);
        assert_eq!(AddressFamily::Inet.to_string(), "INET");
        let err = "IPX".parse::<AddressFamily>().unwrap_err();
        assert_eq!(err.reason(), "unknown");
    }
}
