//! IP address and prefix-length pairs.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::address_family::AddressFamily;
use crate::dto;
use crate::error::{CorruptionError, ValidationError};
use crate::validation::{InvalidResult, MessageArg, ValidationResult};

/// An IP address paired with a network prefix length, as in `10.0.0.0/8`.
///
/// The prefix is bounded by the address family: at most 32 for IPv4 and 128
/// for IPv6. Values order by address first and prefix length second.
///
/// # Examples
///
/// ```
/// use netid::AddressPrefix;
///
/// let prefix: AddressPrefix = "192.0.2.0/24".parse().unwrap();
/// assert_eq!(prefix.prefix(), 24);
/// assert_eq!(prefix.to_string(), "192.0.2.0/24");
///
/// assert!("192.0.2.0/33".parse::<AddressPrefix>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressPrefix {
    address: IpAddr,
    prefix: u8,
}

impl AddressPrefix {
    /// Validates an address and prefix length.
    ///
    /// Fails if the address is absent, the prefix is negative, or the prefix
    /// exceeds the maximum for the address family. The `tooBig` failure
    /// carries the offending prefix and the bound.
    #[must_use]
    pub fn validate(address: Option<&IpAddr>, prefix: i32) -> ValidationResult {
        let Some(address) = address else {
            return ValidationResult::invalid("AddressPrefix.validate.address.isNull", vec![]);
        };
        match check_prefix(address, prefix) {
            Ok(_) => ValidationResult::Valid,
            Err(invalid) => ValidationResult::Invalid(invalid),
        }
    }

    /// Creates a validated prefix.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the prefix is negative or too large for
    /// the address family.
    pub fn new(address: IpAddr, prefix: i32) -> Result<Self, ValidationError> {
        let prefix = check_prefix(&address, prefix)?;
        Ok(Self { address, prefix })
    }

    /// Creates a validated prefix from an optional address; absence
    /// propagates.
    ///
    /// # Errors
    ///
    /// See [`AddressPrefix::new`].
    pub fn value_of(
        address: Option<IpAddr>,
        prefix: i32,
    ) -> Result<Option<Self>, ValidationError> {
        address.map(|address| Self::new(address, prefix)).transpose()
    }

    /// Returns the address.
    #[must_use]
    pub const fn address(&self) -> IpAddr {
        self.address
    }

    /// Returns the prefix length in bits.
    #[must_use]
    pub const fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Returns the address family.
    #[must_use]
    pub const fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.address)
    }

    /// Returns the transport record for this prefix.
    #[must_use]
    pub fn to_dto(&self) -> dto::AddressPrefix {
        dto::AddressPrefix::new(self.address.to_string(), i32::from(self.prefix))
    }

    /// Rebuilds a prefix from a persisted record.
    ///
    /// # Errors
    ///
    /// Returns `CorruptionError` if the record no longer validates.
    pub fn restore(record: dto::AddressPrefix) -> Result<Self, CorruptionError> {
        Self::try_from(record).map_err(|e| CorruptionError::new("AddressPrefix", e.into_result()))
    }
}

fn check_prefix(address: &IpAddr, prefix: i32) -> Result<u8, InvalidResult> {
    if prefix < 0 {
        return Err(InvalidResult::new(
            "AddressPrefix.validate.prefix.lessThanZero",
            vec![prefix.into()],
        ));
    }
    let max = AddressFamily::of(address).max_prefix();
    match u8::try_from(prefix) {
        Ok(bits) if bits <= max => Ok(bits),
        _ => Err(InvalidResult::new(
            "AddressPrefix.validate.prefix.tooBig",
            vec![prefix.into(), max.into()],
        )),
    }
}

fn parse_address(address: &str) -> Result<IpAddr, ValidationError> {
    address.parse().map_err(|_| {
        ValidationError::new(InvalidResult::new(
            "AddressPrefix.parse.invalidAddress",
            vec![MessageArg::from(address)],
        ))
    })
}

impl fmt::Display for AddressPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

impl FromStr for AddressPrefix {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((address, prefix)) = s.split_once('/') else {
            return Err(ValidationError::new(InvalidResult::new(
                "AddressPrefix.parse.missingSlash",
                vec![MessageArg::from(s)],
            )));
        };
        let address = parse_address(address)?;
        let prefix = prefix.parse::<i32>().map_err(|_| {
            ValidationError::new(InvalidResult::new(
                "AddressPrefix.parse.invalidPrefix",
                vec![MessageArg::from(prefix)],
            ))
        })?;
        Self::new(address, prefix)
    }
}

impl TryFrom<&str> for AddressPrefix {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<dto::AddressPrefix> for AddressPrefix {
    type Error = ValidationError;

    fn try_from(record: dto::AddressPrefix) -> Result<Self, Self::Error> {
        if record.address.is_empty() {
            return Err(ValidationError::new(InvalidResult::new(
                "AddressPrefix.validate.address.isNull",
                vec![],
            )));
        }
        Self::new(parse_address(&record.address)?, record.prefix)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AddressPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.to_dto(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AddressPrefix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = <dto::AddressPrefix as serde::Deserialize>::deserialize(deserializer)?;
        Self::restore(record).map_err(serde::de::Error::custom)
    }
}
