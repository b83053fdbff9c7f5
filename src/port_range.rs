//! Transport-layer port ranges.

use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_PORT, MIN_PORT};
use crate::dto;
use crate::error::{CorruptionError, ValidationError};
use crate::validation::{InvalidResult, MessageArg, ValidationResult};

/// Transport protocol a port range applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Protocol {
    /// Transmission Control Protocol
    Tcp,
    /// User Datagram Protocol
    Udp,
    /// Stream Control Transmission Protocol
    Sctp,
}

impl Protocol {
    /// Returns the upper-case protocol name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
            Self::Sctp => "SCTP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Tcp, Self::Udp, Self::Sctp]
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ValidationError::new(InvalidResult::new(
                    "Protocol.validate.unknown",
                    vec![MessageArg::from(s)],
                ))
            })
    }
}

/// An inclusive range of ports for one protocol, such as `8000-8080/TCP`.
///
/// # Examples
///
/// ```
/// use netid::{PortRange, Protocol};
///
/// let range = PortRange::new(8000, 8080, Protocol::Tcp).unwrap();
/// assert!(range.contains(8080));
/// assert!(!range.contains(8081));
/// assert_eq!(range.to_string(), "8000-8080/TCP");
///
/// assert!(PortRange::new(0, 80, Protocol::Udp).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortRange {
    from: u16,
    to: u16,
    protocol: Protocol,
}

impl PortRange {
    /// Validates a candidate range from raw values.
    ///
    /// Checks run in order: `from` at least 1, `from` at most 65535, `to` at
    /// least 1, `to` at most 65535, `from` not after `to`, then the protocol
    /// name.
    #[must_use]
    pub fn validate(from: i32, to: i32, protocol: &str) -> ValidationResult {
        if let Err(invalid) = check_ports(from, to) {
            return ValidationResult::Invalid(invalid);
        }
        match protocol.parse::<Protocol>() {
            Ok(_) => ValidationResult::Valid,
            Err(e) => ValidationResult::Invalid(e.into_result()),
        }
    }

    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` with the first failing port check of
    /// [`PortRange::validate`].
    pub fn new(from: i32, to: i32, protocol: Protocol) -> Result<Self, ValidationError> {
        let (from, to) = check_ports(from, to)?;
        Ok(Self { from, to, protocol })
    }

    /// Creates a range covering a single port.
    #[must_use]
    pub const fn single(port: u16, protocol: Protocol) -> Option<Self> {
        if port < MIN_PORT {
            return None;
        }
        Some(Self {
            from: port,
            to: port,
            protocol,
        })
    }

    /// Returns the first port.
    #[must_use]
    pub const fn from(&self) -> u16 {
        self.from
    }

    /// Returns the last port, inclusive.
    #[must_use]
    pub const fn to(&self) -> u16 {
        self.to
    }

    /// Returns the protocol.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Returns true if `port` lies within the range.
    #[must_use]
    pub const fn contains(&self, port: u16) -> bool {
        self.from <= port && port <= self.to
    }

    /// Returns true if the range covers exactly one port.
    #[must_use]
    pub const fn is_single_port(&self) -> bool {
        self.from == self.to
    }

    /// Returns the transport record for this range.
    #[must_use]
    pub fn to_dto(&self) -> dto::PortRange {
        dto::PortRange::new(
            i32::from(self.from),
            i32::from(self.to),
            self.protocol.as_str(),
        )
    }

    /// Rebuilds a range from a persisted record.
    ///
    /// # Errors
    ///
    /// Returns `CorruptionError` if the record no longer validates.
    pub fn restore(record: dto::PortRange) -> Result<Self, CorruptionError> {
        Self::try_from(record).map_err(|e| CorruptionError::new("PortRange", e.into_result()))
    }
}

fn check_port(
    port: i32,
    less_than_one: &'static str,
    too_big: &'static str,
) -> Result<u16, InvalidResult> {
    if port < i32::from(MIN_PORT) {
        return Err(InvalidResult::new(less_than_one, vec![port.into()]));
    }
    if port > i32::from(MAX_PORT) {
        return Err(InvalidResult::new(too_big, vec![port.into()]));
    }
    u16::try_from(port).map_err(|_| InvalidResult::new(too_big, vec![port.into()]))
}

fn check_ports(from: i32, to: i32) -> Result<(u16, u16), InvalidResult> {
    let from_port = check_port(
        from,
        "PortRange.validate.from.lessThanOne",
        "PortRange.validate.from.greaterThan64k",
    )?;
    let to_port = check_port(
        to,
        "PortRange.validate.to.lessThanOne",
        "PortRange.validate.to.greaterThan64k",
    )?;
    if from_port > to_port {
        return Err(InvalidResult::new(
            "PortRange.validate.fromGreaterThanTo",
            vec![from.into(), to.into()],
        ));
    }
    Ok((from_port, to_port))
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}/{}", self.from, self.to, self.protocol)
    }
}

impl TryFrom<dto::PortRange> for PortRange {
    type Error = ValidationError;

    fn try_from(record: dto::PortRange) -> Result<Self, Self::Error> {
        Self::validate(record.from, record.to, &record.protocol).into_result()?;
        let protocol = record.protocol.parse()?;
        Self::new(record.from, record.to, protocol)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PortRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.to_dto(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PortRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = <dto::PortRange as serde::Deserialize>::deserialize(deserializer)?;
        Self::restore(record).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(from: i32, to: i32) -> &'static str {
        PortRange::validate(from, to, "TCP")
            .as_invalid()
            .map_or("valid", |invalid| invalid.reason())
    }

    #[test]
    fn bounds() {
        assert_eq!(reason(1, 65535), "valid");
        assert_eq!(reason(0, 10), "lessThanOne");
        assert_eq!(reason(65536, 65536), "greaterThan64k");
        assert_eq!(reason(10, 0), "lessThanOne");
        assert_eq!(reason(10, 70000), "greaterThan64k");
        assert_eq!(reason(443, 80), "fromGreaterThanTo");
    }

    #[test]
    fn checks_run_in_order() {
        let result = PortRange::validate(0, 0, "UDP");
        assert_eq!(result.as_invalid().unwrap().key(), "PortRange.validate.from.lessThanOne");

        let result = PortRange::validate(70000, 0, "UDP");
        assert_eq!(
            result.as_invalid().unwrap().key(),
            "PortRange.validate.from.greaterThan64k"
        );

        let result = PortRange::validate(5, -3, "UDP");
        let invalid = result.as_invalid().unwrap();
        assert_eq!(invalid.key(), "PortRange.validate.to.lessThanOne");
        assert_eq!(invalid.args(), &[MessageArg::Int(-3)]);
    }

    #[test]
    fn protocol_checked_after_ports() {
        assert_eq!(reason(1, 2), "valid");
        let result = PortRange::validate(1, 2, "gre");
        assert_eq!(result.as_invalid().unwrap().key(), "Protocol.validate.unknown");
        let result = PortRange::validate(2, 1, "gre");
        assert_eq!(result.as_invalid().unwrap().reason(), "fromGreaterThanTo");
    }

    #[test]
    fn from_greater_than_to_carries_both() {
        let err = PortRange::new(443, 80, Protocol::Tcp).unwrap_err();
        assert_eq!(err.result().args(), &[MessageArg::Int(443), MessageArg::Int(80)]);
        assert_eq!(
            err.to_string(),
            "validation failed: from port 443 may not be greater than to port 80"
        );
    }

    #[test]
    fn contains_and_single_port() {
        let range = PortRange::new(80, 80, Protocol::Tcp).unwrap();
        assert!(range.is_single_port());
        assert!(range.contains(80));
        assert!(!range.contains(81));
        assert_eq!(PortRange::single(80, Protocol::Tcp), Some(range));
        assert_eq!(PortRange::single(0, Protocol::Tcp), None);
    }

    #[test]
    fn protocol_names() {
        assert_eq!("udp".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert_eq!("SCTP".parse::<Protocol>().unwrap(), Protocol::Sctp);
        assert_eq!(Protocol::Tcp.to_string(), "TCP");
        let err = "icmp".parse::<Protocol>().unwrap_err();
        assert_eq!(err.reason(), "unknown");
    }

    #[test]
    fn display() {
        let range = PortRange::new(1, 1024, Protocol::Udp).unwrap();
        assert_eq!(range.to_string(), "1-1024/UDP");
        assert_eq!(range.from(), 1);
        assert_eq!(range.to(), 1024);
        assert_eq!(range.protocol(), Protocol::Udp);
    }

    #[test]
    fn dto_round_trip() {
        let range = PortRange::new(8000, 8080, Protocol::Sctp).unwrap();
        let record = range.to_dto();
        assert_eq!(record, dto::PortRange::new(8000, 8080, "SCTP"));
        assert_eq!(PortRange::try_from(record).unwrap(), range);
    }

    #[test]
    fn dto_protocol_is_case_insensitive() {
        let range = PortRange::try_from(dto::PortRange::new(53, 53, "udp")).unwrap();
        assert_eq!(range.protocol(), Protocol::Udp);
    }

    #[test]
    fn restore_reports_corruption() {
        let err = PortRange::restore(dto::PortRange::new(100, 10, "TCP")).unwrap_err();
        assert_eq!(err.type_name(), "PortRange");
        assert_eq!(err.result().reason(), "fromGreaterThanTo");

        let err = PortRange::restore(dto::PortRange::default()).unwrap_err();
        assert_eq!(err.result().key(), "Protocol.validate.unknown");
    }
}
