//! Constants for identifier validation and URI transcoding.

/// Maximum length of a single DNS label in characters.
pub const MAX_DOMAIN_LABEL_LENGTH: usize = 63;

/// Maximum prefix length of an IPv4 network.
pub const INET_MAX_PREFIX: u8 = 32;

/// Maximum prefix length of an IPv6 network.
pub const INET6_MAX_PREFIX: u8 = 128;

/// Length of an IPv4 address in bytes.
pub const INET_BYTE_LENGTH: usize = 4;

/// Length of an IPv6 address in bytes.
pub const INET6_BYTE_LENGTH: usize = 16;

/// Lowest valid port number.
pub const MIN_PORT: u16 = 1;

/// Highest valid port number.
pub const MAX_PORT: u16 = 65535;

/// Text encoding used to interpret percent-encoded octets.
///
/// Both transcoding directions use this encoding, and peers exchanging
/// encoded URIs must agree on it.
pub const ENCODING: &str = "UTF-8";
