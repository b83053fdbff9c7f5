//! Validated network identifiers and a byte-exact URI transcoder.
//!
//! This crate provides immutable value types for DNS labels, IP address
//! prefixes, and port ranges, plus functions that convert URI text between
//! RFC 3986 percent-encoded form and RFC 3987 Unicode display form.
//!
//! # Value types
//!
//! Every value type follows the same discipline:
//!
//! - a `validate` function that returns a [`ValidationResult`] (a message
//!   key plus arguments, never a formatted message),
//! - a factory (`parse`/`new`) that fails with a [`ValidationError`],
//! - a transport record in [`dto`] whose conversion back re-runs validation;
//!   `restore` reports persisted-data failures as a [`CorruptionError`].
//!
//! ```rust
//! use netid::{AddressPrefix, DomainLabel, PortRange, Protocol};
//!
//! let label = DomainLabel::parse("Mail").unwrap();
//! assert_eq!(label, DomainLabel::parse("mail").unwrap());
//!
//! let prefix: AddressPrefix = "10.0.0.0/8".parse().unwrap();
//! assert_eq!(prefix.prefix(), 8);
//!
//! let ports = PortRange::new(8000, 8080, Protocol::Tcp).unwrap();
//! assert!(ports.contains(8008));
//! ```
//!
//! # URI transcoding
//!
//! [`decode_uri`] turns escapes back into characters but leaves escapes of
//! reserved characters alone, so the result means the same URI.
//! [`decode_uri_component`] decodes everything. The encode functions go the
//! other way.
//!
//! ```rust
//! use netid::{decode_uri, decode_uri_component, encode_uri};
//!
//! assert_eq!(decode_uri("/caf%C3%A9?q=a%26b").unwrap(), "/café?q=a%26b");
//! assert_eq!(decode_uri_component("a%26b").unwrap(), "a&b");
//! assert_eq!(encode_uri("/café?q=a%26b"), "/caf%C3%A9?q=a%26b");
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the value types and records.
//!   Value types serialize as their record and re-validate on load.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod address_family;
mod address_prefix;
mod constants;
mod domain_label;
pub mod dto;
mod error;
#[cfg(kani)]
mod kani_impls;
mod port_range;
pub mod prelude;
pub mod rfc3986;
mod transcode;
mod validation;

pub use address_family::AddressFamily;
pub use address_prefix::AddressPrefix;
pub use constants::{
    ENCODING, INET6_BYTE_LENGTH, INET6_MAX_PREFIX, INET_BYTE_LENGTH, INET_MAX_PREFIX,
    MAX_DOMAIN_LABEL_LENGTH, MAX_PORT, MIN_PORT,
};
pub use domain_label::{DomainLabel, InternRegistry};
pub use error::{CorruptionError, UriError, ValidationError};
pub use port_range::{PortRange, Protocol};
pub use transcode::{
    Encoder, decode_uri, decode_uri_component, decode_uri_component_opt, decode_uri_component_to,
    decode_uri_component_with, decode_uri_opt, decode_uri_to, decode_uri_with, encode_uri,
    encode_uri_component, encode_uri_component_to, encode_uri_component_with, encode_uri_to,
    encode_uri_with,
};
pub use validation::{
    EnglishMessages, InvalidResult, MessageArg, MessageCatalog, ValidationResult,
};
