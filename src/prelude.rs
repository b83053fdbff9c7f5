//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use netid::prelude::*;
//!
//! let label = DomainLabel::parse("www").unwrap();
//! assert!(DomainLabel::validate(label.as_str()).is_valid());
//! ```
//!
//! Transport records stay under [`crate::dto`] because their names match the
//! value types.

pub use crate::{
    // Value types
    AddressFamily, AddressPrefix, DomainLabel, InternRegistry, PortRange, Protocol,
    // Validation
    EnglishMessages, InvalidResult, MessageArg, MessageCatalog, ValidationResult,
    // Errors
    CorruptionError, UriError, ValidationError,
    // Transcoding
    Encoder, decode_uri, decode_uri_component, encode_uri, encode_uri_component,
    // Constants
    ENCODING, INET6_MAX_PREFIX, INET_MAX_PREFIX, MAX_DOMAIN_LABEL_LENGTH, MAX_PORT, MIN_PORT,
};
