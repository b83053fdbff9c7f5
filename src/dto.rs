//! Plain transport records for crossing serialization boundaries.
//!
//! These records carry raw field values without any validation. Converting
//! one back into its value type always re-runs full validation: through
//! `TryFrom` for records supplied by a caller, or through `restore` for
//! records loaded from storage.

/// Transport form of [`crate::DomainLabel`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainLabel {
    /// The label in its original case
    pub label: String,
}

impl DomainLabel {
    /// Creates a record.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Transport form of [`crate::AddressPrefix`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressPrefix {
    /// The address in textual form; empty when absent
    pub address: String,
    /// The prefix length in bits
    pub prefix: i32,
}

impl AddressPrefix {
    /// Creates a record.
    #[must_use]
    pub fn new(address: impl Into<String>, prefix: i32) -> Self {
        Self {
            address: address.into(),
            prefix,
        }
    }
}

/// Transport form of [`crate::PortRange`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortRange {
    /// First port of the range
    pub from: i32,
    /// Last port of the range, inclusive
    pub to: i32,
    /// Protocol name, such as `TCP` or `UDP`
    pub protocol: String,
}

impl PortRange {
    /// Creates a record.
    #[must_use]
    pub fn new(from: i32, to: i32, protocol: impl Into<String>) -> Self {
        Self {
            from,
            to,
            protocol: protocol.into(),
        }
    }
}
