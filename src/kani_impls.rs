//! Kani Arbitrary implementations and proof harnesses.
//!
//! Kani is not a Cargo dependency. Install and run with:
//!
//! ```bash
//! cargo install --locked kani-verifier
//! cargo kani setup
//! cargo kani
//! ```
//!
//! This module is only compiled when using Kani (`#[cfg(kani)]`).

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::{AddressPrefix, DomainLabel, PortRange, Protocol, decode_uri, decode_uri_component};

/// Valid characters for the inside of a domain label
const LABEL_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-";

/// Valid first and last characters of a domain label
const LABEL_BOUNDARY_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn pick(chars: &[u8]) -> char {
    let idx: usize = kani::any();
    chars[idx % chars.len()] as char
}

impl kani::Arbitrary for DomainLabel {
    fn any() -> Self {
        // 1-6 chars for tractability
        let len: usize = kani::any();
        let len = 1 + (len % 6);

        let label: String = (0..len)
            .map(|i| {
                if i == 0 || i == len - 1 {
                    pick(LABEL_BOUNDARY_CHARS)
                } else {
                    pick(LABEL_CHARS)
                }
            })
            .collect();

        DomainLabel::parse(&label).expect("valid label by construction")
    }
}

impl kani::Arbitrary for AddressPrefix {
    fn any() -> Self {
        let v4: bool = kani::any();
        let address = if v4 {
            IpAddr::V4(Ipv4Addr::from(kani::any::<u32>()))
        } else {
            IpAddr::V6(Ipv6Addr::from(kani::any::<u128>()))
        };
        let prefix: u8 = kani::any();
        let max = if v4 { 32 } else { 128 };
        kani::assume(prefix <= max);

        AddressPrefix::new(address, i32::from(prefix)).expect("valid prefix by construction")
    }
}

impl kani::Arbitrary for Protocol {
    fn any() -> Self {
        match kani::any::<u8>() % 3 {
            0 => Protocol::Tcp,
            1 => Protocol::Udp,
            _ => Protocol::Sctp,
        }
    }
}

impl kani::Arbitrary for PortRange {
    fn any() -> Self {
        let from: u16 = kani::any();
        let to: u16 = kani::any();
        kani::assume(from >= 1 && from <= to);

        PortRange::new(i32::from(from), i32::from(to), kani::any())
            .expect("valid range by construction")
    }
}

// ============================================================================
// Kani Proof Harnesses
// ============================================================================

/// Proof: Every constructed label re-validates
#[kani::proof]
#[kani::unwind(8)]
fn proof_label_revalidates() {
    let label: DomainLabel = kani::any();
    assert!(DomainLabel::validate(label.as_str()).is_valid());
}

/// Proof: Equality agrees with the lower-case forms
#[kani::proof]
#[kani::unwind(8)]
fn proof_label_eq_is_case_insensitive() {
    let a: DomainLabel = kani::any();
    let b: DomainLabel = kani::any();
    assert_eq!(a == b, a.to_lower_case() == b.to_lower_case());
}

/// Proof: A label never starts or ends with a dash
#[kani::proof]
#[kani::unwind(8)]
fn proof_label_dash_rules() {
    let c0 = pick(LABEL_CHARS);
    let c1 = pick(LABEL_CHARS);
    let c2 = pick(LABEL_CHARS);
    let s: String = [c0, c1, c2].iter().collect();
    let valid = DomainLabel::validate(&s).is_valid();
    assert_eq!(valid, c0 != '-' && c2 != '-');
}

/// Proof: The prefix never exceeds the family maximum
#[kani::proof]
fn proof_prefix_within_family_bound() {
    let prefix: AddressPrefix = kani::any();
    assert!(prefix.prefix() <= prefix.family().max_prefix());
}

/// Proof: Validation and construction agree for IPv4
#[kani::proof]
fn proof_prefix_validate_matches_new() {
    let address = IpAddr::V4(Ipv4Addr::from(kani::any::<u32>()));
    let prefix: i32 = kani::any();
    let valid = AddressPrefix::validate(Some(&address), prefix).is_valid();
    assert_eq!(valid, AddressPrefix::new(address, prefix).is_ok());
    assert_eq!(valid, (0..=32).contains(&prefix));
}

/// Proof: A range contains both of its ends
#[kani::proof]
fn proof_port_range_contains_ends() {
    let range: PortRange = kani::any();
    assert!(range.contains(range.from()));
    assert!(range.contains(range.to()));
    assert!(!range.contains(0));
}

/// Proof: Text without escapes decodes to itself
#[kani::proof]
#[kani::unwind(6)]
fn proof_decode_without_escapes_is_identity() {
    let bytes: [u8; 4] = kani::any();
    kani::assume(bytes.iter().all(|&b| b.is_ascii() && b != b'%'));
    let s = std::str::from_utf8(&bytes).expect("ascii");
    assert_eq!(decode_uri(s).expect("no escapes"), s);
    assert_eq!(decode_uri_component(s).expect("no escapes"), s);
}
