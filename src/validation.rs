//! Validation outcomes shared by every value type.
//!
//! A validation function never formats a message itself. It returns a
//! [`ValidationResult`] holding a message key plus the ordered arguments
//! needed to render that message later, in whatever locale or channel the
//! caller uses (see [`MessageCatalog`]).

use std::fmt;

use crate::error::ValidationError;

/// Outcome of validating a raw candidate value.
///
/// # Examples
///
/// ```
/// use netid::{DomainLabel, ValidationResult};
///
/// assert!(DomainLabel::validate("example").is_valid());
///
/// let ValidationResult::Invalid(invalid) = DomainLabel::validate("-example") else {
///     panic!("expected invalid");
/// };
/// assert_eq!(invalid.key(), "DomainLabel.validate.startsDash");
/// assert_eq!(invalid.reason(), "startsDash");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The candidate satisfies every invariant.
    Valid,
    /// The candidate violates an invariant.
    Invalid(InvalidResult),
}

impl ValidationResult {
    /// Shorthand for building a [`ValidationResult::Invalid`].
    #[must_use]
    pub fn invalid(key: &'static str, args: Vec<MessageArg>) -> Self {
        Self::Invalid(InvalidResult::new(key, args))
    }

    /// Returns true for [`ValidationResult::Valid`].
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the failure details, if any.
    #[must_use]
    pub const fn as_invalid(&self) -> Option<&InvalidResult> {
        match self {
            Self::Valid => None,
            Self::Invalid(invalid) => Some(invalid),
        }
    }

    /// Converts into a `Result`, failing with a [`ValidationError`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the result is invalid.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(invalid) => Err(ValidationError::new(invalid)),
        }
    }
}

/// Why a candidate failed validation: a message key and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidResult {
    key: &'static str,
    args: Vec<MessageArg>,
}

impl InvalidResult {
    /// Creates a new invalid result.
    ///
    /// Keys are dotted paths such as `DomainLabel.validate.tooLong`.
    #[must_use]
    pub fn new(key: &'static str, args: Vec<MessageArg>) -> Self {
        debug_assert!(!key.is_empty(), "message key must not be empty");
        Self { key, args }
    }

    /// Returns the full message key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the last component of the message key, e.g. `tooLong`.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.key.rsplit('.').next().unwrap_or(self.key)
    }

    /// Returns the message arguments in substitution order.
    #[must_use]
    pub fn args(&self) -> &[MessageArg] {
        &self.args
    }

    /// Renders the message through a catalog.
    ///
    /// Placeholders `{0}`, `{1}`, ... in the template are replaced by the
    /// matching argument. A key missing from the catalog renders as the key
    /// followed by its arguments.
    #[must_use]
    pub fn render<C: MessageCatalog + ?Sized>(&self, catalog: &C) -> String {
        let Some(template) = catalog.template(self.key) else {
            if self.args.is_empty() {
                return self.key.to_string();
            }
            let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
            return format!("{}: {}", self.key, args.join(", "));
        };

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                let arg = self.args.get(index)?;
                Some((arg, close))
            });
            if let Some((arg, close)) = substituted {
                out.push_str(&arg.to_string());
                rest = &after[close + 1..];
            } else {
                out.push('{');
                rest = after;
            }
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for InvalidResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&EnglishMessages))
    }
}

/// A single message argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageArg {
    /// An integer value, such as a length or bound.
    Int(i64),
    /// A single character, such as the offending character.
    Char(char),
    /// A string value.
    Str(String),
}

impl fmt::Display for MessageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MessageArg {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for MessageArg {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u8> for MessageArg {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for MessageArg {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for MessageArg {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<char> for MessageArg {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<&str> for MessageArg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Source of message templates keyed by message key.
pub trait MessageCatalog {
    /// Returns the template for `key`, or `None` when the catalog has no entry.
    fn template(&self, key: &str) -> Option<&str>;
}

impl<F> MessageCatalog for F
where
    F: Fn(&str) -> Option<&'static str>,
{
    fn template(&self, key: &str) -> Option<&str> {
        self(key)
    }
}

/// Built-in English messages for every key this crate produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMessages;

impl MessageCatalog for EnglishMessages {
    fn template(&self, key: &str) -> Option<&str> {
        let template = match key {
            "DomainLabel.validate.invalidRange" => {
                "range {0}..{1} is not a character-aligned slice of a {2}-byte label"
            }
            "DomainLabel.validate.empty" => "domain label may not be empty",
            "DomainLabel.validate.tooLong" => {
                "domain label may not be longer than {0} characters, got {1}"
            }
            "DomainLabel.validate.startsDash" => "domain label may not start with a dash",
            "DomainLabel.validate.endsDash" => "domain label may not end with a dash",
            "DomainLabel.validate.invalidCharacter" => {
                "invalid character '{0}' at position {1} of domain label"
            }
            "AddressPrefix.validate.address.isNull" => "address required",
            "AddressPrefix.validate.prefix.lessThanZero" => "prefix may not be negative: {0}",
            "AddressPrefix.validate.prefix.tooBig" => "prefix {0} exceeds maximum of {1}",
            "AddressPrefix.parse.missingSlash" => "expected address/prefix, got '{0}'",
            "AddressPrefix.parse.invalidAddress" => "invalid IP address '{0}'",
            "AddressPrefix.parse.invalidPrefix" => "invalid prefix '{0}'",
            "PortRange.validate.from.lessThanOne" => "from port may not be less than one: {0}",
            "PortRange.validate.from.greaterThan64k" => {
                "from port may not be greater than 65535: {0}"
            }
            "PortRange.validate.to.lessThanOne" => "to port may not be less than one: {0}",
            "PortRange.validate.to.greaterThan64k" => {
                "to port may not be greater than 65535: {0}"
            }
            "PortRange.validate.fromGreaterThanTo" => {
                "from port {0} may not be greater than to port {1}"
            }
            "Protocol.validate.unknown" => "unknown protocol '{0}'",
            "AddressFamily.validate.unknown" => "unknown address family '{0}'",
            _ => return None,
        };
        Some(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_is_valid() {
        assert!(ValidationResult::Valid.is_valid());
        assert!(ValidationResult::Valid.as_invalid().is_none());
        assert!(ValidationResult::Valid.into_result().is_ok());
    }

    #[test]
    fn reason_is_last_key_component() {
        let invalid = InvalidResult::new("AddressPrefix.validate.prefix.tooBig", vec![]);
        assert_eq!(invalid.reason(), "tooBig");
    }

    #[test]
    fn render_substitutes_args_in_order() {
        let invalid = InvalidResult::new(
            "DomainLabel.validate.tooLong",
            vec![MessageArg::from(63usize), MessageArg::from(64usize)],
        );
        assert_eq!(
            invalid.render(&EnglishMessages),
            "domain label may not be longer than 63 characters, got 64"
        );
    }

    #[test]
    fn render_with_custom_catalog() {
        let catalog = |key: &str| match key {
            "DomainLabel.validate.invalidCharacter" => Some("{1}: bad char {0}"),
            _ => None,
        };
        let invalid = InvalidResult::new(
            "DomainLabel.validate.invalidCharacter",
            vec![MessageArg::from('_'), MessageArg::from(1usize)],
        );
        assert_eq!(invalid.render(&catalog), "1: bad char _");
    }

    #[test]
    fn render_unknown_key_falls_back_to_key_and_args() {
        let invalid = InvalidResult::new("Some.unknown.key", vec![MessageArg::from(-1i32)]);
        assert_eq!(invalid.render(&EnglishMessages), "Some.unknown.key: -1");
    }

    #[test]
    fn render_keeps_unmatched_braces() {
        let catalog = |_: &str| Some("{x} and {5} and {0}");
        let invalid = InvalidResult::new("k.v", vec![MessageArg::from("a")]);
        assert_eq!(invalid.render(&catalog), "{x} and {5} and a");
    }

    #[test]
    fn into_result_wraps_invalid() {
        let result = ValidationResult::invalid("DomainLabel.validate.empty", vec![]);
        let err = result.into_result().unwrap_err();
        assert_eq!(err.reason(), "empty");
        assert_eq!(
            err.to_string(),
            "validation failed: domain label may not be empty"
        );
    }
}
