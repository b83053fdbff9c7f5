//! DNS domain labels.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::str::FromStr;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::constants::MAX_DOMAIN_LABEL_LENGTH;
use crate::dto;
use crate::error::{CorruptionError, ValidationError};
use crate::validation::{MessageArg, ValidationResult};

/// A validated DNS label, such as `www` in `www.example.com`.
///
/// Labels are 1 to 63 ASCII letters, digits, and hyphens, and may not start
/// or end with a hyphen. The original case is kept for display, but
/// equality, hashing, and ordering ignore case.
///
/// # Examples
///
/// ```
/// use netid::DomainLabel;
///
/// let label = DomainLabel::parse("Example").unwrap();
/// assert_eq!(label.as_str(), "Example");
/// assert_eq!(label.to_lower_case(), "example");
/// assert_eq!(label, DomainLabel::parse("EXAMPLE").unwrap());
///
/// assert!(DomainLabel::parse("-example").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DomainLabel {
    label: Arc<str>,
    lower: Arc<str>,
}

impl DomainLabel {
    /// Validates a candidate label.
    ///
    /// Checks run in order and the first failure is reported: empty, too
    /// long, a character that is not an ASCII letter, digit, or hyphen (the
    /// leftmost one), a leading hyphen, then a trailing hyphen.
    #[must_use]
    pub fn validate(label: &str) -> ValidationResult {
        Self::validate_range(label, 0..label.len())
    }

    /// Validates the part of `label` within `range` (byte offsets).
    ///
    /// Positions in the returned arguments are relative to the start of the
    /// range. A range that is out of bounds or not on character boundaries
    /// is reported as `invalidRange` with its start, end, and the byte length
    /// of `label`.
    #[must_use]
    pub fn validate_range(label: &str, range: Range<usize>) -> ValidationResult {
        let Some(candidate) = label.get(range.clone()) else {
            return ValidationResult::invalid(
                "DomainLabel.validate.invalidRange",
                vec![range.start.into(), range.end.into(), label.len().into()],
            );
        };

        let len = candidate.chars().count();
        if len == 0 {
            return ValidationResult::invalid("DomainLabel.validate.empty", vec![]);
        }
        if len > MAX_DOMAIN_LABEL_LENGTH {
            return ValidationResult::invalid(
                "DomainLabel.validate.tooLong",
                vec![MAX_DOMAIN_LABEL_LENGTH.into(), len.into()],
            );
        }

        for (pos, ch) in candidate.char_indices() {
            if ch != '-' && !ch.is_ascii_alphanumeric() {
                // Every character before this one is ASCII, so the byte
                // offset is also the character position.
                return ValidationResult::invalid(
                    "DomainLabel.validate.invalidCharacter",
                    vec![MessageArg::from(ch), pos.into()],
                );
            }
        }
        if candidate.starts_with('-') {
            return ValidationResult::invalid("DomainLabel.validate.startsDash", vec![]);
        }
        if candidate.ends_with('-') {
            return ValidationResult::invalid("DomainLabel.validate.endsDash", vec![]);
        }
        ValidationResult::Valid
    }

    /// Parses and validates a label.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` with the first failing check of
    /// [`DomainLabel::validate`].
    pub fn parse(label: &str) -> Result<Self, ValidationError> {
        Self::validate(label).into_result()?;
        Ok(Self {
            label: Arc::from(label),
            lower: Arc::from(label.to_ascii_lowercase()),
        })
    }

    /// Parses an optional label; absence propagates.
    ///
    /// # Errors
    ///
    /// See [`DomainLabel::parse`].
    pub fn value_of(label: Option<&str>) -> Result<Option<Self>, ValidationError> {
        label.map(Self::parse).transpose()
    }

    /// Returns the label in its original case.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// Returns the lower-case form of the label.
    ///
    /// After interning into the same registry, labels that are equal ignoring
    /// case share one lower-case allocation (see
    /// [`DomainLabel::lower_ptr_eq`]).
    #[must_use]
    pub fn to_lower_case(&self) -> &str {
        &self.lower
    }

    /// Returns true if both values are the same interned instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.label, &other.label) && Arc::ptr_eq(&self.lower, &other.lower)
    }

    /// Returns true if both values share the same lower-case allocation.
    ///
    /// Implies equality; the reverse holds for labels interned into the same
    /// registry.
    #[must_use]
    pub fn lower_ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.lower, &other.lower)
    }

    /// Returns the shared instance of this label from the process-wide
    /// registry, registering it first if needed.
    #[must_use]
    pub fn intern(&self) -> Self {
        InternRegistry::global().intern(self)
    }

    /// Returns the shared instance of this label from `registry`.
    #[must_use]
    pub fn intern_in(&self, registry: &InternRegistry) -> Self {
        registry.intern(self)
    }

    /// Returns the transport record for this label.
    #[must_use]
    pub fn to_dto(&self) -> dto::DomainLabel {
        dto::DomainLabel::new(self.as_str())
    }

    /// Rebuilds a label from a persisted record.
    ///
    /// # Errors
    ///
    /// Returns `CorruptionError` if the record no longer validates.
    pub fn restore(record: dto::DomainLabel) -> Result<Self, CorruptionError> {
        Self::parse(&record.label)
            .map_err(|e| CorruptionError::new("DomainLabel", e.into_result()))
    }
}

impl PartialEq for DomainLabel {
    fn eq(&self, other: &Self) -> bool {
        self.lower_ptr_eq(other) || self.lower == other.lower
    }
}

impl Eq for DomainLabel {}

impl Hash for DomainLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower.hash(state);
    }
}

impl PartialOrd for DomainLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DomainLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.lower_ptr_eq(other) {
            return Ordering::Equal;
        }
        self.lower.cmp(&other.lower)
    }
}

impl fmt::Display for DomainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for DomainLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for DomainLabel {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<dto::DomainLabel> for DomainLabel {
    type Error = ValidationError;

    fn try_from(record: dto::DomainLabel) -> Result<Self, Self::Error> {
        Self::parse(&record.label)
    }
}

impl AsRef<str> for DomainLabel {
    fn as_ref(&self) -> &str {
        &self.label
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DomainLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.to_dto(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DomainLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = <dto::DomainLabel as serde::Deserialize>::deserialize(deserializer)?;
        Self::restore(record).map_err(serde::de::Error::custom)
    }
}

/// A registry of shared [`DomainLabel`] instances.
///
/// Interning collapses equal labels onto one instance so callers can compare
/// by identity. Entries are keyed by the label's exact original case; labels
/// that differ only in case get separate entries that share one lower-case
/// allocation. Entries are never evicted.
///
/// Concurrent calls follow put-if-absent semantics: the first caller to
/// register a label wins and every caller receives the winning instance.
///
/// # Examples
///
/// ```
/// use netid::{DomainLabel, InternRegistry};
///
/// let registry = InternRegistry::new();
/// let a = DomainLabel::parse("Example").unwrap().intern_in(&registry);
/// let b = DomainLabel::parse("Example").unwrap().intern_in(&registry);
/// assert!(a.ptr_eq(&b));
/// ```
#[derive(Debug, Default)]
pub struct InternRegistry {
    inner: RwLock<Interned>,
}

#[derive(Debug, Default)]
struct Interned {
    labels: HashMap<Arc<str>, DomainLabel>,
    lowers: HashSet<Arc<str>>,
}

impl InternRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<InternRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the shared instance for `label`, registering it if absent.
    #[must_use]
    pub fn intern(&self, label: &DomainLabel) -> DomainLabel {
        if let Some(existing) = self.read().labels.get(label.as_str()) {
            return existing.clone();
        }

        let mut guard = self.write();
        let Interned { labels, lowers } = &mut *guard;
        if let Some(existing) = labels.get(label.as_str()) {
            return existing.clone();
        }

        let lower = if let Some(shared) = lowers.get(label.to_lower_case()) {
            Arc::clone(shared)
        } else {
            lowers.insert(Arc::clone(&label.lower));
            Arc::clone(&label.lower)
        };
        let canonical = DomainLabel {
            label: Arc::clone(&label.label),
            lower,
        };
        labels.insert(Arc::clone(&canonical.label), canonical.clone());
        tracing::trace!(label = %canonical, entries = labels.len(), "interned domain label");
        canonical
    }

    /// Returns the registered instance for an exact label, if any.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<DomainLabel> {
        self.read().labels.get(label).cloned()
    }

    /// Returns the number of registered labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().labels.len()
    }

    /// Returns true if no label has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().labels.is_empty()
    }

    // A panic while holding the lock cannot leave the maps inconsistent:
    // every write is a single insert.
    fn read(&self) -> RwLockReadGuard<'_, Interned> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Interned> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::thread;

    fn reason(label: &str) -> &'static str {
        DomainLabel::validate(label)
            .as_invalid()
            .map_or("valid", |invalid| invalid.reason())
    }

    #[test]
    fn single_character_is_valid() {
        assert!(DomainLabel::validate("a").is_valid());
        assert!(DomainLabel::validate("7").is_valid());
    }

    #[test]
    fn max_length_is_valid() {
        assert!(DomainLabel::validate(&"a".repeat(63)).is_valid());
    }

    #[test]
    fn empty_is_invalid() {
        assert_eq!(reason(""), "empty");
    }

    #[test]
    fn too_long_reports_bound_and_length() {
        let result = DomainLabel::validate(&"a".repeat(64));
        let invalid = result.as_invalid().unwrap();
        assert_eq!(invalid.key(), "DomainLabel.validate.tooLong");
        assert_eq!(invalid.args(), &[MessageArg::Int(63), MessageArg::Int(64)]);
    }

    #[test]
    fn dash_positions() {
        assert_eq!(reason("-a"), "startsDash");
        assert_eq!(reason("a-"), "endsDash");
        assert_eq!(reason("-"), "startsDash");
        assert_eq!(reason("a-b"), "valid");
        assert_eq!(reason("xn--bcher-kva"), "valid");
    }

    #[test]
    fn invalid_character_reports_char_and_position() {
        let result = DomainLabel::validate("a_b");
        let invalid = result.as_invalid().unwrap();
        assert_eq!(invalid.reason(), "invalidCharacter");
        assert_eq!(invalid.args(), &[MessageArg::Char('_'), MessageArg::Int(1)]);
    }

    #[test]
    fn character_check_precedes_dash_checks() {
        assert_eq!(reason("a_-"), "invalidCharacter");
        assert_eq!(reason("-_a"), "invalidCharacter");
        assert_eq!(reason("-a-"), "startsDash");
    }

    #[test]
    fn leftmost_invalid_character_is_reported() {
        let result = DomainLabel::validate("ab.c_d");
        let invalid = result.as_invalid().unwrap();
        assert_eq!(invalid.args(), &[MessageArg::Char('.'), MessageArg::Int(2)]);
    }

    #[test]
    fn non_ascii_is_invalid_character() {
        let result = DomainLabel::validate("bü");
        let invalid = result.as_invalid().unwrap();
        assert_eq!(invalid.args(), &[MessageArg::Char('ü'), MessageArg::Int(1)]);
    }

    #[test]
    fn length_counts_characters() {
        // 40 two-byte characters: not too long, but not valid either.
        assert_eq!(reason(&"é".repeat(40)), "invalidCharacter");
    }

    #[test]
    fn validate_range_uses_relative_positions() {
        let text = "www.ex_ample.com";
        let result = DomainLabel::validate_range(text, 4..12);
        let invalid = result.as_invalid().unwrap();
        assert_eq!(invalid.args(), &[MessageArg::Char('_'), MessageArg::Int(2)]);
        assert!(DomainLabel::validate_range(text, 0..3).is_valid());
        assert_eq!(
            DomainLabel::validate_range(text, 3..3).as_invalid().unwrap().reason(),
            "empty"
        );
    }

    #[test]
    fn validate_range_rejects_bad_ranges() {
        let result = DomainLabel::validate_range("abc", 1..9);
        let invalid = result.as_invalid().unwrap();
        assert_eq!(invalid.key(), "DomainLabel.validate.invalidRange");
        assert_eq!(
            invalid.args(),
            &[MessageArg::Int(1), MessageArg::Int(9), MessageArg::Int(3)]
        );

        #[allow(clippy::reversed_empty_ranges)]
        let reversed = DomainLabel::validate_range("abc", 2..1);
        assert_eq!(reversed.as_invalid().unwrap().reason(), "invalidRange");

        // 'é' is two bytes, so byte 2 is inside it.
        let split = DomainLabel::validate_range("aéb", 0..2);
        assert_eq!(split.as_invalid().unwrap().reason(), "invalidRange");
        assert_eq!(
            split.as_invalid().unwrap().to_string(),
            "range 0..2 is not a character-aligned slice of a 4-byte label"
        );
    }

    #[test]
    fn parse_keeps_case() {
        let label = DomainLabel::parse("ABC").unwrap();
        assert_eq!(label.as_str(), "ABC");
        assert_eq!(label.to_string(), "ABC");
        assert_eq!(label.to_lower_case(), "abc");
    }

    #[test]
    fn parse_failure_carries_result() {
        let err = DomainLabel::parse("a-").unwrap_err();
        assert_eq!(err.reason(), "endsDash");
    }

    #[test]
    fn value_of_propagates_absence() {
        assert_eq!(DomainLabel::value_of(None).unwrap(), None);
        assert_eq!(
            DomainLabel::value_of(Some("abc")).unwrap().unwrap().as_str(),
            "abc"
        );
        assert!(DomainLabel::value_of(Some("")).is_err());
    }

    #[test]
    fn equality_ignores_case() {
        let upper = DomainLabel::parse("ABC").unwrap();
        let lower = DomainLabel::parse("abc").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_lower_case(), lower.to_lower_case());
        assert_eq!(upper.cmp(&lower), Ordering::Equal);

        let set: HashSet<DomainLabel> = [upper, lower].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ordering_ignores_case() {
        let labels: BTreeSet<DomainLabel> = ["b", "A", "C", "a"]
            .into_iter()
            .map(|s| DomainLabel::parse(s).unwrap())
            .collect();
        let sorted: Vec<&str> = labels.iter().map(DomainLabel::to_lower_case).collect();
        assert_eq!(sorted, ["a", "b", "c"]);
    }

    #[test]
    fn interning_converges() {
        let registry = InternRegistry::new();
        let first = DomainLabel::parse("Example").unwrap();
        let second = DomainLabel::parse("Example").unwrap();
        assert!(!first.ptr_eq(&second));

        let a = first.intern_in(&registry);
        let b = second.intern_in(&registry);
        assert!(a.ptr_eq(&b));
        assert!(a.ptr_eq(&first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn interning_is_idempotent() {
        let registry = InternRegistry::new();
        let a = DomainLabel::parse("host").unwrap().intern_in(&registry);
        let b = a.intern_in(&registry);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn interned_case_variants_share_lower_case() {
        let registry = InternRegistry::new();
        let upper = DomainLabel::parse("EXAMPLE").unwrap().intern_in(&registry);
        let mixed = DomainLabel::parse("Example").unwrap().intern_in(&registry);
        assert!(!upper.ptr_eq(&mixed));
        assert!(upper.lower_ptr_eq(&mixed));
        assert_eq!(upper.as_str(), "EXAMPLE");
        assert_eq!(mixed.as_str(), "Example");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registries_are_isolated() {
        let left = InternRegistry::new();
        let right = InternRegistry::new();
        let a = DomainLabel::parse("iso").unwrap().intern_in(&left);
        let b = DomainLabel::parse("iso").unwrap().intern_in(&right);
        assert!(!a.ptr_eq(&b));
        assert!(right.get("iso").is_some());
        assert!(InternRegistry::new().is_empty());
    }

    #[test]
    fn global_registry_interning() {
        let a = DomainLabel::parse("GlobalRegistryTest").unwrap().intern();
        let b = DomainLabel::parse("GlobalRegistryTest").unwrap().intern();
        assert!(a.ptr_eq(&b));
        assert!(InternRegistry::global().get("GlobalRegistryTest").is_some());
    }

    #[test]
    fn concurrent_interning_has_one_winner() {
        let registry = InternRegistry::new();
        let interned: Vec<DomainLabel> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        DomainLabel::parse("Concurrent")
                            .unwrap()
                            .intern_in(&registry)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winner = registry.get("Concurrent").unwrap();
        assert!(interned.iter().all(|label| label.ptr_eq(&winner)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dto_round_trip_revalidates() {
        let label = DomainLabel::parse("Node1").unwrap();
        let record = label.to_dto();
        assert_eq!(record.label, "Node1");
        assert_eq!(DomainLabel::try_from(record).unwrap(), label);

        let err = DomainLabel::try_from(dto::DomainLabel::new("bad_label")).unwrap_err();
        assert_eq!(err.reason(), "invalidCharacter");
    }

    #[test]
    fn restore_reports_corruption() {
        let err = DomainLabel::restore(dto::DomainLabel::new("")).unwrap_err();
        assert_eq!(err.type_name(), "DomainLabel");
        assert_eq!(err.result().reason(), "empty");
        assert!(DomainLabel::restore(dto::DomainLabel::new("ok")).is_ok());
    }
}
