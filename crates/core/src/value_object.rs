//! Value object kernel: equality by value, construction through
//! normalize-then-validate.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainResult;

/// Immutable, self-validating value.
///
/// Construction always goes through [`ValueObject::construct`]:
///
/// 1. the raw instance is built from caller-supplied fields as given,
/// 2. [`normalize`](ValueObject::normalize) may hand back a canonical replacement,
/// 3. [`validate`](ValueObject::validate) checks the (possibly normalized) fields.
///
/// After that the instance is never written again; "changing" a value object
/// means constructing a new one. Concrete types keep their fields private and
/// route every public constructor through `construct`, so step 2 is the only
/// rewrite an instance ever sees.
///
/// Both hooks default to no-ops, so a type with no overrides behaves as a plain
/// immutable record.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Slug {
///     text: String,
/// }
///
/// impl ValueObject for Slug {
///     fn normalize(&self) -> Option<Self> {
///         let text = self.text.trim().to_lowercase();
///         (text != self.text).then(|| Slug { text })
///     }
/// }
///
/// let slug = Slug::construct(Slug { text: "  Hello ".into() })?;
/// assert_eq!(slug.text, "hello");
/// ```
pub trait ValueObject: Clone + PartialEq + fmt::Debug + Sized {
    /// Canonical-form rewrite (trimming, case folding, truncation).
    ///
    /// Must be pure and must not fail. Returns `None` when the instance is
    /// already canonical.
    fn normalize(&self) -> Option<Self> {
        None
    }

    /// Check domain invariants. Must not rewrite anything.
    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }

    /// Run the normalize → validate pipeline over a raw instance.
    fn construct(raw: Self) -> DomainResult<Self> {
        let value = match raw.normalize() {
            Some(normalized) => {
                tracing::trace!(before = ?raw, after = ?normalized, "value object normalized");
                normalized
            }
            None => raw,
        };
        value.validate()?;
        Ok(value)
    }
}

/// Normalize/validate strategy for a [`SingleValueObject`].
///
/// Implement this on a zero-sized marker type and name the resulting value
/// object with a type alias:
///
/// ```ignore
/// enum NameRules {}
///
/// impl ValueRules for NameRules {
///     type Value = String;
///
///     fn normalize_value(value: String) -> String {
///         value.trim().to_string()
///     }
///
///     fn validate_value(value: &String) -> DomainResult<()> {
///         if value.is_empty() {
///             return Err(DomainError::validation("name cannot be empty"));
///         }
///         Ok(())
///     }
/// }
///
/// type Name = SingleValueObject<NameRules>;
/// ```
pub trait ValueRules: 'static {
    type Value: Clone + PartialEq + fmt::Debug;

    /// Representation unification only. Must be pure and must not fail.
    fn normalize_value(value: Self::Value) -> Self::Value {
        value
    }

    /// Domain invariant check. Must not rewrite the value.
    fn validate_value(_value: &Self::Value) -> DomainResult<()> {
        Ok(())
    }
}

/// Value object holding exactly one payload, governed by rules `R`.
pub struct SingleValueObject<R: ValueRules> {
    value: R::Value,
    rules: PhantomData<fn() -> R>,
}

impl<R: ValueRules> SingleValueObject<R> {
    /// Build through the normalize → validate pipeline.
    pub fn new(value: impl Into<R::Value>) -> DomainResult<Self> {
        Self::construct(Self::raw(value.into()))
    }

    fn raw(value: R::Value) -> Self {
        Self {
            value,
            rules: PhantomData,
        }
    }

    pub fn value(&self) -> &R::Value {
        &self.value
    }

    /// Underlying representation for serialization, storage and transport.
    pub fn as_primitive(&self) -> R::Value {
        self.value.clone()
    }

    pub fn into_inner(self) -> R::Value {
        self.value
    }
}

impl<R: ValueRules> ValueObject for SingleValueObject<R> {
    fn normalize(&self) -> Option<Self> {
        let normalized = R::normalize_value(self.value.clone());
        (normalized != self.value).then(|| Self::raw(normalized))
    }

    fn validate(&self) -> DomainResult<()> {
        R::validate_value(&self.value)
    }
}

impl<R: ValueRules> Clone for SingleValueObject<R> {
    fn clone(&self) -> Self {
        Self::raw(self.value.clone())
    }
}

impl<R: ValueRules> PartialEq for SingleValueObject<R> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<R: ValueRules> Eq for SingleValueObject<R> where R::Value: Eq {}

impl<R: ValueRules> Hash for SingleValueObject<R>
where
    R::Value: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<R: ValueRules> fmt::Debug for SingleValueObject<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SingleValueObject").field(&self.value).finish()
    }
}

impl<R: ValueRules> fmt::Display for SingleValueObject<R>
where
    R::Value: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<R: ValueRules> AsRef<R::Value> for SingleValueObject<R> {
    fn as_ref(&self) -> &R::Value {
        &self.value
    }
}

impl<R: ValueRules> Serialize for SingleValueObject<R>
where
    R::Value: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, R: ValueRules> Deserialize<'de> for SingleValueObject<R>
where
    R::Value: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <R::Value as Deserialize<'de>>::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
