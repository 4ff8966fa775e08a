//! Provide the errors raised while accessing properties.
//!
//! Every single `get`/`set` fails fast with an [`AccessError`]. Batch
//! updates collect them into a
//! [`BatchUpdateError`](crate::batch::BatchUpdateError).

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::bean::Type;
use crate::convert::ConversionError;
use crate::path::ParseError;
use crate::value::{ValueError, ValueType};

// -----------------------------------------------------------------------------
// Capability errors

/// A getter or setter refused to run.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum InvocationError {
    /// A domain rule rejected the call.
    #[error("{0}")]
    Rejected(Cow<'static, str>),

    #[error(transparent)]
    Value(#[from] ValueError),

    /// The bean is already borrowed by an outer call.
    #[error("bean `{0}` is already borrowed")]
    Borrowed(&'static str),

    /// The capability was invoked on a bean of another type.
    #[error("capability expects a bean of type `{expected}`")]
    WrongReceiver { expected: Type },

    /// The property has no getter or setter for this direction.
    #[error("property has no {0}")]
    Missing(&'static str),
}

impl InvocationError {
    /// Creates a [`InvocationError::Rejected`] with the given message.
    #[inline]
    pub fn rejected(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Rejected(message.into())
    }
}

/// A bean could not be created from its type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConstructionError {
    #[error("bean type `{0}` is not registered")]
    Unregistered(Type),

    #[error("bean type `{0}` has no zero-argument constructor")]
    NoConstructor(Type),
}

/// Why an absent intermediate could not be created.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GrowFailure {
    #[error("auto-growing nested paths is disabled")]
    Disabled,

    #[error("values of type `{0}` cannot be created automatically")]
    NotConstructible(ValueType),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("index {index} exceeds the collection growth limit {limit}")]
    LimitExceeded { index: usize, limit: usize },
}

// -----------------------------------------------------------------------------
// AccessError

fn suggestion_hint(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => alloc::format!("; did you mean `{only}`?"),
        many => alloc::format!("; did you mean one of {}?", many.join(", ")),
    }
}

/// An error returned from a failed property access.
///
/// `property` is always the canonical prefix of the path up to and including
/// the failing segment. `owner` is the bean type that holds it.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum AccessError {
    #[error(transparent)]
    MalformedPath(#[from] ParseError),

    #[error("property `{property}` of bean `{owner}` is not readable")]
    NotReadableProperty { property: String, owner: Type },

    #[error(
        "property `{property}` of bean `{owner}` is not writable{}",
        suggestion_hint(.suggestions)
    )]
    NotWritableProperty {
        property: String,
        owner: Type,
        suggestions: Vec<String>,
    },

    #[error("failed to convert value for property `{property}`")]
    TypeMismatch {
        property: String,
        #[source]
        source: ConversionError,
    },

    #[error("cannot auto-grow property `{property}` of bean `{owner}`")]
    AutoGrowFailed {
        property: String,
        owner: Type,
        #[source]
        reason: GrowFailure,
    },

    #[error("value of nested property `{property}` of bean `{owner}` is null")]
    NullValueInNestedPath { property: String, owner: Type },

    #[error("invalid property `{property}` of bean `{owner}`: {reason}")]
    InvalidProperty {
        property: String,
        owner: Type,
        reason: Cow<'static, str>,
    },

    #[error("invocation of property `{property}` on bean `{owner}` failed")]
    InvocationFailed {
        property: String,
        owner: Type,
        #[source]
        source: InvocationError,
    },
}

impl AccessError {
    /// Returns the near-match names of a [`NotWritableProperty`] error.
    ///
    /// `None` for every other error and for empty suggestion lists.
    ///
    /// [`NotWritableProperty`]: AccessError::NotWritableProperty
    pub fn possible_matches(&self) -> Option<&[String]> {
        match self {
            Self::NotWritableProperty { suggestions, .. } if !suggestions.is_empty() => {
                Some(suggestions)
            }
            _ => None,
        }
    }

    /// Returns the failing property, `None` for malformed paths.
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::MalformedPath(_) => None,
            Self::NotReadableProperty { property, .. }
            | Self::NotWritableProperty { property, .. }
            | Self::TypeMismatch { property, .. }
            | Self::AutoGrowFailed { property, .. }
            | Self::NullValueInNestedPath { property, .. }
            | Self::InvalidProperty { property, .. }
            | Self::InvocationFailed { property, .. } => Some(property),
        }
    }

    /// Returns `true` for errors caused by a name the target does not have.
    #[inline]
    pub const fn is_unknown_property(&self) -> bool {
        matches!(self, Self::NotWritableProperty { .. })
    }

    /// Returns `true` for errors caused by an unusable intermediate value.
    #[inline]
    pub const fn is_invalid_navigation(&self) -> bool {
        matches!(
            self,
            Self::NullValueInNestedPath { .. }
                | Self::InvalidProperty { .. }
                | Self::AutoGrowFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::{AccessError, suggestion_hint};
    use crate::bean::Type;
    use crate::path::PropertyPath;

    struct Person;

    #[test]
    fn hint_lists_suggestions() {
        assert_eq!(suggestion_hint(&[]), "");
        assert_eq!(suggestion_hint(&["age".into()]), "; did you mean `age`?");

        let err = AccessError::NotWritableProperty {
            property: "ag".into(),
            owner: Type::of::<Person>(),
            suggestions: vec!["age".into()],
        };
        assert!(err.to_string().ends_with("is not writable; did you mean `age`?"));
        assert_eq!(err.possible_matches(), Some(&["age".into()][..]));
    }

    #[test]
    fn malformed_path_has_no_matches() {
        let err: AccessError = PropertyPath::parse("[']").unwrap_err().into();
        assert!(err.possible_matches().is_none());
        assert!(err.property().is_none());
    }
}
