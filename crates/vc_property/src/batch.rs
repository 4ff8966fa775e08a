//! Provide batch updates over ordered property values.
//!
//! A [`BatchMutator`] applies every entry of a [`PropertyValues`] through a
//! [`PropertyAccessor`]. A failure never stops the batch: failures are
//! collected and reported together in a [`BatchUpdateError`] once every
//! entry was attempted. Writes that succeeded stay applied.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::access::{PropertyAccessor, PropertyChange};
use crate::bean::BeanRef;
use crate::error::AccessError;
use crate::registry::CapabilityRegistry;
use crate::value::Value;

// -----------------------------------------------------------------------------
// PropertyValues

/// A named raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub name: String,
    pub value: Value,
}

impl PropertyValue {
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered list of [`PropertyValue`]s with unique names.
///
/// Adding a name that is already present replaces its value in place.
///
/// # Examples
///
/// ```
/// use vc_property::batch::PropertyValues;
/// use vc_property::Value;
///
/// let values = PropertyValues::new()
///     .with("name", "tom")
///     .with("age", "42")
///     .with("name", "ann");
///
/// assert_eq!(values.len(), 2);
/// assert_eq!(values.get("name"), Some(&Value::from("ann")));
/// let names: Vec<_> = values.iter().map(|pv| pv.name.as_str()).collect();
/// assert_eq!(names, ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValues {
    values: Vec<PropertyValue>,
}

impl PropertyValues {
    #[inline]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Adds a value, replacing the value of an existing entry of that name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.push(PropertyValue::new(name, value));
        self
    }

    /// Builder form of [`add`](Self::add).
    #[inline]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add(name, value);
        self
    }

    fn push(&mut self, pv: PropertyValue) {
        match self.values.iter_mut().find(|existing| existing.name == pv.name) {
            Some(existing) => existing.value = pv.value,
            None => self.values.push(pv),
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|pv| pv.name == name)
            .map(|pv| &pv.value)
    }

    /// Removes and returns the value of `name`.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.values.iter().position(|pv| pv.name == name)?;
        Some(self.values.remove(index).value)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|pv| pv.name == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, PropertyValue> {
        self.values.iter()
    }
}

impl FromIterator<PropertyValue> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = PropertyValue>>(iter: I) -> Self {
        let mut values = Self::new();
        iter.into_iter().for_each(|pv| values.push(pv));
        values
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for PropertyValues {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| PropertyValue::new(name, value))
            .collect()
    }
}

impl IntoIterator for PropertyValues {
    type Item = PropertyValue;
    type IntoIter = alloc::vec::IntoIter<PropertyValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertyValues {
    type Item = &'a PropertyValue;
    type IntoIter = core::slice::Iter<'a, PropertyValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

// -----------------------------------------------------------------------------
// Errors

/// One entry of a batch that failed.
#[derive(Debug, Clone)]
pub struct PropertyFailure {
    pub property: String,
    pub value: Value,
    pub error: AccessError,
}

impl fmt::Display for PropertyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.property, self.error)
    }
}

/// The aggregated failures of a batch update.
#[derive(Debug, Clone, Error)]
#[error("failed to set {} propert{}: {}", .failures.len(), plural(.failures.len()), join(.failures))]
pub struct BatchUpdateError {
    failures: Vec<PropertyFailure>,
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "y" } else { "ies" }
}

fn join(failures: &[PropertyFailure]) -> String {
    use core::fmt::Write;

    let mut out = String::new();
    for (index, failure) in failures.iter().enumerate() {
        if index > 0 {
            out.push_str("; ");
        }
        // Writing into a `String` cannot fail.
        let _ = write!(out, "{failure}");
    }
    out
}

impl BatchUpdateError {
    #[inline]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Returns all failures in batch order.
    #[inline]
    pub fn failures(&self) -> &[PropertyFailure] {
        &self.failures
    }

    /// Returns the failure of one property.
    pub fn failure(&self, property: &str) -> Option<&PropertyFailure> {
        self.failures.iter().find(|f| f.property == property)
    }
}

// -----------------------------------------------------------------------------
// BatchOptions

/// Which failures a batch may skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct BatchOptions {
    /// Skip entries whose final property does not exist or is read-only.
    pub ignore_unknown: bool,
    /// Skip entries whose path cannot be navigated.
    pub ignore_invalid: bool,
}

// -----------------------------------------------------------------------------
// BatchOutcome

/// The per-entry result of a batch that ran to the end.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub property: String,
    pub value: Value,
    pub result: Result<PropertyChange, AccessError>,
}

/// Every entry of a batch with its result, in batch order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    entries: Vec<BatchEntry>,
}

impl BatchOutcome {
    #[inline]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Number of entries that failed and were not ignored.
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_err()).count()
    }

    /// Returns the successful changes in batch order.
    pub fn changes(&self) -> impl Iterator<Item = &PropertyChange> {
        self.entries.iter().filter_map(|e| e.result.as_ref().ok())
    }

    /// Returns the changes, or every failure if at least one entry failed.
    pub fn into_result(self) -> Result<Vec<PropertyChange>, BatchUpdateError> {
        let mut changes = Vec::with_capacity(self.entries.len());
        let mut failures = Vec::new();
        for entry in self.entries {
            match entry.result {
                Ok(change) => changes.push(change),
                Err(error) => failures.push(PropertyFailure {
                    property: entry.property,
                    value: entry.value,
                    error,
                }),
            }
        }
        if failures.is_empty() {
            Ok(changes)
        } else {
            Err(BatchUpdateError { failures })
        }
    }
}

// -----------------------------------------------------------------------------
// BatchMutator

/// Applies [`PropertyValues`] to a bean.
///
/// # Examples
///
/// ```
/// use vc_property::batch::{BatchMutator, PropertyValues};
/// use vc_property::derive::Bean;
/// use vc_property::registry::TypeRegistry;
/// use vc_property::{BeanRef, PropertyAccessor, Value};
///
/// #[derive(Bean, Default)]
/// struct Person {
///     name: String,
///     age: u8,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Person>();
/// let accessor = PropertyAccessor::new(&registry);
/// let root = BeanRef::new(Person::default());
///
/// let values = PropertyValues::new()
///     .with("name", "tom")
///     .with("age", "old")
///     .with("weight", "80");
/// let err = BatchMutator::new(&accessor).apply_all(&root, &values).unwrap_err();
///
/// assert_eq!(err.failure_count(), 2);
/// assert!(err.failure("age").is_some());
/// assert_eq!(accessor.get(&root, "name").unwrap(), Value::from("tom"));
/// ```
pub struct BatchMutator<'a, R> {
    accessor: &'a PropertyAccessor<R>,
    options: BatchOptions,
}

impl<'a, R: CapabilityRegistry> BatchMutator<'a, R> {
    #[inline]
    pub fn new(accessor: &'a PropertyAccessor<R>) -> Self {
        Self {
            accessor,
            options: BatchOptions::default(),
        }
    }

    #[inline]
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Applies every value in order and aggregates the failures.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchUpdateError`] with one entry per failed property.
    pub fn apply_all(
        &self,
        root: &BeanRef,
        values: &PropertyValues,
    ) -> Result<Vec<PropertyChange>, BatchUpdateError> {
        self.apply_all_outcome(root, values).into_result()
    }

    /// Applies every value in order and reports each result.
    ///
    /// Failures skipped by the [`BatchOptions`] are left out.
    pub fn apply_all_outcome(&self, root: &BeanRef, values: &PropertyValues) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for pv in values {
            let result = self.accessor.set(root, pv.name.as_str(), pv.value.clone());
            if let Err(err) = &result {
                if self.is_ignored(err) {
                    log::debug!("ignoring property `{}`: {err}", pv.name);
                    continue;
                }
                log::debug!("failed to set property `{}`: {err}", pv.name);
            }
            outcome.entries.push(BatchEntry {
                property: pv.name.clone(),
                value: pv.value.clone(),
                result,
            });
        }
        outcome
    }

    fn is_ignored(&self, err: &AccessError) -> bool {
        (self.options.ignore_unknown && err.is_unknown_property())
            || (self.options.ignore_invalid && err.is_invalid_navigation())
    }
}

impl<R: CapabilityRegistry> PropertyAccessor<R> {
    /// Applies `values` with default [`BatchOptions`].
    ///
    /// See [`BatchMutator::apply_all`].
    #[inline]
    pub fn set_all(
        &self,
        root: &BeanRef,
        values: &PropertyValues,
    ) -> Result<Vec<PropertyChange>, BatchUpdateError> {
        BatchMutator::new(self).apply_all(root, values)
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use core::cell::RefCell;

    use super::{BatchMutator, BatchOptions, PropertyValue, PropertyValues};
    use crate::access::PropertyAccessor;
    use crate::bean::{BeanRef, Shared};
    use crate::derive::Bean;
    use crate::error::{AccessError, InvocationError};
    use crate::registry::TypeRegistry;
    use crate::value::Value;

    #[derive(Bean, Default)]
    #[bean(default)]
    struct Person {
        name: String,
        age: i32,
        #[bean(setter = "set_touchy")]
        touchy: String,
        spouse: Option<Shared<Person>>,
    }

    impl Person {
        fn set_touchy(&mut self, touchy: String) -> Result<(), InvocationError> {
            if touchy.contains('.') {
                return Err(InvocationError::rejected("Can't contain a ."));
            }
            self.touchy = touchy;
            Ok(())
        }
    }

    fn setup() -> (TypeRegistry, Shared<Person>, BeanRef) {
        let mut registry = TypeRegistry::new();
        registry.register::<Person>();
        let person = Rc::new(RefCell::new(Person {
            age: 5,
            ..Person::default()
        }));
        let root = BeanRef::from_shared(person.clone());
        (registry, person, root)
    }

    #[test]
    fn values_keep_order_and_unique_names() {
        let mut values: PropertyValues = [("b", "1"), ("a", "2")].into_iter().collect();
        values.add("b", "3");
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("b"), Some(&Value::from("3")));
        assert!(values.contains("a"));
        assert_eq!(values.remove("a"), Some(Value::from("2")));
        assert_eq!(
            values.into_iter().collect::<alloc::vec::Vec<_>>(),
            [PropertyValue::new("b", "3")]
        );
    }

    #[test]
    fn partial_failure_is_aggregated() {
        let (registry, person, root) = setup();
        let accessor = PropertyAccessor::new(&registry);
        let values = PropertyValues::new()
            .with("age", "foobar")
            .with("name", "tony")
            .with("touchy", ".valid");

        let err = accessor.set_all(&root, &values).unwrap_err();
        assert_eq!(err.failure_count(), 2);
        assert_eq!(person.borrow().name, "tony");
        assert_eq!(person.borrow().age, 5);

        let age = err.failure("age").unwrap();
        assert!(matches!(age.error, AccessError::TypeMismatch { .. }));
        let touchy = err.failure("touchy").unwrap();
        assert_eq!(touchy.value, Value::from(".valid"));
        assert!(matches!(touchy.error, AccessError::InvocationFailed { .. }));
        assert!(err.to_string().starts_with("failed to set 2 properties: `age`"));
    }

    #[test]
    fn later_entries_see_earlier_writes() {
        let (registry, person, root) = setup();
        let accessor = PropertyAccessor::new(&registry);
        let first = Rc::new(RefCell::new(Person::default()));
        let second = Rc::new(RefCell::new(Person::default()));

        let values = PropertyValues::new()
            .with("spouse", BeanRef::from_shared(first.clone()))
            .with("spouse.name", "ann")
            .with("spouse.age", "30");
        accessor.set_all(&root, &values).unwrap();
        assert_eq!(first.borrow().name, "ann");
        assert_eq!(first.borrow().age, 30);

        let values = PropertyValues::new()
            .with("spouse", BeanRef::from_shared(second.clone()))
            .with("spouse.name", "bea");
        accessor.set_all(&root, &values).unwrap();
        assert_eq!(second.borrow().name, "bea");
        assert_eq!(first.borrow().name, "ann");

        let spouse = person.borrow().spouse.clone().unwrap();
        assert!(Rc::ptr_eq(&spouse, &second));
    }

    #[test]
    fn continues_past_unknown_and_invalid() {
        let (registry, person, root) = setup();
        let accessor = PropertyAccessor::new(&registry);
        let values = PropertyValues::new()
            .with("nmae", "x")
            .with("spouse.age", "3")
            .with("name", "kept");

        let outcome = BatchMutator::new(&accessor).apply_all_outcome(&root, &values);
        assert_eq!(outcome.entries().len(), 3);
        assert_eq!(outcome.failure_count(), 2);
        assert_eq!(outcome.changes().count(), 1);
        assert_eq!(person.borrow().name, "kept");

        let err = outcome.into_result().unwrap_err();
        assert_eq!(
            err.failure("nmae").unwrap().error.possible_matches(),
            Some(&["name".to_string()][..])
        );
    }

    #[test]
    fn ignored_failures_are_skipped() {
        let (registry, _person, root) = setup();
        let accessor = PropertyAccessor::new(&registry);
        let values = PropertyValues::new()
            .with("nmae", "x")
            .with("spouse.age", "3")
            .with("age", "7");

        let mutator = BatchMutator::new(&accessor).with_options(BatchOptions {
            ignore_unknown: true,
            ignore_invalid: true,
        });
        let changes = mutator.apply_all(&root, &values).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new_value, Value::Int(7));

        let mutator = BatchMutator::new(&accessor).with_options(BatchOptions {
            ignore_unknown: true,
            ignore_invalid: false,
        });
        let err = mutator.apply_all(&root, &values).unwrap_err();
        assert_eq!(err.failure_count(), 1);
        assert!(err.failure("spouse.age").is_some());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_from_json() {
        let options: BatchOptions = serde_json::from_str(r#"{"ignore_unknown": true}"#).unwrap();
        assert!(options.ignore_unknown);
        assert!(!options.ignore_invalid);
    }
}
