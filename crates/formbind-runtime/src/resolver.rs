#![forbid(unsafe_code)]

//! Field resolution: which model fields a binding point watches.
//!
//! A binding point names one primary field and any number of auxiliary
//! fields (fields it does not display but must re-render on, e.g. a sibling
//! that drives its visibility). Resolution is pure: the same inputs always
//! yield an equal [`FieldSet`], independent of auxiliary order or duplicates.

use core::fmt;

/// Canonical, deduplicated and lexicographically sorted set of watched
/// field names, always containing the primary name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSet {
    primary: String,
    names: Vec<String>,
}

impl FieldSet {
    /// Resolve a primary name and auxiliary names into a canonical set.
    pub fn resolve<I, S>(primary: impl Into<String>, auxiliary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let primary = primary.into();
        let mut names: Vec<String> = auxiliary.into_iter().map(Into::into).collect();
        names.push(primary.clone());
        names.sort();
        names.dedup();
        Self { primary, names }
    }

    /// The set containing only `primary`.
    pub fn single(primary: impl Into<String>) -> Self {
        Self::resolve(primary, std::iter::empty::<String>())
    }

    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// All names in resolver order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Names other than the primary, in resolver order.
    pub fn auxiliary(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(move |n| *n != self.primary)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// A resolved set holds at least the primary name, so this is `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// Stable registration key: names joined with `,`.
    #[must_use]
    pub fn key(&self) -> String {
        self.names.join(",")
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.primary, self.key())
    }
}
