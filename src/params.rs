use std::ops::Index;

use serde::{Serialize, Serializer};

/// One training sample: `(input, target)`.
pub type DataPoint = (f64, f64);

/// An ordered mapping from parameter name to scalar value.
///
/// Parameters are kept explicit and inspectable instead of being hidden in a
/// flat weight buffer: every value has a name, and iteration always follows
/// insertion order. The same type doubles as a gradient map, so accumulation
/// and the update step speak one vocabulary.
///
/// Lookup is a linear scan; these maps hold a handful of named scalars, not
/// tensors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: Vec<(String, f64)>,
}

impl ParamMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Returns the value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.position(name).map(|i| self.entries[i].1)
    }

    /// Returns a mutable reference to the value of `name`, if present.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut f64> {
        self.position(name).map(move |i| &mut self.entries[i].1)
    }

    /// Inserts or replaces `name`.
    ///
    /// An existing entry keeps its position; a new entry goes to the end, so
    /// iteration order is always first-insertion order.
    ///
    /// # Returns
    /// The previous value, if `name` was already present.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        let name = name.into();
        match self.position(&name) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Adds `delta` to `name`, creating the entry (starting at zero) if it is
    /// not present yet.
    pub fn add(&mut self, name: &str, delta: f64) {
        match self.position(name) {
            Some(i) => self.entries[i].1 += delta,
            None => self.entries.push((name.to_owned(), delta)),
        }
    }

    /// Multiplies every value by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for (_, v) in &mut self.entries {
            *v *= factor;
        }
    }

    /// Returns a map with the same names, all values zero.
    pub fn zeroed(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(n, _)| (n.clone(), 0.0))
                .collect(),
        }
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Iterates parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Returns `true` if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

/// Panicking lookup, `HashMap`-style: `params["w"]`.
///
/// # Panics
/// Panics if `name` is not present.
impl Index<&str> for ParamMap {
    type Output = f64;

    fn index(&self, name: &str) -> &f64 {
        match self.position(name) {
            Some(i) => &self.entries[i].1,
            None => panic!("no parameter named {name:?}"),
        }
    }
}

impl FromIterator<(String, f64)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<const N: usize> From<[(&str, f64); N]> for ParamMap {
    fn from(entries: [(&str, f64); N]) -> Self {
        entries
            .into_iter()
            .map(|(n, v)| (n.to_owned(), v))
            .collect()
    }
}

/// Serializes as a JSON object whose keys appear in insertion order.
impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(n, v)| (n.as_str(), v)))
    }
}
