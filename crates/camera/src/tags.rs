//! Raw per-file tag values, keyed by `Exif.<group>.<Name>`
//!
//! Groups: `Image` (TIFF IFD0), `Photo` (EXIF sub-IFD), `GPSInfo`, `Iop`.

use std::collections::BTreeMap;

/// An unsigned or signed EXIF rational
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub num: i64,
    pub denom: i64,
}

impl Rational {
    pub const fn new(num: i64, denom: i64) -> Self {
        Self { num, denom }
    }

    /// Zero denominators evaluate to 0
    pub fn to_f64(self) -> f64 {
        if self.denom == 0 {
            return 0.0;
        }
        self.num as f64 / self.denom as f64
    }
}

/// A tag's decoded value
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Integers(Vec<i64>),
    Rationals(Vec<Rational>),
    Floats(Vec<f64>),
}

impl TagValue {
    /// First component as an integer (rationals truncate toward zero)
    pub fn to_long(&self) -> Option<i64> {
        match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Integers(v) => v.first().copied(),
            Self::Rationals(v) => v.first().map(|r| r.to_f64() as i64),
            Self::Floats(v) => v.first().map(|f| *f as i64),
        }
    }

    /// First component as a float
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Integers(v) => v.first().map(|i| *i as f64),
            Self::Rationals(v) => v.first().map(|r| r.to_f64()),
            Self::Floats(v) => v.first().copied(),
        }
    }

    /// Component `index` as a rational
    ///
    /// Integers are widened to `n/1`; floats and text have no rational form.
    pub fn rational(&self, index: usize) -> Option<Rational> {
        match self {
            Self::Rationals(v) => v.get(index).copied(),
            Self::Integers(v) => v.get(index).map(|i| Rational::new(*i, 1)),
            _ => None,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integers(v) => join(v.iter()),
            Self::Rationals(v) => join(v.iter().map(|r| format!("{}/{}", r.num, r.denom))),
            Self::Floats(v) => join(v.iter()),
        }
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
}

/// Tag lookup over one file's embedded metadata
pub trait TagSource {
    fn get(&self, key: &str) -> Option<&TagValue>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// First present tag among `keys`, in order
    fn find(&self, keys: &[&str]) -> Option<&TagValue> {
        keys.iter().find_map(|k| self.get(k))
    }
}

/// In-memory tag set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMap {
    tags: BTreeMap<String, TagValue>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: TagValue) {
        self.tags.insert(key.into(), value);
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: TagValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TagSource for TagMap {
    fn get(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }
}
