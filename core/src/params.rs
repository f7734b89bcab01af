//! Ordered name/value collections for query strings and form bodies.
//!
//! # Design
//! Both collections are a plain `Vec` of owned pairs. Order and duplicate keys
//! are kept exactly as given, and keys are never normalized. Converting a raw
//! multimap copies it, so the caller's collection can change afterwards
//! without touching a request that was already built.

use serde::{Deserialize, Serialize};

macro_rules! name_value_collection {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            pairs: Vec<(String, String)>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Append a pair. Existing pairs with the same key are kept.
            pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
                self.pairs.push((key.into(), value.into()));
                self
            }

            /// Builder-style variant of [`add`](Self::add).
            pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.add(key, value);
                self
            }

            /// First value stored under `key`.
            pub fn get(&self, key: &str) -> Option<&str> {
                self.pairs
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
            }

            /// Every value stored under `key`, in insertion order.
            pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
                self.pairs
                    .iter()
                    .filter(move |(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
            }

            pub fn contains_key(&self, key: &str) -> bool {
                self.pairs.iter().any(|(k, _)| k == key)
            }

            pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
                self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
            }

            pub fn len(&self) -> usize {
                self.pairs.len()
            }

            pub fn is_empty(&self) -> bool {
                self.pairs.is_empty()
            }

            pub fn as_pairs(&self) -> &[(String, String)] {
                &self.pairs
            }

            pub fn into_pairs(self) -> Vec<(String, String)> {
                self.pairs
            }

            /// Encode as `application/x-www-form-urlencoded`, preserving order.
            pub fn to_urlencoded(&self) -> Result<String, serde_urlencoded::ser::Error> {
                serde_urlencoded::to_string(&self.pairs)
            }
        }

        impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                Self {
                    pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
                }
            }
        }

        impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for $name {
            fn from(pairs: Vec<(K, V)>) -> Self {
                pairs.into_iter().collect()
            }
        }

        impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for $name {
            fn from(pairs: [(K, V); N]) -> Self {
                pairs.into_iter().collect()
            }
        }

        impl<K: AsRef<str>, V: AsRef<str>> From<&[(K, V)]> for $name {
            fn from(pairs: &[(K, V)]) -> Self {
                pairs
                    .iter()
                    .map(|(k, v)| (k.as_ref(), v.as_ref()))
                    .collect()
            }
        }

        impl<K: AsRef<str>, V: AsRef<str>> From<&Vec<(K, V)>> for $name {
            fn from(pairs: &Vec<(K, V)>) -> Self {
                Self::from(pairs.as_slice())
            }
        }

        impl From<&$name> for $name {
            fn from(other: &$name) -> Self {
                other.clone()
            }
        }

        impl IntoIterator for $name {
            type Item = (String, String);
            type IntoIter = std::vec::IntoIter<(String, String)>;

            fn into_iter(self) -> Self::IntoIter {
                self.pairs.into_iter()
            }
        }
    };
}

name_value_collection! {
    /// Query parameters appended to the request URL.
    QueryString
}

name_value_collection! {
    /// Form fields sent as the request body.
    PostData
}
