// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Receiving decoded key/value pairs.

//! The decoder only needs a [Recorder](Recorder). [Values](Values) is
//! the ready-made one: a multi-valued map from keys to all the values
//! seen for them, in document order.

use kstring::KString;
use std::collections::BTreeMap;

/// Anything that can accept decoded pairs. The same key may be added
/// any number of times; whether later values replace or accumulate is
/// up to the recorder.
pub trait Recorder {
    fn add(&mut self, key: &str, value: &str);
}

impl<R: Recorder + ?Sized> Recorder for &mut R {
    fn add(&mut self, key: &str, value: &str) {
        (**self).add(key, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} = {:?}", self.key, self.value))
    }
}

/// Keeps every pair in the order it was added.
impl Recorder for Vec<Entry> {
    fn add(&mut self, key: &str, value: &str) {
        self.push(Entry { key: key.to_string(), value: value.to_string() })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(BTreeMap<KString, Vec<String>>);

impl Values {
    pub fn new() -> Self {
        Values(BTreeMap::new())
    }

    /// Replace all values of `key` with just `value`.
    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(KString::from_ref(key), vec![value.to_string()]);
    }

    /// Append `value` to the values of `key`.
    pub fn add(&mut self, key: &str, value: &str) {
        self.0.entry(KString::from_ref(key))
            .or_default()
            .push(value.to_string());
    }

    /// The first value of `key`, or "" if there is none.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key)
            .and_then(|vs| vs.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn del(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(key)
    }

    /// Whether `key` is present at all, even with no values.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, vs)| (k.as_str(), vs.as_slice()))
    }

    /// Append all values into `dst` (a new map if `None`), after any
    /// values `dst` already has for the same keys.
    pub fn copy_into(&self, dst: Option<Values>) -> Values {
        self.matching(dst, |_, _| true)
    }

    /// Like `copy_into`, but only for the keys `pred` accepts.
    pub fn matching(
        &self,
        dst: Option<Values>,
        pred: impl Fn(&str, &[String]) -> bool
    ) -> Values {
        let mut dst = dst.unwrap_or_default();
        for (k, vs) in &self.0 {
            if pred(k, vs) {
                dst.0.entry(k.clone())
                    .or_default()
                    .extend(vs.iter().cloned());
            }
        }
        dst
    }

    pub fn with_prefix(&self, dst: Option<Values>, prefix: &str) -> Values {
        self.matching(dst, |k, _| k.starts_with(prefix))
    }
}

impl Recorder for Values {
    fn add(&mut self, key: &str, value: &str) {
        Values::add(self, key, value)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, Vec<V>)> for Values {
    fn from_iter<T: IntoIterator<Item = (K, Vec<V>)>>(iter: T) -> Self {
        Values(iter.into_iter()
               .map(|(k, vs)| {
                   (KString::from_ref(k.as_ref()),
                    vs.iter().map(|v| v.as_ref().to_string()).collect())
               })
               .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(pairs: Vec<(&str, Vec<&str>)>) -> Values {
        pairs.into_iter().collect()
    }

    #[test]
    fn set_add_del_copy() {
        let mut v = Values::new();
        v.add("foo", "baz");
        v.add("foo", "quux");
        v.set("wub", "123");
        v.set("wub", "456");
        v.set("bob", "someone");
        assert!(v.del("bob").is_some());

        let expected = vals(vec![("foo", vec!["baz", "quux"]), ("wub", vec!["456"])]);
        assert_eq!(v, expected);
        assert_eq!(v.copy_into(None), expected);

        let copied_to = v.copy_into(Some(vals(vec![("foo", vec!["bar"])])));
        assert_eq!(copied_to,
                   vals(vec![("foo", vec!["bar", "baz", "quux"]),
                             ("wub", vec!["456"])]));
        assert_eq!(copied_to.get("foo"), "bar");
        assert_eq!(copied_to.get("nothing"), "");
    }

    #[test]
    fn contains_is_existence() {
        let v = vals(vec![("foo", vec![])]);
        assert!(v.contains("foo"));
        assert!(!v.contains("not.present"));
        assert_eq!(v.get("foo"), "");
        assert_eq!(v.get_all("foo").map(|vs| vs.len()), Some(0));
    }

    #[test]
    fn matching_and_prefix() {
        let v = vals(vec![
            ("foo.bar", vec![]),
            ("foo.baz", vec!["x"]),
            ("quux.bar", vec!["wop"]),
            ("foo", vec!["a thing"]),
        ]);
        assert_eq!(v.with_prefix(None, "foo."),
                   vals(vec![("foo.bar", vec![]), ("foo.baz", vec!["x"])]));
        assert_eq!(v.with_prefix(Some(vals(vec![("foo.baz", vec!["y"])])), "foo."),
                   vals(vec![("foo.bar", vec![]), ("foo.baz", vec!["y", "x"])]));
        assert_eq!(v.matching(None, |_, vs| vs.len() == 1).len(), 3);
    }

    fn feed(mut r: impl Recorder) {
        r.add("k", "a");
        r.add("k", "b");
    }

    #[test]
    fn vec_recorder_keeps_order() {
        let mut log: Vec<Entry> = Vec::new();
        feed(&mut log);
        assert_eq!(log.iter().map(|e| e.value.as_str()).collect::<Vec<_>>(),
                   ["a", "b"]);
        assert_eq!(log[0].to_string(), "k = \"a\"");
    }
}
