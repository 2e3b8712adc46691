//! Case-normalizing header container.
//!
//! Header names are normalized to title case on both storage and lookup, so
//! the names returned by [`Headers::keys`] may differ from the names that were
//! used to store them:
//!
//! ```
//! use jester_http::protocol::Headers;
//!
//! let mut headers = Headers::new();
//! headers.insert("content-type", "text/plain");
//! assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
//! assert_eq!(headers.keys().collect::<Vec<_>>(), ["Content-Type"]);
//! ```
//!
//! [`Headers::insert`] always overwrites. [`Headers::append`] combines repeated
//! fields as described in [RFC 7230 section 3.2.2](https://tools.ietf.org/html/rfc7230#section-3.2.2),
//! by joining the values with a comma.

use std::fmt::Display;

/// Normalizes a header name: lower-case everything, then upper-case the first
/// letter of each hyphen-delimited word.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if word_start {
            normalized.extend(c.to_uppercase());
        } else {
            normalized.extend(c.to_lowercase());
        }
        word_start = c == '-';
    }
    normalized
}

/// Ordered mapping from normalized header names to their textual values.
///
/// Entries live in a `Vec` in insertion order and lookups scan it linearly.
/// The parser caps a request at 64 headers by default, which keeps the scan
/// short; the order is what the response gate writes headers back out in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Returns the value stored under `name`, in any case.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = normalize_name(name);
        self.position(&name).map(|index| self.entries[index].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Stores `value` under `name`, replacing whatever was there.
    pub fn insert<V: Display>(&mut self, name: &str, value: V) {
        let name = normalize_name(name);
        let value = value.to_string();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Appends `value` to an existing header as `<old>,<new>`, or stores it
    /// when the header is absent.
    pub fn append<V: Display>(&mut self, name: &str, value: V) {
        let name = normalize_name(name);
        match self.position(&name) {
            Some(index) => {
                let existing = &mut self.entries[index].1;
                existing.push(',');
                existing.push_str(&value.to_string());
            }
            None => self.entries.push((name, value.to_string())),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = normalize_name(name);
        self.position(&name).map(|index| self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn position(&self, normalized: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_case_is_normalized() {
        let mut headers = Headers::new();
        headers.insert("UPPER", "message");
        headers.insert("x-forwarded-for", "127.0.0.1");
        assert_eq!(headers.keys().collect::<Vec<_>>(), ["Upper", "X-Forwarded-For"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("content-type", "text/html");

        assert_eq!(headers.get("Content-Type"), Some("text/html"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert_eq!(headers.get("content-length"), None);
    }

    #[test]
    fn values_are_coerced_to_strings() {
        let mut headers = Headers::new();
        headers.insert("One", 1);
        assert_eq!(headers.get("One"), Some("1"));
    }

    #[test]
    fn insert_overwrites() {
        let mut headers = Headers::new();
        headers.insert("one", 1);
        headers.insert("ONE", "two");
        assert_eq!(headers.get("one"), Some("two"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn append_sets_absent_header() {
        let mut headers = Headers::new();
        headers.append("one", 1);
        assert_eq!(headers.get("one"), Some("1"));
    }

    #[test]
    fn append_combines_with_comma() {
        let mut headers = Headers::new();
        headers.insert("Accept", "text/html");
        headers.append("accept", "application/json");
        headers.append("ACCEPT", 2);
        assert_eq!(headers.get("Accept"), Some("text/html,application/json,2"));
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut headers = Headers::new();
        headers.insert("zeta", 1);
        headers.insert("Alpha", 2);
        headers.append("ZETA", 3);

        assert_eq!(headers.iter().collect::<Vec<_>>(), [("Zeta", "1,3"), ("Alpha", "2")]);
    }

    #[test]
    fn remove_normalizes_too() {
        let mut headers = Headers::new();
        headers.insert("Host", "example");
        assert_eq!(headers.remove("HOST"), Some("example".to_string()));
        assert!(headers.is_empty());
    }

    #[test]
    fn normalize_handles_digits_and_empty_words() {
        assert_eq!(normalize_name("2"), "2");
        assert_eq!(normalize_name("content-md5"), "Content-Md5");
        assert_eq!(normalize_name("x--y"), "X--Y");
        assert_eq!(normalize_name("WWW-AUTHENTICATE"), "Www-Authenticate");
    }
}
