use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a page section (`"home"`, `"skills"`, ...).
///
/// Wraps `Arc<str>`: the navigation bar re-reads the active key on every
/// scroll event, so cloning must stay a refcount bump.
///
/// Compares equal to plain string slices so `assert_eq!(nav.active(), "home")`
/// reads naturally.
#[derive(Debug, Clone, Eq)]
pub struct SectionKey(Arc<str>);

impl SectionKey {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fragment link for this section, e.g. `#contact`.
    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }
}

impl PartialEq for SectionKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl PartialEq<str> for SectionKey {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SectionKey {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::hash::Hash for SectionKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (*self.0).hash(state);
    }
}

impl std::ops::Deref for SectionKey {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectionKey {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for SectionKey {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionKey {
    #[inline]
    fn from(s: &str) -> Self {
        SectionKey(Arc::from(s))
    }
}

impl From<String> for SectionKey {
    #[inline]
    fn from(s: String) -> Self {
        SectionKey(Arc::from(s))
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Hand-rolled so serde's `rc` feature stays off.

impl Serialize for SectionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SectionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(SectionKey::from(s))
    }
}

/// A section's key together with its top offset in page pixels.
///
/// Positions belong to the rendering layer; anchors are rebuilt from it on
/// every scroll event and only read by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnchor {
    pub key: SectionKey,
    pub top: f64,
}

impl SectionAnchor {
    pub fn new(key: impl Into<SectionKey>, top: f64) -> Self {
        Self {
            key: key.into(),
            top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_allocation() {
        let a = SectionKey::from("skills");
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(a, b);
    }

    #[test]
    fn compares_with_str() {
        let key = SectionKey::from("contact");
        assert_eq!(key, "contact");
        assert!(key != "home");
    }

    #[test]
    fn href_prefixes_hash() {
        assert_eq!(SectionKey::from("projects").href(), "#projects");
    }

    #[test]
    fn hashmap_lookup_by_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(SectionKey::from("home"), 1);
        assert_eq!(map.get("home"), Some(&1));
    }

    #[test]
    fn anchor_serializes_key_as_plain_string() {
        let anchor = SectionAnchor::new("experiences", 1200.0);
        let json = serde_json::to_string(&anchor).unwrap_or_default();
        assert_eq!(json, r#"{"key":"experiences","top":1200.0}"#);
    }
}
