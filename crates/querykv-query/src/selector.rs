use serde::{Deserialize, Serialize};

use querykv_record::Attributes;

use crate::error::QueryError;

/// Which keys a fetch should resolve.
///
/// An empty `Keys` list is the all-keys sentinel, never "select nothing".
/// Use [`KeySelector::keys`] to build one from an iterator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySelector<K> {
    All,
    Keys(Vec<K>),
}

impl<K> KeySelector<K> {
    pub fn all() -> Self {
        KeySelector::All
    }

    pub fn one(key: K) -> Self {
        KeySelector::Keys(vec![key])
    }

    pub fn keys(keys: impl IntoIterator<Item = K>) -> Self {
        let keys: Vec<K> = keys.into_iter().collect();
        if keys.is_empty() {
            KeySelector::All
        } else {
            KeySelector::Keys(keys)
        }
    }

    pub fn is_all(&self) -> bool {
        match self {
            KeySelector::All => true,
            KeySelector::Keys(keys) => keys.is_empty(),
        }
    }

    /// The explicit key list, or `None` for the all-keys sentinel.
    pub fn explicit(&self) -> Option<&[K]> {
        match self {
            KeySelector::Keys(keys) if !keys.is_empty() => Some(keys),
            _ => None,
        }
    }
}

impl<K> Default for KeySelector<K> {
    fn default() -> Self {
        KeySelector::All
    }
}

impl<K> From<Vec<K>> for KeySelector<K> {
    fn from(keys: Vec<K>) -> Self {
        KeySelector::keys(keys)
    }
}

/// Attribute names to fetch. Empty means every attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection(Vec<String>);

impl Projection {
    pub fn all() -> Self {
        Projection(Vec::new())
    }

    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection(names.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.is_all() || self.0.iter().any(|n| n == name)
    }

    /// Reject blank attribute names.
    pub fn validate(&self) -> Result<(), QueryError> {
        match self.0.iter().position(|n| n.trim().is_empty()) {
            Some(i) => Err(QueryError::precondition(format!(
                "projection attribute #{i} is blank"
            ))),
            None => Ok(()),
        }
    }

    /// Copy of `attributes` restricted to this projection. Names that are
    /// not present in the source stay absent.
    pub fn apply(&self, attributes: &Attributes) -> Attributes {
        if self.is_all() {
            return attributes.clone();
        }
        self.0
            .iter()
            .filter_map(|name| {
                attributes
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Projection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Projection::of(iter)
    }
}

#[cfg(test)]
mod tests {
    use querykv_record::Value;

    use super::*;

    #[test]
    fn empty_key_list_is_all_keys() {
        let selector: KeySelector<String> = KeySelector::keys(Vec::new());
        assert_eq!(selector, KeySelector::All);

        // Constructed directly, an empty list still reads as the sentinel.
        let raw: KeySelector<String> = KeySelector::Keys(Vec::new());
        assert!(raw.is_all());
        assert_eq!(raw.explicit(), None);
    }

    #[test]
    fn explicit_keys_keep_order() {
        let selector = KeySelector::from(vec!["b", "a"]);
        assert!(!selector.is_all());
        assert_eq!(selector.explicit(), Some(&["b", "a"][..]));
    }

    #[test]
    fn blank_projection_name_is_a_precondition_failure() {
        let projection = Projection::of(["status", " "]);
        let err = projection.validate().unwrap_err();
        assert!(matches!(err, QueryError::Precondition(_)));
        assert!(Projection::of(["status"]).validate().is_ok());
        assert!(Projection::all().validate().is_ok());
    }

    #[test]
    fn apply_keeps_only_named_attributes() {
        let attrs = Attributes::from([
            ("status".to_string(), Value::from("open")),
            ("owner".to_string(), Value::from("ann")),
        ]);

        let projected = Projection::of(["status", "missing"]).apply(&attrs);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected["status"], Value::from("open"));

        assert_eq!(Projection::all().apply(&attrs), attrs);
    }

    #[test]
    fn contains_treats_all_as_every_name() {
        let projection = Projection::of(["status", "owner"]);
        assert_eq!(projection.names(), ["status", "owner"]);
        assert!(projection.contains("owner"));
        assert!(!projection.contains("rank"));

        assert!(Projection::all().names().is_empty());
        assert!(Projection::all().contains("anything"));
    }

    #[test]
    fn serde_shapes() {
        let json = serde_json::to_string(&Projection::of(["a", "b"])).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let selector: KeySelector<u32> = serde_json::from_str(r#"{"keys":[1,2]}"#).unwrap();
        assert_eq!(selector, KeySelector::Keys(vec![1, 2]));
        let all: KeySelector<u32> = serde_json::from_str(r#""all""#).unwrap();
        assert!(all.is_all());
    }
}
