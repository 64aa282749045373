//! Parameter records and the token → parameter table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A placeholder's name, value and type.
///
/// Every field defaults to the empty string when missing from JSON. An empty
/// `param_type` means untyped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub value: String,

    #[serde(default, rename = "type")]
    pub param_type: String,
}

impl Param {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        param_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            param_type: param_type.into(),
        }
    }

    /// A freshly discovered placeholder: name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, "", "")
    }

    /// True when name, value and type are all empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.value.is_empty() && self.param_type.is_empty()
    }

    /// Value as it is substituted into a document.
    ///
    /// `string`-typed values (any case) are wrapped in double quotes.
    pub fn substitution_value(&self) -> String {
        if self.param_type.eq_ignore_ascii_case("string") {
            format!("\"{}\"", self.value)
        } else {
            self.value.clone()
        }
    }

    /// Field-level merge with a persisted copy of the same parameter.
    ///
    /// A persisted field wins unless it is empty, so rescanning a document
    /// (which always yields empty value and type) keeps saved values.
    pub fn merged_with(&self, persisted: &Param) -> Param {
        fn pick(current: &str, persisted: &str) -> String {
            if persisted.is_empty() {
                current.to_string()
            } else {
                persisted.to_string()
            }
        }

        Param {
            name: pick(&self.name, &persisted.name),
            value: pick(&self.value, &persisted.value),
            param_type: pick(&self.param_type, &persisted.param_type),
        }
    }
}

/// Mapping from the literal token text (e.g. `@@Name@@`) to its parameter.
///
/// Iteration follows insertion order: document order for scanned tables,
/// file order for loaded ones. Saving and command building both rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamTable {
    entries: IndexMap<String, Param>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the parameter for `token`.
    ///
    /// Replacing keeps the token's original position.
    pub fn insert(&mut self, token: impl Into<String>, param: Param) -> Option<Param> {
        self.entries.insert(token.into(), param)
    }

    pub fn get(&self, token: &str) -> Option<&Param> {
        self.entries.get(token)
    }

    pub fn get_mut(&mut self, token: &str) -> Option<&mut Param> {
        self.entries.get_mut(token)
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse a table from JSON text.
    ///
    /// The document must be an object whose values are objects with string
    /// `name`/`value`/`type` fields (each optional).
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON (two-space indent) in table order.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromIterator<(String, Param)> for ParamTable {
    fn from_iter<I: IntoIterator<Item = (String, Param)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ParamTable {
    type Item = (String, Param);
    type IntoIter = indexmap::map::IntoIter<String, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParamTable {
    type Item = (&'a String, &'a Param);
    type IntoIter = indexmap::map::Iter<'a, String, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
