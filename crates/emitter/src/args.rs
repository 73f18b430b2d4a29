use crate::error::Failure;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Positional and keyword arguments forwarded to every listener of a
/// dispatch pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    positional: Vec<Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    keyword: Map<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.positional.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &Map<String, Value> {
        &self.keyword
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn get_kwarg(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Decode the failure record carried as the first positional argument
    /// of an error-channel emission.
    pub fn failure(&self) -> Option<Failure> {
        self.positional
            .first()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub(crate) fn with_leading(&self, value: Value) -> Self {
        let mut positional = Vec::with_capacity(self.positional.len() + 1);
        positional.push(value);
        positional.extend(self.positional.iter().cloned());
        Self {
            positional,
            keyword: self.keyword.clone(),
        }
    }
}
