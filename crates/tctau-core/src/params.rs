//! Parameter sets
//!
//! A `ParameterSet` is the already-parsed key/value record handed to the
//! corrector by the host. Which keys are recognised is entirely up to the
//! algorithm reading it. Sets can be read from TOML or JSON documents.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ParameterError, TauError, TauResult};

/// Single parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Doubles(Vec<f64>),
    PSets(Vec<ParameterSet>),
    PSet(ParameterSet),
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Double(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::String(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        ParamValue::Doubles(v)
    }
}

impl From<Vec<ParameterSet>> for ParamValue {
    fn from(v: Vec<ParameterSet>) -> Self {
        ParamValue::PSets(v)
    }
}

impl From<ParameterSet> for ParamValue {
    fn from(v: ParameterSet) -> Self {
        ParamValue::PSet(v)
    }
}

/// Ordered key/value configuration record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> Result<&ParamValue, ParameterError> {
        self.get(name)
            .ok_or_else(|| ParameterError::Missing(name.to_string()))
    }

    fn wrong_type(name: &str, expected: &'static str) -> ParameterError {
        ParameterError::WrongType {
            name: name.to_string(),
            expected,
        }
    }

    /// Double parameter; integers are widened
    pub fn get_double(&self, name: &str) -> Result<f64, ParameterError> {
        match self.require(name)? {
            ParamValue::Double(v) => Ok(*v),
            ParamValue::Int(v) => Ok(*v as f64),
            _ => Err(Self::wrong_type(name, "double")),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64, ParameterError> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(*v),
            _ => Err(Self::wrong_type(name, "int")),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ParameterError> {
        match self.require(name)? {
            ParamValue::Bool(v) => Ok(*v),
            _ => Err(Self::wrong_type(name, "bool")),
        }
    }

    pub fn get_string(&self, name: &str) -> Result<&str, ParameterError> {
        match self.require(name)? {
            ParamValue::String(v) => Ok(v),
            _ => Err(Self::wrong_type(name, "string")),
        }
    }

    pub fn get_doubles(&self, name: &str) -> Result<&[f64], ParameterError> {
        match self.require(name)? {
            ParamValue::Doubles(v) => Ok(v),
            _ => Err(Self::wrong_type(name, "vdouble")),
        }
    }

    pub fn get_pset(&self, name: &str) -> Result<&ParameterSet, ParameterError> {
        match self.require(name)? {
            ParamValue::PSet(v) => Ok(v),
            _ => Err(Self::wrong_type(name, "PSet")),
        }
    }

    /// List of parameter sets; an empty list may deserialize as `Doubles`
    pub fn get_psets(&self, name: &str) -> Result<&[ParameterSet], ParameterError> {
        match self.require(name)? {
            ParamValue::PSets(v) => Ok(v),
            ParamValue::Doubles(v) if v.is_empty() => Ok(&[]),
            _ => Err(Self::wrong_type(name, "VPSet")),
        }
    }

    pub fn get_double_or(&self, name: &str, default: f64) -> Result<f64, ParameterError> {
        if self.contains(name) {
            self.get_double(name)
        } else {
            Ok(default)
        }
    }

    pub fn get_int_or(&self, name: &str, default: i64) -> Result<i64, ParameterError> {
        if self.contains(name) {
            self.get_int(name)
        } else {
            Ok(default)
        }
    }

    pub fn get_bool_or(&self, name: &str, default: bool) -> Result<bool, ParameterError> {
        if self.contains(name) {
            self.get_bool(name)
        } else {
            Ok(default)
        }
    }

    pub fn get_string_or<'a>(
        &'a self,
        name: &str,
        default: &'a str,
    ) -> Result<&'a str, ParameterError> {
        if self.contains(name) {
            self.get_string(name)
        } else {
            Ok(default)
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> TauResult<Self> {
        toml::from_str(s).map_err(|e| TauError::ConfigParse(e.to_string()))
    }

    /// Parse a JSON document
    pub fn from_json_str(s: &str) -> TauResult<Self> {
        serde_json::from_str(s).map_err(|e| TauError::ConfigParse(e.to_string()))
    }

    /// Load from a `.json` or `.toml` file
    pub fn from_file(path: impl AsRef<Path>) -> TauResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| TauError::ConfigParse(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }
}
