//! Argument binding between the engine and puzzle verifiers/solvers.
//!
//! Each definition declares its parameters once in a [`ParamSpec`]. Callers
//! may then pass arguments positionally or as a named record; both shapes
//! are normalized into [`BoundArgs`] in declared order, with defaults filled
//! in for omitted trailing parameters.

use serde_json::Value;

use crate::error::BindingError;
use crate::record::ParameterRecord;

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

/// Ordered parameter descriptor for a puzzle definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSpec {
    params: Vec<Param>,
}

/// The two call shapes accepted by [`ParamSpec::bind`].
#[derive(Debug, Clone, Copy)]
pub enum Args<'a> {
    /// Values in declared order. Missing trailing values fall back to defaults.
    Positional(&'a [Value]),
    /// Values by name. Record order is irrelevant.
    Named(&'a ParameterRecord),
}

impl ParamSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter with no default.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Declare a parameter that may be omitted.
    pub fn optional(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Record of every declared default, in declared order.
    pub fn defaults_record(&self) -> ParameterRecord {
        self.params
            .iter()
            .filter_map(|p| p.default.clone().map(|value| (p.name.clone(), value)))
            .collect()
    }

    /// Normalize either call shape into declared-order arguments.
    pub fn bind(&self, args: Args<'_>) -> Result<BoundArgs, BindingError> {
        let mut bound = ParameterRecord::new();
        match args {
            Args::Positional(values) => {
                if values.len() > self.params.len() {
                    return Err(BindingError::TooManyArguments {
                        expected: self.params.len(),
                        actual: values.len(),
                    });
                }
                for (index, param) in self.params.iter().enumerate() {
                    let value = values.get(index).or(param.default.as_ref());
                    bound.insert(param.name.clone(), self.require(param, value)?);
                }
            }
            Args::Named(record) => {
                if let Some(unknown) = record
                    .keys()
                    .find(|key| !self.params.iter().any(|p| p.name == *key))
                {
                    return Err(BindingError::UnknownParameter(unknown.to_string()));
                }
                for param in &self.params {
                    let value = record.get(&param.name).or(param.default.as_ref());
                    bound.insert(param.name.clone(), self.require(param, value)?);
                }
            }
        }
        Ok(BoundArgs { values: bound })
    }

    fn require(&self, param: &Param, value: Option<&Value>) -> Result<Value, BindingError> {
        value
            .cloned()
            .ok_or_else(|| BindingError::MissingParameter(param.name.clone()))
    }
}

/// Arguments normalized to declared order, read through typed accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgs {
    values: ParameterRecord,
}

impl BoundArgs {
    /// Values in declared order, as a positional tuple.
    pub fn positional(&self) -> Vec<&Value> {
        self.values.iter().map(|(_, value)| value).collect()
    }

    pub fn as_record(&self) -> &ParameterRecord {
        &self.values
    }

    pub fn value(&self, name: &str) -> Result<&Value, BindingError> {
        self.values
            .get(name)
            .ok_or_else(|| BindingError::UnknownParameter(name.to_string()))
    }

    pub fn str(&self, name: &str) -> Result<&str, BindingError> {
        let value = self.value(name)?;
        value.as_str().ok_or_else(|| mismatch(name, "string", value))
    }

    pub fn i64(&self, name: &str) -> Result<i64, BindingError> {
        let value = self.value(name)?;
        value.as_i64().ok_or_else(|| mismatch(name, "integer", value))
    }

    pub fn u64(&self, name: &str) -> Result<u64, BindingError> {
        let value = self.value(name)?;
        value
            .as_u64()
            .ok_or_else(|| mismatch(name, "non-negative integer", value))
    }

    pub fn f64(&self, name: &str) -> Result<f64, BindingError> {
        let value = self.value(name)?;
        value.as_f64().ok_or_else(|| mismatch(name, "number", value))
    }

    pub fn bool(&self, name: &str) -> Result<bool, BindingError> {
        let value = self.value(name)?;
        value.as_bool().ok_or_else(|| mismatch(name, "boolean", value))
    }

    pub fn array(&self, name: &str) -> Result<&[Value], BindingError> {
        let value = self.value(name)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| mismatch(name, "array", value))
    }

    /// Array parameter whose elements must all be integers.
    pub fn i64_list(&self, name: &str) -> Result<Vec<i64>, BindingError> {
        self.array(name)?
            .iter()
            .map(|item| item.as_i64().ok_or_else(|| mismatch(name, "integer array", item)))
            .collect()
    }
}

fn mismatch(name: &str, expected: &'static str, actual: &Value) -> BindingError {
    BindingError::TypeMismatch {
        name: name.to_string(),
        expected,
        actual: actual.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> ParamSpec {
        ParamSpec::new().required("s").optional("n", 5)
    }

    #[test]
    fn test_positional_fills_trailing_default() {
        let args = spec().bind(Args::Positional(&[json!("ab")])).unwrap();
        assert_eq!(args.positional(), vec![&json!("ab"), &json!(5)]);
        assert_eq!(args.str("s").unwrap(), "ab");
        assert_eq!(args.i64("n").unwrap(), 5);
    }

    #[test]
    fn test_named_expands_in_declared_order() {
        let record = ParameterRecord::new().with("n", 2).with("s", "xy");
        let args = spec().bind(Args::Named(&record)).unwrap();
        assert_eq!(args.positional(), vec![&json!("xy"), &json!(2)]);
        let keys: Vec<&str> = args.as_record().keys().collect();
        assert_eq!(keys, vec!["s", "n"]);
    }

    #[test]
    fn test_both_shapes_bind_identically() {
        let positional = spec().bind(Args::Positional(&[json!("q"), json!(1)])).unwrap();
        let record = ParameterRecord::new().with("n", 1).with("s", "q");
        let named = spec().bind(Args::Named(&record)).unwrap();
        assert_eq!(positional, named);
    }

    #[test]
    fn test_missing_required() {
        let err = spec().bind(Args::Positional(&[])).unwrap_err();
        assert_eq!(err, BindingError::MissingParameter("s".to_string()));

        let record = ParameterRecord::new().with("n", 1);
        let err = spec().bind(Args::Named(&record)).unwrap_err();
        assert_eq!(err, BindingError::MissingParameter("s".to_string()));
    }

    #[test]
    fn test_shape_errors() {
        let err = spec()
            .bind(Args::Positional(&[json!("a"), json!(1), json!(2)]))
            .unwrap_err();
        assert_eq!(
            err,
            BindingError::TooManyArguments {
                expected: 2,
                actual: 3
            }
        );

        let record = ParameterRecord::new().with("s", "a").with("bogus", 1);
        let err = spec().bind(Args::Named(&record)).unwrap_err();
        assert_eq!(err, BindingError::UnknownParameter("bogus".to_string()));
    }

    #[test]
    fn test_typed_accessor_mismatch() {
        let args = spec().bind(Args::Positional(&[json!(7)])).unwrap();
        assert!(matches!(
            args.str("s"),
            Err(BindingError::TypeMismatch { expected: "string", .. })
        ));
        let list = ParamSpec::new()
            .required("nums")
            .bind(Args::Positional(&[json!([1, "two"])]))
            .unwrap();
        assert!(list.i64_list("nums").is_err());
        assert!(list.array("nums").is_ok());
    }

    #[test]
    fn test_defaults_record() {
        let defaults = spec().defaults_record();
        assert_eq!(defaults.canonical_key(), r#"{"n":5}"#);
        assert_eq!(spec().names().collect::<Vec<_>>(), vec!["s", "n"]);
    }
}
