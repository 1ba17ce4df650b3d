//! Numeric override application.
//!
//! An override value for a strength, scale or factor is either a literal that
//! replaces the original, or a directive such as `{"op": "mult", "value": 0.5}`
//! that is applied to the original. Directives never change the shape of the
//! value: a scalar stays a scalar and an N-vector stays an N-vector.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while parsing or applying a modifier.
#[derive(Debug, Error)]
pub enum ModulateError {
    #[error("unknown operator `{0}`, expected `add` or `mult`")]
    UnknownOperator(String),
    #[error("modifier directive is missing `{0}`")]
    MissingDirectiveField(&'static str),
    #[error("unknown modifier directive keys: {}", .0.join(", "))]
    UnknownDirectiveKeys(Vec<String>),
    #[error("modifier value {0} is not numeric")]
    NonNumericValue(Value),
    #[error("cannot modulate a missing value with op `{op}` and value {value}")]
    NullOriginal { op: Operator, value: Numeric },
    #[error("cannot modulate scalar {original} by vector {value}")]
    ScalarByVector { original: f32, value: Numeric },
    #[error("original {original} and value {value} must be equal length")]
    LengthMismatch { original: Numeric, value: Numeric },
    #[error("modulation changed shape from {expected} to {found}")]
    ShapeChanged { expected: Shape, found: Shape },
}

/// A numeric override operand: one number or a fixed-length vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Scalar(f32),
    Vector(Vec<f32>),
}

/// Scalar/vector shape of a [`Numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Vector(usize),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::Vector(len) => write!(f, "{len}-vector"),
        }
    }
}

impl Numeric {
    /// Read a JSON number or array of numbers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(|v| Self::Scalar(v as f32)),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_f64().map(|v| v as f32))
                .collect::<Option<Vec<_>>>()
                .map(Self::Vector),
            _ => None,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Numeric::Scalar(_) => Shape::Scalar,
            Numeric::Vector(v) => Shape::Vector(v.len()),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Scalar(v) => write!(f, "{v}"),
            Numeric::Vector(values) => {
                write!(f, "(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Directive operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Multiply,
}

impl Operator {
    fn parse(op: &str) -> Result<Self, ModulateError> {
        match op {
            "add" => Ok(Self::Add),
            "mult" | "multiply" => Ok(Self::Multiply),
            other => Err(ModulateError::UnknownOperator(other.to_string())),
        }
    }

    fn apply(self, original: f32, value: f32) -> f32 {
        match self {
            Operator::Add => original + value,
            Operator::Multiply => original * value,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Add => write!(f, "add"),
            Operator::Multiply => write!(f, "mult"),
        }
    }
}

/// A parsed override value for a numeric field.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    /// Replaces the original value.
    Literal(Numeric),
    /// Combines the original value with `value`.
    Directive { op: Operator, value: Numeric },
}

impl Modifier {
    /// Parse a modifier from its JSON form.
    ///
    /// Objects are directives and must hold exactly `op` and `value`;
    /// anything else is a literal and must be numeric.
    pub fn parse(raw: &Value) -> Result<Self, ModulateError> {
        let Value::Object(directive) = raw else {
            return Numeric::from_value(raw)
                .map(Self::Literal)
                .ok_or_else(|| ModulateError::NonNumericValue(raw.clone()));
        };

        let unknown: Vec<String> = directive
            .keys()
            .filter(|k| k.as_str() != "op" && k.as_str() != "value")
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ModulateError::UnknownDirectiveKeys(unknown));
        }

        let op = directive
            .get("op")
            .ok_or(ModulateError::MissingDirectiveField("op"))?;
        let op = match op {
            Value::String(s) => Operator::parse(s)?,
            other => return Err(ModulateError::UnknownOperator(other.to_string())),
        };

        let value = directive
            .get("value")
            .ok_or(ModulateError::MissingDirectiveField("value"))?;
        let value = Numeric::from_value(value)
            .ok_or_else(|| ModulateError::NonNumericValue(value.clone()))?;

        Ok(Self::Directive { op, value })
    }
}

/// Apply `modifier` to `original`.
///
/// `None` stands for a missing original; only literals can replace it.
pub fn modulate(original: Option<&Numeric>, modifier: &Modifier) -> Result<Numeric, ModulateError> {
    let (op, value) = match modifier {
        Modifier::Literal(literal) => return Ok(literal.clone()),
        Modifier::Directive { op, value } => (*op, value),
    };

    let original = original.ok_or_else(|| ModulateError::NullOriginal {
        op,
        value: value.clone(),
    })?;

    let result = match (original, value) {
        (Numeric::Scalar(o), Numeric::Scalar(v)) => Numeric::Scalar(op.apply(*o, *v)),
        (Numeric::Scalar(o), Numeric::Vector(_)) => {
            return Err(ModulateError::ScalarByVector {
                original: *o,
                value: value.clone(),
            });
        }
        (Numeric::Vector(o), Numeric::Scalar(v)) => {
            Numeric::Vector(o.iter().map(|x| op.apply(*x, *v)).collect())
        }
        (Numeric::Vector(o), Numeric::Vector(v)) => {
            if o.len() != v.len() {
                return Err(ModulateError::LengthMismatch {
                    original: original.clone(),
                    value: value.clone(),
                });
            }
            Numeric::Vector(o.iter().zip(v).map(|(x, y)| op.apply(*x, *y)).collect())
        }
    };

    if result.shape() != original.shape() {
        return Err(ModulateError::ShapeChanged {
            expected: original.shape(),
            found: result.shape(),
        });
    }

    Ok(result)
}

/// Typed numeric fields that can be modulated.
pub trait NumericValue: Sized + Copy {
    fn to_numeric(self) -> Numeric;
    fn from_numeric(value: &Numeric) -> Option<Self>;
}

impl NumericValue for f32 {
    fn to_numeric(self) -> Numeric {
        Numeric::Scalar(self)
    }

    fn from_numeric(value: &Numeric) -> Option<Self> {
        match value {
            Numeric::Scalar(v) => Some(*v),
            Numeric::Vector(_) => None,
        }
    }
}

impl<const N: usize> NumericValue for [f32; N] {
    fn to_numeric(self) -> Numeric {
        Numeric::Vector(self.to_vec())
    }

    fn from_numeric(value: &Numeric) -> Option<Self> {
        match value {
            Numeric::Vector(v) => v.as_slice().try_into().ok(),
            Numeric::Scalar(_) => None,
        }
    }
}

/// Apply `modifier` to a typed field, rejecting literals of the wrong shape.
pub fn modulate_value<T: NumericValue>(original: T, modifier: &Modifier) -> Result<T, ModulateError> {
    let original = original.to_numeric();
    let result = modulate(Some(&original), modifier)?;
    T::from_numeric(&result).ok_or(ModulateError::ShapeChanged {
        expected: original.shape(),
        found: result.shape(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directive(raw: Value) -> Modifier {
        Modifier::parse(&raw).unwrap()
    }

    #[test]
    fn test_literal_replaces_original() {
        let result = modulate(Some(&Numeric::Scalar(0.25)), &directive(json!([1, 2]))).unwrap();
        assert_eq!(result, Numeric::Vector(vec![1.0, 2.0]));

        let result = modulate(None, &directive(json!(3.0))).unwrap();
        assert_eq!(result, Numeric::Scalar(3.0));
    }

    #[test]
    fn test_scalar_multiply_stays_scalar() {
        let result = modulate(
            Some(&Numeric::Scalar(0.5)),
            &directive(json!({"op": "mult", "value": 3})),
        )
        .unwrap();
        assert_eq!(result, Numeric::Scalar(1.5));
    }

    #[test]
    fn test_vector_add_broadcasts_scalar() {
        let result = modulate(
            Some(&Numeric::Vector(vec![1.0, 2.0, 3.0])),
            &directive(json!({"op": "add", "value": 1})),
        )
        .unwrap();
        assert_eq!(result, Numeric::Vector(vec![2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_vector_add_elementwise() {
        let result = modulate(
            Some(&Numeric::Vector(vec![1.0, 2.0])),
            &directive(json!({"op": "add", "value": [0.5, 0.25]})),
        )
        .unwrap();
        assert_eq!(result, Numeric::Vector(vec![1.5, 2.25]));
    }

    #[test]
    fn test_multiply_alias() {
        let result = modulate(
            Some(&Numeric::Vector(vec![1.0, 2.0])),
            &directive(json!({"op": "multiply", "value": [2, 4]})),
        )
        .unwrap();
        assert_eq!(result, Numeric::Vector(vec![2.0, 8.0]));
    }

    #[test]
    fn test_length_mismatch_fails() {
        let err = modulate(
            Some(&Numeric::Vector(vec![1.0, 2.0])),
            &directive(json!({"op": "add", "value": [1, 2, 3]})),
        )
        .unwrap_err();
        assert!(matches!(err, ModulateError::LengthMismatch { .. }));
    }

    #[test]
    fn test_scalar_by_vector_fails() {
        let err = modulate(
            Some(&Numeric::Scalar(1.0)),
            &directive(json!({"op": "mult", "value": [1, 2]})),
        )
        .unwrap_err();
        assert!(matches!(err, ModulateError::ScalarByVector { .. }));
    }

    #[test]
    fn test_null_original_fails() {
        let err = modulate(None, &directive(json!({"op": "add", "value": 1}))).unwrap_err();
        assert!(matches!(err, ModulateError::NullOriginal { .. }));
    }

    #[test]
    fn test_malformed_directives() {
        assert!(matches!(
            Modifier::parse(&json!({"op": "pow", "value": 2})),
            Err(ModulateError::UnknownOperator(op)) if op == "pow"
        ));
        assert!(matches!(
            Modifier::parse(&json!({"op": "add"})),
            Err(ModulateError::MissingDirectiveField("value"))
        ));
        assert!(matches!(
            Modifier::parse(&json!({"op": "add", "value": 1, "clamp": true})),
            Err(ModulateError::UnknownDirectiveKeys(keys)) if keys == vec!["clamp".to_string()]
        ));
        assert!(matches!(
            Modifier::parse(&json!("bright")),
            Err(ModulateError::NonNumericValue(_))
        ));
    }

    #[test]
    fn test_typed_literal_of_wrong_shape_fails() {
        let err = modulate_value([1.0_f32; 4], &directive(json!(0.5))).unwrap_err();
        assert!(matches!(
            err,
            ModulateError::ShapeChanged {
                expected: Shape::Vector(4),
                found: Shape::Scalar
            }
        ));

        let tinted = modulate_value([1.0_f32, 1.0, 1.0], &directive(json!({"op": "mult", "value": 0.5})))
            .unwrap();
        assert_eq!(tinted, [0.5, 0.5, 0.5]);
    }
}
