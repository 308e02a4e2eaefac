//! Conversion of untyped argument values into typed call arguments.
//!
//! Scalar conversions go through a decoder table registered once per scalar
//! kind; structured values are mapped recursively against the target type's
//! record fields or list element. Null handling follows the explicit
//! `NullDefaultsToZeroValue` policy: a null for a non-nullable value-type
//! slot becomes the type's zero value instead of an error.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};

use crate::catalog::signature::{MethodSignature, Parameter, ScalarKind};
use crate::catalog::{ResolvedType, TypeCatalog, TypeShape};
use crate::error::AdminError;

/// A scalar decode function: canonical typed value, or `None` on failure.
pub type ScalarDecoder = fn(&Value) -> Option<Value>;

/// Mapping from scalar kind to decode function, registered once and used
/// uniformly for every coercion.
pub struct DecoderTable {
    decoders: HashMap<ScalarKind, ScalarDecoder>,
}

impl DecoderTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// The built-in decoder set covering every [`ScalarKind`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.register(ScalarKind::String, decode_string);
        table.register(ScalarKind::Int, decode_int);
        table.register(ScalarKind::Long, decode_long);
        table.register(ScalarKind::Double, decode_double);
        table.register(ScalarKind::Bool, decode_bool);
        table.register(ScalarKind::DateTime, decode_datetime);
        table
    }

    pub fn register(&mut self, kind: ScalarKind, decoder: ScalarDecoder) {
        self.decoders.insert(kind, decoder);
    }

    #[must_use]
    pub fn decode(&self, kind: ScalarKind, value: &Value) -> Option<Value> {
        self.decoders.get(&kind).and_then(|decode| decode(value))
    }
}

impl Default for DecoderTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The zero value substituted for a null in a non-nullable value-type slot.
#[must_use]
pub fn zero_value(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::String => Value::String(String::new()),
        ScalarKind::Int | ScalarKind::Long => Value::Number(Number::from(0)),
        // 0.0 is always representable
        ScalarKind::Double => Number::from_f64(0.0).map_or(Value::Null, Value::Number),
        ScalarKind::Bool => Value::Bool(false),
        ScalarKind::DateTime => Value::String(DateTime::<Utc>::UNIX_EPOCH.to_rfc3339()),
    }
}

fn decode_string(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => Some(Value::String(s.clone())),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn decode_int(value: &Value) -> Option<Value> {
    integral(value)
        .filter(|n| i32::try_from(*n).is_ok())
        .map(|n| Value::Number(Number::from(n)))
}

fn decode_long(value: &Value) -> Option<Value> {
    integral(value).map(|n| Value::Number(Number::from(n)))
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                // fractional or out-of-range numbers are not integral
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn decode_double(value: &Value) -> Option<Value> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    Number::from_f64(parsed).map(Value::Number)
}

fn decode_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(b) => Some(Value::Bool(*b)),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
        _ => None,
    }
}

fn decode_datetime(value: &Value) -> Option<Value> {
    let Value::String(s) = value else {
        return None;
    };
    let text = s.trim();
    let parsed = DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|naive| naive.and_utc())
        })
        .ok()?;
    Some(Value::String(parsed.to_rfc3339()))
}

/// Coerces untyped values against catalog-resolved target types.
pub struct ArgumentCoercer<'a> {
    catalog: &'a TypeCatalog,
    decoders: &'a DecoderTable,
}

impl<'a> ArgumentCoercer<'a> {
    #[must_use]
    pub fn new(catalog: &'a TypeCatalog, decoders: &'a DecoderTable) -> Self {
        Self { catalog, decoders }
    }

    /// Coerce each value against its positional parameter.
    ///
    /// Fail-fast: the first value that cannot be converted aborts with that
    /// argument's index and attempted type; later values are not checked.
    pub fn coerce_arguments(
        &self,
        values: &[Value],
        parameters: &[Parameter],
    ) -> Result<Vec<Value>, AdminError> {
        if values.len() != parameters.len() {
            return Err(AdminError::ArgumentCountMismatch {
                expected: parameters.len(),
                supplied: values.len(),
            });
        }

        values
            .iter()
            .zip(parameters)
            .enumerate()
            .map(|(index, (value, parameter))| {
                self.coerce_one(value, &parameter.type_name, parameter.nullable)
                    .ok_or_else(|| AdminError::ArgumentCoercionFailed {
                        index,
                        attempted_type: parameter.type_name.clone(),
                    })
            })
            .collect()
    }

    /// Cross-check that the coerced value list is arity- and type-consistent
    /// with the matched signature's user parameters. Correctness-by-
    /// construction double-check after the pipeline has already coerced.
    #[must_use]
    pub fn arguments_valid(&self, signature: &MethodSignature, coerced: &[Value]) -> bool {
        let parameters: Vec<&Parameter> = signature.user_parameters().collect();
        if parameters.len() != coerced.len() {
            return false;
        }
        coerced
            .iter()
            .zip(parameters)
            .all(|(value, parameter)| {
                self.coerce_one(value, &parameter.type_name, parameter.nullable)
                    .is_some()
            })
    }

    fn coerce_one(&self, value: &Value, type_name: &str, nullable: bool) -> Option<Value> {
        match self.catalog.resolve_type(type_name)? {
            ResolvedType::Scalar(kind) => {
                if value.is_null() {
                    if nullable || kind.is_reference() {
                        Some(Value::Null)
                    } else {
                        Some(zero_value(kind))
                    }
                } else {
                    self.decoders.decode(kind, value)
                }
            }
            ResolvedType::Entry(entry) => match &entry.shape {
                TypeShape::Record { fields } => {
                    if value.is_null() {
                        return Some(Value::Null);
                    }
                    let Value::Object(supplied) = value else {
                        return None;
                    };
                    let mut mapped = Map::new();
                    for field in fields {
                        let raw = supplied.get(&field.name).cloned().unwrap_or(Value::Null);
                        let coerced = self.coerce_one(&raw, &field.type_name, field.nullable)?;
                        mapped.insert(field.name.clone(), coerced);
                    }
                    Some(Value::Object(mapped))
                }
                TypeShape::List { element } => {
                    if value.is_null() {
                        return Some(Value::Null);
                    }
                    let Value::Array(items) = value else {
                        return None;
                    };
                    items
                        .iter()
                        .map(|item| self.coerce_one(item, element, false))
                        .collect::<Option<Vec<Value>>>()
                        .map(Value::Array)
                }
                // services and host-injected types are never coercion targets
                TypeShape::Service { .. } | TypeShape::Opaque => None,
            },
        }
    }
}
