use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Parameter type of the host execution context, supplied by the executing
/// host at call time.
pub const EXECUTION_CONTEXT_TYPE: &str = "host.ExecutionContext";
/// Parameter type of the host's cooperative cancellation token.
pub const JOB_CANCELLATION_TOKEN_TYPE: &str = "host.JobCancellationToken";
/// Parameter type of the generic cancellation token.
pub const CANCELLATION_TOKEN_TYPE: &str = "CancellationToken";

/// Parameter types the executing host injects at call time. These never
/// appear in the user-facing argument list that gets coerced, but they do
/// remain part of the method's real signature.
pub const INJECTED_PARAMETER_TYPES: [&str; 3] = [
    EXECUTION_CONTEXT_TYPE,
    JOB_CANCELLATION_TOKEN_TYPE,
    CANCELLATION_TOKEN_TYPE,
];

#[must_use]
pub fn is_injected_type(name: &str) -> bool {
    INJECTED_PARAMETER_TYPES.contains(&name)
}

/// Scalar types every catalog knows about, regardless of loaded modules.
///
/// The primary name (`to_string`) is the canonical spelling; the extra
/// `serialize` entries are accepted aliases in manifests and admin requests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum ScalarKind {
    #[strum(to_string = "string", serialize = "str")]
    String,
    #[strum(to_string = "int", serialize = "i32", serialize = "integer")]
    Int,
    #[strum(to_string = "long", serialize = "i64")]
    Long,
    #[strum(to_string = "double", serialize = "f64", serialize = "float")]
    Double,
    #[strum(to_string = "bool", serialize = "boolean")]
    Bool,
    #[strum(to_string = "datetime")]
    DateTime,
}

impl ScalarKind {
    /// Whether a null value is acceptable for this kind even when the
    /// parameter is not explicitly nullable. Strings behave like reference
    /// types; the numeric kinds, booleans and datetimes are value types and
    /// fall back to their zero value instead.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::String)
    }
}

/// One declared parameter of a resolvable method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
}

/// A concrete, invocable method signature resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub declaring_type: String,
    pub name: String,
    pub parameters: Vec<Parameter>,
}

impl MethodSignature {
    /// The user-supplied parameter view: every parameter except the
    /// host-injected ones. This is the coercion target list.
    pub fn user_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|p| !is_injected_type(&p.type_name))
    }

    #[must_use]
    pub fn parameter_type_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.type_name.clone()).collect()
    }
}

/// Lookup key of the signature index: exact positional type-name match,
/// not assignability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureKey {
    pub type_name: String,
    pub method_name: String,
    pub parameter_types: Vec<String>,
}

impl SignatureKey {
    #[must_use]
    pub fn new(type_name: &str, method_name: &str, parameter_types: &[String]) -> Self {
        Self {
            type_name: type_name.to_string(),
            method_name: method_name.to_string(),
            parameter_types: parameter_types.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_scalar_kind_aliases_resolve() {
        assert_eq!(ScalarKind::from_str("string").unwrap(), ScalarKind::String);
        assert_eq!(ScalarKind::from_str("integer").unwrap(), ScalarKind::Int);
        assert_eq!(ScalarKind::from_str("i32").unwrap(), ScalarKind::Int);
        assert_eq!(ScalarKind::from_str("i64").unwrap(), ScalarKind::Long);
        assert_eq!(ScalarKind::from_str("float").unwrap(), ScalarKind::Double);
        assert_eq!(ScalarKind::from_str("Boolean").unwrap(), ScalarKind::Bool);
        assert!(ScalarKind::from_str("decimal").is_err());
    }

    #[test]
    fn test_canonical_names_round_trip() {
        assert_eq!(ScalarKind::Int.to_string(), "int");
        assert_eq!(ScalarKind::DateTime.to_string(), "datetime");
    }

    #[test]
    fn test_user_parameters_skip_injected() {
        let signature = MethodSignature {
            declaring_type: "Reports.Runner".to_string(),
            name: "Send".to_string(),
            parameters: vec![
                Parameter {
                    type_name: "string".to_string(),
                    nullable: false,
                },
                Parameter {
                    type_name: EXECUTION_CONTEXT_TYPE.to_string(),
                    nullable: false,
                },
                Parameter {
                    type_name: "int".to_string(),
                    nullable: true,
                },
            ],
        };

        let user: Vec<&str> = signature
            .user_parameters()
            .map(|p| p.type_name.as_str())
            .collect();
        assert_eq!(user, vec!["string", "int"]);
    }
}
