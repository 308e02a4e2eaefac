//! Method resolution against the type catalog.
//!
//! Host-injected parameter types are filtered out of the user-facing
//! argument list before coercion, but the final invocable signature is
//! looked up with the full, unfiltered type-name list — the method's real
//! signature still includes the parameters the host supplies at call time.

use serde_json::Value;

use crate::catalog::signature::{is_injected_type, MethodSignature, SignatureKey};
use crate::catalog::TypeCatalog;
use crate::error::AdminError;

/// Drop host-injected entries from the paired type-name/value lists.
///
/// Filtering is positional and exact by type name. A kept position with no
/// corresponding value contributes a JSON null, so the outputs always have
/// equal length.
#[must_use]
pub fn filter_injected(type_names: &[String], values: &[Value]) -> (Vec<String>, Vec<Value>) {
    let mut kept_names = Vec::with_capacity(type_names.len());
    let mut kept_values = Vec::with_capacity(type_names.len());

    for (position, name) in type_names.iter().enumerate() {
        if is_injected_type(name) {
            continue;
        }
        kept_names.push(name.clone());
        kept_values.push(values.get(position).cloned().unwrap_or(Value::Null));
    }

    (kept_names, kept_values)
}

/// Find the unique method matching `(type, name, full parameter type list)`.
///
/// Exact positional type-name match through the signature index; no
/// assignability or overload ranking.
pub fn resolve_method(
    catalog: &TypeCatalog,
    type_name: &str,
    method_name: &str,
    full_type_names: &[String],
) -> Result<MethodSignature, AdminError> {
    if !catalog.is_valid_type(type_name) {
        return Err(AdminError::TypeNotFound(type_name.to_string()));
    }

    catalog
        .find_signature(&SignatureKey::new(type_name, method_name, full_type_names))
        .cloned()
        .ok_or_else(|| AdminError::MethodNotFound {
            type_name: type_name.to_string(),
            method: method_name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::manifest::ModuleManifest;
    use crate::catalog::signature::EXECUTION_CONTEXT_TYPE;

    fn catalog() -> TypeCatalog {
        let manifest: ModuleManifest = serde_json::from_str(
            r#"{
                "name": "reports",
                "types": [
                    {
                        "kind": "service",
                        "name": "Reports.Runner",
                        "methods": [
                            {"name": "Send", "parameters": [
                                {"type": "string"},
                                {"type": "host.ExecutionContext"}
                            ]}
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();
        TypeCatalog::build(vec![manifest])
    }

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_filtering_is_positional_and_exact() {
        let type_names = names(&["Foo", EXECUTION_CONTEXT_TYPE, "Bar"]);
        let values = vec![json!(1), Value::Null, json!("x")];

        let (kept_names, kept_values) = filter_injected(&type_names, &values);
        assert_eq!(kept_names, names(&["Foo", "Bar"]));
        assert_eq!(kept_values, vec![json!(1), json!("x")]);
    }

    #[test]
    fn test_missing_values_become_null() {
        let type_names = names(&["string", EXECUTION_CONTEXT_TYPE, "int"]);
        let values = vec![json!("only one")];

        let (kept_names, kept_values) = filter_injected(&type_names, &values);
        assert_eq!(kept_names, names(&["string", "int"]));
        assert_eq!(kept_values, vec![json!("only one"), Value::Null]);
    }

    #[test]
    fn test_resolution_uses_the_full_type_list() {
        let catalog = catalog();

        let full = resolve_method(
            &catalog,
            "Reports.Runner",
            "Send",
            &names(&["string", EXECUTION_CONTEXT_TYPE]),
        );
        assert!(full.is_ok());

        // The filtered (user-only) list does not match the real signature.
        let filtered_only =
            resolve_method(&catalog, "Reports.Runner", "Send", &names(&["string"]));
        assert!(matches!(
            filtered_only,
            Err(AdminError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_type_and_method() {
        let catalog = catalog();

        assert!(matches!(
            resolve_method(&catalog, "Reports.Ghost", "Send", &[]),
            Err(AdminError::TypeNotFound(_))
        ));
        assert!(matches!(
            resolve_method(&catalog, "Reports.Runner", "Ghost", &[]),
            Err(AdminError::MethodNotFound { .. })
        ));
    }
}
