//! The two admin pipelines.
//!
//! Save: validate cron → resolve time zone → confirm type → filter injected
//! parameters → resolve the full signature → coerce user arguments →
//! cross-validate → register. Strictly fail-fast; registration is the single
//! atomic side effect and nothing is persisted before it.
//!
//! Action: one state transition per request.

use serde_json::Value;
use tracing::debug;

use crate::catalog::TypeCatalog;
use crate::coerce::{ArgumentCoercer, DecoderTable};
use crate::error::AdminError;
use crate::jobs::registry::{JobRegistration, RecurringJobRegistry};
use crate::jobs::{JobAction, RegisteredJob};
use crate::resolve::{filter_injected, resolve_method};
use crate::schedule::{resolve_time_zone, validate_cron};

/// One administrative save request, as decoded from the transport.
/// Request-scoped; discarded once the pipeline completes either way.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    pub id: String,
    pub cron: String,
    pub time_zone_id: String,
    pub type_name: String,
    pub method_name: String,
    pub argument_type_names: Vec<String>,
    pub argument_values: Vec<Value>,
    pub queue: String,
}

/// Run the save pipeline to completion.
pub async fn save_job(
    catalog: &TypeCatalog,
    decoders: &DecoderTable,
    registry: &RecurringJobRegistry,
    descriptor: JobDescriptor,
) -> Result<RegisteredJob, AdminError> {
    let schedule = validate_cron(&descriptor.cron)?;
    let time_zone = resolve_time_zone(&descriptor.time_zone_id)?;

    if !catalog.is_valid_type(&descriptor.type_name) {
        return Err(AdminError::TypeNotFound(descriptor.type_name));
    }

    let (user_type_names, user_values) = filter_injected(
        &descriptor.argument_type_names,
        &descriptor.argument_values,
    );
    debug!(
        id = %descriptor.id,
        type_name = %descriptor.type_name,
        method = %descriptor.method_name,
        user_arguments = user_type_names.len(),
        "resolving job target"
    );

    // The invocable signature still includes the host-injected parameters,
    // so resolution runs against the full, unfiltered type list.
    let signature = resolve_method(
        catalog,
        &descriptor.type_name,
        &descriptor.method_name,
        &descriptor.argument_type_names,
    )?;

    let coercer = ArgumentCoercer::new(catalog, decoders);
    let user_parameters: Vec<_> = signature.user_parameters().cloned().collect();
    let coerced = coercer.coerce_arguments(&user_values, &user_parameters)?;

    if !coercer.arguments_valid(&signature, &coerced) {
        return Err(AdminError::ArgumentsInvalid {
            type_name: signature.declaring_type.clone(),
            method: signature.name.clone(),
        });
    }

    registry
        .register(JobRegistration {
            id: descriptor.id,
            signature,
            arguments: coerced,
            cron: schedule.source().to_string(),
            time_zone_id: time_zone.name().to_string(),
            queue: descriptor.queue,
        })
        .await
}

/// Run the action pipeline: a single state transition by id.
pub async fn apply_action(
    registry: &RecurringJobRegistry,
    id: &str,
    action: JobAction,
) -> Result<(), AdminError> {
    match action {
        JobAction::Start => registry.activate(id).await,
        JobAction::Stop => registry.deactivate(id).await,
        JobAction::Remove => registry.remove(id).await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::catalog::manifest::ModuleManifest;
    use crate::catalog::signature::EXECUTION_CONTEXT_TYPE;
    use crate::jobs::store::MemoryJobStore;
    use crate::jobs::JobState;

    fn catalog() -> TypeCatalog {
        let manifest: ModuleManifest = serde_json::from_str(
            r#"{
                "name": "reports",
                "types": [
                    {
                        "kind": "service",
                        "name": "Reports.Runner",
                        "methods": [
                            {"name": "Send", "parameters": [{"type": "string"}]},
                            {"name": "Sync", "parameters": [
                                {"type": "int"},
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

    fn descriptor() -> JobDescriptor {
        JobDescriptor {
            id: "job1".to_string(),
            cron: "*/5 * * * *".to_string(),
            time_zone_id: String::new(),
            type_name: "Reports.Runner".to_string(),
            method_name: "Send".to_string(),
            argument_type_names: vec!["string".to_string()],
            argument_values: vec![json!("weekly")],
            queue: "default".to_string(),
        }
    }

    async fn run(descriptor: JobDescriptor) -> (Result<RegisteredJob, AdminError>, RecurringJobRegistry) {
        let catalog = catalog();
        let decoders = DecoderTable::with_defaults();
        let registry = RecurringJobRegistry::new(Arc::new(MemoryJobStore::new()));
        let outcome = save_job(&catalog, &decoders, &registry, descriptor).await;
        (outcome, registry)
    }

    #[tokio::test]
    async fn test_end_to_end_registration() {
        let (outcome, registry) = run(descriptor()).await;
        let job = outcome.unwrap();

        assert_eq!(job.id, "job1");
        assert_eq!(job.state, JobState::Active);
        assert_eq!(job.time_zone_id, "UTC");
        assert_eq!(job.arguments, vec![json!("weekly")]);
        assert_eq!(job.signature.name, "Send");

        let listed = registry.list_active(0, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_injected_parameters_are_supplied_by_the_host_not_the_admin() {
        let mut request = descriptor();
        request.method_name = "Sync".to_string();
        request.argument_type_names =
            vec!["int".to_string(), EXECUTION_CONTEXT_TYPE.to_string()];
        request.argument_values = vec![json!("10"), Value::Null];

        let (outcome, _) = run(request).await;
        let job = outcome.unwrap();

        // only the user argument is bound; the injected slot is gone
        assert_eq!(job.arguments, vec![json!(10)]);
        assert_eq!(job.signature.parameters.len(), 2);
    }

    #[tokio::test]
    async fn test_each_stage_short_circuits() {
        let cases: Vec<(JobDescriptor, fn(&AdminError) -> bool)> = vec![
            (
                JobDescriptor {
                    cron: "* * *".to_string(),
                    ..descriptor()
                },
                |e| matches!(e, AdminError::InvalidCronFormat(_)),
            ),
            (
                JobDescriptor {
                    time_zone_id: "Mars/Olympus".to_string(),
                    ..descriptor()
                },
                |e| matches!(e, AdminError::UnknownTimeZone(_)),
            ),
            (
                JobDescriptor {
                    type_name: "Reports.Ghost".to_string(),
                    ..descriptor()
                },
                |e| matches!(e, AdminError::TypeNotFound(_)),
            ),
            (
                JobDescriptor {
                    method_name: "Ghost".to_string(),
                    ..descriptor()
                },
                |e| matches!(e, AdminError::MethodNotFound { .. }),
            ),
            (
                JobDescriptor {
                    argument_values: vec![json!({})],
                    ..descriptor()
                },
                |e| matches!(e, AdminError::ArgumentCoercionFailed { index: 0, .. }),
            ),
        ];

        for (request, expected) in cases {
            let (outcome, registry) = run(request).await;
            let err = outcome.unwrap_err();
            assert!(expected(&err), "unexpected error: {err}");

            // a failed pipeline leaves no side effect behind
            assert_eq!(registry.counts().await.unwrap(), (0, 0));
        }
    }

    #[test]
    fn test_cross_check_failure_names_the_target_method() {
        let err = AdminError::ArgumentsInvalid {
            type_name: "Reports.Runner".to_string(),
            method: "Send".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Arguments do not match method 'Send' on type 'Reports.Runner'"
        );
    }

    #[tokio::test]
    async fn test_action_pipeline_dispatches_transitions() {
        let (outcome, registry) = run(descriptor()).await;
        outcome.unwrap();

        apply_action(&registry, "job1", JobAction::Stop).await.unwrap();
        assert_eq!(registry.counts().await.unwrap(), (0, 1));

        apply_action(&registry, "job1", JobAction::Start).await.unwrap();
        assert_eq!(registry.counts().await.unwrap(), (1, 0));

        apply_action(&registry, "job1", JobAction::Remove).await.unwrap();
        assert_eq!(registry.counts().await.unwrap(), (0, 0));

        let err = apply_action(&registry, "job1", JobAction::Stop)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::StateTransitionInvalid { .. }));
    }
}
