use super::{
    annotation::DeploymentAnnotations, error::ValidationError, spec::deployment_pod_spec,
};
use k8s_openapi::api::apps::v1::Deployment;

/// Check that a deployment carries what's needed to derive a job from it
///
/// # Arguments
///
/// * `deployment` - &Deployment
pub fn validate(deployment: &Deployment) -> Result<(), ValidationError> {
    if deployment.command_template().is_none() {
        return Err(ValidationError::MissingCommandTemplate);
    }

    let containers = deployment_pod_spec(deployment)
        .map(|spec| spec.containers.as_slice())
        .unwrap_or_default();

    if containers.len() <= 1 {
        return Ok(());
    }

    let Some(primary) = deployment.primary_container() else {
        return Err(ValidationError::MissingPrimaryContainerAnnotation);
    };

    match containers.iter().any(|c| c.name == primary) {
        true => Ok(()),
        false => Err(ValidationError::PrimaryContainerNotFound {
            name: primary.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kube::annotation::{COMMAND_TEMPLATE, PRIMARY_CONTAINER};
    use serde_json::{Value, json};

    fn deployment(annotations: Value, containers: &[&str]) -> Deployment {
        let containers: Vec<Value> = containers
            .iter()
            .map(|name| json!({ "name": name, "image": "app:1.0" }))
            .collect();

        serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "api", "namespace": "prod", "annotations": annotations },
            "spec": {
                "selector": { "matchLabels": { "app": "api" } },
                "template": { "spec": { "containers": containers } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn single_or_no_container_never_needs_primary() {
        let template = json!({ COMMAND_TEMPLATE: "[\"$JOBIFY_COMMAND\"]" });
        assert_eq!(validate(&deployment(template.clone(), &[])), Ok(()));
        assert_eq!(validate(&deployment(template, &["web"])), Ok(()));

        let with_bogus_primary = json!({
            COMMAND_TEMPLATE: "[\"$JOBIFY_COMMAND\"]",
            PRIMARY_CONTAINER: "nope"
        });
        assert_eq!(validate(&deployment(with_bogus_primary, &["web"])), Ok(()));
    }

    #[test]
    fn missing_template_wins_regardless_of_containers() {
        for containers in [&[][..], &["web"][..], &["web", "proxy"][..]] {
            assert_eq!(
                validate(&deployment(json!({}), containers)),
                Err(ValidationError::MissingCommandTemplate)
            );
        }
    }

    #[test]
    fn empty_template_counts_as_present() {
        let annotations = json!({ COMMAND_TEMPLATE: "" });
        assert_eq!(validate(&deployment(annotations, &["web"])), Ok(()));
    }

    #[test]
    fn multiple_containers_need_primary() {
        let annotations = json!({ COMMAND_TEMPLATE: "[\"$JOBIFY_COMMAND\"]" });
        assert_eq!(
            validate(&deployment(annotations, &["web", "proxy"])),
            Err(ValidationError::MissingPrimaryContainerAnnotation)
        );
    }

    #[test]
    fn primary_must_name_a_container() {
        let annotations = json!({
            COMMAND_TEMPLATE: "[\"$JOBIFY_COMMAND\"]",
            PRIMARY_CONTAINER: "worker"
        });
        assert_eq!(
            validate(&deployment(annotations, &["web", "proxy"])),
            Err(ValidationError::PrimaryContainerNotFound {
                name: "worker".to_string()
            })
        );

        let annotations = json!({
            COMMAND_TEMPLATE: "[\"$JOBIFY_COMMAND\"]",
            PRIMARY_CONTAINER: "proxy"
        });
        assert_eq!(validate(&deployment(annotations, &["web", "proxy"])), Ok(()));
    }
}
