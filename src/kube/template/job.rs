use super::{SUFFIX_LEN, TemplateSpecOps, random_suffix};
use crate::kube::{
    annotation::{
        DeploymentAnnotations, JOB_NAME_LABEL, LOG_URL_TEMPLATE, MANAGED_LABEL, PRIMARY_CONTAINER,
        SOURCE_ALIAS, SOURCE_DEPLOYMENT, USER_COMMAND,
    },
    error::BuildError,
    spec::PodSpecOps,
};
use k8s_openapi::{
    api::{
        apps::v1::Deployment,
        batch::v1::{Job, JobSpec},
    },
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use kube::ResourceExt;
use rand::Rng;
use std::collections::BTreeMap;

pub const BACKOFF_LIMIT: i32 = 2;
pub const ACTIVE_DEADLINE_SECONDS: i64 = 24 * 60 * 60;

/// Build a one-shot job from a deployment
///
/// The deployment is expected to have gone through validation, a primary
/// container that can't be found is reported as an invariant violation.
///
/// # Arguments
///
/// * `deployment` - &Deployment
/// * `command` - Vec<String>
/// * `image_tag_override` - &str
/// * `user_command` - &str
/// * `rng` - R
pub fn build_job<R: Rng + ?Sized>(
    deployment: &Deployment,
    command: Vec<String>,
    image_tag_override: &str,
    user_command: &str,
    rng: &mut R,
) -> Result<Job, BuildError> {
    let display_name = deployment.display_name();
    let name = format!("{}-{}", display_name, random_suffix(rng, SUFFIX_LEN));

    let mut template = deployment
        .get_job_pod_template()
        .ok_or(BuildError::MissingPodSpec)?;
    let pod_spec = template.spec.as_mut().ok_or(BuildError::MissingPodSpec)?;

    let primary = deployment.primary_container();
    let idx = pod_spec.primary_container_index(primary).ok_or_else(|| {
        BuildError::PrimaryContainerInvariantViolation {
            name: primary.unwrap_or_default().to_string(),
        }
    })?;

    if !image_tag_override.is_empty() {
        pod_spec.override_image_tag(idx, image_tag_override);
    }

    pod_spec.strip_probes();
    pod_spec.set_command(idx, command);

    let primary_name = pod_spec.containers[idx].name.clone();

    let labels = BTreeMap::from([
        (JOB_NAME_LABEL.to_string(), name.clone()),
        (MANAGED_LABEL.to_string(), "true".to_string()),
    ]);

    let mut annotations = BTreeMap::from([
        (SOURCE_DEPLOYMENT.to_string(), deployment.name_any()),
        (SOURCE_ALIAS.to_string(), display_name),
        (USER_COMMAND.to_string(), user_command.to_string()),
        (PRIMARY_CONTAINER.to_string(), primary_name),
    ]);

    if let Some(url) = deployment.log_url_template() {
        annotations.insert(LOG_URL_TEMPLATE.to_string(), url.to_string());
    }

    tracing::debug!(job = %name, container = idx, "built job spec");

    Ok(Job {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: deployment.namespace(),
            labels: Some(labels),
            annotations: Some(annotations),
            ..Default::default()
        },
        spec: Some(JobSpec {
            backoff_limit: Some(BACKOFF_LIMIT),
            active_deadline_seconds: Some(ACTIVE_DEADLINE_SECONDS),
            template,
            ..Default::default()
        }),
        ..Default::default()
    })
}
