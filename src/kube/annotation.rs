//! Annotation keys read from source deployments and written on derived jobs.

use k8s_openapi::api::apps::v1::Deployment;
use kube::ResourceExt;

pub const COMMAND_TEMPLATE: &str = "jobify/command-array-template";
pub const PRIMARY_CONTAINER: &str = "jobify/primary-container";
pub const DEFAULT_COMMAND: &str = "jobify/default-command";
pub const SOURCE_ALIAS: &str = "jobify/source-alias";
pub const USER_COMMAND: &str = "jobify/user-command";
pub const SOURCE_DEPLOYMENT: &str = "jobify/source-deployment";
pub const DEPLOYMENT_ALIAS: &str = "jobify/deployment-alias";
pub const LOG_URL_TEMPLATE: &str = "jobify/log-url-template";

/// Set on the job pod template so the cluster autoscaler leaves it alone
pub const SAFE_TO_EVICT: &str = "cluster-autoscaler.kubernetes.io/safe-to-evict";

/// Label carried by every deployment and job this tool works with
pub const MANAGED_LABEL: &str = "jobify";
pub const MANAGED_SELECTOR: &str = "jobify=true";
/// Label the job controller puts on the pods of a job
pub const JOB_NAME_LABEL: &str = "job-name";

/// Substituted with the user command inside the command template
pub const COMMAND_PLACEHOLDER: &str = "$JOBIFY_COMMAND";
const LOG_URL_JOB_PLACEHOLDER: &str = "$JOB";
const LOG_URL_CONTAINER_PLACEHOLDER: &str = "$CONTAINER";

pub trait DeploymentAnnotations {
    /// Raw command array template. `None` when the annotation is absent
    fn command_template(&self) -> Option<&str>;
    /// Name of the targeted container. `None` when the annotation is absent
    fn primary_container(&self) -> Option<&str>;
    fn default_command(&self) -> &str;
    fn log_url_template(&self) -> Option<&str>;
    /// Alias annotation if any, otherwise the deployment name
    fn display_name(&self) -> String;
}

impl DeploymentAnnotations for Deployment {
    fn command_template(&self) -> Option<&str> {
        annotation(self, COMMAND_TEMPLATE)
    }

    fn primary_container(&self) -> Option<&str> {
        annotation(self, PRIMARY_CONTAINER)
    }

    fn default_command(&self) -> &str {
        annotation(self, DEFAULT_COMMAND).unwrap_or_default()
    }

    fn log_url_template(&self) -> Option<&str> {
        annotation(self, LOG_URL_TEMPLATE)
    }

    fn display_name(&self) -> String {
        annotation(self, DEPLOYMENT_ALIAS)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| self.name_any())
    }
}

/// Look up an annotation on any kubernetes object
pub fn annotation<'a, K: ResourceExt>(obj: &'a K, key: &str) -> Option<&'a str> {
    obj.annotations().get(key).map(String::as_str)
}

/// Render a log viewer url from its template
///
/// # Arguments
///
/// * `template` - &str
/// * `job_name` - &str
/// * `container` - &str
pub fn render_log_url(template: &str, job_name: &str, container: &str) -> String {
    template
        .replace(LOG_URL_JOB_PLACEHOLDER, job_name)
        .replace(LOG_URL_CONTAINER_PLACEHOLDER, container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deployment(annotations: serde_json::Value) -> Deployment {
        serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {
                "name": "api",
                "namespace": "prod",
                "annotations": annotations
            }
        }))
        .unwrap()
    }

    #[test]
    fn absent_and_empty_annotations_are_distinct() {
        let absent = deployment(json!({}));
        assert_eq!(absent.command_template(), None);
        assert_eq!(absent.primary_container(), None);
        assert_eq!(absent.log_url_template(), None);

        let empty = deployment(json!({
            COMMAND_TEMPLATE: "",
            PRIMARY_CONTAINER: "",
            LOG_URL_TEMPLATE: ""
        }));
        assert_eq!(empty.command_template(), Some(""));
        assert_eq!(empty.primary_container(), Some(""));
        assert_eq!(empty.log_url_template(), Some(""));
    }

    #[test]
    fn display_name_prefers_alias() {
        assert_eq!(deployment(json!({})).display_name(), "api");
        assert_eq!(
            deployment(json!({ DEPLOYMENT_ALIAS: "public-api" })).display_name(),
            "public-api"
        );
    }

    #[test]
    fn default_command_is_empty_when_missing() {
        assert_eq!(deployment(json!({})).default_command(), "");
        assert_eq!(
            deployment(json!({ DEFAULT_COMMAND: "rake db:migrate" })).default_command(),
            "rake db:migrate"
        );
    }

    #[test]
    fn renders_every_placeholder() {
        let url = render_log_url(
            "https://logs.example.com/?q=$JOB&c=$CONTAINER&again=$JOB",
            "api-abcde",
            "web",
        );
        assert_eq!(url, "https://logs.example.com/?q=api-abcde&c=web&again=api-abcde");
    }
}
