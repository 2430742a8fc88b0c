use super::TemplateSpecOps;
use crate::kube::annotation::SAFE_TO_EVICT;
use k8s_openapi::api::{apps::v1::Deployment, core::v1::PodTemplateSpec};
use std::collections::BTreeMap;

impl TemplateSpecOps for Deployment {
    fn get_job_pod_template(&self) -> Option<PodTemplateSpec> {
        let mut template = self.spec.as_ref()?.template.clone();

        let metadata = template.metadata.get_or_insert_with(Default::default);
        metadata.labels = Some(BTreeMap::new());
        metadata
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(SAFE_TO_EVICT.to_string(), "false".to_string());

        // Run once, with containers able to see each other's processes
        if let Some(spec) = template.spec.as_mut() {
            spec.restart_policy = Some("Never".to_string());
            spec.share_process_namespace = Some(true);
        }

        Some(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deployment() -> Deployment {
        serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "api", "namespace": "prod" },
            "spec": {
                "selector": { "matchLabels": { "app": "api" } },
                "template": {
                    "metadata": {
                        "labels": { "app": "api" },
                        "annotations": {
                            SAFE_TO_EVICT: "true",
                            "prometheus.io/scrape": "true"
                        }
                    },
                    "spec": {
                        "restartPolicy": "Always",
                        "containers": [{ "name": "web", "image": "app:1.0" }]
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn prepares_template_for_a_job() {
        let source = deployment();
        let template = source.get_job_pod_template().unwrap();

        let metadata = template.metadata.unwrap();
        assert_eq!(metadata.labels, Some(BTreeMap::new()));
        let annotations = metadata.annotations.unwrap();
        assert_eq!(annotations.get(SAFE_TO_EVICT).map(String::as_str), Some("false"));
        assert_eq!(
            annotations.get("prometheus.io/scrape").map(String::as_str),
            Some("true")
        );

        let spec = template.spec.unwrap();
        assert_eq!(spec.restart_policy.as_deref(), Some("Never"));
        assert_eq!(spec.share_process_namespace, Some(true));
    }

    #[test]
    fn source_deployment_is_untouched() {
        let source = deployment();
        let before = source.clone();
        let _ = source.get_job_pod_template();
        assert_eq!(source, before);
    }

    #[test]
    fn template_without_metadata_gets_annotations() {
        let mut source = deployment();
        if let Some(spec) = source.spec.as_mut() {
            spec.template.metadata = None;
        }

        let metadata = source.get_job_pod_template().unwrap().metadata.unwrap();
        assert_eq!(
            metadata.annotations.unwrap().get(SAFE_TO_EVICT).map(String::as_str),
            Some("false")
        );
    }

    #[test]
    fn deployment_without_spec_has_no_template() {
        let mut source = deployment();
        source.spec = None;
        assert!(source.get_job_pod_template().is_none());
    }
}
