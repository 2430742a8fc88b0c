use super::{annotation::DeploymentAnnotations, command::replace_image_tag};
use k8s_openapi::api::{apps::v1::Deployment, core::v1::PodSpec};

/// Get the pod spec of a deployment's pod template
pub fn deployment_pod_spec(deployment: &Deployment) -> Option<&PodSpec> {
    deployment
        .spec
        .as_ref()
        .and_then(|spec| spec.template.spec.as_ref())
}

/// Get the image reference of the primary container of a deployment
pub fn primary_container_image(deployment: &Deployment) -> Option<&str> {
    let spec = deployment_pod_spec(deployment)?;
    let idx = spec.primary_container_index(deployment.primary_container())?;

    spec.containers[idx].image.as_deref()
}

pub trait PodSpecOps {
    /// Index of the container targeted by command and image overrides
    ///
    /// A single container is always the primary one. With several containers the
    /// one named by `primary` is picked.
    fn primary_container_index(&self, primary: Option<&str>) -> Option<usize>;
    fn override_image_tag(&mut self, idx: usize, tag: &str);
    fn strip_probes(&mut self);
    fn set_command(&mut self, idx: usize, command: Vec<String>);
}

impl PodSpecOps for PodSpec {
    fn primary_container_index(&self, primary: Option<&str>) -> Option<usize> {
        match self.containers.len() {
            0 => None,
            1 => Some(0),
            _ => {
                let primary = primary?;
                self.containers.iter().position(|c| c.name == primary)
            }
        }
    }

    fn override_image_tag(&mut self, idx: usize, tag: &str) {
        if let Some(container) = self.containers.get_mut(idx) {
            let image = container.image.as_deref().unwrap_or_default();
            container.image = Some(replace_image_tag(image, tag));
        }
    }

    fn strip_probes(&mut self) {
        for container in self.containers.iter_mut() {
            container.readiness_probe = None;
            container.liveness_probe = None;
        }
    }

    fn set_command(&mut self, idx: usize, command: Vec<String>) {
        if let Some(container) = self.containers.get_mut(idx) {
            container.command = Some(command);
        }
    }
}
