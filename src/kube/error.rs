use super::annotation::{COMMAND_TEMPLATE, PRIMARY_CONTAINER};
use thiserror::Error;

/// Reasons a deployment can't be turned into a job
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("deployment doesn't have command template annotation {COMMAND_TEMPLATE}")]
    MissingCommandTemplate,
    #[error(
        "deployment has multiple containers, but doesn't have primary container annotation {PRIMARY_CONTAINER}"
    )]
    MissingPrimaryContainerAnnotation,
    #[error(
        "deployment has multiple containers, and none of them matches {name:?} from annotation {PRIMARY_CONTAINER}"
    )]
    PrimaryContainerNotFound { name: String },
}

/// The command template didn't decode into an array of strings once the user
/// command was substituted in
#[derive(Debug, Error)]
#[error("unable to decode command array {text}: {source}")]
pub struct CommandResolutionError {
    pub text: String,
    #[source]
    pub source: serde_json::Error,
}

/// Failures while deriving a job from a deployment.
///
/// These only happen when the deployment skipped validation, so callers
/// should treat them as bugs rather than something the user can fix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("primary container {name:?} not found in a deployment that passed validation")]
    PrimaryContainerInvariantViolation { name: String },
    #[error("deployment has no pod spec")]
    MissingPodSpec,
}
