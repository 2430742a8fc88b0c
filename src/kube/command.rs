use super::{annotation::COMMAND_PLACEHOLDER, error::CommandResolutionError};

/// Resolve the command array of the job from the deployment command template
///
/// The placeholder is replaced in the raw template text before decoding, so the
/// user command lands verbatim inside a JSON string literal. A command that
/// breaks the JSON (e.g. unescaped quotes) is reported instead of being dropped.
///
/// # Arguments
///
/// * `template` - &str
/// * `user_command` - &str
pub fn resolve_command(
    template: &str,
    user_command: &str,
) -> Result<Vec<String>, CommandResolutionError> {
    let text = template.replace(COMMAND_PLACEHOLDER, user_command);

    serde_json::from_str::<Vec<String>>(&text)
        .map_err(|source| CommandResolutionError { text, source })
}

/// Get the image tag the job is going to run with
///
/// # Arguments
///
/// * `image` - &str
/// * `tag_override` - &str
pub fn resolve_image_tag(image: &str, tag_override: &str) -> String {
    if !tag_override.is_empty() {
        return tag_override.to_string();
    }

    image
        .rsplit_once(':')
        .map(|(_, tag)| tag.to_string())
        .unwrap_or_default()
}

/// Swap the tag of an image reference, adding one if the reference has none
pub fn replace_image_tag(image: &str, tag: &str) -> String {
    let repository = image
        .rsplit_once(':')
        .map(|(repository, _)| repository)
        .unwrap_or(image);

    format!("{repository}:{tag}")
}
