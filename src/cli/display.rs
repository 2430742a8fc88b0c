use crate::kube::{
    annotation::{
        DeploymentAnnotations, LOG_URL_TEMPLATE, PRIMARY_CONTAINER, SOURCE_ALIAS,
        SOURCE_DEPLOYMENT, USER_COMMAND, annotation, render_log_url,
    },
    status::{JobStatusOps, container_state_summary, format_time},
};
use anyhow::Result;
use colored::Colorize;
use k8s_openapi::api::{apps::v1::Deployment, batch::v1::Job, core::v1::Pod};
use kube::ResourceExt;
use spinners::{Spinner, Spinners};
use std::future::Future;

const SHOWN_PODS: usize = 2;

/// Run a cluster call behind a spinner
///
/// # Arguments
///
/// * `message` - &str
/// * `fut` - F
pub async fn with_spinner<T, F>(message: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let mut sp = Spinner::new(Spinners::Dots, message.to_string());
    let res = fut.await;
    sp.stop_with_newline();

    res
}

pub fn print_attribute(key: &str, value: &str) {
    print_attribute_with_indentation(key, value, 0);
}

pub fn print_attribute_with_indentation(key: &str, value: &str, indentation: usize) {
    println!(
        "{}{} {}",
        "  ".repeat(indentation),
        format!("{key}:").dimmed(),
        value.cyan()
    );
}

pub fn deployment_row(deployment: &Deployment) -> String {
    format!(
        "{}/{}",
        deployment.namespace().unwrap_or_default(),
        deployment.display_name()
    )
}

pub fn job_row(job: &Job) -> String {
    format!(
        "{}/{}: {} {} Created at: {}",
        job.namespace().unwrap_or_default(),
        job.name_any(),
        annotation(job, USER_COMMAND).unwrap_or_default(),
        job.state().icon(),
        format_time(job.creation_timestamp().as_ref())
    )
}

pub fn confirmation_details(deployment: &Deployment, image_tag: &str, user_command: &str) {
    println!("\nJob details:");
    print_attribute("Deployment Name", &deployment.display_name());
    print_attribute("Namespace", &deployment.namespace().unwrap_or_default());
    print_attribute("Image Tag", image_tag);
    print_attribute("Command", user_command);
}

/// Print the outcome of a job creation
///
/// # Arguments
///
/// * `job` - &Job
/// * `dry_run` - bool
pub fn job_created(job: &Job, dry_run: bool) -> Result<()> {
    let namespace = job.namespace().unwrap_or_default();

    if dry_run {
        let yaml = serde_yml::to_string(job)?;
        println!(
            "\nDry run result for job {}",
            job.name_any().bright_purple().bold()
        );
        println!("\n{}", yaml);

        return Ok(());
    }

    println!(
        "Created job {}/{} successfully!\n",
        namespace,
        job.name_any().truecolor(7, 174, 237).bold()
    );
    println!("{}", "Use the following command to view the job's details:".dimmed());
    println!("{}", format!("jobify view {} {}", namespace, job.name_any()).cyan());

    Ok(())
}

/// Print a job along with the last pods it ran
///
/// # Arguments
///
/// * `job` - &Job
/// * `pods` - &[Pod] sorted oldest first
pub fn job_details(job: &Job, pods: &[Pod]) {
    let state = job.state();
    let namespace = job.namespace().unwrap_or_default();
    let alias = annotation(job, SOURCE_ALIAS).unwrap_or_default();
    let source = annotation(job, SOURCE_DEPLOYMENT).unwrap_or_default();
    let primary = annotation(job, PRIMARY_CONTAINER).unwrap_or_default();

    println!("\n--------- Details ----------");
    print_attribute("Name", &job.name_any());
    print_attribute("Namespace", &namespace);
    print_attribute("State", &state.to_string());
    if !alias.is_empty() && alias != source {
        print_attribute("Deployment Alias", alias);
    }
    print_attribute("Deployment Name", source);
    print_attribute("Created At", &format_time(job.creation_timestamp().as_ref()));
    print_attribute("Pod Stats", &job.pod_stats());

    if !pods.is_empty() {
        let shown = &pods[pods.len().saturating_sub(SHOWN_PODS)..];
        match pods.len() > SHOWN_PODS {
            true => print_attribute("Pods (last two)", ""),
            false => print_attribute("Pods", ""),
        }

        for pod in shown {
            pod_details(pod);
        }

        print_attribute(
            "Use the following command to view logs (NOTE: this will not work once pods are garbage collected)",
            "",
        );
        println!(
            "{}",
            format!(
                "kubectl logs -n {} -l job-name={} --container={}",
                namespace,
                job.name_any(),
                primary
            )
            .cyan()
        );
    } else if state.is_finished() {
        println!("No pods found! Pods were likely garbage collected");
    } else {
        println!("No pods found! Either they're being created, or there is a problem with the job");
    }

    if let Some(template) = annotation(job, LOG_URL_TEMPLATE) {
        print_attribute("Visit the link below to view logs", "");
        println!("{}", render_log_url(template, &job.name_any(), primary).cyan());
    }
}

fn pod_details(pod: &Pod) {
    let status = pod.status.as_ref();

    print_attribute_with_indentation(&pod.name_any(), "", 1);
    print_attribute_with_indentation(
        "Status",
        status.and_then(|s| s.phase.as_deref()).unwrap_or_default(),
        2,
    );
    print_attribute_with_indentation(
        "Created At",
        &format_time(pod.creation_timestamp().as_ref()),
        2,
    );

    let containers = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();
    if containers.is_empty() {
        return;
    }

    print_attribute_with_indentation("Containers", "", 2);
    for container in containers {
        let summary = container
            .state
            .as_ref()
            .map(container_state_summary)
            .unwrap_or_default();
        print_attribute_with_indentation(&container.name, &summary, 3);
    }
}

pub fn pod_logs(pod_name: &str, container: &str, logs: &str) {
    println!(
        "\n--------- Logs of {}/{} ----------",
        pod_name.truecolor(7, 174, 237).bold(),
        container
    );
    println!("{logs}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deployment_row_uses_alias() {
        let deployment: Deployment = serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {
                "name": "api",
                "namespace": "prod",
                "annotations": { "jobify/deployment-alias": "public-api" }
            }
        }))
        .unwrap();

        assert_eq!(deployment_row(&deployment), "prod/public-api");
    }

    #[test]
    fn job_row_shows_command_and_state() {
        let job: Job = serde_json::from_value(json!({
            "apiVersion": "batch/v1",
            "kind": "Job",
            "metadata": {
                "name": "api-qwert",
                "namespace": "prod",
                "creationTimestamp": "2024-03-01T09:30:00Z",
                "annotations": { USER_COMMAND: "rake db:migrate" }
            },
            "status": {
                "conditions": [{ "type": "Complete", "status": "True" }]
            }
        }))
        .unwrap();

        assert_eq!(
            job_row(&job),
            "prod/api-qwert: rake db:migrate ✅ Created at: 2024-03-01 09:30:00 UTC"
        );
    }
}
