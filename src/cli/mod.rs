use crate::kube::{
    KubeHandler,
    annotation::{DeploymentAnnotations, MANAGED_SELECTOR, PRIMARY_CONTAINER, annotation},
    command::resolve_command,
    error::ValidationError,
    template::job::build_job,
    validate::validate,
};
use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use k8s_openapi::api::batch::v1::Job;
use kube::ResourceExt;

mod display;
mod prompt;

#[derive(Parser)]
#[command(
    version,
    about = "Create a one-off kubernetes job from a deployment to run an ad-hoc command"
)]
pub struct Cli {
    /// Only look at deployments and jobs in this namespace
    #[arg(short, long, env = "JOBIFY_NAMESPACE", global = true)]
    pub namespace: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new job
    Create {
        /// Submit the job as a server side dry run and print it
        #[arg(long)]
        dry_run: bool,
    },
    /// List jobs and view the details of one
    List(LogArgs),
    /// View the details of a job, given as "namespace job-name" or "namespace/job-name"
    View {
        #[arg(required = true, num_args = 1..=2, value_name = "JOB")]
        target: Vec<String>,

        #[command(flatten)]
        logs: LogArgs,
    },
}

#[derive(Args, Clone, Copy)]
struct LogArgs {
    /// Print the last log lines of the primary container
    #[arg(long)]
    logs: bool,

    #[arg(long, default_value_t = 10)]
    tail_lines: i64,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self {
            logs: false,
            tail_lines: 10,
        }
    }
}

impl Cli {
    pub async fn run<S: AsRef<str>>(&self, kube_handler: &KubeHandler<S>) -> Result<()> {
        match &self.command {
            Some(Command::Create { dry_run }) => create(kube_handler, *dry_run).await,
            Some(Command::List(logs)) => list(kube_handler, *logs).await,
            Some(Command::View { target, logs }) => {
                let (namespace, name) = parse_job_ref(target)?;
                let job = display::with_spinner(
                    "Loading job...",
                    kube_handler.get_job(&namespace, &name),
                )
                .await?;

                view(kube_handler, &job, *logs).await
            }
            None => {
                println!("No command given, starting in interactive mode...");
                match prompt::operation()? {
                    prompt::Operation::Create => create(kube_handler, false).await,
                    prompt::Operation::View => list(kube_handler, LogArgs::default()).await,
                }
            }
        }
    }
}

async fn create<S: AsRef<str>>(kube_handler: &KubeHandler<S>, dry_run: bool) -> Result<()> {
    let deployments =
        display::with_spinner("Loading deployments...", kube_handler.list_deployments()).await?;
    if deployments.is_empty() {
        return Err(anyhow!("No deployment labelled {} found", MANAGED_SELECTOR));
    }

    let deployment = prompt::select_deployment(deployments)?;
    validate(&deployment).map_err(|err: ValidationError| anyhow!("Invalid deployment: {err}"))?;

    let Some(template) = deployment.command_template() else {
        return Err(ValidationError::MissingCommandTemplate.into());
    };

    println!();
    let user_command = prompt::command(deployment.default_command())?;
    let Some(confirmed) = prompt::confirm(&deployment, user_command)? else {
        println!("Cancelled job creation, terminating...");
        return Ok(());
    };

    let command = resolve_command(template, &confirmed.user_command)?;
    let job = build_job(
        &deployment,
        command,
        &confirmed.image_tag_override,
        &confirmed.user_command,
        &mut rand::thread_rng(),
    )?;

    let res = kube_handler.create_job(&job, dry_run).await?;

    display::job_created(&res, dry_run)
}

async fn list<S: AsRef<str>>(kube_handler: &KubeHandler<S>, logs: LogArgs) -> Result<()> {
    let jobs = display::with_spinner("Loading jobs...", kube_handler.list_jobs()).await?;
    if jobs.is_empty() {
        return Err(anyhow!("No job labelled {} found", MANAGED_SELECTOR));
    }

    let job = prompt::select_job(jobs)?;

    view(kube_handler, &job, logs).await
}

async fn view<S: AsRef<str>>(
    kube_handler: &KubeHandler<S>,
    job: &Job,
    logs: LogArgs,
) -> Result<()> {
    let namespace = job.namespace().unwrap_or_default();
    let pods = kube_handler.list_pods(&namespace, &job.name_any()).await?;

    display::job_details(job, &pods);

    if !logs.logs {
        return Ok(());
    }

    let Some(pod) = pods.last() else {
        return Err(anyhow!("No pods left to read logs from"));
    };

    let container = annotation(job, PRIMARY_CONTAINER).unwrap_or_default();
    let content = kube_handler
        .get_pod_logs(&namespace, &pod.name_any(), container, logs.tail_lines)
        .await?;
    display::pod_logs(&pod.name_any(), container, &content);

    Ok(())
}

/// Split a job reference given as `namespace name` or `namespace/name`
fn parse_job_ref(target: &[String]) -> Result<(String, String)> {
    match target {
        [namespace, name] => Ok((namespace.clone(), name.clone())),
        [target] => target
            .split_once('/')
            .map(|(namespace, name)| (namespace.to_string(), name.to_string()))
            .ok_or_else(|| {
                anyhow!(
                    "job details must be provided in one of two formats \"namespace job-name\" or \"namespace/job-name\""
                )
            }),
        _ => Err(anyhow!("expected a job reference, got {} arguments", target.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn job_ref_as_two_arguments() {
        let (ns, name) = parse_job_ref(&args(&["prod", "api-abcde"])).unwrap();
        assert_eq!((ns.as_str(), name.as_str()), ("prod", "api-abcde"));
    }

    #[test]
    fn job_ref_with_slash() {
        let (ns, name) = parse_job_ref(&args(&["prod/api-abcde"])).unwrap();
        assert_eq!((ns.as_str(), name.as_str()), ("prod", "api-abcde"));
    }

    #[test]
    fn job_ref_without_namespace_is_rejected() {
        assert!(parse_job_ref(&args(&["api-abcde"])).is_err());
        assert!(parse_job_ref(&[]).is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["jobify", "-n", "prod", "view", "prod/api-abcde", "--logs"])
            .unwrap();
        assert_eq!(cli.namespace.as_deref(), Some("prod"));
        match cli.command {
            Some(Command::View { target, logs }) => {
                assert_eq!(target, vec!["prod/api-abcde".to_string()]);
                assert!(logs.logs);
                assert_eq!(logs.tail_lines, 10);
            }
            _ => panic!("expected view"),
        }

        let cli = Cli::try_parse_from(["jobify", "create", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Create { dry_run: true })));

        let cli = Cli::try_parse_from(["jobify"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn view_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["jobify", "view", "a", "b", "c"]).is_err());
    }
}
