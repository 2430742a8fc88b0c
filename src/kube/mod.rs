use anyhow::{Result, anyhow};
use colored::Colorize;
use k8s_openapi::api::{apps::v1::Deployment, batch::v1::Job, core::v1::Pod};
use kube::{
    Client, Resource, ResourceExt,
    api::{Api, ListParams, LogParams, PostParams},
};

pub(crate) mod annotation;
pub(crate) mod command;
pub(crate) mod error;
pub(crate) mod spec;
pub(crate) mod status;
pub(crate) mod template;
pub(crate) mod validate;

use annotation::{JOB_NAME_LABEL, MANAGED_SELECTOR};

#[derive(Clone)]
pub struct KubeHandler<S: AsRef<str>> {
    client: Client,
    namespace: Option<S>,
}

impl<S> KubeHandler<S>
where
    S: AsRef<str>,
{
    /// Create a new instance of the KubeHandler
    ///
    /// # Arguments
    ///
    /// * `ns` - Option<S> restricts listing to a namespace, all namespaces otherwise
    pub async fn new(ns: Option<S>) -> Result<Self> {
        let client = Client::try_default().await?;

        Ok(Self {
            client,
            namespace: ns,
        })
    }

    fn scoped<K>(&self) -> Api<K>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        match &self.namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns.as_ref()),
            None => Api::all(self.client.clone()),
        }
    }

    /// List the deployments jobs can be created from
    pub async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        let deployments: Api<Deployment> = self.scoped();

        let lp = ListParams::default().labels(MANAGED_SELECTOR);
        let list = deployments.list(&lp).await?;
        tracing::debug!(count = list.items.len(), "listed deployments");

        Ok(list.items)
    }

    /// List the jobs created by jobify, newest first
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let jobs: Api<Job> = self.scoped();

        let lp = ListParams::default().labels(MANAGED_SELECTOR);
        let mut list = jobs.list(&lp).await?.items;
        list.sort_by(|a, b| b.creation_timestamp().cmp(&a.creation_timestamp()));
        tracing::debug!(count = list.len(), "listed jobs");

        Ok(list)
    }

    /// Get a job
    ///
    /// # Arguments
    ///
    /// * `namespace` - &str
    /// * `name` - &str
    pub async fn get_job(&self, namespace: &str, name: &str) -> Result<Job> {
        let jobs: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        let job = jobs.get(name).await?;

        Ok(job)
    }

    /// List the pods of a job, oldest first
    ///
    /// # Arguments
    ///
    /// * `namespace` - &str
    /// * `job_name` - &str
    pub async fn list_pods(&self, namespace: &str, job_name: &str) -> Result<Vec<Pod>> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);

        let lp = ListParams::default().labels(&format!("{JOB_NAME_LABEL}={job_name}"));
        let mut list = pods.list(&lp).await?.items;
        list.sort_by(|a, b| a.creation_timestamp().cmp(&b.creation_timestamp()));

        Ok(list)
    }

    /// Get the last lines of logs of a pod container
    ///
    /// # Arguments
    ///
    /// * `namespace` - &str
    /// * `pod_name` - &str
    /// * `container` - &str
    /// * `tail_lines` - i64
    pub async fn get_pod_logs(
        &self,
        namespace: &str,
        pod_name: &str,
        container: &str,
        tail_lines: i64,
    ) -> Result<String> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let lp = LogParams {
            container: Some(container.to_string()),
            tail_lines: Some(tail_lines),
            ..Default::default()
        };

        let logs = pods.logs(pod_name, &lp).await?;

        Ok(logs)
    }

    /// Create the job in K8S
    ///
    /// # Arguments
    ///
    /// * `job` - &Job
    /// * `dry_run` - bool
    pub async fn create_job(&self, job: &Job, dry_run: bool) -> Result<Job> {
        let namespace = job
            .namespace()
            .ok_or_else(|| anyhow!("Unable to create job {:?} without a namespace", job.name_any()))?;

        let job_api: Api<Job> = Api::namespaced(self.client.clone(), &namespace);
        let mut pp = PostParams::default();

        if dry_run {
            pp.dry_run = true;
        }

        tracing::info!(job = %job.name_any(), %namespace, dry_run, "creating job");
        println!(
            "Creating job {} in namespace {}",
            job.name_any().truecolor(7, 174, 237).bold(),
            namespace.truecolor(133, 59, 255).bold()
        );

        let res = job_api.create(&pp, job).await?;

        Ok(res)
    }
}
