use super::display;
use crate::kube::{command::resolve_image_tag, spec::primary_container_image};
use anyhow::{Result, anyhow};
use inquire::{InquireError, Select, Text, validator::ValueRequiredValidator};
use k8s_openapi::api::{apps::v1::Deployment, batch::v1::Job};
use std::fmt;

const PAGE_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    View,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "Create a new job"),
            Operation::View => write!(f, "View existing jobs"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmAction {
    Confirm,
    EditImageTag,
    EditCommand,
    Cancel,
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfirmAction::Confirm => "Confirm",
            ConfirmAction::EditImageTag => "Edit image tag",
            ConfirmAction::EditCommand => "Edit command",
            ConfirmAction::Cancel => "Cancel",
        };

        write!(f, "{label}")
    }
}

/// What the user settled on in the confirmation loop
pub struct Confirmed {
    pub image_tag_override: String,
    pub user_command: String,
}

/// Turn an aborted prompt into a readable error
fn interrupted(err: InquireError) -> anyhow::Error {
    match err {
        InquireError::OperationInterrupted | InquireError::OperationCanceled => {
            anyhow!("The command was interrupted ^C")
        }
        err => err.into(),
    }
}

pub fn operation() -> Result<Operation> {
    Select::new(
        "Select an operation to perform",
        vec![Operation::Create, Operation::View],
    )
    .prompt()
    .map_err(interrupted)
}

/// Pick one deployment out of the list
///
/// # Arguments
///
/// * `deployments` - Vec<Deployment>
pub fn select_deployment(mut deployments: Vec<Deployment>) -> Result<Deployment> {
    let rows = deployments.iter().map(display::deployment_row).collect();

    let selected = Select::new("Select a deployment", rows)
        .with_page_size(PAGE_SIZE)
        .raw_prompt()
        .map_err(interrupted)?;

    Ok(deployments.swap_remove(selected.index))
}

/// Pick one job out of the list
///
/// # Arguments
///
/// * `jobs` - Vec<Job>
pub fn select_job(mut jobs: Vec<Job>) -> Result<Job> {
    let rows = jobs.iter().map(display::job_row).collect();

    let selected = Select::new("Select a job", rows)
        .with_page_size(PAGE_SIZE)
        .raw_prompt()
        .map_err(interrupted)?;

    Ok(jobs.swap_remove(selected.index))
}

pub fn command(default: &str) -> Result<String> {
    Text::new("Enter the job command")
        .with_initial_value(default)
        .with_validator(ValueRequiredValidator::new("Must enter a command"))
        .prompt()
        .map_err(interrupted)
}

pub fn image_tag(current: &str) -> Result<String> {
    Text::new("Enter the image tag")
        .with_initial_value(current)
        .prompt()
        .map_err(interrupted)
}

/// Show the job details until the user confirms or cancels. Returns `None` on cancel
///
/// # Arguments
///
/// * `deployment` - &Deployment
/// * `user_command` - String
pub fn confirm(deployment: &Deployment, mut user_command: String) -> Result<Option<Confirmed>> {
    let mut image_tag_override = String::new();

    loop {
        let current_tag = resolve_image_tag(
            primary_container_image(deployment).unwrap_or_default(),
            &image_tag_override,
        );
        display::confirmation_details(deployment, &current_tag, &user_command);

        let action = Select::new(
            "Confirm details?",
            vec![
                ConfirmAction::Confirm,
                ConfirmAction::EditImageTag,
                ConfirmAction::EditCommand,
                ConfirmAction::Cancel,
            ],
        )
        .with_page_size(PAGE_SIZE)
        .prompt()
        .map_err(interrupted)?;

        match action {
            ConfirmAction::Confirm => {
                return Ok(Some(Confirmed {
                    image_tag_override,
                    user_command,
                }));
            }
            ConfirmAction::EditImageTag => image_tag_override = image_tag(&current_tag)?,
            ConfirmAction::EditCommand => user_command = command(&user_command)?,
            ConfirmAction::Cancel => return Ok(None),
        }
    }
}
