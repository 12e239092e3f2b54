use clap::{Subcommand, ValueEnum};
use serde_json::json;

use crate::authz::{
    ChangeRequestStatus, ProjectStatus, RoleCatalog, TransitionGuard, Transitions, UpdateStatus, WorkflowStatus,
};
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Entity {
    Project,
    WeeklyUpdate,
    ChangeRequest,
}

#[derive(Subcommand)]
pub enum AuthzCommands {
    #[command(about = "List roles with their rank and capabilities")]
    Roles,

    #[command(about = "Check whether a role holds a capability")]
    CheckPermission {
        #[arg(help = "Role id, e.g. ProjectManager")]
        role: String,
        #[arg(help = "Capability name, e.g. Projects.Edit")]
        capability: String,
    },

    #[command(about = "Check whether a role may move an entity between two statuses")]
    CheckTransition {
        #[arg(value_enum, help = "Entity kind")]
        entity: Entity,
        #[arg(help = "Role id")]
        role: String,
        #[arg(help = "Current status")]
        from: String,
        #[arg(help = "Proposed status")]
        to: String,
    },

    #[command(about = "List the statuses a role may set on an entity")]
    Targets {
        #[arg(value_enum, help = "Entity kind")]
        entity: Entity,
        #[arg(help = "Role id")]
        role: String,
    },
}

pub async fn handle(cmd: AuthzCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let catalog = RoleCatalog::seeded();
    let transitions = Transitions::seeded();

    match cmd {
        AuthzCommands::Roles => list_roles(&catalog, &output_format),
        AuthzCommands::CheckPermission { role, capability } => {
            if !catalog.contains(&role) {
                tracing::warn!("Role '{}' is not in the catalog", role);
            }
            let granted = catalog.has_permission(&role, &capability);
            match output_format {
                OutputFormat::Json => print_json(&json!({
                    "role": role,
                    "capability": capability,
                    "granted": granted
                })),
                OutputFormat::Text => {
                    println!("{} -> {}: {}", role, capability, yes_no(granted));
                    Ok(())
                }
            }
        }
        AuthzCommands::CheckTransition { entity, role, from, to } => {
            let allowed = match entity {
                Entity::Project => check::<ProjectStatus>(&transitions.project, &from, &to, &role)?,
                Entity::WeeklyUpdate => check::<UpdateStatus>(&transitions.weekly_update, &from, &to, &role)?,
                Entity::ChangeRequest => check::<ChangeRequestStatus>(&transitions.change_request, &from, &to, &role)?,
            };
            match output_format {
                OutputFormat::Json => print_json(&json!({
                    "role": role,
                    "from": from,
                    "to": to,
                    "allowed": allowed
                })),
                OutputFormat::Text => {
                    println!("{:?} {} -> {} as {}: {}", entity, from, to, role, yes_no(allowed));
                    Ok(())
                }
            }
        }
        AuthzCommands::Targets { entity, role } => {
            let targets = match entity {
                Entity::Project => names(&transitions.project, &role),
                Entity::WeeklyUpdate => names(&transitions.weekly_update, &role),
                Entity::ChangeRequest => names(&transitions.change_request, &role),
            };
            match output_format {
                OutputFormat::Json => print_json(&json!({ "role": role, "targets": targets })),
                OutputFormat::Text => {
                    if targets.is_empty() {
                        println!("{} may not set any {:?} status", role, entity);
                    } else {
                        println!("{}", targets.join(", "));
                    }
                    Ok(())
                }
            }
        }
    }
}

fn list_roles(catalog: &RoleCatalog, output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&json!({ "roles": catalog.roles() })),
        OutputFormat::Text => {
            println!("{:<20} {:<22} {:>5}  {}", "ID", "NAME", "LEVEL", "CAPABILITIES");
            println!("{}", "-".repeat(90));
            for role in catalog.roles() {
                let caps: Vec<&str> = role.capabilities.iter().map(String::as_str).collect();
                println!(
                    "{:<20} {:<22} {:>5}  {}",
                    role.id,
                    role.display_name,
                    role.hierarchy_level,
                    caps.join(", ")
                );
            }
            Ok(())
        }
    }
}

fn check<S: WorkflowStatus>(guard: &TransitionGuard<S>, from: &str, to: &str, role: &str) -> anyhow::Result<bool> {
    let from: S = from.parse()?;
    let to: S = to.parse()?;
    Ok(guard.can_transition(from, to, role))
}

fn names<S: WorkflowStatus>(guard: &TransitionGuard<S>, role: &str) -> Vec<&'static str> {
    guard.allowed_targets(role).iter().map(|s| s.as_str()).collect()
}
