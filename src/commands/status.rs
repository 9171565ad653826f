//! Status command implementation
//!
//! Reports what is on disk without installing anything: every component is
//! resolved, and fetched components are checked for updates and local edits.

use std::path::Path;
use std::sync::Arc;

use console::Style;
use serde::Serialize;

use crate::cli::StatusArgs;
use crate::component::Component;
use crate::error::{CinstallError, Result};
use crate::project::Project;
use crate::state::ComponentState;

/// One line of status output
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub name: String,
    pub state: String,
    pub dependency_state: String,
    pub path: String,
    pub active: bool,
    pub local_changes: bool,
    pub update_available: bool,
}

impl ComponentStatus {
    /// Snapshot of a resolved component
    pub fn of(component: &Component) -> Self {
        let fetched = component.state().get() >= ComponentState::Fetched;
        Self {
            name: component.name().to_string(),
            state: component.state().get().to_string(),
            dependency_state: component.dependency_state().get().to_string(),
            path: component.full_path().display().to_string(),
            active: component.is_active(),
            local_changes: fetched && component.has_local_changes(),
            update_available: fetched && component.is_updatable(),
        }
    }
}

/// Resolve every component of the project and snapshot it
pub fn collect(project: &Project) -> Vec<ComponentStatus> {
    let source = project.source();
    project
        .components()
        .iter()
        .map(|component: &Arc<Component>| {
            component.resolve_state();
            component.validate(source.as_ref());
            ComponentStatus::of(component)
        })
        .collect()
}

/// Run status command
pub fn run(manifest: &Path, root: Option<&Path>, args: &StatusArgs) -> Result<()> {
    let project = Project::open(manifest, root)?;
    let statuses = collect(&project);

    if args.json {
        let json = serde_json::to_string_pretty(&statuses).map_err(|e| CinstallError::IoError {
            message: format!("Failed to serialize status: {e}"),
        })?;
        println!("{json}");
        return Ok(());
    }

    print_table(&project, &statuses);
    Ok(())
}

fn print_table(project: &Project, statuses: &[ComponentStatus]) {
    if statuses.is_empty() {
        println!("No components declared.");
        return;
    }

    let title = project.name().unwrap_or("Components");
    println!("{} ({}):", Style::new().bold().apply_to(title), statuses.len());
    println!();

    let width = statuses.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for status in statuses {
        let state_style = match status.state.as_str() {
            "fetched" | "loaded" => Style::new().green(),
            "error" => Style::new().red(),
            _ => Style::new().yellow(),
        };
        let mut flags = Vec::new();
        if status.active {
            flags.push("active");
        }
        if status.local_changes {
            flags.push("local changes");
        }
        if status.update_available {
            flags.push("update available");
        }

        println!(
            "  {:<width$}  {:<13}  {}",
            Style::new().bold().yellow().apply_to(&status.name),
            state_style.apply_to(&status.state),
            Style::new().dim().apply_to(flags.join(", ")),
        );
    }
}
