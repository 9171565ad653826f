//! Install command implementation
//!
//! Installs the selected components and whatever they depend on, then
//! prints one line per component that took part in the installation.

use std::path::Path;
use std::sync::Arc;

use console::Style;
use tracing::info;

use crate::cli::InstallArgs;
use crate::component::Component;
use crate::error::{CinstallError, Result};
use crate::installer::InstallerFactory;
use crate::progress::InstallProgress;
use crate::project::Project;
use crate::state::ComponentState;
use crate::task::ThreadTaskManager;

/// Run install command
pub fn run(manifest: &Path, root: Option<&Path>, args: &InstallArgs) -> Result<()> {
    let project = Project::open(manifest, root)?;
    let selected = project.select(&args.components)?;
    info!(
        components = ?selected.iter().map(|c| c.name()).collect::<Vec<_>>(),
        "installing"
    );

    let progress = (!args.no_progress).then(|| InstallProgress::attach(&selected));
    let installer = InstallerFactory::new(ThreadTaskManager::new()).installer_for(project.source());
    installer.install_all(&selected)?;
    installer.settle(&selected);
    if let Some(progress) = &progress {
        progress.finish();
    }

    print_summary(project.components(), &selected);

    let failed: Vec<&str> = selected
        .iter()
        .filter(|component| component.has_error())
        .map(|component| component.name())
        .collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(CinstallError::InstallFailed {
            names: failed.join(", "),
        })
    }
}

fn outcome(component: &Component) -> (Style, &'static str, String) {
    if component.state().has_error() {
        (Style::new().red().bold(), "✗", "failed".to_string())
    } else if component.has_error() {
        (
            Style::new().yellow().bold(),
            "!",
            "installed, but a dependency failed".to_string(),
        )
    } else {
        (Style::new().green().bold(), "✓", "installed".to_string())
    }
}

/// Print selected components plus every dependency that was pulled in
fn print_summary(all: &[Arc<Component>], selected: &[Arc<Component>]) {
    let involved: Vec<&Arc<Component>> = all
        .iter()
        .filter(|component| {
            selected.iter().any(|s| Arc::ptr_eq(s, component))
                || component.state().get() == ComponentState::Loaded
                || component.state().has_error()
        })
        .collect();

    for component in involved {
        let (style, mark, text) = outcome(component);
        println!(
            "  {} {} {}",
            style.apply_to(mark),
            Style::new().bold().apply_to(component.name()),
            Style::new().dim().apply_to(text)
        );
    }
}
