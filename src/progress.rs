//! Progress bar display for installations
//!
//! The bar is driven entirely by component events: it advances once per
//! tracked component when that component settles (LOADED with its
//! dependency phase over, or ERROR).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use indicatif::{ProgressBar, ProgressStyle};

use crate::component::Component;
use crate::state::{ComponentState, DependencyState};

/// Whether the component will not change any more during this attempt
pub fn is_settled(component: &Component) -> bool {
    match component.state().get() {
        ComponentState::Error => true,
        ComponentState::Loaded => matches!(
            component.dependency_state().get(),
            DependencyState::Loaded | DependencyState::Error
        ),
        _ => false,
    }
}

/// Progress display for an installation
pub struct InstallProgress {
    bar: ProgressBar,
}

impl InstallProgress {
    /// Show a bar on stderr tracking `components`
    pub fn attach(components: &[Arc<Component>]) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("#>-"));
        let bar = ProgressBar::new(components.len() as u64);
        bar.set_style(style);
        Self::with_bar(bar, components)
    }

    /// Track `components` on an existing bar
    pub fn with_bar(bar: ProgressBar, components: &[Arc<Component>]) -> Self {
        for component in components {
            let bar = bar.clone();
            let counted = AtomicBool::new(false);
            let weak: Weak<Component> = Arc::downgrade(component);
            component.state_changed().subscribe(move || {
                let Some(component) = weak.upgrade() else {
                    return;
                };
                if is_settled(&component) && !counted.swap(true, Ordering::SeqCst) {
                    bar.set_message(component.name().to_string());
                    bar.inc(1);
                }
            });
        }
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Leave the bar where it stopped
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
