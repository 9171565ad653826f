use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install the auto_install components:\n    cinstall install\n\n\
                   Install by name:\n    cinstall install core exercises\n\n\
                   Install every lesson:\n    cinstall install 'lesson-*'")]
pub struct InstallArgs {
    /// Component names or glob patterns. Defaults to auto_install from the
    /// manifest, or to every component
    pub components: Vec<String>,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,
}
