use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    cinstall completions bash > ~/.bash_completion.d/cinstall\n\n\
                  Generate zsh completions:\n    cinstall completions zsh > ~/.zfunc/_cinstall\n\n\
                  Generate fish completions:\n    cinstall completions fish > ~/.config/fish/completions/cinstall.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
