pub mod args;
pub mod processor;
pub mod runner;

pub use args::{
    get_log_level_from_verbose, parse_cli, Cli, Commands, DirectivesArgs, GenerateArgs,
    RemoteArgs, RewriteArgs, SkipConfirm, UrlShape,
};
pub use processor::SyncReport;
pub use runner::run;

use crate::error::Result;

/// Runs the selected subcommand.
pub fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Generate(args) => run(args).map(|_| ()),
        Commands::Directives(args) => runner::print_directives(&args),
        Commands::Rewrite(args) => runner::rewrite(&args),
        Commands::Remote(args) => runner::remote(&args),
    }
}
