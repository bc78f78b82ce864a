use crate::prelude::*;
use clap::Parser;

mod analytics;
mod atlassian;
mod error;
mod prelude;
mod proxy;
mod style;

#[cfg(test)]
mod test_support;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "View the issues of a Jira Epic and track WCAG completion from the terminal"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "EPICDASH_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// List the issues that belong to a Jira Epic
    Epic(crate::atlassian::epic::EpicOptions),

    /// Check a Personal Access Token against Jira
    Whoami(crate::atlassian::myself::WhoamiOptions),

    /// Completion statistics for a WCAG issue export
    Analytics(crate::analytics::AnalyticsOptions),

    /// Development reverse proxy forwarding /rest to Jira
    Proxy(crate::proxy::ProxyOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Epic(options) => crate::atlassian::epic::handler(options, app.global).await,
        SubCommands::Whoami(options) => crate::atlassian::myself::handler(options, app.global).await,
        SubCommands::Analytics(options) => crate::analytics::handler(options, app.global).await,
        SubCommands::Proxy(options) => crate::proxy::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
