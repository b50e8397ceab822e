use crate::demo::{run_check, run_demo, run_score, CheckArgs, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use closet_share::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Closet Share",
    about = "Run the listing review service or score listings from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect a listing document without storing it
    Listing {
        #[command(subcommand)]
        command: ListingCommand,
    },
    /// Walk a listing through drafting, submission, and moderation
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ListingCommand {
    /// Print the quality score and improvement suggestions for a listing
    Score(ScoreArgs),
    /// Run the automated submission checks against a listing
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Listing {
            command: ListingCommand::Score(args),
        } => run_score(args),
        Command::Listing {
            command: ListingCommand::Check(args),
        } => run_check(args),
        Command::Demo(args) => run_demo(args),
    }
}
