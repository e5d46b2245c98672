use crate::server;
use crate::terminal::{run_match, run_quiz_command, MatchArgs, QuizArgs};
use clap::{Args, Parser, Subcommand};
use rim_orientation::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "rim-orientation",
    about = "RIASEC orientation quiz and program matcher for Mauritanian higher education",
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
    /// Take the questionnaire interactively in the terminal
    Quiz(QuizArgs),
    /// Match programs against final scores without taking the quiz
    Match(MatchArgs),
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
        Command::Quiz(args) => run_quiz_command(args),
        Command::Match(args) => run_match(args),
    }
}
