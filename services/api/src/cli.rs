use crate::demo::{run_demo, run_question_import, DemoArgs, QuestionImportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use learning_compass::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Learning Compass",
    about = "Run the Learning Compass assessment service or explore it from the command line",
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
    /// Manage the published question bank
    Questions {
        #[command(subcommand)]
        command: QuestionsCommand,
    },
    /// Walk one student through an assessment and print the results
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum QuestionsCommand {
    /// Validate a question bank CSV against the built-in questionnaire
    Import(QuestionImportArgs),
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
        Command::Questions {
            command: QuestionsCommand::Import(args),
        } => run_question_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
