#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    ChatInput, ChatStrategy, CommandStrategy, InfoStrategy, InitStrategy, VersionStrategy,
    VoiceInput, VoiceStrategy, WellbeingInput, WellbeingStrategy,
};

#[derive(Parser)]
#[command(name = "wellchat")]
#[command(about = "Spoken companion chat backed by a completion API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat by typing prompts
    Chat {
        /// Single message to send
        #[arg(short = 'm', long)]
        message: Option<String>,

        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// Print replies without speaking them
        #[arg(long)]
        mute: bool,
    },
    /// Chat by speaking prompts
    Voice {
        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// Print replies without speaking them
        #[arg(long)]
        mute: bool,
    },
    /// Run a single well-being check and speak the question
    Wellbeing {
        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,
    },
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            model,
            mute,
        } => {
            ChatStrategy
                .execute(ChatInput {
                    message,
                    model,
                    mute,
                })
                .await
        }
        Commands::Voice { model, mute } => VoiceStrategy.execute(VoiceInput { model, mute }).await,
        Commands::Wellbeing { model } => WellbeingStrategy.execute(WellbeingInput { model }).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
