use clap::{Parser, Subcommand};
use melos::{
    config::Config,
    event::events::GlobalEvent,
    logging,
    ui::{app::App, hook},
};

#[derive(Parser)]
#[command(version, about = "Terminal client for a personal music server")]
struct Cli {
    /// Server address, overriding the config file.
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Queue a whole album or artist on the server and start playing.
    PlayAll {
        /// `album` or `artist`.
        kind: String,
        /// Album name, or artist id.
        value: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.server_url = server.trim_end_matches('/').into();
    }

    logging::init(&config.log)?;
    hook::install()?;

    let mut app = App::new(&config)?;

    if let Some(Command::PlayAll { kind, value }) = cli.command {
        let _ = app.command_tx().send(GlobalEvent::PlayAll { kind, value });
    }

    app.run().await
}
