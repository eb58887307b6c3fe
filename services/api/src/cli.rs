use crate::demo::{run_demo, DemoArgs};
use crate::infra::parse_role;
use crate::server;
use aquasentra::auth::TokenAuthority;
use aquasentra::config::AppConfig;
use aquasentra::error::AppError;
use aquasentra::reports::{Principal, Role};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Aquasentra",
    about = "Run the Aquasentra hazard reporting API and its local tooling",
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
    /// Mint a bearer token signed with the configured secret
    Token(TokenArgs),
    /// Walk a report through submission and moderation against an in-memory store
    Demo(DemoArgs),
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

#[derive(Args, Debug)]
pub(crate) struct TokenArgs {
    /// Principal id to embed as the token subject
    #[arg(long)]
    pub(crate) subject: String,
    /// Role granted to the principal (citizen or verifier)
    #[arg(long, value_parser = parse_role, default_value = "citizen")]
    pub(crate) role: Role,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Token(args) => run_token(args),
        Command::Demo(args) => run_demo(args),
    }
}

fn run_token(args: TokenArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let authority = TokenAuthority::from_config(&config.auth);
    let token = authority.issue(&Principal::new(args.subject, args.role))?;
    println!("{token}");
    Ok(())
}
