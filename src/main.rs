use clap::{Args, Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use stratus::commands::{app_init, login, secrets};
use stratus::profile::{Profile, DEFAULT_PROFILE};
use stratus::terminal::{Log, OutputFormat, Streams, TerminalUi, Ui, UiConfig};
use stratus::{Error, ErrorCode};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "stratus")]
#[command(version = VERSION)]
#[command(about = "CLI for managing cloud platform apps")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Profile to read and store credentials in
    #[arg(long, global = true, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long = "yes", global = true)]
    auto_confirm: bool,

    /// Disable colored output (also set by NO_COLOR)
    #[arg(long, global = true)]
    disable_colors: bool,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output_format: OutputFormat,

    /// Write normal output to this file instead of stdout
    #[arg(long, global = true, value_name = "PATH")]
    output_target: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with a programmatic API key
    Login(login::LoginInputs),
    /// Manage apps
    App(AppArgs),
    /// Manage app secrets
    Secrets(SecretsArgs),
}

#[derive(Args)]
struct AppArgs {
    #[command(subcommand)]
    command: AppCommand,
}

#[derive(Subcommand)]
enum AppCommand {
    /// Initialize an app project in the current directory
    Init(app_init::AppInitInputs),
}

#[derive(Args)]
struct SecretsArgs {
    #[command(subcommand)]
    command: SecretsCommand,
}

#[derive(Subcommand)]
enum SecretsCommand {
    /// Create a secret for an app
    Create(secrets::SecretCreateInputs),
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn ui_config(global: &GlobalArgs) -> UiConfig {
    UiConfig {
        auto_confirm: global.auto_confirm,
        disable_colors: global.disable_colors || env::var_os("NO_COLOR").is_some(),
        output_format: global.output_format,
        output_target: global.output_target.clone(),
    }
}

fn streams(config: &UiConfig) -> stratus::Result<Streams> {
    match &config.output_target {
        Some(path) => Streams::stdio().with_output_file(path),
        None => Ok(Streams::stdio()),
    }
}

fn run(command: Commands, profile_name: &str, ui: &dyn Ui) -> stratus::Result<()> {
    let working_directory = env::current_dir().map_err(|e| {
        Error::internal_io(e.to_string(), Some("read working directory".to_string()))
    })?;
    let mut profile = Profile::load(profile_name, working_directory)?;

    match command {
        Commands::Login(inputs) => login::run(inputs, &mut profile, ui).map(|_| ()),
        Commands::App(args) => match args.command {
            AppCommand::Init(inputs) => app_init::run(inputs, &profile, ui).map(|_| ()),
        },
        Commands::Secrets(args) => match args.command {
            SecretsCommand::Create(inputs) => secrets::run(inputs, &profile, ui).map(|_| ()),
        },
    }
}

fn exit_code_for_error(code: ErrorCode) -> u8 {
    match code {
        ErrorCode::ConfigInvalidJson | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::ProjectExists => 3,

        ErrorCode::PromptNonInteractive | ErrorCode::PromptFailed => 4,

        ErrorCode::OutputRenderFailed
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = ui_config(&cli.global);
    let ui = match streams(&config) {
        Ok(streams) => TerminalUi::new(config, streams),
        Err(err) => {
            TerminalUi::new(config, Streams::stdio()).print(&[Log::error(&err)]);
            return ExitCode::from(exit_code_for_error(err.code));
        }
    };

    match run(cli.command, &cli.global.profile, &ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{} failed: {:?}", env!("CARGO_PKG_NAME"), err);
            ui.print(&[Log::error(&err)]);
            ExitCode::from(exit_code_for_error(err.code))
        }
    }
}
