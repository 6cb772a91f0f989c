/*!
 * space-builder CLI
 *
 * `build` publishes a composite space, `check` runs the validation steps
 * only, and `serve` exposes the same pipeline as a web form.
 */

use clap::{Args, Parser, Subcommand, ValueEnum};
use space_builder::{
    cli_style::{self, header_box, print_error, print_info, print_success, Theme},
    config::{BuilderConfig, LogLevel},
    error::{BuildError, Result, EXIT_SUCCESS},
    logging,
    web::{self, AppState},
    BuildForm, HttpHub, Hub, SpaceBuilder,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "space-builder")]
#[command(version, about = "Combine hosted models and spaces into one composite Gradio space", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Path to log file (default: stderr)
    #[arg(long, value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    /// Enable verbose logging (equivalent to --log-level=debug)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Path to config file (overrides the per-user config file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Hub base URL (overrides hub_endpoint from the config file)
    #[arg(long, value_name = "URL", global = true)]
    hub_endpoint: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and publish a composite space
    Build {
        #[command(flatten)]
        target: TargetArgs,

        /// Title shown on the generated interface
        #[arg(long)]
        title: String,

        /// Description shown on the generated interface
        #[arg(long)]
        description: String,

        /// Validate and print the generated program without creating anything
        #[arg(long)]
        dry_run: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check name availability and interface compatibility only
    Check {
        #[command(flatten)]
        target: TargetArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the build form over HTTP
    Serve {
        /// Address to bind (default: bind_addr from the config file)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Space or model identifier (repeatable), e.g. models/gpt2
    #[arg(short = 'n', long = "name", value_name = "ID")]
    names: Vec<String>,

    /// File with one identifier per line
    #[arg(long, value_name = "FILE")]
    names_file: Option<PathBuf>,

    /// Hub write token
    #[arg(long, env = "HF_TOKEN", hide_env_values = true, default_value = "")]
    token: String,

    /// Name of the space to create under the token's owner
    #[arg(short = 't', long)]
    target: String,
}

impl TargetArgs {
    /// Newline-joined identifiers from flags and the names file, in that order
    fn space_names(&self) -> Result<String> {
        let mut lines = self.names.clone();
        if let Some(ref path) = self.names_file {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                BuildError::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            lines.push(contents);
        }
        Ok(lines.join("\n"))
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            print_error(&e.to_string(), suggestion(&e));
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn suggestion(error: &BuildError) -> Option<&'static str> {
    match error {
        BuildError::MissingInput => Some("Pass --name or --names-file, --token, --target, --title and --description"),
        BuildError::InvalidToken => Some("Check the token given with --token or HF_TOKEN"),
        BuildError::NameTaken { .. } => Some("Choose another --target name"),
        BuildError::HubUnreachable { .. } => Some("Check the network or --hub-endpoint"),
        BuildError::Config(_) => Some("Check the file given with --config"),
        _ => None,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "space-builder", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = BuilderConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    config.verbose |= cli.verbose;
    if let Some(endpoint) = cli.hub_endpoint {
        config.hub_endpoint = endpoint;
        config.validate()?;
    }

    if let Err(e) = logging::init_logging(&config) {
        cli_style::print_warning(&format!("Failed to initialize logging: {}", e));
    }

    match cli.command {
        Commands::Build {
            target,
            title,
            description,
            dry_run,
            json,
        } => {
            let form = BuildForm {
                space_names: target.space_names()?,
                token: target.token,
                target_name: target.target,
                title,
                description,
            };
            handle_build(&config, &form, dry_run, json)
        }
        Commands::Check { target, json } => handle_check(&config, &target, json),
        Commands::Serve { addr } => handle_serve(config, addr),
        Commands::Completions { .. } => Ok(()),
    }
}

fn connect(config: &BuilderConfig) -> Result<HttpHub> {
    HttpHub::new(config)
        .map_err(|e| BuildError::Config(format!("Failed to create Hub client: {}", e)))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| BuildError::Config(format!("Failed to serialize result: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

fn handle_build(config: &BuilderConfig, form: &BuildForm, dry_run: bool, json: bool) -> Result<()> {
    let hub = connect(config)?;
    let builder = SpaceBuilder::new(&hub, config);

    if dry_run {
        let plan = builder.dry_run(form)?;
        if json {
            return print_json(&plan);
        }
        header_box("Dry run", Some("nothing will be created"));
        println!("{}", cli_style::plan_table(&plan));
        println!();
        println!("{}", Theme::muted(format!("--- {} ---", plan.path_in_repo)));
        print!("{}", plan.artifact);
        return Ok(());
    }

    if !json {
        print_info(&format!("Building {} on {}", form.target_name.trim(), hub.endpoint()));
    }
    let outcome = builder.build(form)?;
    if json {
        return print_json(&outcome);
    }
    println!("{}", cli_style::outcome_table(&outcome));
    print_success(&outcome.url);
    Ok(())
}

fn handle_check(config: &BuilderConfig, target: &TargetArgs, json: bool) -> Result<()> {
    let hub = connect(config)?;
    let validation =
        SpaceBuilder::new(&hub, config).check(&target.space_names()?, &target.token, &target.target)?;

    if json {
        return print_json(&validation);
    }
    println!("{}", cli_style::validation_table(&validation));
    print_success("Inputs are compatible and the target name is free");
    Ok(())
}

fn handle_serve(config: BuilderConfig, addr: Option<String>) -> Result<()> {
    let addr = addr.unwrap_or_else(|| config.bind_addr.clone());

    // The blocking client must be created, and finally dropped, outside the runtime
    let hub: Arc<dyn Hub> = Arc::new(connect(&config)?);
    let state = AppState::new(Arc::clone(&hub), config);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| BuildError::Config(format!("Failed to start async runtime: {}", e)))?;

    println!(
        "{} Serving the build form at {}",
        Theme::success(cli_style::Icons::BUILD),
        Theme::primary(format!("http://{}", addr))
    );

    let result = runtime.block_on(web::serve(&addr, state));
    drop(runtime);
    drop(hub);

    result.map_err(|e| BuildError::Config(e.to_string()))
}
