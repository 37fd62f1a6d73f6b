use facet::Facet;
use figue as args;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod scenarios;

type AnyResult<T> = Result<T, String>;

#[derive(Facet, Debug)]
struct Cli {
    #[facet(flatten)]
    builtins: args::FigueBuiltins,
    /// Dump every outstanding record with its creation stack.
    #[facet(args::named, default)]
    verbose: bool,
    /// Print the report as JSON instead.
    #[facet(args::named, default)]
    json: bool,
    /// How long to let the scenario run before reporting, in milliseconds.
    #[facet(args::named, default)]
    settle_ms: Option<u64>,
    #[facet(args::subcommand)]
    command: CommandKind,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum CommandKind {
    LeakedTimer,
    OneshotSenderLostInMap,
    CausalChain,
    CustomType,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> AnyResult<()> {
    let cli = parse_cli()?;
    let tracker = linger::global();
    info!(scenario = ?cli.command, "running scenario");

    dispatch_command(tracker, &cli.command).await?;

    // Plain tokio sleep: the harness itself must not show up in the report.
    let settle = Duration::from_millis(cli.settle_ms.unwrap_or(50));
    tokio::time::sleep(settle).await;

    if cli.json {
        let json = tracker.report_json(None).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        let outstanding = tracker.report(cli.verbose);
        println!("{outstanding} async operation(s) still outstanding");
    }
    tracker.disable();
    Ok(())
}

fn parse_cli() -> AnyResult<Cli> {
    let figue_config = args::builder::<Cli>()
        .map_err(|e| format!("failed to build CLI schema: {e}"))?
        .cli(|cli| cli.strict())
        .help(|h| {
            h.program_name("linger-examples")
                .description("Run linger leak scenarios as subcommands")
                .version(option_env!("CARGO_PKG_VERSION").unwrap_or("dev"))
        })
        .build();

    args::Driver::new(figue_config)
        .run()
        .into_result()
        .map(|v| v.value)
        .map_err(|e| e.to_string())
}

async fn dispatch_command(tracker: &linger::Tracker, command: &CommandKind) -> AnyResult<()> {
    match command {
        CommandKind::LeakedTimer => scenarios::leaked_timer::run(tracker).await,
        CommandKind::OneshotSenderLostInMap => {
            scenarios::oneshot_sender_lost_in_map::run(tracker).await
        }
        CommandKind::CausalChain => scenarios::causal_chain::run(tracker).await,
        CommandKind::CustomType => scenarios::custom_type::run(tracker).await,
    }
}
