use dbdesk_gateway::app::{AppState, build_router};
use dbdesk_gateway::client::{ClientError, GatewayClient, default_base_url};
use dbdesk_gateway::config::GatewayConfig;
use facet::Facet;
use figue as args;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Facet, Debug)]
struct ServerCli {
    #[facet(flatten)]
    builtins: args::FigueBuiltins,
}

#[derive(Facet, Debug)]
struct ClientCli {
    #[facet(flatten)]
    builtins: args::FigueBuiltins,
    #[facet(args::subcommand)]
    command: ClientCommand,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum ClientCommand {
    Query {
        #[facet(args::named, default)]
        url: Option<String>,
        #[facet(args::named)]
        path: String,
        #[facet(args::named)]
        sql: String,
    },
    Health {
        #[facet(args::named, default)]
        url: Option<String>,
    },
}

fn main() {
    let cli_args: Vec<String> = std::env::args().skip(1).collect();
    if cli_args
        .first()
        .map(String::as_str)
        .is_some_and(is_client_command)
    {
        if let Err(err) = run_client() {
            eprintln!("{err}");
            std::process::exit(1);
        }
        return;
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async {
            if let Err(err) = run_server().await {
                eprintln!("{err}");
                std::process::exit(1);
            }
        });
}

fn is_client_command(value: &str) -> bool {
    matches!(value, "query" | "health")
}

async fn run_server() -> Result<(), String> {
    let _cli = parse_server_cli()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::from_env()?;
    let listen_addr = config.listen_addr();
    let timeout_ms = config.timeout.map(|timeout| timeout.as_millis());
    let app = build_router(AppState::new(config));

    let listener = TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| format!("failed to bind HTTP on {listen_addr}: {e}"))?;
    info!(%listen_addr, ?timeout_ms, "dbdesk-gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("dbdesk-gateway shutting down");
        })
        .await
        .map_err(|e| format!("HTTP server error: {e}"))
}

fn parse_server_cli() -> Result<ServerCli, String> {
    let figue_config = args::builder::<ServerCli>()
        .map_err(|e| format!("failed to build CLI schema: {e}"))?
        .cli(|cli| cli.strict())
        .help(|h| {
            h.program_name("dbdesk-gateway")
                .description("Local SQLite execution gateway for dbdesk")
                .version(option_env!("CARGO_PKG_VERSION").unwrap_or("dev"))
        })
        .build();
    let cli = args::Driver::new(figue_config)
        .run()
        .into_result()
        .map_err(|e| e.to_string())?;
    Ok(cli.value)
}

fn parse_client_cli() -> Result<ClientCli, String> {
    let figue_config = args::builder::<ClientCli>()
        .map_err(|e| format!("failed to build CLI schema: {e}"))?
        .cli(|cli| cli.strict())
        .help(|h| {
            h.program_name("dbdesk-gateway")
                .description("CLI for a running dbdesk-gateway")
                .version(option_env!("CARGO_PKG_VERSION").unwrap_or("dev"))
        })
        .build();
    let cli = args::Driver::new(figue_config)
        .run()
        .into_result()
        .map_err(|e| e.to_string())?;
    Ok(cli.value)
}

fn run_client() -> Result<(), String> {
    let cli = parse_client_cli()?;
    let render = |result: Result<String, ClientError>| -> Result<(), String> {
        println!("{}", result.map_err(|e| e.to_string())?);
        Ok(())
    };
    match cli.command {
        ClientCommand::Query { url, path, sql } => {
            let client = GatewayClient::new(url.unwrap_or_else(default_base_url));
            render(client.query(&path, &sql).and_then(|r| to_pretty_json(&r)))
        }
        ClientCommand::Health { url } => {
            let client = GatewayClient::new(url.unwrap_or_else(default_base_url));
            render(client.health().and_then(|r| to_pretty_json(&r)))
        }
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, ClientError> {
    serde_json::to_string_pretty(value).map_err(|e| ClientError::Decode(e.to_string()))
}
