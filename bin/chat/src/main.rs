use helpdesk_chat::{config::AppConfig, identity, repl};
use helpdesk_conversation::{ChatSession, SimulatedConnector};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with the chat on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(chat());

    // A pending stdin read sits on the blocking pool and never completes on
    // its own.
    runtime.shutdown_background();
    code
}

async fn chat() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "loaded configuration");

    let user_name = identity::resolve_user_name(config.user_name.as_deref());
    let (session, mut feed) =
        ChatSession::start(user_name, config.chat, Arc::new(SimulatedConnector));

    let stdin = BufReader::new(tokio::io::stdin());
    match repl::run(&session, &mut feed, stdin, tokio::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "terminal I/O failed");
            ExitCode::FAILURE
        }
    }
}
