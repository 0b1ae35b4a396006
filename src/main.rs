#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::sync::Arc;

use anyhow::Error;
use domain::models::BackendBox;
use domain::models::WorkspaceStoreBox;
use domain::services::AppState;
use infrastructure::backends::ContractApi;
use infrastructure::stores::FileWorkspaceStore;
use yansi::Paint;

use crate::application::cli;
use crate::application::shell;
use crate::configuration::Config;

fn handle_error(err: Error) {
    eprintln!(
            "{}",
            Paint::red(format!(
                "Oh no! Dossier has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {}",
                env!("CARGO_PKG_VERSION"),
                env!("VERGEN_GIT_DESCRIBE"),
                err
            ))
        );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let file_appender = tracing_appender::rolling::never(Config::log_dir(), "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("dossier")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    match cli::parse().await {
        Ok(true) => {}
        Ok(false) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    }

    let top_k = match Config::top_k() {
        Ok(top_k) => top_k,
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let backend: BackendBox = Arc::new(ContractApi::default());
    let store: WorkspaceStoreBox = Arc::new(FileWorkspaceStore::default());
    let (mut app_state, mut event_rx, worker) = AppState::spawn(backend, store, top_k);

    let res = tokio::select!(
        res = worker => match res {
            Ok(res) => res,
            Err(err) => Err(err.into()),
        },
        res = shell::start(&mut app_state, &mut event_rx) => res,
    );

    if let Err(err) = res {
        handle_error(err);
    }

    process::exit(0);
}
