#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;
use std::process;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use yansi::Paint;

use super::shell;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::SelectedFile;
use crate::domain::models::WorkspaceStoreBox;
use crate::domain::services::AppState;
use crate::infrastructure::backends::ContractApi;
use crate::infrastructure::stores::FileWorkspaceStore;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    let mut cmd = Command::new("debug");
    cmd = cmd.about("Debug helpers for Dossier")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Dossier with environment variable RUST_LOG=dossier")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );

    return cmd;
}

fn subcommand_workspace() -> Command {
    return Command::new("workspace")
        .about("Manage the workspace documents are uploaded to and questions are asked against.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("set")
                .about("Binds to a workspace. Only letters, numbers, '_' and '-' are kept.")
                .arg(
                    clap::Arg::new("id")
                        .help("Workspace name")
                        .required(true),
                ),
        )
        .subcommand(Command::new("get").about("Prints the current workspace."))
        .subcommand(Command::new("clear").about("Forgets the current workspace."));
}

fn subcommand_upload() -> Command {
    return Command::new("upload")
        .about("Uploads documents to the current workspace, one at a time. Exits non-zero if any upload fails.")
        .arg(
            clap::Arg::new("files")
                .help("Paths of the documents to upload")
                .num_args(1..)
                .required(true),
        );
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Asks a question against the current workspace and prints the answer with its sources.")
        .arg(
            clap::Arg::new("question")
                .help("The question to ask")
                .num_args(1..)
                .required(true),
        );
}

fn arg_api_url() -> Arg {
    return Arg::new(ConfigKey::ApiURL.to_string())
        .long(ConfigKey::ApiURL.to_string())
        .env("DOSSIER_API_URL")
        .num_args(1)
        .help(format!(
            "Base URL of the contract intelligence API. [default: {}]",
            Config::default(ConfigKey::ApiURL)
        ))
        .global(true);
}

fn arg_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::HealthCheckTimeout.to_string())
        .long(ConfigKey::HealthCheckTimeout.to_string())
        .env("DOSSIER_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .help(
            format!("Time to wait in milliseconds before timing out when doing a healthcheck for the API. [default: {}]", Config::default(ConfigKey::HealthCheckTimeout)),
        )
        .global(true);
}

fn arg_state_file() -> Arg {
    return Arg::new(ConfigKey::StateFile.to_string())
        .long(ConfigKey::StateFile.to_string())
        .env("DOSSIER_STATE_FILE")
        .num_args(1)
        .help(format!(
            "Path to the file remembering the current workspace. [default: {}]",
            Config::default(ConfigKey::StateFile)
        ))
        .global(true);
}

fn arg_top_k() -> Arg {
    return Arg::new(ConfigKey::TopK.to_string())
        .long(ConfigKey::TopK.to_string())
        .env("DOSSIER_TOP_K")
        .num_args(1)
        .help(format!(
            "Number of document chunks the API retrieves to answer a question. [default: {}]",
            Config::default(ConfigKey::TopK)
        ))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = shell::help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("QUESTIONS:") {
                return Paint::new(format!("SHELL {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("dossier")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("shell").about("Starts an interactive session. This is the default."))
        .subcommand(subcommand_workspace())
        .subcommand(subcommand_upload())
        .subcommand(subcommand_ask())
        .subcommand(Command::new("health").about("Checks whether the API is reachable."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("DOSSIER_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(arg_api_url())
        .arg(arg_health_check_timeout())
        .arg(arg_state_file())
        .arg(arg_top_k());
}

fn values(matches: &ArgMatches, id: &str) -> Vec<String> {
    return matches
        .get_many::<String>(id)
        .map(|vals| return vals.cloned().collect())
        .unwrap_or_default();
}

/// Session wired to the configured API and state file, for one-shot commands.
fn one_shot() -> Result<(AppState, mpsc::UnboundedReceiver<Event>)> {
    let backend: BackendBox = Arc::new(ContractApi::default());
    let store: WorkspaceStoreBox = Arc::new(FileWorkspaceStore::default());
    let (app_state, event_rx, _worker) = AppState::spawn(backend, store, Config::top_k()?);
    return Ok((app_state, event_rx));
}

fn finish(app_state: &mut AppState, failed: bool) {
    shell::print_messages(app_state);
    if failed {
        process::exit(1);
    }
}

async fn run_workspace(matches: &ArgMatches) -> Result<()> {
    let (mut app_state, _) = one_shot()?;
    match matches.subcommand() {
        Some(("set", set_matches)) => {
            let id = set_matches
                .get_one::<String>("id")
                .map(|e| return e.to_string())
                .unwrap_or_default();
            app_state.set_workspace(&id).await?;
            let bound = app_state.store.get().await?.is_some_and(|e| return e.is_bound());
            finish(&mut app_state, !bound);
        }
        Some(("get", _)) => {
            app_state.show_workspace().await?;
            finish(&mut app_state, false);
        }
        Some(("clear", _)) => {
            app_state.clear_workspace().await?;
            finish(&mut app_state, false);
        }
        _ => {
            subcommand_workspace().print_long_help()?;
        }
    }

    return Ok(());
}

async fn run_upload(matches: &ArgMatches) -> Result<()> {
    let (mut app_state, mut event_rx) = one_shot()?;

    let mut files = vec![];
    for file_path in values(matches, "files") {
        match SelectedFile::read(path::Path::new(&file_path)).await {
            Ok(file) => files.push(file),
            Err(err) => {
                eprintln!("{}", Paint::red(format!("Couldn't read {file_path}: {err}")));
                process::exit(1);
            }
        }
    }

    app_state.upload(files).await;
    if !app_state.uploads.has_pending() {
        finish(&mut app_state, true);
        return Ok(());
    }
    shell::print_messages(&mut app_state);

    while let Some(event) = event_rx.recv().await {
        let failed = match &event {
            Event::UploadBatchFinished(summary) => Some(summary.failed > 0),
            _ => None,
        };

        app_state.handle_event(event);
        shell::print_messages(&mut app_state);

        if let Some(failed) = failed {
            finish(&mut app_state, failed);
            break;
        }
    }

    return Ok(());
}

async fn run_ask(matches: &ArgMatches) -> Result<()> {
    let question = values(matches, "question").join(" ");
    if question.trim().is_empty() {
        return Ok(());
    }

    let (mut app_state, mut event_rx) = one_shot()?;
    app_state.ask(&question).await;

    if app_state.queries.error().is_none() {
        while let Some(event) = event_rx.recv().await {
            let resolved = matches!(event, Event::QueryResolved(..));
            app_state.handle_event(event);
            if resolved {
                break;
            }
        }
    }

    let failed = app_state.queries.result().is_none();
    finish(&mut app_state, failed);
    return Ok(());
}

async fn run_health() -> Result<()> {
    let (mut app_state, _) = one_shot()?;
    let healthy = app_state.health_check().await;
    if healthy {
        println!("{}", Paint::green("The API is up and running."));
    }
    finish(&mut app_state, !healthy);
    return Ok(());
}

/// Parses arguments and runs one-shot commands. Returns true when the
/// interactive shell should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = Config::log_dir().join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("workspace", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            run_workspace(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("upload", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            run_upload(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            run_ask(subcmd_matches).await?;
            return Ok(false);
        }
        Some(("health", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            run_health().await?;
            return Ok(false);
        }
        Some(("shell", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
