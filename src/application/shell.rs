#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;

use std::io::Write;
use std::path;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use yansi::Paint;

use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::SelectedFile;
use crate::domain::models::SlashCommand;
use crate::domain::services::AppState;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /workspace (/w) [NAME?] - Binds the session to a workspace. Names keep only letters, numbers, '_' and '-'. Without a NAME, shows the current workspace.
- /unbind - Clears the current workspace.
- /upload (/u) [PATH...] - Uploads one or more documents to the current workspace, one at a time.
- /items (/ls) - Lists uploaded documents and their status.
- /remove (/rm) [NUMBER] - Removes a finished upload from the list, by its number from /items.
- /health - Checks whether the API is reachable.
- /quit /exit (/q) - Exit Dossier.
- /help (/h) - Provides this help menu.

QUESTIONS:
Anything that isn't a command is asked as a question against the documents of the current workspace. The answer is printed with the sources it cites.
        "#;

    return text.trim().to_string();
}

pub fn paint(message: &Message) -> String {
    match message.message_type() {
        MessageType::Normal => return message.text.to_string(),
        MessageType::Success => return Paint::green(&message.text).to_string(),
        MessageType::Error => return Paint::red(&message.text).to_string(),
    }
}

pub fn print_messages(app_state: &mut AppState) {
    for message in app_state.take_messages() {
        println!("{}\n", paint(&message));
    }
}

fn print_prompt() {
    print!("{} ", Paint::cyan(">").bold());
    let _ = std::io::stdout().flush();
}

async fn upload_paths(app_state: &mut AppState, paths: &[String]) {
    let mut files = vec![];
    for file_path in paths {
        match SelectedFile::read(path::Path::new(file_path)).await {
            Ok(file) => files.push(file),
            Err(err) => {
                app_state.add_message(Message::new_with_type(
                    MessageType::Error,
                    &format!("Couldn't read {file_path}: {err}"),
                ));
            }
        }
    }

    app_state.upload(files).await;
}

/// Handles one line of input. Returns false once the user asks to quit.
pub async fn handle_input(app_state: &mut AppState, text: &str) -> Result<bool> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(true);
    }

    let Some(command) = SlashCommand::parse(text) else {
        if text.starts_with('/') {
            let name = text.split_whitespace().next().unwrap_or(text);
            app_state.add_message(Message::new_with_type(
                MessageType::Error,
                &format!("Unknown command {name}. Type `/help` for all commands."),
            ));
        } else {
            app_state.ask(text).await;
        }
        return Ok(true);
    };

    if command.is_quit() {
        return Ok(false);
    }

    if command.is_help() {
        app_state.add_message(Message::new(&help_text()));
    } else if command.is_workspace() {
        if command.args.is_empty() {
            app_state.show_workspace().await?;
        } else {
            app_state.set_workspace(&command.args.join(" ")).await?;
        }
    } else if command.is_unbind() {
        app_state.clear_workspace().await?;
    } else if command.is_upload() {
        if command.args.is_empty() {
            app_state.add_message(Message::new_with_type(
                MessageType::Error,
                "You must pass at least one file path with `/upload`.",
            ));
        } else {
            upload_paths(app_state, &command.args).await;
        }
    } else if command.is_items() {
        app_state.list_items();
    } else if command.is_remove() {
        match command.args.first().map(|e| return e.parse::<usize>()) {
            Some(Ok(position)) => app_state.remove(position),
            _ => {
                app_state.add_message(Message::new_with_type(
                    MessageType::Error,
                    "You must pass an item number with `/remove`. Run `/items` to see them.",
                ));
            }
        }
    } else if command.is_health() && app_state.health_check().await {
        app_state.add_message(Message::new_with_type(
            MessageType::Success,
            "The API is up and running.",
        ));
    }

    return Ok(true);
}

pub async fn start(
    app_state: &mut AppState,
    rx: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    app_state.start().await?;
    print_messages(app_state);
    print_prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                if !handle_input(app_state, &line).await? {
                    break;
                }

                print_messages(app_state);
                print_prompt();
            }
            Some(event) = rx.recv() => {
                app_state.handle_event(event);
                println!();
                print_messages(app_state);
                print_prompt();
            }
        }
    }

    if app_state.uploads.has_pending() {
        tracing::warn!("Exiting with uploads still pending");
    }

    return Ok(());
}
