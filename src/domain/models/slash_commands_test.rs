use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    assert!(SlashCommand::parse("").is_none());
}

#[test]
fn it_parse_space_only() {
    assert!(SlashCommand::parse("   ").is_none());
}

#[test]
fn it_parse_single_slash() {
    assert!(SlashCommand::parse("/").is_none());
}

#[test]
fn it_parse_question() {
    assert!(SlashCommand::parse("what is the term?").is_none());
}

#[test]
fn it_parse_valid_prefix() {
    let cmd = SlashCommand::parse("/q");
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_is_quit() {
    assert!(SlashCommand::parse("/q").unwrap().is_quit());
    assert!(SlashCommand::parse("/quit").unwrap().is_quit());
    assert!(SlashCommand::parse("/exit").unwrap().is_quit());
    assert!(!SlashCommand::parse("/ls").unwrap().is_quit());
}

#[test]
fn it_is_workspace_with_args() {
    let cmd = SlashCommand::parse("  /workspace   acme ").unwrap();
    assert!(cmd.is_workspace());
    assert_eq!(cmd.args, vec!["acme".to_string()]);

    let short = SlashCommand::parse("/w").unwrap();
    assert!(short.is_workspace());
    assert!(short.args.is_empty());
}

#[test]
fn it_is_unbind() {
    assert!(SlashCommand::parse("/unbind").unwrap().is_unbind());
}

#[test]
fn it_is_upload_with_paths() {
    let cmd = SlashCommand::parse("/u a.pdf b.pdf").unwrap();
    assert!(cmd.is_upload());
    assert_eq!(cmd.args, vec!["a.pdf".to_string(), "b.pdf".to_string()]);
    assert!(SlashCommand::parse("/upload").unwrap().is_upload());
}

#[test]
fn it_is_remove() {
    let cmd = SlashCommand::parse("/rm 2").unwrap();
    assert!(cmd.is_remove());
    assert_eq!(cmd.args, vec!["2".to_string()]);
    assert!(SlashCommand::parse("/remove 1").unwrap().is_remove());
}

#[test]
fn it_is_items() {
    assert!(SlashCommand::parse("/ls").unwrap().is_items());
    assert!(SlashCommand::parse("/items").unwrap().is_items());
}

#[test]
fn it_is_health() {
    assert!(SlashCommand::parse("/health").unwrap().is_health());
}

#[test]
fn it_is_help() {
    assert!(SlashCommand::parse("/h").unwrap().is_help());
    assert!(SlashCommand::parse("/help").unwrap().is_help());
    assert!(!SlashCommand::parse("/q").unwrap().is_help());
}
