#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }

        let prefix = args.remove(0);
        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_workspace()
            || cmd.is_unbind()
            || cmd.is_upload()
            || cmd.is_remove()
            || cmd.is_items()
            || cmd.is_health()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_workspace(&self) -> bool {
        return ["/w", "/workspace"].contains(&self.command.as_str());
    }

    pub fn is_unbind(&self) -> bool {
        return ["/unbind"].contains(&self.command.as_str());
    }

    pub fn is_upload(&self) -> bool {
        return ["/u", "/upload"].contains(&self.command.as_str());
    }

    pub fn is_remove(&self) -> bool {
        return ["/rm", "/remove"].contains(&self.command.as_str());
    }

    pub fn is_items(&self) -> bool {
        return ["/ls", "/items"].contains(&self.command.as_str());
    }

    pub fn is_health(&self) -> bool {
        return ["/health"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}
