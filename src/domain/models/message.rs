#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Success,
    Error,
}

/// Transient status line shown to the user. The latest batch summary is one
/// of these, overwritten by the next batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    mtype: MessageType,
}

impl Message {
    pub fn new(text: &str) -> Message {
        return Message {
            text: text.to_string().replace('\t', "  "),
            mtype: MessageType::Normal,
        };
    }

    pub fn new_with_type(mtype: MessageType, text: &str) -> Message {
        return Message {
            text: text.to_string().replace('\t', "  "),
            mtype,
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }
}
