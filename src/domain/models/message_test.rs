use super::Message;
use super::MessageType;

#[test]
fn it_executes_new() {
    let msg = Message::new("Hi there!");
    assert_eq!(msg.text, "Hi there!".to_string());
    assert_eq!(msg.mtype, MessageType::Normal);
}

#[test]
fn it_executes_new_replacing_tabs() {
    let msg = Message::new("\t\tHi there!");
    assert_eq!(msg.text, "    Hi there!".to_string());
}

#[test]
fn it_executes_new_with_type() {
    let msg = Message::new_with_type(MessageType::Error, "It broke!");
    assert_eq!(msg.text, "It broke!".to_string());
    assert_eq!(msg.message_type(), MessageType::Error);
}
