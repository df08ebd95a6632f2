/// Key scripts for `markpad replay`: literal chars plus `<Name>` tokens.
use markpad_core::{Key, KeyEvent};

/// Maps a token name (without the angle brackets) to its key event.
fn named_key(name: &str) -> Option<KeyEvent> {
    let event = match name {
        "Tab" => KeyEvent::plain(Key::Tab),
        "Enter" => KeyEvent::plain(Key::Enter),
        "BS" => KeyEvent::plain(Key::Backspace),
        "Del" => KeyEvent::plain(Key::Delete),
        "Left" => KeyEvent::plain(Key::Left),
        "Right" => KeyEvent::plain(Key::Right),
        "C-s" => KeyEvent::ctrl(Key::Char('s')),
        "C-Enter" => KeyEvent::ctrl(Key::Enter),
        _ => return None,
    };
    Some(event)
}

/// Splits `script` into key events.
///
/// A `<` that does not start a known token is typed literally, so markup
/// like `<div>` can appear in scripts as-is.
pub fn parse(script: &str) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    let mut rest = script;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(end) = rest.find('>') {
                if let Some(event) = named_key(&rest[1..end]) {
                    events.push(event);
                    rest = &rest[end + 1..];
                    continue;
                }
            }
        }
        events.push(KeyEvent::from(c));
        rest = &rest[c.len_utf8()..];
    }
    events
}
