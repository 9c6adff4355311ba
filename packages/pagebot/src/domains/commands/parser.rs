pub const PUBLISH_PREFIX: &str = "/post";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    /// `/post <text>`
    Publish(String),
    /// `/post` with nothing after it
    MissingText,
}

/// Parse one line of operator input.
///
/// Returns `None` for anything that is not a publish command; such lines are
/// ignored rather than reported.
pub fn parse_line(line: &str) -> Option<OperatorCommand> {
    let line = line.trim();
    let prefix = line.get(..PUBLISH_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(PUBLISH_PREFIX) {
        return None;
    }

    let rest = &line[PUBLISH_PREFIX.len()..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        Some(OperatorCommand::MissingText)
    } else {
        Some(OperatorCommand::Publish(text.to_string()))
    }
}
