use console::style;

/// System line, e.g. "Conversation cleared."
pub fn notice(msg: &str) -> String { style(msg).cyan().dim().to_string() }
pub fn success(msg: &str) -> String { style(msg).green().to_string() }
pub fn failure(msg: &str) -> String { style(msg).red().bold().to_string() }

/// Speaker tag printed before assistant replies.
pub fn bot_tag() -> String { style("Bot:").magenta().bold().to_string() }
