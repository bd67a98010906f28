//! Shell replies and their text rendering

use std::fmt;

/// Outcome of one command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Output lines
    Lines(Vec<String>),
    /// Failed command, rendered with an `ERR` prefix
    Error(String),
    /// Leave the shell
    Quit,
}

impl Reply {
    /// Single-line reply
    pub fn line(text: impl Into<String>) -> Self {
        Reply::Lines(vec![text.into()])
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Lines(lines) => write!(f, "{}", lines.join("\n")),
            Reply::Error(e) => write!(f, "ERR {}", e),
            Reply::Quit => write!(f, "bye"),
        }
    }
}
