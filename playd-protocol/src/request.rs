//! Request message construction

use std::fmt::Display;

use crate::{Command, DELIMITER};

/// Builder for one outbound message
///
/// # Example
///
/// ```rust
/// use playd_protocol::{Command, Request};
///
/// let message = Request::new(Command::SetVolume).arg(42.5).into_message();
/// assert_eq!(message, format!("{}\u{1f}42.5", Command::SetVolume.code()));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    buf: String,
}

impl Request {
    pub fn new(command: Command) -> Self {
        Self {
            buf: command.code().to_string(),
        }
    }

    /// Append one delimiter-separated argument field
    pub fn arg(mut self, value: impl Display) -> Self {
        self.buf.push(DELIMITER);
        self.buf.push_str(&value.to_string());
        self
    }

    /// Append every element of an iterator as an argument field
    pub fn args<T: Display>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        for value in values {
            self = self.arg(value);
        }
        self
    }

    pub fn into_message(self) -> String {
        self.buf
    }
}
