use std::{fmt, num::ParseIntError, path::PathBuf, str::Utf8Error};

use super::Message;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Simple wrapper over all I/O related errors, e.g. when the control
    /// socket can't be reached
    IoError(std::io::Error),
    /// We received an error [Message] from the server
    ProtocolError(Message),
    /// If we received a token which was not what we were
    /// supposed to get
    InvalidToken(String),
    /// The command output did not have the structure we expected.
    /// `line` is 1-based.
    ParseError { line: usize, reason: String },
    /// The protocol name mapping could not be loaded
    NameMapError { path: PathBuf, reason: String },
    /// The configuration file could not be loaded
    ConfigError { path: PathBuf, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(err) => write!(f, "IO operation failed: {}", err),
            Error::ProtocolError(msg) => {
                write!(f, "received an error message from server")?;
                let summary = match msg {
                    Message::ReplyTooLong(_) => Some("reply too long"),
                    Message::RouteNotFound(_) => Some("route not found"),
                    Message::ConfigurationFileError(_) => Some("configuration file error"),
                    Message::NoProtocolsMatch(_) => Some("no protocols match"),
                    Message::StoppedDueToReconfiguration(_) => Some("stopped due to reconfiguration"),
                    Message::ProtocolDown(_) => Some("protocol is down => cannot dump"),
                    Message::ReloadFailed(_) => Some("reload failed"),
                    Message::AccessDenied(_) => Some("access denied"),
                    Message::RuntimeError(_) => Some("evaluation runtime error"),
                    Message::CommandTooLong(_) => Some("command too long"),
                    Message::InvalidSymbolType(_) => Some("invalid symbol type"),
                    _ => None,
                };
                if let Some(summary) = summary {
                    write!(f, ": {}", summary)?;
                }
                // the server's own wording, as sent
                match msg.text() {
                    "" if summary.is_none() => write!(f, ": {}", msg),
                    "" => Ok(()),
                    text => write!(f, ": {}", text),
                }
            }
            Error::InvalidToken(s) => write!(f, "received invalid token: {}", s),
            Error::ParseError { line, reason } => {
                write!(f, "failed to parse protocols at line {}: {}", line, reason)
            }
            Error::NameMapError { path, reason } => {
                write!(f, "reading protocol names from {}: {}", path.display(), reason)
            }
            Error::ConfigError { path, reason } => {
                write!(f, "loading config from {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    pub fn eof(err: &str) -> Self {
        Self::IoError(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err))
    }

    pub(crate) fn parse<S: Into<String>>(line: usize, reason: S) -> Self {
        Self::ParseError {
            line,
            reason: reason.into(),
        }
    }

    /// Returns true if this error came out of the exchange with the server,
    /// as opposed to what we did with its output
    pub fn is_command_error(&self) -> bool {
        matches!(
            self,
            Error::IoError(_) | Error::ProtocolError(_) | Error::InvalidToken(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<Message> for Error {
    fn from(message: Message) -> Self {
        Error::ProtocolError(message)
    }
}

impl From<Utf8Error> for Error {
    fn from(_: Utf8Error) -> Self {
        Error::InvalidToken("failed to parse as utf8".into())
    }
}

impl From<ParseIntError> for Error {
    fn from(_: ParseIntError) -> Self {
        Error::InvalidToken("failed to parse as integer".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::from(Message::from_code(8003, "No protocols match"));
        assert_eq!(
            err.to_string(),
            "received an error message from server: no protocols match: No protocols match"
        );
        assert!(err.is_command_error());

        let err = Error::parse(3, "missing Neighbor AS");
        assert_eq!(
            err.to_string(),
            "failed to parse protocols at line 3: missing Neighbor AS"
        );
        assert!(!err.is_command_error());
    }

    #[test]
    fn test_display_keeps_server_text() {
        let err = Error::from(Message::from_code(8008, "Filter runtime error: division by zero"));
        assert_eq!(
            err.to_string(),
            "received an error message from server: evaluation runtime error: Filter runtime error: division by zero"
        );

        let err = Error::from(Message::from_code(8002, "/etc/bird/bird.conf:12:3 syntax error"));
        assert!(err.to_string().contains("configuration file error"));
        assert!(err.to_string().contains("/etc/bird/bird.conf:12:3 syntax error"));

        let err = Error::from(Message::from_code(8007, "Access denied"));
        assert!(err.to_string().ends_with(": access denied: Access denied"));

        let err = Error::from(Message::from_code(9001, "syntax error, unexpected END"));
        assert_eq!(
            err.to_string(),
            "received an error message from server: syntax error, unexpected END"
        );

        // nothing but the code to go on
        let err = Error::from(Message::from_code(8005, ""));
        assert_eq!(
            err.to_string(),
            "received an error message from server: protocol is down => cannot dump"
        );
    }
}
