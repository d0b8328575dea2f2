//! Module for the coded messages that make up a bird reply.
//!
//! Every line the server sends starts with a 4 digit code (or a space, if it
//! continues the previous line). Lines sharing a code form one [Message].
//!
//! Codes are listed [here](https://gitlab.nic.cz/labs/bird/-/blob/master/doc/reply_codes)

use std::fmt;

/// A single message in a bird reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// 0000: end of a successful reply
    Ok,
    /// 0001: greeting sent on connection
    Welcome(String),
    /// 1000: BIRD version
    BirdVersion(String),
    /// 1002: protocol list, one protocol per line
    ProtocolList(String),
    /// 1006: detailed protocol information
    ProtocolDetails(String),
    /// 2xxx: column headings of a table
    TableHeading(u32, String),
    /// 8000
    ReplyTooLong(String),
    /// 8001
    RouteNotFound(String),
    /// 8002
    ConfigurationFileError(String),
    /// 8003
    NoProtocolsMatch(String),
    /// 8004
    StoppedDueToReconfiguration(String),
    /// 8005
    ProtocolDown(String),
    /// 8006
    ReloadFailed(String),
    /// 8007
    AccessDenied(String),
    /// 8008
    RuntimeError(String),
    /// 9000
    CommandTooLong(String),
    /// 9001
    SyntaxError(String),
    /// 9002
    InvalidSymbolType(String),
    /// Any other code, kept with its text
    Other(u32, String),
}

impl Message {
    /// Creates a [Message] from a reply `code` and the text that followed it
    pub fn from_code(code: u32, text: &str) -> Self {
        let text = text.to_owned();
        match code {
            0 => Message::Ok,
            1 => Message::Welcome(text),
            1000 => Message::BirdVersion(text),
            1002 => Message::ProtocolList(text),
            1006 => Message::ProtocolDetails(text),
            2000..=2999 => Message::TableHeading(code, text),
            8000 => Message::ReplyTooLong(text),
            8001 => Message::RouteNotFound(text),
            8002 => Message::ConfigurationFileError(text),
            8003 => Message::NoProtocolsMatch(text),
            8004 => Message::StoppedDueToReconfiguration(text),
            8005 => Message::ProtocolDown(text),
            8006 => Message::ReloadFailed(text),
            8007 => Message::AccessDenied(text),
            8008 => Message::RuntimeError(text),
            9000 => Message::CommandTooLong(text),
            9001 => Message::SyntaxError(text),
            9002 => Message::InvalidSymbolType(text),
            _ => Message::Other(code, text),
        }
    }

    /// The reply code of this message
    pub fn code(&self) -> u32 {
        match self {
            Message::Ok => 0,
            Message::Welcome(_) => 1,
            Message::BirdVersion(_) => 1000,
            Message::ProtocolList(_) => 1002,
            Message::ProtocolDetails(_) => 1006,
            Message::TableHeading(code, _) => *code,
            Message::ReplyTooLong(_) => 8000,
            Message::RouteNotFound(_) => 8001,
            Message::ConfigurationFileError(_) => 8002,
            Message::NoProtocolsMatch(_) => 8003,
            Message::StoppedDueToReconfiguration(_) => 8004,
            Message::ProtocolDown(_) => 8005,
            Message::ReloadFailed(_) => 8006,
            Message::AccessDenied(_) => 8007,
            Message::RuntimeError(_) => 8008,
            Message::CommandTooLong(_) => 9000,
            Message::SyntaxError(_) => 9001,
            Message::InvalidSymbolType(_) => 9002,
            Message::Other(code, _) => *code,
        }
    }

    /// The text carried by this message. Empty for [Message::Ok].
    pub fn text(&self) -> &str {
        match self {
            Message::Ok => "",
            Message::Welcome(s)
            | Message::BirdVersion(s)
            | Message::ProtocolList(s)
            | Message::ProtocolDetails(s)
            | Message::TableHeading(_, s)
            | Message::ReplyTooLong(s)
            | Message::RouteNotFound(s)
            | Message::ConfigurationFileError(s)
            | Message::NoProtocolsMatch(s)
            | Message::StoppedDueToReconfiguration(s)
            | Message::ProtocolDown(s)
            | Message::ReloadFailed(s)
            | Message::AccessDenied(s)
            | Message::RuntimeError(s)
            | Message::CommandTooLong(s)
            | Message::SyntaxError(s)
            | Message::InvalidSymbolType(s)
            | Message::Other(_, s) => s,
        }
    }

    /// Returns true if the server used this message to reject our request
    pub fn is_error(&self) -> bool {
        (8000..=9999).contains(&self.code())
    }

    /// Returns true for table column headings, which carry no data
    pub fn is_heading(&self) -> bool {
        matches!(self, Message::TableHeading(..))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} {}", self.code(), self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Message::from_code(0, ""), Message::Ok);
        assert_eq!(
            Message::from_code(1, "BIRD 2.0.7 ready."),
            Message::Welcome("BIRD 2.0.7 ready.".into())
        );
        assert!(matches!(
            Message::from_code(2002, "Name       Proto"),
            Message::TableHeading(2002, _)
        ));
        assert!(matches!(
            Message::from_code(1234, "whatever"),
            Message::Other(1234, ref s) if s == "whatever"
        ));
    }

    #[test]
    fn test_code_roundtrip() {
        for code in [0, 1, 1000, 1002, 1006, 2002, 8003, 9001, 1234] {
            assert_eq!(Message::from_code(code, "x").code(), code);
        }
    }

    #[test]
    fn test_error_codes() {
        assert!(Message::from_code(8003, "No protocols match").is_error());
        assert!(Message::from_code(9001, "syntax error").is_error());
        assert!(!Message::from_code(1002, "device1").is_error());
        assert!(!Message::Ok.is_error());
        assert!(Message::from_code(2002, "Name").is_heading());
    }

    #[test]
    fn test_display() {
        let msg = Message::from_code(8003, "No protocols match");
        assert_eq!(msg.to_string(), "8003 No protocols match");
    }
}
