//! Module that deals with connection and protocol related logic.
//!
//! Refer to documentation of [Connection] for more details.

use std::path::Path;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
};

use crate::{Error, Message, Result};

/// An active connection, on which requests can be executed, and responses
/// received.
///
/// Requests are serial: [Connection::send_request] reads the full reply
/// before returning, so a connection is always ready for the next request.
pub struct Connection {
    stream: BufReader<UnixStream>,
    line: Vec<u8>,
}

impl Connection {
    /// Open a new connection to this `unix_socket`, and consumes the
    /// introductory welcome message before returning the [Connection]
    pub(crate) async fn new<P: AsRef<Path>>(unix_socket: P) -> Result<Self> {
        let stream = UnixStream::connect(unix_socket).await?;
        let mut connection = Connection {
            stream: BufReader::with_capacity(READ_FRAME_SIZE, stream),
            line: Vec::with_capacity(256),
        };

        let greeting = connection.read_reply().await?;
        if let [Message::Welcome(text)] = greeting.as_slice() {
            log::trace!("received greeting {}", text);
            log::trace!("handshake completed. connection active");
            Ok(connection)
        } else {
            Err(Error::InvalidToken("did not find greeting".into()))
        }
    }

    /// Sends a request to the server and gets a vec of response messages. The
    /// terminating [Message::Ok] is not included.
    ///
    /// If the server answers with an error code, the error [Message] is
    /// returned as [Error::ProtocolError].
    pub async fn send_request(&mut self, request: &str) -> Result<Vec<Message>> {
        let request = if request.ends_with('\n') {
            request.to_owned()
        } else {
            format!("{}\n", request)
        };
        log::debug!("conn: sending request {}", request.trim_end());
        self.stream.get_mut().write_all(request.as_bytes()).await?;

        let mut messages = self.read_reply().await?;
        if let Some(pos) = messages.iter().position(Message::is_error) {
            return Err(Error::ProtocolError(messages.swap_remove(pos)));
        }
        messages.retain(|m| !matches!(m, Message::Ok));
        Ok(messages)
    }

    /// Reads lines until the final line of a reply, folding them into
    /// [Message]s.
    async fn read_reply(&mut self) -> Result<Vec<Message>> {
        let mut messages = vec![];
        let mut current: Option<(u32, String)> = None;
        loop {
            let line = self.next_line().await?;
            log::trace!("conn: processing line: {}", line);
            match parse_line(&line)? {
                Line::Continuation(text) => match current {
                    Some((_, ref mut body)) => {
                        body.push('\n');
                        body.push_str(text);
                    }
                    None => {
                        return Err(Error::InvalidToken(format!(
                            "continuation line without a code: {}",
                            line
                        )))
                    }
                },
                Line::Coded { code, last, text } => {
                    if let Some((prev, body)) = current.take() {
                        messages.push(Message::from_code(prev, &body));
                    }
                    if last {
                        messages.push(Message::from_code(code, text));
                        return Ok(messages);
                    }
                    current = Some((code, text.to_owned()));
                }
            }
        }
    }

    /// Reads the next line from the server, without its line terminator
    async fn next_line(&mut self) -> Result<String> {
        self.line.clear();
        let count = self.stream.read_until(b'\n', &mut self.line).await?;
        if count == 0 {
            return Err(Error::eof("premature EOF"));
        }
        let line = std::str::from_utf8(&self.line)?;
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_owned())
    }
}

/// A single line of a bird reply
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// `xxxx<space><content>` (last line of the reply) or
    /// `xxxx<minus><content>` (more to follow)
    Coded { code: u32, last: bool, text: &'a str },
    /// `<space><content>`, continues the previous message
    Continuation(&'a str),
}

/// Splits a reply line into its code, continuation marker and content.
///
/// More details about the protocol can be found [here](https://gitlab.nic.cz/labs/bird/-/blob/master/nest/cli.c)
fn parse_line(line: &str) -> Result<Line<'_>> {
    if let Some(text) = line.strip_prefix(' ') {
        return Ok(Line::Continuation(text));
    }
    if line.len() == 4 {
        // some servers drop the trailing space of a bare final code
        return Ok(Line::Coded {
            code: parse_code(line)?,
            last: true,
            text: "",
        });
    }
    if line.len() < 5 || !line.is_char_boundary(4) || !line.is_char_boundary(5) {
        return Err(Error::InvalidToken(format!("line too short: {:?}", line)));
    }
    let code = parse_code(&line[..4])?;
    let last = match line.as_bytes()[4] {
        b' ' => true,
        b'-' => false,
        separator => {
            return Err(Error::InvalidToken(format!(
                "unknown separator {} after code {}",
                separator as char, code
            )))
        }
    };
    Ok(Line::Coded {
        code,
        last,
        text: &line[5..],
    })
}

/// Parse the 4 digit code at the front of a bird response
#[inline]
fn parse_code(s: &str) -> Result<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidToken(format!("invalid reply code {:?}", s)));
    }
    Ok(s.parse()?)
}

/// Reads are buffered in sizes of this
const READ_FRAME_SIZE: usize = 2048;

/// Unit tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coded_lines() {
        let _ = env_logger::try_init();
        assert_eq!(
            parse_line("1002-device1    Device     ---        up     2022-04-14").unwrap(),
            Line::Coded {
                code: 1002,
                last: false,
                text: "device1    Device     ---        up     2022-04-14"
            }
        );
        assert_eq!(
            parse_line("0000 ").unwrap(),
            Line::Coded {
                code: 0,
                last: true,
                text: ""
            }
        );
        assert_eq!(
            parse_line("1006-").unwrap(),
            Line::Coded {
                code: 1006,
                last: false,
                text: ""
            }
        );
    }

    #[test]
    fn test_continuation_line() {
        assert_eq!(
            parse_line("   Channel ipv4").unwrap(),
            Line::Continuation("  Channel ipv4")
        );
        assert_eq!(parse_line(" ").unwrap(), Line::Continuation(""));
    }

    #[test]
    fn test_invalid_lines() {
        assert!(matches!(parse_line("100"), Err(Error::InvalidToken(_))));
        assert!(matches!(parse_line("1002+abc"), Err(Error::InvalidToken(_))));
        assert!(matches!(parse_line("10a2-abc"), Err(Error::InvalidToken(_))));
        assert!(matches!(parse_line("+100-abc"), Err(Error::InvalidToken(_))));
    }
}
