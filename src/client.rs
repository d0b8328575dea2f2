use std::{ffi::OsString, path::Path};

use crate::{Connection, Message, Result};

/// A bird client instance. You need to create a [Connection] from this
/// client, using [Client::connect], to make requests, or use
/// [Client::run_command] for a one-shot exchange.
pub struct Client {
    unix_socket: OsString,
}

impl Client {
    /// Creates a new [Client] using `unix_socket` file.
    ///
    /// This doesn't establish a new connection, so is guaranteed to
    /// succeed. New connections are created by [Client::connect],
    /// which can fail if `unix_socket` does not exist, or permissions
    /// prevent access.
    pub fn for_unix_socket<P: AsRef<Path>>(unix_socket: P) -> Self {
        Client {
            unix_socket: unix_socket.as_ref().as_os_str().to_owned(),
        }
    }

    /// Open a new [Connection] to this client. You can open multiple
    /// connections to the same client.
    ///
    /// Note that this can fail if the unix socket is closed, or if the
    /// initial hello negotiation with the server fails.
    pub async fn connect(&self) -> Result<Connection> {
        Connection::new(&self.unix_socket).await
    }

    /// Runs `command` on a fresh connection and returns the reply as plain
    /// text: reply codes are stripped, and table headings are left out.
    pub async fn run_command(&self, command: &str) -> Result<String> {
        let mut connection = self.connect().await?;
        let messages = connection.send_request(command).await?;
        log::debug!("client: '{}' returned {} messages", command, messages.len());
        Ok(reply_text(&messages))
    }
}

/// Joins the text of `messages` into one line-oriented string
pub fn reply_text(messages: &[Message]) -> String {
    messages
        .iter()
        .filter(|m| !m.is_heading())
        .map(Message::text)
        .collect::<Vec<&str>>()
        .join("\n")
}
