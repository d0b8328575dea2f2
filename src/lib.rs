//! Library for showing the status of the protocols of a Bird BGP server.
//!
//! It runs `show protocols all` over the control socket, parses the reply
//! into [ProtocolState]s, orders and filters them, and renders a
//! [StatusTable].
//!
//! ## Examples
//! ```no_run
//! use birdstat::*;
//!
//! async fn show_status() -> Result<()> {
//!     let client = Client::for_unix_socket("/run/bird/bird.ctl");
//!     let names = NameMap::from_file("/etc/bird/protocols.json")?;
//!     let options = StatusOptions {
//!         filter: ProtocolFilter {
//!             bgp_only: true,
//!             tags: vec![],
//!         },
//!         show_tags: true,
//!     };
//!     fetch_status_table(&client, &names, &options).await?.print()?;
//!     Ok(())
//! }
//! ```
//!
//! Or, working with the parsed protocols directly:
//! ```no_run
//! use birdstat::*;
//!
//! async fn bgp_sessions(client: &Client) -> Result<()> {
//!     let raw = client.run_command(SHOW_PROTOCOLS_ALL).await?;
//!     for protocol in ProtocolState::parse_all(&raw)? {
//!         if let Some(bgp) = &protocol.bgp {
//!             println!("{} AS{} {}", protocol.name, bgp.neighbor_as, protocol.state);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Compatibility
//! This library has been tested only against Bird2

mod client;
pub use client::*;

mod config;
pub use config::*;

mod connection;
pub use connection::*;

mod display;
pub use display::*;

mod error;
pub use error::*;

mod message;
pub use message::*;

mod models;
pub use models::*;

pub mod order;
pub use order::{ProtocolFilter, PREFIX_ORDER};

mod status;
pub use status::*;
