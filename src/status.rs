//! The `show protocols all` → table pipeline.

use crate::{order, Client, NameMap, ProtocolFilter, ProtocolState, Result, StatusTable};

/// The bird command whose output we display
pub const SHOW_PROTOCOLS_ALL: &str = "show protocols all";

/// What to show, and how
#[derive(Debug, Default, Clone)]
pub struct StatusOptions {
    pub filter: ProtocolFilter,
    /// Add a column with each protocol's tags
    pub show_tags: bool,
}

/// Builds the status table from the raw text of a `show protocols all`
/// response. This is a pure function of its inputs.
pub fn status_table(raw: &str, names: &NameMap, options: &StatusOptions) -> Result<StatusTable> {
    let protocols = ProtocolState::parse_all(raw)?;
    let selected = order::select(&protocols, names, &options.filter);
    Ok(StatusTable::from_protocols(
        &selected,
        names,
        options.show_tags,
    ))
}

/// Queries bird through `client`, and builds the status table from its reply
pub async fn fetch_status_table(
    client: &Client,
    names: &NameMap,
    options: &StatusOptions,
) -> Result<StatusTable> {
    let raw = client.run_command(SHOW_PROTOCOLS_ALL).await?;
    status_table(&raw, names, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "direct1    Direct     ---        up     2022-04-14
  Channel ipv4
    Routes:         4 imported, 0 exported, 4 preferred
peer_b     BGP        ---        up     2022-04-14    Established
  BGP state:          Established
    Neighbor address: 192.0.2.2
    Neighbor AS:      64502
transit_a  BGP        ---        start  2022-04-14    Active        Socket: Connection refused
  BGP state:          Active
    Neighbor address: 192.0.2.1
    Neighbor AS:      64501
";

    #[test]
    fn test_status_table() {
        let _ = env_logger::try_init();
        let names = NameMap::from_json(r#"{"peer_b": {"name": "Peer B", "tags": ["edge"]}}"#).unwrap();
        let table = status_table(RAW, &names, &StatusOptions::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.row_values(0).unwrap(),
            vec!["direct1", "-", "-", "up", "4", "0", "2022-04-14", ""]
        );
        assert_eq!(table.row_values(1).unwrap()[0], "transit_a");
        assert_eq!(
            table.row_values(1).unwrap()[7],
            "Active        Socket: Connection refused"
        );
        assert_eq!(table.row_values(2).unwrap()[0], "Peer B");
        assert_eq!(table.row_values(2).unwrap()[1], "64502");
    }

    #[test]
    fn test_status_table_with_tags() {
        let names = NameMap::from_json(r#"{"peer_b": {"name": "Peer B", "tags": ["edge", "ix"]}}"#).unwrap();
        let options = StatusOptions {
            filter: ProtocolFilter {
                bgp_only: true,
                tags: vec!["ix".into()],
            },
            show_tags: true,
        };
        let table = status_table(RAW, &names, &options).unwrap();
        assert_eq!(table.len(), 1);
        let row = table.row_values(0).unwrap();
        assert_eq!(row.len(), 9);
        assert_eq!(row[8], "edge, ix");
    }

    #[test]
    fn test_status_table_is_repeatable() {
        let names = NameMap::default();
        let options = StatusOptions::default();
        let first = status_table(RAW, &names, &options).unwrap().to_string();
        let second = status_table(RAW, &names, &options).unwrap().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_status_table_parse_error() {
        let names = NameMap::default();
        assert!(status_table("  orphan: 1", &names, &StatusOptions::default()).is_err());
    }
}
