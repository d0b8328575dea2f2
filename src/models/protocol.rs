//! Module for bird protocol objects

use chrono::NaiveTime;

use crate::{Error, Result};

/// The state of one of the BIRD protocol instances, as reported by
/// `show protocols all`. Note that this isn't the same as, say BGP, or OSPF.
/// That is represented by the field [ProtocolState::proto]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolState {
    /// Name of this protocol instance
    pub name: String,
    /// The underlying protocol, e.g. BGP, BFD, Kernel etc.
    pub proto: String,
    /// State - up, down, start etc.
    pub state: String,
    /// Last state change, exactly as bird printed it
    pub since: String,
    /// Additional status info, e.g. in case of BGP, this could be `Established`,
    /// `Active Socket: Connection refused` etc. Empty if bird printed nothing.
    pub info: String,
    /// Route counts, summed over all channels
    pub routes: RouteCounts,
    /// Neighbor details, present if and only if this is a BGP session
    pub bgp: Option<BgpNeighbor>,
}

/// Imported and exported route counts. `None` means bird didn't report
/// any count for this protocol.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouteCounts {
    pub imported: Option<u32>,
    pub exported: Option<u32>,
}

/// The remote end of a BGP session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpNeighbor {
    /// It's a specific IP address, possibly suffixed with `%<interface>`, or
    /// an address range when BGP is configured in passive mode
    pub neighbor_address: String,
    pub neighbor_as: u32,
}

impl ProtocolState {
    /// Returns true if this protocol is a BGP session
    #[inline]
    pub fn is_bgp(&self) -> bool {
        self.bgp.is_some()
    }

    /// Parses the text of a `show protocols all` response, with the reply codes
    /// already stripped, into one [ProtocolState] per protocol, in the order
    /// bird reported them.
    ///
    /// Each protocol starts with a non-indented header line
    /// (`name proto table state since [info]`), and is followed by indented
    /// `key: value` detail lines. Unknown detail lines are skipped.
    ///
    /// Details [here](https://gitlab.nic.cz/labs/bird/-/blob/master/nest/proto.c)
    pub fn parse_all(content: &str) -> Result<Vec<ProtocolState>> {
        let mut result = vec![];
        let mut block: Option<Block> = None;
        for (idx, line) in content.lines().enumerate() {
            let lineno = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            if indent_level(line) > 0 {
                match block.as_mut() {
                    Some(b) => b.add_detail(lineno, line)?,
                    None => {
                        return Err(Error::parse(
                            lineno,
                            "detail line before any protocol header",
                        ))
                    }
                }
            } else if let Some(header) = Block::from_header(lineno, line)? {
                if let Some(prev) = block.replace(header) {
                    result.push(prev.finish()?);
                }
            }
        }
        if let Some(last) = block {
            result.push(last.finish()?);
        }
        log::debug!("parsed {} protocols", result.len());
        Ok(result)
    }
}

/// A protocol block that's still being parsed
#[derive(Debug)]
struct Block {
    lineno: usize,
    name: String,
    proto: String,
    state: String,
    since: String,
    info: String,
    routes: RouteCounts,
    neighbor_address: Option<String>,
    neighbor_as: Option<u32>,
}

impl Block {
    /// Starts a block from its header line. Returns `None` for bird's own
    /// column title line.
    fn from_header(lineno: usize, line: &str) -> Result<Option<Block>> {
        let mut fields = [""; 5];
        let mut rest = line;
        for field in fields.iter_mut() {
            match next_field(rest) {
                Some((f, r)) => {
                    *field = f;
                    rest = r;
                }
                None => {
                    return Err(Error::parse(
                        lineno,
                        format!("expected at least 5 fields in protocol header {:?}", line),
                    ))
                }
            }
        }
        let [name, proto, _table, state, since] = fields;
        if name == "Name" && proto == "Proto" {
            log::trace!("skipping column titles at line {}", lineno);
            return Ok(None);
        }

        // since can be a date followed by a time
        let mut since = since.to_owned();
        if let Some((time, r)) = next_field(rest) {
            if is_time(time) {
                since.push(' ');
                since.push_str(time);
                rest = r;
            }
        }

        Ok(Some(Block {
            lineno,
            name: name.to_owned(),
            proto: proto.to_owned(),
            state: state.to_owned(),
            since,
            info: rest.trim().to_owned(),
            routes: RouteCounts::default(),
            neighbor_address: None,
            neighbor_as: None,
        }))
    }

    #[inline]
    fn is_bgp(&self) -> bool {
        self.proto.eq_ignore_ascii_case("BGP")
    }

    fn add_detail(&mut self, lineno: usize, line: &str) -> Result<()> {
        let (key, val) = if let Some(pos) = line.find(':') {
            (line[..pos].trim(), line[(pos + 1)..].trim())
        } else {
            return Ok(());
        };
        match key {
            "Routes" => self.add_routes(lineno, val)?,
            "Neighbor address" | "Neighbor range" if self.is_bgp() => {
                self.neighbor_address = Some(val.to_owned())
            }
            "Neighbor AS" if self.is_bgp() => {
                self.neighbor_as = Some(parse_number(lineno, "Neighbor AS", val)?)
            }
            _ => {}
        }
        Ok(())
    }

    /// Adds up a `Routes:` line, e.g. `1 imported, 0 filtered, 10 exported, 1 preferred`
    fn add_routes(&mut self, lineno: usize, val: &str) -> Result<()> {
        for pair in val.split(',') {
            let pair = pair.trim();
            if let Some(u) = pair.strip_suffix("imported") {
                let n = parse_number(lineno, "imported routes", u.trim())?;
                self.routes.imported = Some(self.routes.imported.unwrap_or(0).saturating_add(n));
            } else if let Some(u) = pair.strip_suffix("exported") {
                let n = parse_number(lineno, "exported routes", u.trim())?;
                self.routes.exported = Some(self.routes.exported.unwrap_or(0).saturating_add(n));
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<ProtocolState> {
        let bgp = if self.is_bgp() {
            match (self.neighbor_address, self.neighbor_as) {
                (Some(neighbor_address), Some(neighbor_as)) => Some(BgpNeighbor {
                    neighbor_address,
                    neighbor_as,
                }),
                (None, _) => {
                    return Err(Error::parse(
                        self.lineno,
                        format!("BGP protocol {} has no Neighbor address", self.name),
                    ))
                }
                (_, None) => {
                    return Err(Error::parse(
                        self.lineno,
                        format!("BGP protocol {} has no Neighbor AS", self.name),
                    ))
                }
            }
        } else {
            None
        };
        Ok(ProtocolState {
            name: self.name,
            proto: self.proto,
            state: self.state,
            since: self.since,
            info: self.info,
            routes: self.routes,
            bgp,
        })
    }
}

/// Splits off the next whitespace separated field of `s`, returning it along
/// with whatever follows it
#[inline]
fn next_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(|c: char| c.is_ascii_whitespace()).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// Returns true for wall clock times like `11:22:33` or `22:23:28.096`
#[inline]
fn is_time(s: &str) -> bool {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok()
}

#[inline]
fn parse_number(lineno: usize, what: &str, val: &str) -> Result<u32> {
    val.parse()
        .map_err(|_| Error::parse(lineno, format!("invalid {} {:?}", what, val)))
}

/// Simple function to get the indent level of a line
#[inline]
fn indent_level(line: &str) -> usize {
    line.find(|c: char| !c.is_ascii_whitespace()).unwrap_or(0)
}
