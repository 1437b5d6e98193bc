//! Parsing of `wg show` output
//!
//! `wg show` prints one attribute per line, unversioned plain text. Both
//! parsers here work line-by-line over trimmed input: one extracts active
//! interface names for machine use, the other reformats the interesting
//! lines for display.

use once_cell::sync::Lazy;
use regex::Regex;

static INTERFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^interface:\s+(.+)$").expect("invalid interface regex"));

/// Synthetic line appended when a tunnel's handshake/transfer lines have not
/// appeared yet.
pub const STARTING_LINE: &str = "Connection starting...";

/// Extract the names of active interfaces from raw `wg show` output.
///
/// Order is not significant; duplicates are passed through rather than
/// tripping the parser.
pub fn active_interfaces(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| INTERFACE_RE.captures(line.trim()))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Reformat raw `wg show` output into display lines, preserving source order.
///
/// Each fully up tunnel contributes an interface, latest-handshake and
/// transfer line, so a complete report has a multiple of three lines. When
/// the count is off, exactly one "Connection starting..." line is appended
/// to flag a tunnel whose handshake has not landed yet. This heuristic
/// cannot tell one still-starting tunnel apart from other malformed shapes
/// (several tunnels starting at once, truncated output); that limitation is
/// accepted rather than papered over, since callers display the result
/// as-is.
pub fn summary_lines(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = raw
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.contains("interface") {
                Some(format!(
                    "Connection: {}",
                    strip_label(line, "interface:")
                ))
            } else if line.contains("latest handshake") {
                Some(format!(
                    "Latest Handshake: {}",
                    strip_label(line, "latest handshake:")
                ))
            } else if line.contains("transfer") {
                Some(format!("Transfer: {}", strip_label(line, "transfer:")))
            } else {
                None
            }
        })
        .collect();

    if lines.len() % 3 != 0 {
        lines.push(STARTING_LINE.to_string());
    }

    lines
}

fn strip_label<'a>(line: &'a str, label: &str) -> &'a str {
    line.strip_prefix(label).unwrap_or(line).trim_start()
}
