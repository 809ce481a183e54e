//! Parsers for the per-process pseudo-file formats.
//!
//! All parsers are pure functions over already-read content so they can be
//! exercised without a live process table. Malformed input yields `None` (or
//! an empty/zero value for optional fields), never a panic.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Coarse run-state of a process as reported in `/proc/<pid>/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Running,
    Sleeping,
    DiskSleep,
    Zombie,
    Stopped,
    TracingStop,
    Dead,
    Wakekill,
    Waking,
    Parked,
    Idle,
}

impl RunState {
    /// Decodes a single state code. Unknown codes are rejected.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'R' => Some(Self::Running),
            'S' => Some(Self::Sleeping),
            'D' => Some(Self::DiskSleep),
            'Z' => Some(Self::Zombie),
            'T' => Some(Self::Stopped),
            't' => Some(Self::TracingStop),
            'X' | 'x' => Some(Self::Dead),
            'K' => Some(Self::Wakekill),
            'W' => Some(Self::Waking),
            'P' => Some(Self::Parked),
            'I' => Some(Self::Idle),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Running => 'R',
            Self::Sleeping => 'S',
            Self::DiskSleep => 'D',
            Self::Zombie => 'Z',
            Self::Stopped => 'T',
            Self::TracingStop => 't',
            Self::Dead => 'X',
            Self::Wakekill => 'K',
            Self::Waking => 'W',
            Self::Parked => 'P',
            Self::Idle => 'I',
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for RunState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.code())
    }
}

/// How the base load address is picked from `/proc/<pid>/maps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseAddressPolicy {
    /// First mapping backed by the executable itself at file offset 0.
    #[default]
    ExecutableMapping,
    /// Start of the very first mapping, whatever backs it. Wrong whenever a
    /// library or anonymous region is mapped below the executable.
    FirstMapping,
}

/// Returns the part of a stat line after the last `)`.
///
/// The command name inside the parentheses is chosen by the process and may
/// itself contain `)` or spaces, so only the last closing parenthesis is a
/// reliable delimiter.
fn after_comm(stat: &str) -> Option<&str> {
    let close = stat.rfind(')')?;
    Some(&stat[close + 1..])
}

/// Extracts the run-state code following the command name.
pub fn parse_state(stat: &str) -> Option<RunState> {
    let code = after_comm(stat)?.trim_start().chars().next()?;
    RunState::from_code(code)
}

/// Extracts the parent PID, the field right after the state code.
pub fn parse_ppid(stat: &str) -> Option<u32> {
    let mut fields = after_comm(stat)?.split_whitespace();
    fields.next()?;
    fields.next()?.parse().ok()
}

/// Extracts the command name between the first `(` and the last `)`.
pub fn parse_stat_name(stat: &str) -> Option<&str> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    if close <= open {
        return None;
    }
    Some(&stat[open + 1..close])
}

/// Splits off the next whitespace-delimited token, returning it and the rest.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

/// One line of `/proc/<pid>/maps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsEntry<'a> {
    pub start: u64,
    pub offset: u64,
    pub path: &'a str,
}

/// Parses a single maps line: `<start>-<end> <perms> <offset> <dev> <inode> [<path>]`.
/// The path may contain spaces and is everything after the inode field.
pub fn parse_maps_line(line: &str) -> Option<MapsEntry<'_>> {
    let (range, rest) = next_token(line)?;
    let (_perms, rest) = next_token(rest)?;
    let (offset, rest) = next_token(rest)?;
    let (_dev, rest) = next_token(rest)?;
    let (_inode, rest) = next_token(rest)?;

    let start = range.split('-').next()?;
    Some(MapsEntry {
        start: u64::from_str_radix(start, 16).ok()?,
        offset: u64::from_str_radix(offset, 16).ok()?,
        path: rest.trim(),
    })
}

/// Resolves the base load address from maps content. Returns 0 when unknown.
pub fn parse_base_address(maps: &str, exe: &str, policy: BaseAddressPolicy) -> u64 {
    let mut entries = maps.lines().filter_map(parse_maps_line);
    let found = match policy {
        BaseAddressPolicy::FirstMapping => entries.next(),
        BaseAddressPolicy::ExecutableMapping => {
            if exe.is_empty() {
                return 0;
            }
            entries.find(|e| e.offset == 0 && e.path == exe)
        }
    };
    found.map(|e| e.start).unwrap_or(0)
}

/// Splits a NUL-separated argument buffer. Spaces inside an argument are
/// preserved; a trailing terminator does not produce an extra empty field.
pub fn parse_cmdline(buf: &[u8]) -> Vec<String> {
    let buf = buf.strip_suffix(&[0u8]).unwrap_or(buf);
    if buf.is_empty() {
        return Vec::new();
    }
    buf.split(|&b| b == 0u8)
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect()
}

/// First line of `/proc/<pid>/comm`.
pub fn parse_display_name(buf: &[u8]) -> String {
    let first = buf.split(|&b| b == b'\n').next().unwrap_or_default();
    String::from_utf8_lossy(first).into_owned()
}
