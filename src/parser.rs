//! Kill accounting for a single match segment.
//!
//! Only kill lines are interpreted. Everything else, including kill lines
//! that do not fit the expected shape, is skipped without error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::game::{MatchRecord, PlayerStats};

/// Token every kill-event line carries
pub const KILL_TOKEN: &str = "Kill:";

/// Killer identifier the server uses for environmental deaths
pub const WORLD_KILLER: &str = "<world>";

const KILL_PATTERN: &str = r"Kill: \d+ \d+ \d+: (.+) killed (.+) by (.+)";

static KILL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(KILL_PATTERN).expect("failed to compile kill regex"));

/// One recognized kill line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillEvent<'a> {
    pub killer: &'a str,
    pub victim: &'a str,
    pub means: &'a str,
}

impl KillEvent<'_> {
    pub fn is_environmental(&self) -> bool {
        self.killer == WORLD_KILLER
    }

    pub fn is_self_kill(&self) -> bool {
        !self.is_environmental() && self.killer == self.victim
    }
}

/// Extract the killer, victim and cause of death from a kill line
pub fn parse_kill_line(line: &str) -> Option<KillEvent<'_>> {
    if !line.contains(KILL_TOKEN) {
        return None;
    }
    let caps = KILL_REGEX.captures(line)?;
    Some(KillEvent {
        killer: caps.get(1)?.as_str(),
        victim: caps.get(2)?.as_str(),
        means: caps.get(3)?.as_str(),
    })
}

/// Build the record for one match from its lines
pub fn parse_segment<S: AsRef<str>>(lines: &[S], game: usize) -> MatchRecord {
    let mut record = MatchRecord::new(game);
    for line in lines {
        if let Some(event) = parse_kill_line(line.as_ref()) {
            apply_kill(&mut record, &event);
        }
    }
    record
}

fn apply_kill(record: &mut MatchRecord, event: &KillEvent<'_>) {
    let victim = record
        .players
        .entry(event.victim.to_owned())
        .or_insert_with(|| PlayerStats::new(event.victim));

    // A self-kill falls through both branches: counted, but scores nothing.
    if event.is_environmental() {
        victim.kills -= 1;
    } else if event.killer != event.victim {
        record
            .players
            .entry(event.killer.to_owned())
            .or_insert_with(|| PlayerStats::new(event.killer))
            .kills += 1;
    }

    *record
        .kills_by_means
        .entry(event.means.to_owned())
        .or_insert(0) += 1;
    record.total_kills += 1;
}
