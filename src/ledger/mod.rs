use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

/// Wire format of a record timestamp, millisecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// How a seat's round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    Win,
    Lose,
    Draw,
    Blackjack,
}

/// One seat's snapshot inside a record. Field names follow the historical
/// French file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "resultat")]
    pub outcome: RoundOutcome,
    pub score: u32,
    #[serde(rename = "solde")]
    pub balance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealerEntry {
    pub score: u32,
}

/// A settled round as persisted. Immutable once created: records are only
/// appended or imported, never rewritten. Legacy records carry no id and are
/// deduplicated by timestamp plus seat data instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub timestamp: String,
    #[serde(rename = "joueur1")]
    pub player1: PlayerEntry,
    #[serde(rename = "joueur2")]
    pub player2: PlayerEntry,
    #[serde(rename = "croupier")]
    pub dealer: DealerEntry,
}

/// Aggregated history for one player name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub blackjacks: u32,
    /// Balance of the most recent matching record in storage order, which
    /// for imported files is not necessarily chronological.
    pub last_balance: u32,
}

/// Append-only round history backed by one JSON file. Single-process only:
/// concurrent writers to the same path would overwrite each other.
#[derive(Debug)]
pub struct ScoreLedger {
    path: PathBuf,
    records: Vec<ScoreRecord>,
}

impl ScoreLedger {
    /// Load the history at `path`. A missing file starts empty; a corrupt
    /// one is logged and treated as empty rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(records) => records,
                Err(err) => {
                    warn!(
                        "score file {} is corrupt, starting with an empty history: {err}",
                        path.display()
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!("could not read score file {}: {err}", path.display());
                Vec::new()
            }
        };
        Self { path, records }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a settled round under a fresh id and the current time, then
    /// persist the whole sequence.
    pub fn add(
        &mut self,
        player1: PlayerEntry,
        player2: PlayerEntry,
        dealer_score: u32,
    ) -> Result<(), LedgerError> {
        let record = ScoreRecord {
            id: Some(fresh_record_id()),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            player1,
            player2,
            dealer: DealerEntry {
                score: dealer_score,
            },
        };
        self.records.push(record);
        self.persist()
    }

    /// Tally outcomes for every record where either seat carries `name`.
    /// Stats merge purely by name string: two physical players who shared a
    /// name share a history.
    pub fn stats(&self, name: &str) -> PlayerStats {
        let mut stats = PlayerStats {
            name: name.to_owned(),
            wins: 0,
            losses: 0,
            draws: 0,
            blackjacks: 0,
            last_balance: 0,
        };
        for record in &self.records {
            for entry in [&record.player1, &record.player2] {
                if entry.name == name {
                    match entry.outcome {
                        RoundOutcome::Win => stats.wins += 1,
                        RoundOutcome::Lose => stats.losses += 1,
                        RoundOutcome::Draw => stats.draws += 1,
                        RoundOutcome::Blackjack => stats.blackjacks += 1,
                    }
                    stats.last_balance = entry.balance;
                }
            }
        }
        stats
    }

    /// Seat balances of the chronologically-last record, used to resume a
    /// session.
    pub fn last_balances(&self) -> Option<(u32, u32)> {
        self.records
            .last()
            .map(|record| (record.player1.balance, record.player2.balance))
    }

    /// Merge an external record file into the history without duplicating.
    /// A record is a duplicate when its id is already present, or, for
    /// legacy id-less data, when timestamp and both seat snapshots match an
    /// existing record. Returns how many records were appended; a file that
    /// is not a record sequence fails without touching the ledger.
    pub fn import_from(&mut self, path: &Path) -> Result<usize, LedgerError> {
        let contents = fs::read_to_string(path)?;
        let incoming: Vec<ScoreRecord> = serde_json::from_str(&contents)?;

        let mut added = 0;
        for record in incoming {
            if self.is_duplicate(&record) {
                debug!(
                    "skipping duplicate score record {}",
                    record.id.as_deref().unwrap_or(record.timestamp.as_str())
                );
                continue;
            }
            self.records.push(record);
            added += 1;
        }
        self.persist()?;
        Ok(added)
    }

    fn is_duplicate(&self, incoming: &ScoreRecord) -> bool {
        if let Some(id) = &incoming.id {
            if self.records.iter().any(|r| r.id.as_deref() == Some(id)) {
                return true;
            }
        }
        self.records.iter().any(|r| {
            r.timestamp == incoming.timestamp
                && r.player1 == incoming.player1
                && r.player2 == incoming.player2
        })
    }

    /// Write the full current sequence to `path` verbatim.
    pub fn export_to(&self, path: &Path) -> Result<(), LedgerError> {
        write_records(path, &self.records)
    }

    /// Drop the whole history and persist the empty state.
    pub fn clear(&mut self) -> Result<(), LedgerError> {
        self.records.clear();
        self.persist()
    }

    /// Serialize to a sibling temp file and rename over the target, so an
    /// interrupted write never truncates the ledger.
    fn persist(&self) -> Result<(), LedgerError> {
        let tmp = self.path.with_extension("tmp");
        write_records(&tmp, &self.records)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn write_records(path: &Path, records: &[ScoreRecord]) -> Result<(), LedgerError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

/// First 8 hex characters of a v4 UUID, the historical record id shape.
fn fresh_record_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_owned()
}
