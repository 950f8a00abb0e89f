use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::RiskPolicy;
use crate::core::lot_calculator::TradeSizingInput;
use crate::journal::entry::{EntryDecision, JournalEntry, JournalError, Reflection};

/// All entries of one member, persisted as a single JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub next_id: u64,
    pub entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing file is an empty journal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No journal at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read journal {}", path.display()))?;
        let journal: Journal = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse journal {}", path.display()))?;
        info!("Loaded {} journal entries from {}", journal.entries.len(), path.display());
        Ok(journal)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write journal {}", path.display()))?;
        debug!("Saved {} journal entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Size `input`, freeze it into a new entry and append it.
    pub fn submit(
        &mut self,
        hypothesis: &str,
        input: TradeSizingInput,
        policy: &RiskPolicy,
        now: DateTime<Utc>,
    ) -> Result<&JournalEntry, JournalError> {
        let id = self.next_id + 1;
        let entry = JournalEntry::submit(id, hypothesis, input, policy, now)?;
        self.next_id = id;

        info!(
            "Journal entry #{} {} lot {:.2} RR {:.2} -> {}",
            entry.id, entry.symbol, entry.sizing.lot_size, entry.sizing.risk_reward_ratio, entry.decision
        );

        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn get(&self, id: u64) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn reflect(
        &mut self,
        id: u64,
        result_pips: f64,
        note: &str,
        now: DateTime<Utc>,
    ) -> Result<&Reflection, JournalError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(JournalError::NotFound(id))?;
        entry.reflect(result_pips, note, now)
    }

    /// Entries still waiting for a post-trade reflection.
    pub fn open_entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(|e| e.is_open())
    }

    pub fn count_by_decision(&self, decision: EntryDecision) -> usize {
        self.entries.iter().filter(|e| e.decision == decision).count()
    }
}
