use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Asia::Tokyo;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::RiskPolicy;
use crate::core::lot_calculator::{compute_trade_sizing, round2, TradeSizingInput, TradeSizingResult};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JournalError {
    #[error("trade form is incomplete, nothing to size")]
    IncompleteInput,
    #[error("entry {0} already has a reflection")]
    AlreadyReflected(u64),
    #[error("entry {0} not found")]
    NotFound(u64),
    #[error("result pips must be a finite number, got {0}")]
    InvalidResult(f64),
}

/// Outcome of the pre-trade gates at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDecision {
    /// Both gates passed; the trade may be taken.
    Valid,
    /// A gate failed; the member logs the idea but skips the trade.
    Skip,
}

impl EntryDecision {
    pub fn from_gate(all_ok: bool) -> Self {
        if all_ok {
            EntryDecision::Valid
        } else {
            EntryDecision::Skip
        }
    }
}

impl fmt::Display for EntryDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryDecision::Valid => write!(f, "valid"),
            EntryDecision::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    /// Signed pips captured; negative for a loss.
    pub result_pips: f64,
    pub pnl_yen: f64,
    /// Result in units of the planned stop distance.
    pub r_multiple: f64,
    #[serde(default)]
    pub note: String,
    pub reflected_at: DateTime<Utc>,
}

/// A journal row: the hypothesis plus a frozen copy of the sizing the form
/// showed when the member pressed submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub symbol: String,
    #[serde(default)]
    pub hypothesis: String,
    pub created_at: DateTime<Utc>,
    /// Calendar date in Tokyo, the member's trading day.
    pub trade_date: NaiveDate,
    pub input: TradeSizingInput,
    pub policy: RiskPolicy,
    pub sizing: TradeSizingResult,
    pub decision: EntryDecision,
    #[serde(default)]
    pub reflection: Option<Reflection>,
}

impl JournalEntry {
    pub fn submit(
        id: u64,
        hypothesis: &str,
        input: TradeSizingInput,
        policy: &RiskPolicy,
        now: DateTime<Utc>,
    ) -> Result<Self, JournalError> {
        let sizing = compute_trade_sizing(&input, policy).ok_or(JournalError::IncompleteInput)?;
        let symbol = input
            .pair
            .as_ref()
            .map(|p| p.symbol().to_string())
            .ok_or(JournalError::IncompleteInput)?;
        let decision = EntryDecision::from_gate(sizing.gate_all_ok());

        Ok(Self {
            id,
            symbol,
            hypothesis: hypothesis.trim().to_string(),
            created_at: now,
            trade_date: now.with_timezone(&Tokyo).date_naive(),
            input,
            policy: *policy,
            sizing,
            decision,
            reflection: None,
        })
    }

    /// Record the post-trade outcome. Allowed once per entry; skipped
    /// entries can be reflected as paper results.
    pub fn reflect(
        &mut self,
        result_pips: f64,
        note: &str,
        now: DateTime<Utc>,
    ) -> Result<&Reflection, JournalError> {
        if self.reflection.is_some() {
            return Err(JournalError::AlreadyReflected(self.id));
        }
        if !result_pips.is_finite() {
            return Err(JournalError::InvalidResult(result_pips));
        }

        let pnl_yen = round2(self.sizing.lot_size * result_pips * self.sizing.pip_value_yen);
        if !pnl_yen.is_finite() {
            return Err(JournalError::InvalidResult(result_pips));
        }
        let r_multiple = round2(result_pips / self.input.stop_loss_pips);

        Ok(&*self.reflection.insert(Reflection {
            result_pips,
            pnl_yen,
            r_multiple,
            note: note.trim().to_string(),
            reflected_at: now,
        }))
    }

    pub fn is_open(&self) -> bool {
        self.reflection.is_none()
    }
}
