use serde::{Deserialize, Serialize};

use crate::config::RiskPolicy;
use crate::core::gate::{effective_take_profit_pips, GateCheck};
use crate::models::CurrencyPairMeta;

/// Absorbs representation error before flooring, so 0.29 * 100 = 28.999...
/// still lands on 29.
const LOT_FLOOR_EPSILON: f64 = 1e-9;

/// What the trade-entry form holds at any moment. Every field may still be
/// blank or half-typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSizingInput {
    /// Account balance in JPY.
    pub account_balance: f64,
    /// Percent of balance to risk. Blank uses the policy default.
    #[serde(default)]
    pub risk_percent: Option<f64>,
    pub stop_loss_pips: f64,
    /// Manual take-profit distance. Blank means auto (stop x recommended RR).
    #[serde(default)]
    pub take_profit_pips: Option<f64>,
    #[serde(default)]
    pub pair: Option<CurrencyPairMeta>,
    /// JPY value of one unit of the pair's quote currency.
    pub jpy_rate_for_quote_currency: f64,
}

impl TradeSizingInput {
    pub fn new(
        pair: CurrencyPairMeta,
        account_balance: f64,
        stop_loss_pips: f64,
        jpy_rate_for_quote_currency: f64,
    ) -> Self {
        Self {
            account_balance,
            risk_percent: None,
            stop_loss_pips,
            take_profit_pips: None,
            pair: Some(pair),
            jpy_rate_for_quote_currency,
        }
    }

    pub fn with_risk_percent(mut self, pct: f64) -> Self {
        self.risk_percent = Some(pct);
        self
    }

    pub fn with_take_profit(mut self, pips: f64) -> Self {
        self.take_profit_pips = Some(pips);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSizingResult {
    /// JPY moved by one pip on one full lot.
    pub pip_value_yen: f64,
    /// Risk percent actually applied (after defaulting).
    pub risk_percent: f64,
    pub risk_amount_yen: f64,
    /// Recommended lot, rounded down to 0.01.
    pub lot_size: f64,
    /// Take-profit distance used (manual or auto).
    pub take_profit_pips: f64,
    pub take_profit_amount_yen: f64,
    pub risk_reward_ratio: f64,
    /// Risk of the rounded lot as a percent of balance.
    pub realized_risk_percent: f64,
    pub is_risk_ok: bool,
    pub is_rr_ok: bool,
}

impl TradeSizingResult {
    pub fn gate(&self) -> GateCheck {
        GateCheck {
            rr_ok: self.is_rr_ok,
            risk_ok: self.is_risk_ok,
        }
    }

    pub fn gate_all_ok(&self) -> bool {
        self.gate().all_ok()
    }
}

/// Intermediate terms shared by the rounded and unrounded paths.
struct SizingTerms {
    stop_loss_pips: f64,
    take_profit_pips: f64,
    pip_value_yen: f64,
    risk_percent: f64,
    risk_amount_yen: f64,
    raw_lot: f64,
}

fn sizing_terms(input: &TradeSizingInput, policy: &RiskPolicy) -> Option<SizingTerms> {
    let pair = input.pair.as_ref()?;

    let balance = input.account_balance;
    if !balance.is_finite() || balance <= 0.0 {
        return None;
    }

    let stop_loss_pips = input.stop_loss_pips;
    if !stop_loss_pips.is_finite() || stop_loss_pips <= 0.0 {
        return None;
    }

    let take_profit_pips = effective_take_profit_pips(stop_loss_pips, input.take_profit_pips, policy);
    if !take_profit_pips.is_finite() || take_profit_pips <= 0.0 {
        return None;
    }

    let pip_value_yen = pip_value_yen(pair, input.jpy_rate_for_quote_currency)?;
    let risk_percent = policy.resolve_risk_percent(input.risk_percent);
    let risk_amount_yen = balance * risk_percent / 100.0;
    let raw_lot = risk_amount_yen / (stop_loss_pips * pip_value_yen);
    if !risk_amount_yen.is_finite() || !raw_lot.is_finite() {
        return None;
    }

    Some(SizingTerms {
        stop_loss_pips,
        take_profit_pips,
        pip_value_yen,
        risk_percent,
        risk_amount_yen,
        raw_lot,
    })
}

/// JPY value of one pip on one lot of `pair`. `None` when the rate is not a
/// positive number.
pub fn pip_value_yen(pair: &CurrencyPairMeta, jpy_rate: f64) -> Option<f64> {
    if !jpy_rate.is_finite() || jpy_rate <= 0.0 {
        return None;
    }
    let pip_value_quote = pair.contract_size() * pair.pip_size();
    Some(pip_value_quote * jpy_rate)
}

/// Size a trade and evaluate its gates.
///
/// Returns `None` while the form is incomplete: no pair, non-positive
/// balance or stop, non-positive effective take-profit, an unusable rate, or
/// inputs so large that an amount overflows.
/// Pure; safe to call on every keystroke.
pub fn compute_trade_sizing(input: &TradeSizingInput, policy: &RiskPolicy) -> Option<TradeSizingResult> {
    let terms = sizing_terms(input, policy)?;

    let lot_size = round_lot_down(terms.raw_lot);
    let take_profit_amount_yen = lot_size * terms.take_profit_pips * terms.pip_value_yen;
    let risk_reward_ratio = round2(terms.take_profit_pips / terms.stop_loss_pips);
    let realized_risk_percent =
        lot_size * terms.stop_loss_pips * terms.pip_value_yen / input.account_balance * 100.0;
    // serde_json writes non-finite floats as null, which would not load back
    if !lot_size.is_finite() || !take_profit_amount_yen.is_finite() || !realized_risk_percent.is_finite() {
        return None;
    }
    let gate = GateCheck::evaluate(risk_reward_ratio, realized_risk_percent, policy);

    Some(TradeSizingResult {
        pip_value_yen: terms.pip_value_yen,
        risk_percent: terms.risk_percent,
        risk_amount_yen: terms.risk_amount_yen,
        lot_size,
        take_profit_pips: terms.take_profit_pips,
        take_profit_amount_yen,
        risk_reward_ratio,
        realized_risk_percent,
        is_risk_ok: gate.risk_ok,
        is_rr_ok: gate.rr_ok,
    })
}

/// Lot size before rounding, under the same preconditions as
/// [`compute_trade_sizing`].
pub fn raw_lot_size(input: &TradeSizingInput, policy: &RiskPolicy) -> Option<f64> {
    sizing_terms(input, policy).map(|t| t.raw_lot)
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round a lot down to 0.01 so the position never risks more than asked.
pub fn round_lot_down(lot: f64) -> f64 {
    (lot * 100.0 + LOT_FLOOR_EPSILON).floor() / 100.0
}
