use serde::{Deserialize, Serialize};

use crate::config::RiskPolicy;

/// Slack for float comparisons against policy thresholds.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Result of the two pre-trade gates. Both must pass before an entry is
/// logged as valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCheck {
    pub rr_ok: bool,
    pub risk_ok: bool,
}

impl GateCheck {
    pub fn evaluate(risk_reward_ratio: f64, realized_risk_percent: f64, policy: &RiskPolicy) -> Self {
        Self {
            rr_ok: is_rr_ok(risk_reward_ratio, policy),
            risk_ok: is_risk_ok(realized_risk_percent, policy),
        }
    }

    pub fn all_ok(&self) -> bool {
        self.rr_ok && self.risk_ok
    }
}

pub fn is_rr_ok(risk_reward_ratio: f64, policy: &RiskPolicy) -> bool {
    risk_reward_ratio >= policy.min_acceptable_rr
}

pub fn is_risk_ok(realized_risk_percent: f64, policy: &RiskPolicy) -> bool {
    realized_risk_percent <= policy.max_risk_percent + THRESHOLD_EPSILON
}

/// Take-profit distance suggested when the member has not typed one:
/// `stop_loss_pips * recommended_rr`, rounded to 0.1 pip.
pub fn auto_take_profit_pips(stop_loss_pips: f64, policy: &RiskPolicy) -> f64 {
    round1(stop_loss_pips * policy.recommended_rr)
}

/// Take-profit distance that sizing runs with. A blank or non-positive
/// manual value counts as "not overridden".
pub fn effective_take_profit_pips(
    stop_loss_pips: f64,
    manual: Option<f64>,
    policy: &RiskPolicy,
) -> f64 {
    match manual {
        Some(tp) if tp.is_finite() && tp > 0.0 => tp,
        _ => auto_take_profit_pips(stop_loss_pips, policy),
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
