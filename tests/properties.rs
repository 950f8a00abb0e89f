mod common;

use proptest::prelude::*;

use fx_journal::config::RiskPolicy;
use fx_journal::core::lot_calculator::{raw_lot_size, round2};
use fx_journal::core::{compute_trade_sizing, TradeSizingInput};
use fx_journal::models::CurrencyPairMeta;

fn pair_strategy() -> impl Strategy<Value = (CurrencyPairMeta, f64)> {
    prop_oneof![
        Just((common::usd_jpy(), 1.0)),
        (50.0f64..250.0).prop_map(|rate| (common::xau_usd(), rate)),
        (50.0f64..250.0).prop_map(|rate| (common::eur_usd_mini(), rate)),
        (50.0f64..250.0).prop_map(|rate| (common::gbp_nzd_mini(), rate)),
    ]
}

fn form(pair: CurrencyPairMeta, rate: f64, balance: f64, risk: f64, stop: f64) -> TradeSizingInput {
    TradeSizingInput::new(pair, balance, stop, rate).with_risk_percent(risk)
}

proptest! {
    #[test]
    fn valid_inputs_size_non_negative(
        (pair, rate) in pair_strategy(),
        balance in 10_000.0f64..100_000_000.0,
        risk in 0.1f64..10.0,
        stop in 1.0f64..500.0,
    ) {
        let r = compute_trade_sizing(&form(pair, rate, balance, risk, stop), &RiskPolicy::default()).unwrap();
        prop_assert!(r.lot_size >= 0.0);
        prop_assert!(r.pip_value_yen > 0.0);
    }

    #[test]
    fn risk_amount_is_exact(
        (pair, rate) in pair_strategy(),
        balance in 10_000.0f64..100_000_000.0,
        risk in 0.1f64..10.0,
        stop in 1.0f64..500.0,
    ) {
        let r = compute_trade_sizing(&form(pair, rate, balance, risk, stop), &RiskPolicy::default()).unwrap();
        prop_assert_eq!(r.risk_amount_yen, balance * risk / 100.0);
    }

    #[test]
    fn rr_is_rounded_ratio(
        (pair, rate) in pair_strategy(),
        stop in 1.0f64..500.0,
        take_profit in 1.0f64..2_000.0,
    ) {
        let input = form(pair, rate, 1_000_000.0, 2.0, stop).with_take_profit(take_profit);
        let r = compute_trade_sizing(&input, &RiskPolicy::default()).unwrap();
        prop_assert_eq!(r.risk_reward_ratio, round2(take_profit / stop));
        prop_assert_eq!(r.is_rr_ok, r.risk_reward_ratio >= 2.7);
    }

    #[test]
    fn sizing_is_deterministic(
        (pair, rate) in pair_strategy(),
        balance in 10_000.0f64..100_000_000.0,
        stop in 1.0f64..500.0,
    ) {
        let input = form(pair, rate, balance, 2.0, stop);
        let a = compute_trade_sizing(&input, &RiskPolicy::default());
        let b = compute_trade_sizing(&input, &RiskPolicy::default());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn wider_stop_means_smaller_lot(
        (pair, rate) in pair_strategy(),
        balance in 10_000.0f64..100_000_000.0,
        stop in 1.0f64..500.0,
        widen in 0.5f64..100.0,
    ) {
        let policy = RiskPolicy::default();
        let near = form(pair.clone(), rate, balance, 2.0, stop);
        let far = form(pair, rate, balance, 2.0, stop + widen);

        prop_assert!(raw_lot_size(&far, &policy).unwrap() < raw_lot_size(&near, &policy).unwrap());
        let near_lot = compute_trade_sizing(&near, &policy).unwrap().lot_size;
        let far_lot = compute_trade_sizing(&far, &policy).unwrap().lot_size;
        prop_assert!(far_lot <= near_lot);
    }

    #[test]
    fn bigger_balance_means_bigger_lot(
        (pair, rate) in pair_strategy(),
        balance in 10_000.0f64..100_000_000.0,
        extra in 1_000.0f64..10_000_000.0,
        stop in 1.0f64..500.0,
    ) {
        let policy = RiskPolicy::default();
        let small = form(pair.clone(), rate, balance, 2.0, stop);
        let big = form(pair, rate, balance + extra, 2.0, stop);

        prop_assert!(raw_lot_size(&big, &policy).unwrap() > raw_lot_size(&small, &policy).unwrap());
        let small_lot = compute_trade_sizing(&small, &policy).unwrap().lot_size;
        let big_lot = compute_trade_sizing(&big, &policy).unwrap().lot_size;
        prop_assert!(big_lot >= small_lot);
    }

    #[test]
    fn realized_risk_never_exceeds_requested(
        (pair, rate) in pair_strategy(),
        balance in 10_000.0f64..100_000_000.0,
        risk in 0.1f64..10.0,
        stop in 1.0f64..500.0,
    ) {
        let r = compute_trade_sizing(&form(pair, rate, balance, risk, stop), &RiskPolicy::default()).unwrap();
        prop_assert!(r.realized_risk_percent <= risk + 1e-6);
        prop_assert_eq!(r.is_risk_ok, r.realized_risk_percent <= 2.0 + 1e-9);
    }

    #[test]
    fn non_positive_inputs_give_none(
        (pair, rate) in pair_strategy(),
        bad in -1_000.0f64..=0.0,
    ) {
        let policy = RiskPolicy::default();

        let mut no_balance = form(pair.clone(), rate, 1_000_000.0, 2.0, 30.0);
        no_balance.account_balance = bad;
        prop_assert!(compute_trade_sizing(&no_balance, &policy).is_none());

        let no_stop = form(pair.clone(), rate, 1_000_000.0, 2.0, bad);
        prop_assert!(compute_trade_sizing(&no_stop, &policy).is_none());

        let mut no_pair = form(pair, rate, 1_000_000.0, 2.0, 30.0);
        no_pair.pair = None;
        prop_assert!(compute_trade_sizing(&no_pair, &policy).is_none());
    }
}
