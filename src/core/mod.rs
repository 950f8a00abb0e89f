pub mod gate;
pub mod lot_calculator;

pub use gate::GateCheck;
pub use lot_calculator::{compute_trade_sizing, TradeSizingInput, TradeSizingResult};
