// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator computations over daily OHLCV series.
// Every column-producing function returns a vector *aligned to the input
// bars*: one slot per bar, `None` wherever the rolling window has not yet
// accumulated enough history. Callers are forced to handle insufficient-data
// and numerical-edge-case scenarios explicitly.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod stoch_rsi;
pub mod support_resistance;
