//! Caller-side mappings from raw indicators to blend signals in [0, 1].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::blend::Signals;

/// Forecast percentage change → signal. -10%..+10% maps onto 0..1,
/// clamped outside that range.
pub fn prediction_signal(pct_change: f64) -> f64 {
    ((pct_change + 10.0) / 20.0).clamp(0.0, 1.0)
}

/// Compound sentiment in [-1, 1] → signal. Not clamped: inputs outside
/// [-1, 1] produce signals outside [0, 1].
pub fn sentiment_signal(compound: f64) -> f64 {
    (compound + 1.0) / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[serde(alias = "up")]
    Uptrend,
    #[serde(alias = "down")]
    Downtrend,
    Sideways,
}

impl Trend {
    /// Discrete technical signal: up 0.7, down 0.3, sideways 0.5.
    pub fn technical_signal(&self) -> f64 {
        match self {
            Trend::Uptrend => 0.7,
            Trend::Downtrend => 0.3,
            Trend::Sideways => 0.5,
        }
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "uptrend" => Ok(Trend::Uptrend),
            "down" | "downtrend" => Ok(Trend::Downtrend),
            "sideways" | "flat" => Ok(Trend::Sideways),
            other => Err(format!(
                "unknown trend '{other}'. Valid: uptrend, downtrend, sideways"
            )),
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Uptrend => "uptrend",
            Trend::Downtrend => "downtrend",
            Trend::Sideways => "sideways",
        };
        write!(f, "{s}")
    }
}

/// Raw indicators as produced by forecasting, sentiment and trend analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSignals {
    pub forecast_pct_change: f64,
    pub sentiment_compound: f64,
    pub trend: Trend,
}

impl RawSignals {
    pub fn normalize(&self) -> Signals {
        Signals {
            prediction: prediction_signal(self.forecast_pct_change),
            technical: self.trend.technical_signal(),
            sentiment: sentiment_signal(self.sentiment_compound),
        }
    }
}
