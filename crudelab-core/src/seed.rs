//! Built-in reference tables: seven crude-oil market situations observed in
//! 2023 and the six actions they map to.
//!
//! Feature layout: [price_trend, volatility, sentiment, demand, inventories,
//! geopolitical_risk], each normalized to [0, 1].

use chrono::NaiveDate;

use crate::domain::{ActionDescriptor, Aggressiveness, HistoricalSituation, RiskLevel};

pub const STRONG_BUY: &str = "COMPRAR_FUERTE";
pub const MODERATE_BUY: &str = "COMPRAR_MODERADO";
pub const HOLD: &str = "MANTENER";
pub const MODERATE_SELL: &str = "VENDER_MODERADO";
pub const STRONG_SELL: &str = "VENDER_FUERTE";
pub const HEDGE: &str = "COBERTURA";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Literal dates below are all valid.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn builtin_situations() -> Vec<HistoricalSituation> {
    vec![
        HistoricalSituation::new(
            "USUARIO_01_MercadoConMiedo",
            [0.30, 0.85, 0.15, 0.40, 0.95, 0.80],
            "Fearful market on geopolitical crisis",
            "Middle East conflict, high inventories, weak demand",
            date(2023, 10, 15),
            STRONG_SELL,
        ),
        HistoricalSituation::new(
            "USUARIO_02_MercadoOptimista",
            [0.75, 0.30, 0.85, 0.80, 0.35, 0.20],
            "Optimistic market with strong demand",
            "Chinese economic recovery, low inventories",
            date(2023, 3, 20),
            STRONG_BUY,
        ),
        HistoricalSituation::new(
            "USUARIO_03_VolatilidadAlta",
            [0.50, 0.95, 0.40, 0.60, 0.50, 0.75],
            "High volatility on OPEC uncertainty",
            "OPEC+ production decision imminent",
            date(2023, 6, 1),
            HOLD,
        ),
        HistoricalSituation::new(
            "USUARIO_04_RecorteOPEP",
            [0.85, 0.55, 0.90, 0.75, 0.25, 0.30],
            "OPEC+ announces production cut",
            "2M barrels/day cut, bullish market",
            date(2023, 4, 5),
            STRONG_BUY,
        ),
        HistoricalSituation::new(
            "USUARIO_05_CrisisRecesion",
            [0.20, 0.70, 0.10, 0.25, 0.90, 0.60],
            "Global recession fears cut demand",
            "Fed raising rates, negative growth forecasts",
            date(2023, 7, 12),
            MODERATE_SELL,
        ),
        HistoricalSituation::new(
            "USUARIO_06_AltaDemandaVerano",
            [0.80, 0.40, 0.70, 0.90, 0.30, 0.25],
            "Peak seasonal demand (US summer)",
            "Driving season, inventories at seasonal lows",
            date(2023, 6, 15),
            MODERATE_BUY,
        ),
        HistoricalSituation::new(
            "USUARIO_07_ColapsoPrecio",
            [0.10, 0.90, 0.05, 0.20, 0.95, 0.85],
            "Price collapse on oversupply",
            "US shale output at record highs, weak demand",
            date(2023, 11, 8),
            HEDGE,
        ),
    ]
}

pub fn builtin_actions() -> Vec<ActionDescriptor> {
    vec![
        ActionDescriptor::new(
            STRONG_BUY,
            "BUY CRUDE",
            Aggressiveness::Aggressive,
            "Buy futures contracts, increase exposure",
            RiskLevel::MediumHigh,
            "3-6 months",
        ),
        ActionDescriptor::new(
            MODERATE_BUY,
            "BUY CRUDE",
            Aggressiveness::Moderate,
            "Buy gradually, take advantage of dips",
            RiskLevel::Medium,
            "1-3 months",
        ),
        ActionDescriptor::new(
            HOLD,
            "HOLD POSITION",
            Aggressiveness::Neutral,
            "Take no action, wait for clearer signals",
            RiskLevel::Low,
            "2-4 weeks",
        ),
        ActionDescriptor::new(
            MODERATE_SELL,
            "SELL CRUDE",
            Aggressiveness::Moderate,
            "Reduce positions gradually, take profits",
            RiskLevel::Medium,
            "1-2 months",
        ),
        ActionDescriptor::new(
            STRONG_SELL,
            "SELL CRUDE",
            Aggressiveness::Aggressive,
            "Close positions quickly, protect capital",
            RiskLevel::High,
            "2-3 weeks",
        ),
        ActionDescriptor::new(
            HEDGE,
            "HEDGE RISK",
            Aggressiveness::Defensive,
            "Hedge with options, protect the portfolio",
            RiskLevel::Low,
            "1-6 months",
        ),
    ]
}
