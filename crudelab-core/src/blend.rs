//! Weighted-sum decision score over three normalized signals.
//!
//! score = 0.40 × prediction + 0.30 × technical + 0.30 × sentiment
//!
//! The score is mapped to an action by [`DECISION_BANDS`], checked top to
//! bottom, first match wins:
//!
//! | score         | action      | risk        |
//! |---------------|-------------|-------------|
//! | ≥ 0.65        | STRONG_BUY  | MEDIUM_HIGH |
//! | [0.55, 0.65)  | BUY         | MEDIUM      |
//! | (0.45, 0.55)  | HOLD        | LOW         |
//! | (0.35, 0.45]  | SELL        | MEDIUM      |
//! | ≤ 0.35        | STRONG_SELL | HIGH        |
//!
//! Inputs are expected in [0, 1]. Under the default
//! [`InputPolicy::PassThrough`] out-of-range values are used as given, so
//! the score can leave [0, 1]; the band table still assigns an action.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::domain::RiskLevel;
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub prediction: f64,
    pub technical: f64,
    pub sentiment: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            prediction: 0.40,
            technical: 0.30,
            sentiment: 0.30,
        }
    }
}

impl BlendWeights {
    pub fn score(&self, signals: &Signals) -> f64 {
        self.prediction * signals.prediction
            + self.technical * signals.technical
            + self.sentiment * signals.sentiment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendedAction {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl fmt::Display for BlendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlendedAction::StrongBuy => "STRONG_BUY",
            BlendedAction::Buy => "BUY",
            BlendedAction::Hold => "HOLD",
            BlendedAction::Sell => "SELL",
            BlendedAction::StrongSell => "STRONG_SELL",
        };
        write!(f, "{s}")
    }
}

/// Lower edge of a decision band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LowerBound {
    /// `score >= x`
    Inclusive(f64),
    /// `score > x`
    Exclusive(f64),
    /// Catch-all.
    Unbounded,
}

impl LowerBound {
    fn admits(&self, score: f64) -> bool {
        match *self {
            LowerBound::Inclusive(x) => score >= x,
            LowerBound::Exclusive(x) => score > x,
            LowerBound::Unbounded => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionBand {
    pub lower: LowerBound,
    pub action: BlendedAction,
    pub risk: RiskLevel,
}

/// Ordered high to low. Upper edges are implied by the band above.
pub const DECISION_BANDS: [DecisionBand; 5] = [
    DecisionBand {
        lower: LowerBound::Inclusive(0.65),
        action: BlendedAction::StrongBuy,
        risk: RiskLevel::MediumHigh,
    },
    DecisionBand {
        lower: LowerBound::Inclusive(0.55),
        action: BlendedAction::Buy,
        risk: RiskLevel::Medium,
    },
    DecisionBand {
        lower: LowerBound::Exclusive(0.45),
        action: BlendedAction::Hold,
        risk: RiskLevel::Low,
    },
    DecisionBand {
        lower: LowerBound::Exclusive(0.35),
        action: BlendedAction::Sell,
        risk: RiskLevel::Medium,
    },
    DecisionBand {
        lower: LowerBound::Unbounded,
        action: BlendedAction::StrongSell,
        risk: RiskLevel::High,
    },
];

/// Band for a score. NaN falls through to the catch-all.
pub fn classify(score: f64) -> &'static DecisionBand {
    DECISION_BANDS
        .iter()
        .find(|band| band.lower.admits(score))
        .unwrap_or(&DECISION_BANDS[DECISION_BANDS.len() - 1])
}

/// The three pre-normalized inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub prediction: f64,
    pub technical: f64,
    pub sentiment: f64,
}

impl Signals {
    pub fn new(prediction: f64, technical: f64, sentiment: f64) -> Self {
        Self {
            prediction,
            technical,
            sentiment,
        }
    }

    fn named(&self) -> [(&'static str, f64); 3] {
        [
            ("prediction", self.prediction),
            ("technical", self.technical),
            ("sentiment", self.sentiment),
        ]
    }

    fn clamped(&self) -> Self {
        Self {
            prediction: self.prediction.clamp(0.0, 1.0),
            technical: self.technical.clamp(0.0, 1.0),
            sentiment: self.sentiment.clamp(0.0, 1.0),
        }
    }
}

/// What to do with signals outside [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputPolicy {
    /// Use values as given.
    #[default]
    PassThrough,
    /// Clamp each signal into [0, 1] first.
    Clamp,
    /// Fail with `SignalOutOfRange` (NaN included).
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendOutcome {
    pub score: f64,
    pub action: BlendedAction,
    pub risk: RiskLevel,
    /// Signals actually used, after the input policy.
    pub signals: Signals,
}

/// Stateless blender; weights and policy are fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalBlender {
    weights: BlendWeights,
    policy: InputPolicy,
}

impl SignalBlender {
    pub fn new(weights: BlendWeights, policy: InputPolicy) -> Self {
        Self { weights, policy }
    }

    pub fn weights(&self) -> BlendWeights {
        self.weights
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn blend(&self, signals: Signals) -> CoreResult<BlendOutcome> {
        let out_of_range = signals
            .named()
            .into_iter()
            .find(|(_, v)| !(0.0..=1.0).contains(v));

        let used = match (self.policy, out_of_range) {
            (_, None) => signals,
            (InputPolicy::PassThrough, Some((name, value))) => {
                warn!(signal = name, value, "signal outside [0, 1] used as given");
                signals
            }
            (InputPolicy::Clamp, Some(_)) => signals.clamped(),
            (InputPolicy::Reject, Some((name, value))) => {
                return Err(CoreError::SignalOutOfRange { name, value });
            }
        };

        let score = self.weights.score(&used);
        let band = classify(score);
        debug!(score, action = %band.action, "blended signals");

        Ok(BlendOutcome {
            score,
            action: band.action,
            risk: band.risk,
            signals: used,
        })
    }
}

/// Reference blend: default weights, pass-through inputs.
pub fn blend(prediction: f64, technical: f64, sentiment: f64) -> BlendOutcome {
    let signals = Signals::new(prediction, technical, sentiment);
    let score = BlendWeights::default().score(&signals);
    let band = classify(score);
    BlendOutcome {
        score,
        action: band.action,
        risk: band.risk,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(classify(0.65).action, BlendedAction::StrongBuy);
        assert_eq!(classify(0.6499).action, BlendedAction::Buy);
        assert_eq!(classify(0.55).action, BlendedAction::Buy);
        assert_eq!(classify(0.5499).action, BlendedAction::Hold);
        assert_eq!(classify(0.4501).action, BlendedAction::Hold);
        assert_eq!(classify(0.45).action, BlendedAction::Sell);
        assert_eq!(classify(0.3501).action, BlendedAction::Sell);
        assert_eq!(classify(0.35).action, BlendedAction::StrongSell);
        assert_eq!(classify(0.0).action, BlendedAction::StrongSell);
    }

    #[test]
    fn band_risk_tags() {
        assert_eq!(classify(0.9).risk, RiskLevel::MediumHigh);
        assert_eq!(classify(0.6).risk, RiskLevel::Medium);
        assert_eq!(classify(0.5).risk, RiskLevel::Low);
        assert_eq!(classify(0.4).risk, RiskLevel::Medium);
        assert_eq!(classify(0.1).risk, RiskLevel::High);
    }

    #[test]
    fn out_of_range_scores_still_classify() {
        assert_eq!(classify(1.7).action, BlendedAction::StrongBuy);
        assert_eq!(classify(-0.2).action, BlendedAction::StrongSell);
        assert_eq!(classify(f64::NAN).action, BlendedAction::StrongSell);
    }

    #[test]
    fn pass_through_keeps_out_of_range_inputs() {
        let blender = SignalBlender::default();
        let out = blender.blend(Signals::new(2.0, 0.5, 0.5)).unwrap();
        assert!((out.score - 1.1).abs() < 1e-12);
        assert_eq!(out.action, BlendedAction::StrongBuy);
        assert_eq!(out.signals.prediction, 2.0);
    }

    #[test]
    fn clamp_policy_clamps_before_scoring() {
        let blender = SignalBlender::new(BlendWeights::default(), InputPolicy::Clamp);
        let out = blender.blend(Signals::new(2.0, 0.5, -1.0)).unwrap();
        assert_eq!(out.signals, Signals::new(1.0, 0.5, 0.0));
        assert!((out.score - 0.55).abs() < 1e-12);
    }

    #[test]
    fn reject_policy_names_the_offending_signal() {
        let blender = SignalBlender::new(BlendWeights::default(), InputPolicy::Reject);
        let err = blender.blend(Signals::new(0.5, 1.2, 0.5)).unwrap_err();
        assert_eq!(
            err,
            CoreError::SignalOutOfRange {
                name: "technical",
                value: 1.2
            }
        );
        assert!(blender.blend(Signals::new(0.5, f64::NAN, 0.5)).is_err());
    }

    #[test]
    fn policies_agree_for_in_range_inputs() {
        let signals = Signals::new(0.3, 0.7, 0.45);
        let outcomes: Vec<_> = [InputPolicy::PassThrough, InputPolicy::Clamp, InputPolicy::Reject]
            .into_iter()
            .map(|p| SignalBlender::new(BlendWeights::default(), p).blend(signals).unwrap())
            .collect();
        assert_eq!(outcomes[0], outcomes[1]);
        assert_eq!(outcomes[1], outcomes[2]);
    }

    #[test]
    fn custom_weights() {
        let weights = BlendWeights {
            prediction: 1.0,
            technical: 0.0,
            sentiment: 0.0,
        };
        let out = SignalBlender::new(weights, InputPolicy::PassThrough)
            .blend(Signals::new(0.2, 1.0, 1.0))
            .unwrap();
        assert_eq!(out.action, BlendedAction::StrongSell);
    }
}
