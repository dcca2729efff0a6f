use std::fmt;

use serde::{Deserialize, Serialize};

use super::Topic;

/// Impact score on a 1-5 scale, where 5 means critical, immediate action required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ImpactScore(u8);

impl ImpactScore {
    pub const MIN: ImpactScore = ImpactScore(1);
    pub const MAX: ImpactScore = ImpactScore(5);
    pub const MIDPOINT: ImpactScore = ImpactScore(3);

    /// Scores at or above this are shown as high impact.
    pub const HIGH_IMPACT: ImpactScore = ImpactScore(4);

    /// Validated constructor. Out-of-range values are rejected, never clamped.
    pub fn new(value: i64) -> Option<Self> {
        (1..=5).contains(&value).then(|| ImpactScore(value as u8))
    }

    /// Raise by `steps`, saturating at [`ImpactScore::MAX`].
    pub fn raised_by(self, steps: usize) -> Self {
        let raised = (self.0 as usize).saturating_add(steps).min(Self::MAX.0 as usize);
        ImpactScore(raised as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_high_impact(self) -> bool {
        self >= Self::HIGH_IMPACT
    }
}

impl TryFrom<i64> for ImpactScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ImpactScore::new(value).ok_or_else(|| format!("impact score {} outside 1..=5", value))
    }
}

impl From<ImpactScore> for u8 {
    fn from(score: ImpactScore) -> u8 {
        score.0
    }
}

impl fmt::Display for ImpactScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scored, summarized, topic-tagged assessment of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub impact_score: ImpactScore,
    /// At most two plain-language sentences
    pub community_impact_summary: String,
    pub topic: Topic,
}

/// Which path produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoredVia {
    Model,
    Fallback,
}

impl ScoredVia {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoredVia::Model => "model",
            ScoredVia::Fallback => "fallback",
        }
    }
}

/// A classification together with the path that produced it.
///
/// Classification cannot fail: when the model path errors, the fallback
/// supplies the whole result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    pub via: ScoredVia,
    pub result: ClassificationResult,
}

impl Scored {
    pub fn model(result: ClassificationResult) -> Self {
        Self {
            via: ScoredVia::Model,
            result,
        }
    }

    pub fn fallback(result: ClassificationResult) -> Self {
        Self {
            via: ScoredVia::Fallback,
            result,
        }
    }
}

/// Keep at most the first two sentences of a summary.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or end of text.
pub fn limit_to_two_sentences(summary: &str) -> String {
    let text = summary.trim();
    let mut sentences = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                sentences += 1;
                if sentences == 2 {
                    return text[..idx + c.len_utf8()].to_string();
                }
            }
        }
    }

    text.to_string()
}
