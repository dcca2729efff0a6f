//! Keyword fallback classifier.
//!
//! Used whenever the model path cannot produce a valid assessment. The result
//! depends only on the text and the fixed tables below.

use crate::domains::events::models::{ClassificationResult, ImpactScore, Topic};

/// One row of the topic table. Rows are checked in order; the first hit wins.
struct TopicRule {
    topic: Topic,
    keywords: &'static [&'static str],
    base_score: u8,
    summary: &'static str,
}

const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: Topic::ZoningHousing,
        keywords: &["zoning", "housing", "land use", "development", "affordable", "tenant", "rent"],
        base_score: 4,
        summary: "This hearing covers zoning and housing development that could affect rents, building permits and neighborhood character. Residents near proposed projects should pay attention.",
    },
    TopicRule {
        topic: Topic::BudgetFinance,
        keywords: &["budget", "appropriation", "tax", "finance", "funding"],
        base_score: 4,
        summary: "Budget decisions made here directly affect funding for schools, parks, sanitation and other essential services in your neighborhood.",
    },
    TopicRule {
        topic: Topic::Education,
        keywords: &["school", "education", "student"],
        base_score: 4,
        summary: "This meeting addresses school policies, funding and programs that affect students and families across NYC public schools.",
    },
    TopicRule {
        topic: Topic::PublicSafety,
        keywords: &["police", "safety", "fire", "emergency"],
        base_score: 3,
        summary: "Public safety policies discussed here may change how police and emergency services operate in your neighborhood.",
    },
    TopicRule {
        topic: Topic::Transportation,
        keywords: &["transit", "transportation", "mta", "traffic", "bus", "subway"],
        base_score: 3,
        summary: "Transportation decisions here could affect subway service, bus routes, bike lanes and street safety in your area.",
    },
    TopicRule {
        topic: Topic::HealthSocialServices,
        keywords: &[
            "health",
            "hospital",
            "social service",
            "mental health",
            "disabilities",
            "addiction",
        ],
        base_score: 4,
        summary: "This committee discusses healthcare access, mental health services and social programs that support vulnerable New Yorkers.",
    },
    TopicRule {
        topic: Topic::Environment,
        keywords: &["environment", "environmental", "climate", "sanitation", "pollution", "resiliency"],
        base_score: 3,
        summary: "Environmental decisions here can shape air quality, waste collection and flood protection in your neighborhood.",
    },
    TopicRule {
        topic: Topic::LegislationPolicy,
        keywords: &["immigration", "immigrant"],
        base_score: 4,
        summary: "Immigration policy decisions here affect services, protections and resources available to immigrant communities across NYC.",
    },
    TopicRule {
        topic: Topic::LegislationPolicy,
        keywords: &["park", "recreation"],
        base_score: 3,
        summary: "Parks decisions here affect green space upkeep, recreation programs and public facilities in your neighborhood.",
    },
    TopicRule {
        topic: Topic::LegislationPolicy,
        keywords: &["veteran"],
        base_score: 3,
        summary: "This meeting addresses services, benefits and support programs for the city's veteran community.",
    },
];

const DEFAULT_SUMMARY: &str =
    "This council meeting will discuss citywide policies that may affect NYC residents.";

/// Words that signal higher stakes. Each distinct word found adds one point.
const URGENCY_WORDS: &[&str] = &[
    "crucial",
    "critical",
    "urgent",
    "eliminate",
    "cut",
    "vulnerable",
    "eviction",
    "displacement",
    "closure",
    "layoff",
];

/// Classify an event from its text alone.
pub fn fallback_classification(title: &str, description: &str) -> ClassificationResult {
    let words = tokenize(&format!("{} {}", title, description));

    let rule = TOPIC_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| contains_phrase(&words, k)));

    let (topic, base, summary) = match rule {
        Some(rule) => (
            rule.topic,
            ImpactScore::new(rule.base_score as i64).unwrap_or(ImpactScore::MIDPOINT),
            rule.summary,
        ),
        None => (Topic::Other, ImpactScore::MIDPOINT, DEFAULT_SUMMARY),
    };

    let urgency = URGENCY_WORDS
        .iter()
        .filter(|w| contains_phrase(&words, w))
        .count();

    ClassificationResult {
        impact_score: base.raised_by(urgency),
        community_impact_summary: summary.to_string(),
        topic,
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whole-word match of a (possibly multi-word) phrase. The last word may carry a plural "s".
fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let parts: Vec<&str> = phrase.split_whitespace().collect();
    let Some((last, leading)) = parts.split_last() else {
        return false;
    };

    words.windows(parts.len()).any(|window| {
        let (window_last, window_leading) = match window.split_last() {
            Some(split) => split,
            None => return false,
        };
        let leading_match = leading
            .iter()
            .zip(window_leading)
            .all(|(want, got)| got == want);
        let last_match = window_last == last
            || window_last
                .strip_suffix('s')
                .is_some_and(|stem| stem == *last);

        leading_match && last_match
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_safety_with_vulnerable_is_high_impact() {
        let result = fallback_classification(
            "Committee on Public Safety",
            "Oversight hearing on services for vulnerable residents",
        );

        assert_eq!(result.topic, Topic::PublicSafety);
        assert_eq!(result.impact_score.value(), 4);
        assert!(result.impact_score.is_high_impact());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // housing row comes before budget row
        let result = fallback_classification("Budget hearing on affordable housing", "");
        assert_eq!(result.topic, Topic::ZoningHousing);
    }

    #[test]
    fn test_no_keyword_is_other_at_midpoint() {
        let result = fallback_classification("Stated Meeting", "");
        assert_eq!(result.topic, Topic::Other);
        assert_eq!(result.impact_score, ImpactScore::MIDPOINT);
        assert!(!result.community_impact_summary.is_empty());
    }

    #[test]
    fn test_whole_word_matching() {
        // "taxi" must not match "tax", "firefighters" must not match "fire"
        let result = fallback_classification("Taxi medallion review", "firefighters present");
        assert_eq!(result.topic, Topic::Other);

        let result = fallback_classification("Committee on Parks", "");
        assert_eq!(result.topic, Topic::LegislationPolicy);

        let result = fallback_classification("Committee on Veterans", "");
        assert_eq!(result.topic, Topic::LegislationPolicy);
    }

    #[test]
    fn test_multi_word_keywords() {
        let result = fallback_classification("Subcommittee on Land Use", "");
        assert_eq!(result.topic, Topic::ZoningHousing);

        let result = fallback_classification("General Welfare", "expanding social services");
        assert_eq!(result.topic, Topic::HealthSocialServices);
    }

    #[test]
    fn test_urgency_words_count_once_and_cap() {
        let once = fallback_classification("Committee on Transportation", "cut cut cut");
        assert_eq!(once.impact_score.value(), 4);

        let many = fallback_classification(
            "Committee on Education",
            "Crucial vote to eliminate programs; cuts hit vulnerable students",
        );
        assert_eq!(many.impact_score, ImpactScore::MAX);
    }

    #[test]
    fn test_deterministic() {
        let a = fallback_classification("Committee on Housing", "eviction protections");
        let b = fallback_classification("Committee on Housing", "eviction protections");
        assert_eq!(a, b);
    }
}
