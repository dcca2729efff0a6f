//! Impact classification: model first, keyword fallback on any failure.

use std::time::Duration;

use openai_client::{strip_code_blocks, OpenAIError, StructuredOutput};
use schemars::JsonSchema;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::fallback::fallback_classification;
use crate::domains::events::models::{
    limit_to_two_sentences, ClassificationResult, ImpactScore, Scored, Topic,
};
use crate::kernel::ServerDeps;

const SYSTEM_PROMPT: &str = "You are a community advocate for underserved New York City \
neighborhoods. You read raw government meeting records, judge their direct human impact, and \
write short plain-language summaries for the public. Answer only in the requested JSON format.";

/// Why the model path did not produce a result.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no model configured")]
    NotConfigured,

    #[error("model did not answer within {0:?}")]
    Timeout(Duration),

    #[error("model rate limited: {0}")]
    RateLimited(String),

    #[error("model call failed: {0}")]
    Upstream(String),

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

impl ClassifyError {
    /// Short label for log fields
    pub fn reason(&self) -> &'static str {
        match self {
            ClassifyError::NotConfigured => "not_configured",
            ClassifyError::Timeout(_) => "timeout",
            ClassifyError::RateLimited(_) => "rate_limited",
            ClassifyError::Upstream(_) => "upstream",
            ClassifyError::InvalidResponse(_) => "invalid_response",
        }
    }

    fn from_model_error(error: anyhow::Error) -> Self {
        match error.downcast_ref::<OpenAIError>() {
            Some(e) if e.is_rate_limited() => ClassifyError::RateLimited(e.to_string()),
            Some(OpenAIError::Timeout(after)) => ClassifyError::Timeout(*after),
            Some(OpenAIError::Parse(message)) => ClassifyError::InvalidResponse(message.clone()),
            _ => ClassifyError::Upstream(format!("{:#}", error)),
        }
    }
}

/// Shape the model must answer with.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModelAssessment {
    /// 1 = routine administrative matter, 5 = critical, immediate action required
    pub impact_score: i64,
    /// At most two plain-language sentences on why a resident should care
    pub community_impact_summary: String,
    pub topic: Topic,
}

impl ModelAssessment {
    fn validate(self) -> Result<ClassificationResult, ClassifyError> {
        let impact_score = ImpactScore::new(self.impact_score).ok_or_else(|| {
            ClassifyError::InvalidResponse(format!(
                "impact_score {} outside 1..=5",
                self.impact_score
            ))
        })?;

        let summary = limit_to_two_sentences(&self.community_impact_summary);
        if summary.is_empty() {
            return Err(ClassifyError::InvalidResponse(
                "empty community_impact_summary".to_string(),
            ));
        }

        Ok(ClassificationResult {
            impact_score,
            community_impact_summary: summary,
            topic: self.topic,
        })
    }
}

/// Parse and validate the model's JSON reply.
pub fn parse_assessment(json: &str) -> Result<ClassificationResult, ClassifyError> {
    let assessment: ModelAssessment = serde_json::from_str(strip_code_blocks(json))
        .map_err(|e| ClassifyError::InvalidResponse(e.to_string()))?;
    assessment.validate()
}

fn build_prompt(title: &str, description: &str, agenda: Option<&str>) -> String {
    let description = match description.trim() {
        "" => "No description provided",
        text => text,
    };
    let agenda = match agenda.map(str::trim) {
        Some(text) if !text.is_empty() => format!("Agenda highlights: {text}\n"),
        _ => String::new(),
    };
    let topics = Topic::ALL
        .iter()
        .map(|t| format!("\"{}\"", t.label()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Assess the following NYC government meeting.\n\n\
         Title: {title}\n\
         Description: {description}\n\
         {agenda}\n\
         1. impact_score (integer 1-5): 1 = routine administrative matter, 2 = minor impact on \
         specific groups, 3 = moderate community interest, 4 = significant impact on many \
         residents, 5 = critical, immediate action required.\n\
         2. community_impact_summary: at most two simple sentences on concrete effects such as \
         rent, schools, safety, services or taxes, naming the communities most affected.\n\
         3. topic: exactly one of {topics}."
    )
}

async fn assess_with_model(
    title: &str,
    description: &str,
    agenda: Option<&str>,
    deps: &ServerDeps,
) -> Result<ClassificationResult, ClassifyError> {
    let ai = deps.ai.as_ref().ok_or(ClassifyError::NotConfigured)?;
    let limit = deps.settings.classify_timeout;

    let prompt = build_prompt(title, description, agenda);
    let call = ai.generate_structured(SYSTEM_PROMPT, &prompt, ModelAssessment::openai_schema());

    let json = tokio::time::timeout(limit, call)
        .await
        .map_err(|_| ClassifyError::Timeout(limit))?
        .map_err(ClassifyError::from_model_error)?;

    parse_assessment(&json)
}

/// Score, summarize and tag one event. Never fails.
///
/// `agenda` is extra context for the model only; the keyword fallback
/// looks at title and description.
pub async fn classify(
    title: &str,
    description: &str,
    agenda: Option<&str>,
    deps: &ServerDeps,
) -> Scored {
    let scored = match assess_with_model(title, description, agenda, deps).await {
        Ok(result) => Scored::model(result),
        Err(ClassifyError::NotConfigured) => {
            Scored::fallback(fallback_classification(title, description))
        }
        Err(e) => {
            warn!(
                via = "fallback",
                reason = e.reason(),
                error = %e,
                title = %title,
                "Model classification failed, using keyword fallback"
            );
            Scored::fallback(fallback_classification(title, description))
        }
    };

    debug!(
        via = scored.via.as_str(),
        topic = %scored.result.topic,
        impact_score = scored.result.impact_score.value(),
        title = %title,
        "Classified event"
    );
    deps.classifier_stats.record(scored.via);

    scored
}
