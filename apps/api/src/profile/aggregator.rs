//! Profile Aggregator: merges the latest assessment per dimension into one
//! `Profile` with a clarity score, a short narrative summary and the merged
//! career shortlist.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::models::assessment::{top_entry, AssessmentRecord, Dimension, DimensionScores, ScoreMap};
use crate::models::profile::{CareerMatch, Profile, RecommendationList, PERSONALITY_SOURCE};
use crate::reference::riasec::{dominant_code, RIASEC_MAX};

/// Dimensions counted towards profile completion. Risk is optional.
const CORE_DIMENSIONS: [Dimension; 4] = [
    Dimension::Riasec,
    Dimension::Aptitude,
    Dimension::Personality,
    Dimension::Values,
];

const COMPLETION_WEIGHT: f64 = 30.0;
const CONSISTENCY_WEIGHT: f64 = 0.4;
const VALUE_ALIGNMENT_CAP: f64 = 30.0;
const TOP_CAREERS_LIMIT: usize = 5;
const TRAIT_HIGHLIGHT_THRESHOLD: f64 = 70.0;
const DEFAULT_SUMMARY: &str = "developing career profile";

/// Big-5 trait key → phrase used when the trait exceeds the highlight threshold.
const TRAIT_PHRASES: &[(&str, &str)] = &[
    ("openness", "open to new experiences"),
    ("conscientiousness", "highly organized"),
    ("extraversion", "outgoing and energetic"),
    ("agreeableness", "cooperative and considerate"),
    ("neuroticism", "emotionally sensitive"),
];

/// Builds the profile for `user_id` from its assessment records. Records that
/// belong to other users are ignored. Returns `None` when the user has no data.
pub fn build_profile(
    user_id: Uuid,
    records: &[AssessmentRecord],
    recommendations: &[RecommendationList],
) -> Option<Profile> {
    let dimensions = DimensionScores::from_latest(user_id, records);
    if dimensions.is_empty() {
        return None;
    }

    let clarity_score = compute_clarity_score(&dimensions);
    let summary = generate_summary(&dimensions);
    let top_careers = merge_top_careers(recommendations);

    debug!(
        "Built profile for user {user_id}: {} dimensions, clarity {clarity_score:.1}",
        dimensions.count()
    );

    Some(Profile {
        user_id,
        dimensions,
        clarity_score,
        summary,
        top_careers,
        updated_at: Utc::now(),
    })
}

/// clarity = completion×30 + riasec_consistency×0.4 + value_alignment, clamped to [0, 100].
pub fn compute_clarity_score(dims: &DimensionScores) -> f64 {
    let present = CORE_DIMENSIONS.iter().filter(|d| dims.contains(**d)).count();
    let completion = present as f64 / CORE_DIMENSIONS.len() as f64;
    let mut clarity = completion * COMPLETION_WEIGHT;

    if let Some(riasec) = dims.riasec() {
        clarity += riasec_consistency(riasec) * CONSISTENCY_WEIGHT;
    }

    if let Some(alignment) = dims.values().and_then(value_alignment) {
        clarity += alignment;
    }

    clarity.clamp(0.0, 100.0)
}

/// Spread between the strongest and weakest interest, as a percentage of the scale.
fn riasec_consistency(riasec: &ScoreMap) -> f64 {
    let max = riasec.values().copied().fold(f64::MIN, f64::max);
    let min = riasec.values().copied().fold(f64::MAX, f64::min);
    ((max - min) / RIASEC_MAX * 100.0).min(100.0)
}

/// Gap between the top two work values; needs at least two values.
fn value_alignment(values: &ScoreMap) -> Option<f64> {
    let mut sorted: Vec<f64> = values.values().copied().collect();
    sorted.sort_by(|a, b| b.total_cmp(a));
    match sorted.as_slice() {
        [first, second, ..] => Some(((first - second) / 5.0 * 100.0).min(VALUE_ALIGNMENT_CAP)),
        _ => None,
    }
}

pub fn generate_summary(dims: &DimensionScores) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(riasec) = dims.riasec() {
        let phrase = dominant_code(riasec)
            .map(|code| code.summary_phrase())
            .unwrap_or("balanced");
        parts.push(phrase.to_string());
    }

    if let Some((value, _)) = dims.values().and_then(top_entry) {
        parts.push(format!("values {}", value.replace('_', " ")));
    }

    if let Some(personality) = dims.personality() {
        for (trait_key, phrase) in TRAIT_PHRASES {
            if personality.get(*trait_key).copied().unwrap_or(0.0) > TRAIT_HIGHLIGHT_THRESHOLD {
                parts.push(phrase.to_string());
            }
        }
    }

    if parts.is_empty() {
        DEFAULT_SUMMARY.to_string()
    } else {
        parts.join(", ")
    }
}

/// Deduplicated union of the source lists, capped at five. Personality-test
/// careers come first, then the other sources in stored order. Match
/// percentages are carried through from the first source naming a career.
pub fn merge_top_careers(lists: &[RecommendationList]) -> Vec<CareerMatch> {
    let mut ordered: Vec<&RecommendationList> = lists.iter().collect();
    ordered.sort_by_key(|l| l.source != PERSONALITY_SOURCE);

    let mut merged: Vec<CareerMatch> = Vec::new();
    for career in ordered.iter().flat_map(|l| l.careers.iter()) {
        if merged.len() == TOP_CAREERS_LIMIT {
            break;
        }
        if career.name.trim().is_empty() || merged.iter().any(|m| m.name == career.name) {
            continue;
        }
        merged.push(career.clone());
    }
    merged
}
