//! RIASEC interest codes: canonical order, labels, course keywords and the
//! flag rules that turn interest scores into classifier features.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::assessment::ScoreMap;

/// Holland interest code. Declaration order (R, I, A, S, E, C) is the canonical
/// order used for every tie-break between codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiasecCode {
    R,
    I,
    A,
    S,
    E,
    C,
}

impl RiasecCode {
    pub const ALL: [RiasecCode; 6] = [
        RiasecCode::R,
        RiasecCode::I,
        RiasecCode::A,
        RiasecCode::S,
        RiasecCode::E,
        RiasecCode::C,
    ];

    /// Key used for this code inside a RIASEC score map.
    pub fn key(self) -> &'static str {
        match self {
            RiasecCode::R => "R",
            RiasecCode::I => "I",
            RiasecCode::A => "A",
            RiasecCode::S => "S",
            RiasecCode::E => "E",
            RiasecCode::C => "C",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RiasecCode::R => "Realistic",
            RiasecCode::I => "Investigative",
            RiasecCode::A => "Artistic",
            RiasecCode::S => "Social",
            RiasecCode::E => "Enterprising",
            RiasecCode::C => "Conventional",
        }
    }

    /// Name plus a short parenthetical, used in explanation details.
    pub fn trait_label(self) -> &'static str {
        match self {
            RiasecCode::R => "Realistic (hands-on)",
            RiasecCode::I => "Investigative (analytical)",
            RiasecCode::A => "Artistic (creative)",
            RiasecCode::S => "Social (people-oriented)",
            RiasecCode::E => "Enterprising (leadership)",
            RiasecCode::C => "Conventional (organized)",
        }
    }

    /// Phrase used in the profile summary when this code is dominant.
    pub fn summary_phrase(self) -> &'static str {
        match self {
            RiasecCode::R => "practical and hands-on",
            RiasecCode::I => "analytical and investigative",
            RiasecCode::A => "creative and artistic",
            RiasecCode::S => "helpful and people-oriented",
            RiasecCode::E => "enterprising and leadership-focused",
            RiasecCode::C => "organized and detail-oriented",
        }
    }

    /// Course-name keywords associated with this personality type.
    pub fn course_keywords(self) -> &'static [&'static str] {
        match self {
            RiasecCode::R => &["Carpenter", "Mechanic", "Electrician", "Engineer", "Technician"],
            RiasecCode::I => &["Scientist", "Engineer", "Researcher", "Analyst", "Doctor"],
            RiasecCode::A => &["Artist", "Writer", "Designer", "Musician", "Architect"],
            RiasecCode::S => &["Teacher", "Counselor", "Nurse", "Social Worker", "Therapist"],
            RiasecCode::E => &["Entrepreneur", "Manager", "Salesperson", "Lawyer", "Business"],
            RiasecCode::C => &["Accountant", "Analyst", "Banker", "Administrator", "Clerk"],
        }
    }

    /// Training feature flags switched on when this code scores above
    /// [`FEATURE_FLAG_THRESHOLD`].
    pub fn feature_flags(self) -> &'static [&'static str] {
        match self {
            RiasecCode::R => &["Sports", "Mechanical"],
            RiasecCode::I => &["Coding", "Mathematics", "Science"],
            RiasecCode::A => &["Drawing", "Painting", "Music"],
            RiasecCode::S => &["Teaching", "Volunteering"],
            RiasecCode::E => &["Leadership", "Public Speaking"],
            RiasecCode::C => &["Organization", "Data Analysis"],
        }
    }
}

/// RIASEC scores strictly above this value enable the code's feature flags.
pub const FEATURE_FLAG_THRESHOLD: f64 = 8.0;

/// Upper bound of the native RIASEC scale.
pub const RIASEC_MAX: f64 = 12.0;

impl fmt::Display for RiasecCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RiasecCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        RiasecCode::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(trimmed) || c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown RIASEC code '{s}'"))
    }
}

/// Returns the highest-scoring code present in `scores`. Ties resolve to the
/// earliest code in canonical order. `None` when no code key is present.
pub fn dominant_code(scores: &ScoreMap) -> Option<RiasecCode> {
    let mut best: Option<(RiasecCode, f64)> = None;
    for code in RiasecCode::ALL {
        if let Some(&value) = scores.get(code.key()) {
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((code, value)),
            }
        }
    }
    best.map(|(code, _)| code)
}

/// Feature flags implied by a RIASEC score map, in canonical code order.
pub fn feature_flags_for(scores: &ScoreMap) -> Vec<&'static str> {
    RiasecCode::ALL
        .into_iter()
        .filter(|code| scores.get(code.key()).copied().unwrap_or(0.0) > FEATURE_FLAG_THRESHOLD)
        .flat_map(|code| code.feature_flags().iter().copied())
        .collect()
}
