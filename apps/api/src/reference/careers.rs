//! Career registry: identifiers, RIASEC weight vectors, market demand and the
//! per-code shortlist used by the simulator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reference::riasec::RiasecCode;

/// Weight of each RIASEC code for a career. Weights are within [0, 1] each.
pub type RiasecWeights = &'static [(RiasecCode, f64)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Career {
    #[serde(rename = "Software Engineer")]
    SoftwareEngineer,
    #[serde(rename = "Data Scientist")]
    DataScientist,
    #[serde(rename = "UX Designer")]
    UxDesigner,
    #[serde(rename = "Teacher")]
    Teacher,
    #[serde(rename = "Product Manager")]
    ProductManager,
    #[serde(rename = "Marketing Manager")]
    MarketingManager,
    #[serde(rename = "Mechanical Engineer")]
    MechanicalEngineer,
    #[serde(rename = "Accountant")]
    Accountant,
    #[serde(rename = "Psychologist")]
    Psychologist,
    #[serde(rename = "Graphic Designer")]
    GraphicDesigner,
    #[serde(rename = "Civil Engineer")]
    CivilEngineer,
    #[serde(rename = "Nurse")]
    Nurse,
    #[serde(rename = "Entrepreneur")]
    Entrepreneur,
    #[serde(rename = "Research Scientist")]
    ResearchScientist,
    #[serde(rename = "Financial Analyst")]
    FinancialAnalyst,
    #[serde(rename = "Electrician")]
    Electrician,
    #[serde(rename = "Carpenter")]
    Carpenter,
    #[serde(rename = "Artist")]
    Artist,
    #[serde(rename = "Counselor")]
    Counselor,
    #[serde(rename = "Social Worker")]
    SocialWorker,
    #[serde(rename = "Sales Manager")]
    SalesManager,
    #[serde(rename = "Data Analyst")]
    DataAnalyst,
    #[serde(rename = "Administrator")]
    Administrator,
}

impl Career {
    pub const ALL: [Career; 23] = [
        Career::SoftwareEngineer,
        Career::DataScientist,
        Career::UxDesigner,
        Career::Teacher,
        Career::ProductManager,
        Career::MarketingManager,
        Career::MechanicalEngineer,
        Career::Accountant,
        Career::Psychologist,
        Career::GraphicDesigner,
        Career::CivilEngineer,
        Career::Nurse,
        Career::Entrepreneur,
        Career::ResearchScientist,
        Career::FinancialAnalyst,
        Career::Electrician,
        Career::Carpenter,
        Career::Artist,
        Career::Counselor,
        Career::SocialWorker,
        Career::SalesManager,
        Career::DataAnalyst,
        Career::Administrator,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Career::SoftwareEngineer => "Software Engineer",
            Career::DataScientist => "Data Scientist",
            Career::UxDesigner => "UX Designer",
            Career::Teacher => "Teacher",
            Career::ProductManager => "Product Manager",
            Career::MarketingManager => "Marketing Manager",
            Career::MechanicalEngineer => "Mechanical Engineer",
            Career::Accountant => "Accountant",
            Career::Psychologist => "Psychologist",
            Career::GraphicDesigner => "Graphic Designer",
            Career::CivilEngineer => "Civil Engineer",
            Career::Nurse => "Nurse",
            Career::Entrepreneur => "Entrepreneur",
            Career::ResearchScientist => "Research Scientist",
            Career::FinancialAnalyst => "Financial Analyst",
            Career::Electrician => "Electrician",
            Career::Carpenter => "Carpenter",
            Career::Artist => "Artist",
            Career::Counselor => "Counselor",
            Career::SocialWorker => "Social Worker",
            Career::SalesManager => "Sales Manager",
            Career::DataAnalyst => "Data Analyst",
            Career::Administrator => "Administrator",
        }
    }

    /// RIASEC weight vector for this career, if the registry defines one.
    pub fn riasec_profile(self) -> Option<RiasecWeights> {
        use RiasecCode::*;
        let weights: RiasecWeights = match self {
            Career::SoftwareEngineer => &[(I, 0.4), (R, 0.3), (C, 0.3)],
            Career::DataScientist => &[(I, 0.5), (C, 0.3), (R, 0.2)],
            Career::UxDesigner => &[(A, 0.5), (I, 0.3), (E, 0.2)],
            Career::Teacher => &[(S, 0.5), (A, 0.3), (I, 0.2)],
            Career::ProductManager => &[(E, 0.4), (I, 0.3), (S, 0.3)],
            Career::MarketingManager => &[(E, 0.5), (A, 0.3), (S, 0.2)],
            Career::MechanicalEngineer => &[(R, 0.5), (I, 0.3), (C, 0.2)],
            Career::Accountant => &[(C, 0.5), (I, 0.3), (R, 0.2)],
            Career::Psychologist => &[(S, 0.5), (I, 0.3), (A, 0.2)],
            Career::GraphicDesigner => &[(A, 0.6), (E, 0.2), (I, 0.2)],
            Career::CivilEngineer => &[(R, 0.4), (I, 0.3), (C, 0.3)],
            Career::Nurse => &[(S, 0.6), (R, 0.2), (I, 0.2)],
            Career::Entrepreneur => &[(E, 0.6), (I, 0.2), (A, 0.2)],
            Career::ResearchScientist => &[(I, 0.6), (R, 0.2), (C, 0.2)],
            Career::FinancialAnalyst => &[(C, 0.4), (I, 0.4), (E, 0.2)],
            _ => return None,
        };
        Some(weights)
    }

    pub fn is_high_demand(self) -> bool {
        matches!(
            self,
            Career::SoftwareEngineer
                | Career::DataScientist
                | Career::ProductManager
                | Career::UxDesigner
        )
    }

    /// Careers the simulator recommends when `code` is the dominant interest.
    pub fn shortlist(code: RiasecCode) -> [Career; 3] {
        match code {
            RiasecCode::R => [Career::MechanicalEngineer, Career::Electrician, Career::Carpenter],
            RiasecCode::I => [
                Career::DataScientist,
                Career::ResearchScientist,
                Career::SoftwareEngineer,
            ],
            RiasecCode::A => [Career::UxDesigner, Career::GraphicDesigner, Career::Artist],
            RiasecCode::S => [Career::Teacher, Career::Counselor, Career::SocialWorker],
            RiasecCode::E => [Career::ProductManager, Career::SalesManager, Career::Entrepreneur],
            RiasecCode::C => [Career::Accountant, Career::DataAnalyst, Career::Administrator],
        }
    }
}

impl fmt::Display for Career {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Career {
    type Err = String;

    /// Case-insensitive; `_` and `-` are accepted as word separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Career::ALL
            .into_iter()
            .find(|c| normalize_name(c.name()) == wanted)
            .ok_or_else(|| format!("unknown career '{}'", s.trim()))
    }
}

fn normalize_name(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_and_separator_insensitive() {
        assert_eq!("software_engineer".parse::<Career>().unwrap(), Career::SoftwareEngineer);
        assert_eq!("  UX designer ".parse::<Career>().unwrap(), Career::UxDesigner);
        assert_eq!("social-worker".parse::<Career>().unwrap(), Career::SocialWorker);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "Astronaut".parse::<Career>().unwrap_err();
        assert!(err.contains("Astronaut"));
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for career in Career::ALL {
            assert_eq!(career.name().parse::<Career>().unwrap(), career);
        }
    }

    #[test]
    fn test_weight_vectors_within_unit_range() {
        for career in Career::ALL {
            if let Some(weights) = career.riasec_profile() {
                assert!(weights.iter().all(|(_, w)| (0.0..=1.0).contains(w)), "{career}");
            }
        }
    }

    #[test]
    fn test_shortlist_careers_without_vectors() {
        assert!(Career::Electrician.riasec_profile().is_none());
        assert!(Career::SoftwareEngineer.riasec_profile().is_some());
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&Career::DataScientist).unwrap();
        assert_eq!(json, "\"Data Scientist\"");
    }
}
