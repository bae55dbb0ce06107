//! Skill identifiers, per-career skill requirements, and the tables that map
//! assessment signals onto skills.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reference::careers::Career;
use crate::reference::riasec::RiasecCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Soft,
    Domain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AptitudeCategory {
    Numerical,
    Verbal,
    Logical,
    Spatial,
    Abstract,
}

impl AptitudeCategory {
    pub const ALL: [AptitudeCategory; 5] = [
        AptitudeCategory::Numerical,
        AptitudeCategory::Verbal,
        AptitudeCategory::Logical,
        AptitudeCategory::Spatial,
        AptitudeCategory::Abstract,
    ];

    /// Key used for this category inside an aptitude score map.
    pub fn key(self) -> &'static str {
        match self {
            AptitudeCategory::Numerical => "numerical",
            AptitudeCategory::Verbal => "verbal",
            AptitudeCategory::Logical => "logical",
            AptitudeCategory::Spatial => "spatial",
            AptitudeCategory::Abstract => "abstract",
        }
    }

    pub fn skills(self) -> &'static [Skill] {
        use Skill::*;
        match self {
            AptitudeCategory::Numerical => {
                &[Mathematics, Statistics, DataAnalysis, FinancialAnalysis]
            }
            AptitudeCategory::Verbal => &[Communication, Writing, Presentation, Documentation],
            AptitudeCategory::Logical => &[ProblemSolving, CriticalThinking, Algorithms, Logic],
            AptitudeCategory::Spatial => &[Design, Visualization, Cad, Modeling3d],
            AptitudeCategory::Abstract => &[PatternRecognition, Innovation, CreativeThinking],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    #[serde(rename = "Mathematics")]
    Mathematics,
    #[serde(rename = "Statistics")]
    Statistics,
    #[serde(rename = "Data Analysis")]
    DataAnalysis,
    #[serde(rename = "Financial Analysis")]
    FinancialAnalysis,
    #[serde(rename = "Communication")]
    Communication,
    #[serde(rename = "Writing")]
    Writing,
    #[serde(rename = "Presentation")]
    Presentation,
    #[serde(rename = "Documentation")]
    Documentation,
    #[serde(rename = "Problem Solving")]
    ProblemSolving,
    #[serde(rename = "Critical Thinking")]
    CriticalThinking,
    #[serde(rename = "Algorithms")]
    Algorithms,
    #[serde(rename = "Logic")]
    Logic,
    #[serde(rename = "Design")]
    Design,
    #[serde(rename = "Visualization")]
    Visualization,
    #[serde(rename = "CAD")]
    Cad,
    #[serde(rename = "3D Modeling")]
    Modeling3d,
    #[serde(rename = "Pattern Recognition")]
    PatternRecognition,
    #[serde(rename = "Innovation")]
    Innovation,
    #[serde(rename = "Creative Thinking")]
    CreativeThinking,
    #[serde(rename = "Hands-on Skills")]
    HandsOnSkills,
    #[serde(rename = "Technical Skills")]
    TechnicalSkills,
    #[serde(rename = "Mechanical Skills")]
    MechanicalSkills,
    #[serde(rename = "Research")]
    Research,
    #[serde(rename = "Analysis")]
    Analysis,
    #[serde(rename = "Scientific Method")]
    ScientificMethod,
    #[serde(rename = "Creativity")]
    Creativity,
    #[serde(rename = "Artistic Expression")]
    ArtisticExpression,
    #[serde(rename = "Interpersonal Skills")]
    InterpersonalSkills,
    #[serde(rename = "Empathy")]
    Empathy,
    #[serde(rename = "Teaching")]
    Teaching,
    #[serde(rename = "Leadership")]
    Leadership,
    #[serde(rename = "Management")]
    Management,
    #[serde(rename = "Negotiation")]
    Negotiation,
    #[serde(rename = "Organization")]
    Organization,
    #[serde(rename = "Attention to Detail")]
    AttentionToDetail,
    #[serde(rename = "Data Entry")]
    DataEntry,
    #[serde(rename = "Programming")]
    Programming,
    #[serde(rename = "Data Structures")]
    DataStructures,
}

impl Skill {
    pub fn name(self) -> &'static str {
        match self {
            Skill::Mathematics => "Mathematics",
            Skill::Statistics => "Statistics",
            Skill::DataAnalysis => "Data Analysis",
            Skill::FinancialAnalysis => "Financial Analysis",
            Skill::Communication => "Communication",
            Skill::Writing => "Writing",
            Skill::Presentation => "Presentation",
            Skill::Documentation => "Documentation",
            Skill::ProblemSolving => "Problem Solving",
            Skill::CriticalThinking => "Critical Thinking",
            Skill::Algorithms => "Algorithms",
            Skill::Logic => "Logic",
            Skill::Design => "Design",
            Skill::Visualization => "Visualization",
            Skill::Cad => "CAD",
            Skill::Modeling3d => "3D Modeling",
            Skill::PatternRecognition => "Pattern Recognition",
            Skill::Innovation => "Innovation",
            Skill::CreativeThinking => "Creative Thinking",
            Skill::HandsOnSkills => "Hands-on Skills",
            Skill::TechnicalSkills => "Technical Skills",
            Skill::MechanicalSkills => "Mechanical Skills",
            Skill::Research => "Research",
            Skill::Analysis => "Analysis",
            Skill::ScientificMethod => "Scientific Method",
            Skill::Creativity => "Creativity",
            Skill::ArtisticExpression => "Artistic Expression",
            Skill::InterpersonalSkills => "Interpersonal Skills",
            Skill::Empathy => "Empathy",
            Skill::Teaching => "Teaching",
            Skill::Leadership => "Leadership",
            Skill::Management => "Management",
            Skill::Negotiation => "Negotiation",
            Skill::Organization => "Organization",
            Skill::AttentionToDetail => "Attention to Detail",
            Skill::DataEntry => "Data Entry",
            Skill::Programming => "Programming",
            Skill::DataStructures => "Data Structures",
        }
    }

    /// Aptitude category whose score estimates this skill, if any.
    pub fn aptitude_category(self) -> Option<AptitudeCategory> {
        AptitudeCategory::ALL
            .into_iter()
            .find(|cat| cat.skills().contains(&self))
    }

    /// RIASEC code whose score estimates this skill, if any.
    pub fn riasec_code(self) -> Option<RiasecCode> {
        RiasecCode::ALL
            .into_iter()
            .find(|code| riasec_skills(*code).contains(&self))
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn riasec_skills(code: RiasecCode) -> &'static [Skill] {
    use Skill::*;
    match code {
        RiasecCode::R => &[HandsOnSkills, TechnicalSkills, MechanicalSkills],
        RiasecCode::I => &[Research, Analysis, ScientificMethod],
        RiasecCode::A => &[Creativity, Design, ArtisticExpression],
        RiasecCode::S => &[InterpersonalSkills, Empathy, Teaching],
        RiasecCode::E => &[Leadership, Management, Negotiation],
        RiasecCode::C => &[Organization, AttentionToDetail, DataEntry],
    }
}

/// A single skill a career requires, with the proficiency needed (1..=5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill: Skill,
    pub category: SkillCategory,
    pub required_level: u8,
}

const fn req(skill: Skill, category: SkillCategory, required_level: u8) -> SkillRequirement {
    SkillRequirement {
        skill,
        category,
        required_level,
    }
}

/// Skill requirements for a career. Empty for careers the registry has no
/// requirement data for.
pub fn requirements_for(career: Career) -> &'static [SkillRequirement] {
    use SkillCategory::{Domain, Soft, Technical};
    use Skill::*;

    const SOFTWARE_ENGINEER: &[SkillRequirement] = &[
        req(Programming, Technical, 5),
        req(DataStructures, Technical, 5),
        req(Algorithms, Technical, 4),
        req(ProblemSolving, Soft, 5),
        req(Communication, Soft, 3),
        req(CriticalThinking, Soft, 4),
        req(Mathematics, Domain, 3),
    ];
    const DATA_SCIENTIST: &[SkillRequirement] = &[
        req(Statistics, Technical, 5),
        req(Programming, Technical, 4),
        req(DataAnalysis, Technical, 5),
        req(Mathematics, Domain, 5),
        req(ProblemSolving, Soft, 5),
        req(Communication, Soft, 4),
    ];
    const UX_DESIGNER: &[SkillRequirement] = &[
        req(Design, Technical, 5),
        req(Creativity, Soft, 5),
        req(Visualization, Technical, 4),
        req(Empathy, Soft, 4),
        req(Communication, Soft, 4),
        req(ProblemSolving, Soft, 4),
    ];
    const TEACHER: &[SkillRequirement] = &[
        req(Communication, Soft, 5),
        req(Teaching, Soft, 5),
        req(Empathy, Soft, 5),
        req(InterpersonalSkills, Soft, 5),
        req(Organization, Soft, 4),
        req(Presentation, Soft, 5),
    ];
    const PRODUCT_MANAGER: &[SkillRequirement] = &[
        req(Leadership, Soft, 5),
        req(Communication, Soft, 5),
        req(ProblemSolving, Soft, 5),
        req(Analysis, Technical, 4),
        req(Negotiation, Soft, 4),
        req(Management, Soft, 4),
    ];
    const MECHANICAL_ENGINEER: &[SkillRequirement] = &[
        req(TechnicalSkills, Technical, 5),
        req(Cad, Technical, 4),
        req(Mathematics, Domain, 5),
        req(ProblemSolving, Soft, 5),
        req(HandsOnSkills, Technical, 4),
    ];
    const ACCOUNTANT: &[SkillRequirement] = &[
        req(FinancialAnalysis, Technical, 5),
        req(AttentionToDetail, Soft, 5),
        req(Organization, Soft, 5),
        req(Mathematics, Domain, 4),
        req(DataEntry, Technical, 4),
    ];
    const MARKETING_MANAGER: &[SkillRequirement] = &[
        req(Creativity, Soft, 5),
        req(Communication, Soft, 5),
        req(Leadership, Soft, 4),
        req(DataAnalysis, Technical, 3),
        req(Presentation, Soft, 5),
    ];

    match career {
        Career::SoftwareEngineer => SOFTWARE_ENGINEER,
        Career::DataScientist => DATA_SCIENTIST,
        Career::UxDesigner => UX_DESIGNER,
        Career::Teacher => TEACHER,
        Career::ProductManager => PRODUCT_MANAGER,
        Career::MechanicalEngineer => MECHANICAL_ENGINEER,
        Career::Accountant => ACCOUNTANT,
        Career::MarketingManager => MARKETING_MANAGER,
        _ => &[],
    }
}
