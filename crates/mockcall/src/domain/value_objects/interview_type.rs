//! InterviewType - Flavor of mock interview

use serde::{Deserialize, Serialize};

/// Interview type, selects the interviewer persona and system prompt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    #[default]
    Behavioral,
    Technical,
    CaseStudy,
    Screening,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Behavioral => "behavioral",
            InterviewType::Technical => "technical",
            InterviewType::CaseStudy => "case_study",
            InterviewType::Screening => "screening",
        }
    }
}

impl std::fmt::Display for InterviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "behavioral" => Ok(InterviewType::Behavioral),
            "technical" => Ok(InterviewType::Technical),
            "case_study" | "case" => Ok(InterviewType::CaseStudy),
            "screening" => Ok(InterviewType::Screening),
            _ => Err(format!("Unknown interview type: {}", s)),
        }
    }
}
