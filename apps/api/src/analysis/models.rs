use serde::{Deserialize, Serialize};

/// Which strategy produced an `AnalysisResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Remote,
    Heuristic,
}

/// Detection flags for the five expected resume sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFlags {
    pub contact: bool,
    pub summary: bool,
    pub experience: bool,
    pub education: bool,
    pub skills: bool,
}

impl SectionFlags {
    pub const NAMES: [&'static str; 5] = ["contact", "summary", "experience", "education", "skills"];

    pub fn detected_count(&self) -> usize {
        [
            self.contact,
            self.summary,
            self.experience,
            self.education,
            self.skills,
        ]
        .iter()
        .filter(|&&detected| detected)
        .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub formatting: String,
    pub content: String,
    pub ats_compatibility: String,
    pub professional_impact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceAnalysis {
    pub years_of_experience: String,
    pub career_progression: String,
    pub achievement_quality: String,
}

/// The unified analysis output. Every field is populated whichever strategy ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u32, // 0 – 100
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub sections: SectionFlags,
    pub keywords: Vec<String>,
    pub overall_feedback: String,
    pub detailed_analysis: DetailedAnalysis,
    pub experience_analysis: ExperienceAnalysis,
    pub improvement_priority: Vec<String>,
    pub source: AnalysisSource,
}
