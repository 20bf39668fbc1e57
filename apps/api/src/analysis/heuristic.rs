//! Heuristic Analyzer: pattern-based resume scoring with no external calls.
//!
//! Total and deterministic: the same text always yields the same `AnalysisResult`.
//! Scores are capped at `MAX_HEURISTIC_SCORE` so a pattern-only estimate never
//! reads as confidently as a model-backed one.
//!
//! Algorithm:
//! 1. Detect the five sections with case-insensitive cue patterns.
//! 2. Extract vocabulary keywords (lowercased, first-seen order, deduplicated).
//! 3. Score: 15 per section, plus length / keyword / duration / achievement bonuses.
//! 4. Emit strengths, weaknesses and suggestions from the same signals.
//! 5. Fill narrative fields from templates.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{
    AnalysisResult, AnalysisSource, DetailedAnalysis, ExperienceAnalysis, SectionFlags,
};

pub const MAX_HEURISTIC_SCORE: u32 = 75;
pub const MAX_KEYWORDS: usize = 15;

const POINTS_PER_SECTION: u32 = 15;
const LENGTH_BONUS_CHARS: usize = 500;
const BRIEF_RESUME_CHARS: usize = 300;
const KEYWORD_BONUS_THRESHOLD: usize = 5;
const STRONG_KEYWORD_THRESHOLD: usize = 8;
const GOOD_STRUCTURE_SCORE: u32 = 60;

/// Closed vocabulary of technology, tooling and professional-skill terms.
/// Order matters where one term prefixes another: the longer term comes first.
const SKILL_VOCABULARY: &[&str] = &[
    "JavaScript", "Python", "Java", "React", "Node", "SQL", "AWS", "Docker", "Git", "HTML",
    "CSS", "Angular", "Vue", "TypeScript", "C++", "C#", "PHP", "Ruby", "Go", "Kubernetes",
    "MongoDB", "PostgreSQL", "MySQL", "Redis", "Linux", "Windows", "MacOS", "Agile", "Scrum",
    "DevOps", "CI/CD", "REST", "API", "JSON", "XML", "Bootstrap", "jQuery", "Express",
    "Django", "Flask", "Spring", "Laravel", "Rails", "Symfony", "Unity", "Unreal",
    "Photoshop", "Illustrator", "Figma", "Sketch", "Adobe", "Microsoft Office", "Excel",
    "PowerPoint", "Word", "Outlook", "Salesforce", "HubSpot", "Google Analytics", "SEO",
    "SEM", "PPC", "Social Media", "Marketing", "Sales", "Management", "Leadership",
    "Project Management", "Data Analysis", "Machine Learning", "AI",
    "Artificial Intelligence", "Deep Learning", "TensorFlow", "PyTorch", "Pandas", "NumPy",
    "Matplotlib", "Tableau", "Power BI", "VBA", "R", "MATLAB", "Stata", "SPSS",
];

fn cue(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static heuristic pattern must compile")
}

static CONTACT_RE: Lazy<Regex> = Lazy::new(|| cue(r"(?i)email|phone|linkedin|github|@"));
static SUMMARY_RE: Lazy<Regex> = Lazy::new(|| cue(r"(?i)summary|objective|profile|about"));
static EXPERIENCE_RE: Lazy<Regex> =
    Lazy::new(|| cue(r"(?i)experience|work|employment|job|position|role"));
static EDUCATION_RE: Lazy<Regex> = Lazy::new(|| {
    cue(r"(?i)education|degree|university|college|school|bachelor|master|phd")
});
static SKILLS_RE: Lazy<Regex> =
    Lazy::new(|| cue(r"(?i)skills|technologies|tools|programming|technical"));

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    // Terms ending in a symbol (C++, C#) can't take a trailing \b.
    let alternatives: Vec<String> = SKILL_VOCABULARY
        .iter()
        .map(|term| {
            let escaped = regex::escape(term);
            if term.ends_with(|c: char| c.is_alphanumeric()) {
                format!(r"{escaped}\b")
            } else {
                escaped
            }
        })
        .collect();
    cue(&format!(r"(?i)\b(?:{})", alternatives.join("|")))
});

static DURATION_RE: Lazy<Regex> = Lazy::new(|| cue(r"(?i)\d+\s*(?:years?|months?)"));
static YEARS_RE: Lazy<Regex> = Lazy::new(|| cue(r"(?i)\d+\s*years?"));
static ACHIEVEMENT_RE: Lazy<Regex> =
    Lazy::new(|| cue(r"(?i)\d+%|\$\d+|\d+k|increased|improved|reduced|achieved"));
static ACTION_VERB_RE: Lazy<Regex> =
    Lazy::new(|| cue(r"(?i)\b(?:managed|led|developed|created|implemented)\b"));
static METRIC_RE: Lazy<Regex> = Lazy::new(|| cue(r"\d+%|\$\d+"));

/// Everything the scoring and narrative rules read from the text, computed once.
struct TextSignals<'a> {
    char_count: usize,
    sections: SectionFlags,
    /// All distinct keywords; the result carries only the first `MAX_KEYWORDS`.
    keywords: Vec<String>,
    duration: bool,
    years: Option<&'a str>,
    achievement: bool,
    action_verbs: bool,
    metrics: bool,
}

impl<'a> TextSignals<'a> {
    fn scan(text: &'a str) -> Self {
        Self {
            char_count: text.chars().count(),
            sections: detect_sections(text),
            keywords: extract_keywords(text),
            duration: DURATION_RE.is_match(text),
            years: YEARS_RE.find(text).map(|m| m.as_str()),
            achievement: ACHIEVEMENT_RE.is_match(text),
            action_verbs: ACTION_VERB_RE.is_match(text),
            metrics: METRIC_RE.is_match(text),
        }
    }

    fn has_impact_language(&self) -> bool {
        self.achievement || self.action_verbs
    }
}

/// Pure pattern-matching analyzer. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let signals = TextSignals::scan(text);
        let score = compute_score(&signals);
        let feedback = build_feedback(&signals);

        AnalysisResult {
            score,
            strengths: feedback.strengths,
            weaknesses: feedback.weaknesses,
            suggestions: feedback.suggestions,
            sections: signals.sections,
            keywords: signals.keywords.iter().take(MAX_KEYWORDS).cloned().collect(),
            overall_feedback: build_overall_feedback(&signals, score),
            detailed_analysis: build_detailed_analysis(&signals),
            experience_analysis: build_experience_analysis(&signals),
            improvement_priority: build_improvement_priority(&signals),
            source: AnalysisSource::Heuristic,
        }
    }
}

fn detect_sections(text: &str) -> SectionFlags {
    SectionFlags {
        contact: CONTACT_RE.is_match(text),
        summary: SUMMARY_RE.is_match(text),
        experience: EXPERIENCE_RE.is_match(text),
        education: EDUCATION_RE.is_match(text),
        skills: SKILLS_RE.is_match(text),
    }
}

/// Distinct vocabulary hits, lowercased, in first-seen order.
fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for m in KEYWORD_RE.find_iter(text) {
        let keyword = m.as_str().to_lowercase();
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}

fn compute_score(signals: &TextSignals<'_>) -> u32 {
    let mut score = signals.sections.detected_count() as u32 * POINTS_PER_SECTION;

    if signals.char_count > LENGTH_BONUS_CHARS {
        score += 10;
    }
    if signals.keywords.len() > KEYWORD_BONUS_THRESHOLD {
        score += 10;
    }
    if signals.duration {
        score += 5;
    }
    if signals.achievement {
        score += 10;
    }

    score.min(MAX_HEURISTIC_SCORE)
}

struct Feedback {
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    suggestions: Vec<String>,
}

impl Feedback {
    fn strength(&mut self, text: impl Into<String>) {
        self.strengths.push(text.into());
    }

    fn gap(&mut self, weakness: &str, suggestion: &str) {
        self.weaknesses.push(weakness.to_string());
        self.suggestions.push(suggestion.to_string());
    }
}

fn build_feedback(signals: &TextSignals<'_>) -> Feedback {
    let sections = &signals.sections;
    let mut fb = Feedback {
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        suggestions: Vec::new(),
    };

    if sections.contact {
        fb.strength("Contact information is present and accessible");
    } else {
        fb.gap(
            "Missing or unclear contact information",
            "Add clear contact details including email, phone, and LinkedIn profile",
        );
    }

    if sections.experience {
        fb.strength("Work experience section is included");
        if signals.duration {
            fb.strength("Experience duration is mentioned");
        }
    } else {
        fb.gap(
            "Work experience section appears to be missing",
            "Add detailed work experience with job titles, companies, and dates",
        );
    }

    if sections.skills {
        fb.strength("Technical skills section is present");
        if signals.keywords.len() > STRONG_KEYWORD_THRESHOLD {
            fb.strength(format!(
                "Strong technical keyword presence ({} skills detected)",
                signals.keywords.len()
            ));
        }
    } else {
        fb.gap(
            "Skills section is not clearly defined",
            "Add a dedicated skills section with relevant technical and soft skills",
        );
    }

    if sections.education {
        fb.strength("Educational background is included");
    } else {
        fb.gap(
            "Education section appears to be missing",
            "Include educational qualifications, degrees, and certifications",
        );
    }

    if sections.summary {
        fb.strength("Professional summary or objective statement is present");
    } else {
        fb.gap(
            "Professional summary or objective statement is missing",
            "Add a compelling professional summary highlighting your key strengths",
        );
    }

    if signals.char_count < BRIEF_RESUME_CHARS {
        fb.gap(
            "Resume content appears to be too brief",
            "Expand content with more detailed descriptions of experience and achievements",
        );
    }

    if !signals.has_impact_language() {
        fb.gap(
            "Lack of quantifiable achievements and action verbs",
            "Include specific metrics, percentages, and dollar amounts to quantify your impact",
        );
    }

    if fb.strengths.is_empty() {
        fb.strength("Resume file was successfully processed");
    }
    if fb.weaknesses.is_empty() {
        fb.weaknesses
            .push("Limited analysis available without AI processing".to_string());
    }
    if fb.suggestions.is_empty() {
        fb.suggestions
            .push("Consider enabling AI analysis for detailed recommendations".to_string());
    }

    fb
}

fn build_overall_feedback(signals: &TextSignals<'_>, score: u32) -> String {
    let structure = if score >= GOOD_STRUCTURE_SCORE {
        "good"
    } else {
        "moderate"
    };
    format!(
        "Basic analysis completed with {}/5 key sections detected. The resume shows {structure} \
         structure with {} technical keywords identified. For comprehensive AI-powered analysis \
         including detailed formatting, ATS compatibility, and industry-specific recommendations, \
         please ensure the AI analysis backend is properly configured.",
        signals.sections.detected_count(),
        signals.keywords.len(),
    )
}

fn build_detailed_analysis(signals: &TextSignals<'_>) -> DetailedAnalysis {
    let achievements = if signals.achievement {
        "Some quantifiable achievements found."
    } else {
        "Consider adding more specific metrics and achievements."
    };

    DetailedAnalysis {
        formatting: "Unable to analyze formatting details without AI processing. Consider checking \
                     for consistent fonts, proper spacing, and clean layout."
            .to_string(),
        content: format!(
            "Content analysis shows {} characters with {} technical terms detected. {achievements}",
            signals.char_count,
            signals.keywords.len(),
        ),
        ats_compatibility: "Basic keyword analysis completed. For detailed ATS compatibility \
                            assessment, AI analysis is recommended."
            .to_string(),
        professional_impact: "Professional impact assessment requires AI analysis for comprehensive \
                              evaluation of market appeal and industry alignment."
            .to_string(),
    }
}

fn build_experience_analysis(signals: &TextSignals<'_>) -> ExperienceAnalysis {
    ExperienceAnalysis {
        years_of_experience: signals
            .years
            .map(String::from)
            .unwrap_or_else(|| "Not clearly specified".to_string()),
        career_progression: "Career progression analysis requires AI processing for detailed \
                             evaluation"
            .to_string(),
        achievement_quality: if signals.achievement {
            "Some quantifiable achievements detected"
        } else {
            "Limited quantifiable achievements found"
        }
        .to_string(),
    }
}

fn build_improvement_priority(signals: &TextSignals<'_>) -> Vec<String> {
    let first = if signals.sections.summary {
        "Enhance existing content with more details"
    } else {
        "Add professional summary section"
    };
    let second = if signals.keywords.len() < KEYWORD_BONUS_THRESHOLD {
        "Include more relevant technical keywords"
    } else {
        "Optimize keyword placement and density"
    };
    let third = if signals.metrics {
        "Improve formatting and visual presentation"
    } else {
        "Add quantifiable achievements and metrics"
    };

    vec![first.to_string(), second.to_string(), third.to_string()]
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
