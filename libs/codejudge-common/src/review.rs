//! Typed view of the review document produced by the LLM.
//!
//! The server never enforces this schema; it relays whatever JSON the model
//! returned. Every field is optional and scalar scores accept either numbers
//! or strings such as `"7/10"` or `"85%"`, so a partially-formed document
//! still renders.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number or free-form text, as LLMs emit both for the same field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Number(f64),
    Text(String),
}

impl Score {
    /// Leading numeric value: `"7/10"` → 7, `"85%"` → 85, `"9-10/10"` → 9
    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Number(n) => Some(*n),
            Score::Text(s) => {
                let s = s.trim();
                let end = s
                    .char_indices()
                    .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
                    .map(|(i, _)| i)
                    .unwrap_or(s.len());
                s[..end].parse().ok()
            }
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Score::Number(n) => write!(f, "{}", n),
            Score::Text(s) => f.write_str(s),
        }
    }
}

/// Boolean that tolerates `"true"`/`"yes"` strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewReport {
    pub problem_understanding: Option<String>,
    pub identified_patterns: Vec<Pattern>,
    pub logic_evaluation: Option<LogicEvaluation>,
    pub complexity_analysis: Option<ComplexityAnalysis>,
    pub performance_issues: Vec<PerformanceIssue>,
    pub optimization_suggestions: Vec<OptimizationSuggestion>,
    pub alternative_approaches: Vec<AlternativeApproach>,
    pub code_quality: Option<CodeQuality>,
    pub interview_perspective: Option<InterviewPerspective>,
    pub learning_recommendations: Option<LearningRecommendations>,
    pub risk_analysis: Option<RiskAnalysis>,
    pub scoring: Option<Scoring>,
    pub improved_code_snippet: Option<String>,
    pub overall_feedback: Option<String>,
    pub template_similarity: Option<TemplateSimilarity>,
    pub progressive_improvements: Option<ProgressiveImprovements>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pattern {
    pub pattern_name: Option<String>,
    pub confidence: Option<Score>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicEvaluation {
    pub is_correct: Option<Flag>,
    pub correctness_confidence: Option<Score>,
    pub explanation: Option<String>,
    pub edge_cases_coverage: Option<EdgeCaseCoverage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeCaseCoverage {
    pub score: Option<Score>,
    pub covered: Vec<String>,
    pub not_covered: Vec<String>,
    pub critical_gaps: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityAnalysis {
    pub time_complexity: Option<TimeComplexity>,
    pub space_complexity: Option<SpaceComplexity>,
    pub comparison_table: Option<ComparisonTable>,
    pub scalability_impact: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeComplexity {
    pub current: Option<String>,
    pub justification: Option<String>,
    pub best_case: Option<String>,
    pub worst_case: Option<String>,
    pub average_case: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceComplexity {
    pub current: Option<String>,
    pub justification: Option<String>,
    pub auxiliary_space: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonTable {
    pub current_approach: Option<ApproachCost>,
    pub optimized_approach: Option<ApproachCost>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachCost {
    pub time: Option<String>,
    pub space: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceIssue {
    pub issue: Option<String>,
    pub severity: Option<String>,
    pub location: Option<String>,
    pub impact: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSuggestion {
    pub suggestion: Option<String>,
    pub expected_improvement: Option<String>,
    pub difficulty: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternativeApproach {
    pub approach_name: Option<String>,
    pub description: Option<String>,
    pub complexity: Option<String>,
    pub when_to_use: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeQuality {
    pub readability_score: Option<Score>,
    pub maintainability_score: Option<Score>,
    pub style_score: Option<Score>,
    pub comments: Option<String>,
    pub good_practices: Vec<String>,
    pub bad_practices: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewPerspective {
    pub would_pass_interview: Option<Flag>,
    pub interview_level: Option<String>,
    pub feedback: Option<String>,
    pub follow_up_questions: Vec<String>,
    pub hints_for_optimization: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningRecommendations {
    pub concepts_to_review: Vec<String>,
    pub similar_problems: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAnalysis {
    pub performance_risk: Option<String>,
    pub memory_risk: Option<String>,
    pub edge_case_risk: Option<String>,
    pub production_readiness: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    pub logic_correctness: Option<Score>,
    pub efficiency: Option<Score>,
    pub code_quality: Option<Score>,
    pub scalability: Option<Score>,
    pub overall_score: Option<Score>,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSimilarity {
    pub resembles_common_pattern: Option<Flag>,
    pub pattern_name: Option<String>,
    pub uniqueness_score: Option<Score>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressiveImprovements {
    pub current_score: Option<Score>,
    pub improvement_path: Vec<ImprovementStep>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementStep {
    pub target_score: Option<Score>,
    pub what_to_improve: Option<String>,
    pub code_example: Option<String>,
    pub key_changes: Vec<String>,
}
