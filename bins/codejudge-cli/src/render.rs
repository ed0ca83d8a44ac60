// Terminal rendering for run results and review reports
use anyhow::{Context, Result};
use codejudge_common::review::{ReviewReport, Score};
use codejudge_common::types::{ReviewMetadata, RunResult};
use handlebars::Handlebars;
use serde_json::{json, Value};

const RULE: &str = "─────────────────────────────────────";

const REVIEW_TEMPLATE: &str = r#"
═══ AI Code Review Report ═══
{{meta.language}} • {{meta.timestamp}} • {{meta.model}}{{#if meta.tokens}} • {{meta.tokens}} tokens{{/if}}

{{#if scoring}}
🏆 Overall {{scoring.overall}}  Grade {{scoring.grade}} ({{scoring.band}})
   Logic {{scoring.logic}} | Efficiency {{scoring.efficiency}} | Quality {{scoring.quality}} | Scalability {{scoring.scalability}}
{{/if}}

{{#if problem}}
🎯 Problem Understanding
   {{problem}}
{{/if}}

{{#if patterns}}
🧩 Identified Patterns
{{#each patterns}}
   • {{name}}{{#if confidence}} ({{confidence}}){{/if}}{{#if description}}: {{description}}{{/if}}
{{/each}}
{{/if}}

{{#if logic}}
✅ Logic Evaluation: {{logic.verdict}}{{#if logic.confidence}} ({{logic.confidence}} confidence){{/if}}
{{#if logic.explanation}}
   {{logic.explanation}}
{{/if}}
{{#if logic.edge_score}}
   Edge cases: {{logic.edge_score}}
{{/if}}
{{#each logic.covered}}
   ✓ {{this}}
{{/each}}
{{#each logic.not_covered}}
   ✗ {{this}}
{{/each}}
{{#each logic.critical_gaps}}
   ⚠ {{this}}
{{/each}}
{{/if}}

{{#if complexity}}
⏱  Complexity
   Time:  {{complexity.time}}{{#if complexity.time_cases}} ({{complexity.time_cases}}){{/if}}
   Space: {{complexity.space}}{{#if complexity.auxiliary}} (auxiliary {{complexity.auxiliary}}){{/if}}
{{#if complexity.optimized}}
   Optimized: {{complexity.optimized}}
{{/if}}
{{#if complexity.scalability}}
   Scalability: {{complexity.scalability}}
{{/if}}
{{/if}}

{{#if issues}}
🐢 Performance Issues
{{#each issues}}
   [{{severity}}] {{issue}}{{#if location}} @ {{location}}{{/if}}{{#if impact}}: {{impact}}{{/if}}
{{/each}}
{{/if}}

{{#if suggestions}}
💡 Optimization Suggestions
{{#each suggestions}}
   • {{suggestion}}{{#if improvement}} [{{improvement}}]{{/if}}{{#if detail}} ({{detail}}){{/if}}
{{/each}}
{{/if}}

{{#if alternatives}}
🔀 Alternative Approaches
{{#each alternatives}}
   • {{name}}{{#if complexity}} [{{complexity}}]{{/if}}{{#if description}}: {{description}}{{/if}}{{#if when}} Use when: {{when}}{{/if}}
{{/each}}
{{/if}}

{{#if quality}}
📝 Code Quality: readability {{quality.readability}} | maintainability {{quality.maintainability}} | style {{quality.style}}
{{#if quality.comments}}
   {{quality.comments}}
{{/if}}
{{#each quality.good}}
   + {{this}}
{{/each}}
{{#each quality.bad}}
   - {{this}}
{{/each}}
{{/if}}

{{#if interview}}
🎤 Interview Perspective: {{interview.verdict}}{{#if interview.level}} ({{interview.level}} level){{/if}}
{{#if interview.feedback}}
   {{interview.feedback}}
{{/if}}
{{#each interview.questions}}
   ? {{this}}
{{/each}}
{{#each interview.hints}}
   → {{this}}
{{/each}}
{{/if}}

{{#if learning}}
📚 Learning
{{#each learning.concepts}}
   • Review: {{this}}
{{/each}}
{{#each learning.problems}}
   • Practice: {{this}}
{{/each}}
{{#each learning.resources}}
   • Resource: {{this}}
{{/each}}
{{/if}}

{{#if risk}}
🛡  Risk Analysis
{{#each risk}}
   {{label}}: {{value}}
{{/each}}
{{/if}}

{{#if similarity}}
🧬 Template Similarity: {{similarity}}
{{/if}}

{{#if improved_snippet}}
🔧 Improved Snippet
{{improved_snippet}}
{{/if}}

{{#if feedback}}
💬 Overall Feedback
   {{feedback}}
{{/if}}

{{#if improvements}}
📈 Progressive Improvements{{#if improvements.current}} (current {{improvements.current}}){{/if}}
{{#each improvements.steps}}

── Step {{step}}: {{target}} ──
{{#if what}}
   {{what}}
{{/if}}
{{#each changes}}
   • {{this}}
{{/each}}
{{#if code}}

{{code}}
{{/if}}
{{/each}}
{{/if}}
"#;

/// Band used to colour a 0-10 score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

pub fn score_band(score: f64) -> ScoreBand {
    if score >= 8.0 {
        ScoreBand::High
    } else if score >= 6.0 {
        ScoreBand::Medium
    } else {
        ScoreBand::Low
    }
}

pub fn grade_label(grade: &str) -> &'static str {
    match grade.trim().chars().next() {
        Some('A') => "excellent",
        Some('B') => "good",
        Some('C') => "fair",
        _ => "needs work",
    }
}

/// Remove markdown code fences the model sometimes wraps code examples in
pub fn strip_code_fences(code: &str) -> String {
    let mut lines = Vec::new();
    for line in code.lines() {
        let trimmed = line.trim_end();
        if let Some(rest) = trimmed.strip_prefix("```") {
            if rest.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '+' || c == '#') {
                continue;
            }
        }
        lines.push(trimmed.strip_suffix("```").unwrap_or(line));
    }
    lines.join("\n").trim().to_string()
}

/// Text shown for a run result, and whether the execution succeeded
pub fn render_run(result: &RunResult) -> (String, bool) {
    if !result.is_success() {
        let text = result
            .error
            .clone()
            .or_else(|| result.exception.clone())
            .or_else(|| result.message.clone())
            .unwrap_or_else(|| "Execution failed".to_string());
        return (text, false);
    }

    let stdout = result.stdout.as_deref().unwrap_or("");
    let stderr = result.stderr.as_deref().unwrap_or("");

    let mut out = String::new();
    out.push_str(stdout);
    out.push_str(stderr);
    if stdout.is_empty() && stderr.is_empty() {
        out.push_str("(Program executed but produced no output)");
    }

    out.push_str(&format!("\n\n{}\n", RULE));
    out.push_str(&format!(
        "✓ Execution Time: {}ms\n",
        result.execution_time.unwrap_or(0.0)
    ));
    out.push_str(&format!(
        "✓ Memory Used: {:.2} KB\n",
        result.memory_used.unwrap_or(0.0) / 1024.0
    ));
    if let Some(ms) = result.compilation_time.filter(|ms| *ms > 0.0) {
        out.push_str(&format!("✓ Compilation Time: {}ms\n", ms));
    }

    (out, true)
}

fn text(score: &Option<Score>) -> String {
    score
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn opt(s: &Option<String>) -> Value {
    match s.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => json!(v),
        _ => Value::Null,
    }
}

fn list<T>(items: &[T]) -> Option<&[T]> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Flatten the report into the shape the template expects
fn review_view(report: &ReviewReport, meta: &ReviewMetadata) -> Value {
    let scoring = report.scoring.as_ref().map(|s| {
        let band = match s.overall_score.as_ref().and_then(Score::value) {
            Some(v) => format!("{:?}", score_band(v)).to_lowercase(),
            None => String::new(),
        };
        let grade = s.grade.clone().unwrap_or_else(|| "-".to_string());
        json!({
            "overall": text(&s.overall_score),
            "band": if band.is_empty() { grade_label(&grade).to_string() } else { format!("{}, {}", grade_label(&grade), band) },
            "grade": grade,
            "logic": text(&s.logic_correctness),
            "efficiency": text(&s.efficiency),
            "quality": text(&s.code_quality),
            "scalability": text(&s.scalability),
        })
    });

    let patterns: Vec<Value> = report
        .identified_patterns
        .iter()
        .map(|p| {
            json!({
                "name": p.pattern_name.clone().unwrap_or_else(|| "Unnamed pattern".to_string()),
                "confidence": p.confidence.as_ref().map(|c| c.to_string()),
                "description": opt(&p.description),
            })
        })
        .collect();

    let logic = report.logic_evaluation.as_ref().map(|l| {
        let verdict = match &l.is_correct {
            Some(flag) if flag.is_set() => "correct",
            Some(_) => "incorrect",
            None => "unknown",
        };
        let coverage = l.edge_cases_coverage.clone().unwrap_or_default();
        json!({
            "verdict": verdict,
            "confidence": l.correctness_confidence.as_ref().map(|c| c.to_string()),
            "explanation": opt(&l.explanation),
            "edge_score": coverage.score.as_ref().map(|c| c.to_string()),
            "covered": coverage.covered,
            "not_covered": coverage.not_covered,
            "critical_gaps": coverage.critical_gaps,
        })
    });

    let complexity = report.complexity_analysis.as_ref().map(|c| {
        let time = c.time_complexity.clone().unwrap_or_default();
        let space = c.space_complexity.clone().unwrap_or_default();
        let cases: Vec<String> = [
            ("best", &time.best_case),
            ("avg", &time.average_case),
            ("worst", &time.worst_case),
        ]
        .iter()
        .filter_map(|(label, v)| v.as_ref().map(|v| format!("{} {}", label, v)))
        .collect();
        let optimized = c
            .comparison_table
            .as_ref()
            .and_then(|t| t.optimized_approach.as_ref())
            .map(|o| {
                let mut s = format!(
                    "time {} / space {}",
                    o.time.as_deref().unwrap_or("-"),
                    o.space.as_deref().unwrap_or("-")
                );
                if let Some(d) = o.description.as_deref() {
                    s.push_str(&format!(" - {}", d));
                }
                s
            });
        json!({
            "time": time.current.unwrap_or_else(|| "-".to_string()),
            "time_cases": if cases.is_empty() { Value::Null } else { json!(cases.join(", ")) },
            "space": space.current.unwrap_or_else(|| "-".to_string()),
            "auxiliary": opt(&space.auxiliary_space),
            "optimized": optimized,
            "scalability": opt(&c.scalability_impact),
        })
    });

    let issues: Vec<Value> = report
        .performance_issues
        .iter()
        .map(|i| {
            json!({
                "severity": i.severity.clone().unwrap_or_else(|| "?".to_string()),
                "issue": i.issue.clone().unwrap_or_default(),
                "location": opt(&i.location),
                "impact": opt(&i.impact),
            })
        })
        .collect();

    let suggestions: Vec<Value> = report
        .optimization_suggestions
        .iter()
        .map(|s| {
            let detail: Vec<String> = [
                s.priority.as_ref().map(|p| format!("priority {}", p)),
                s.difficulty.as_ref().map(|d| format!("difficulty {}", d)),
            ]
            .into_iter()
            .flatten()
            .collect();
            json!({
                "suggestion": s.suggestion.clone().unwrap_or_default(),
                "improvement": opt(&s.expected_improvement),
                "detail": if detail.is_empty() { Value::Null } else { json!(detail.join(", ")) },
            })
        })
        .collect();

    let alternatives: Vec<Value> = report
        .alternative_approaches
        .iter()
        .map(|a| {
            json!({
                "name": a.approach_name.clone().unwrap_or_default(),
                "complexity": opt(&a.complexity),
                "description": opt(&a.description),
                "when": opt(&a.when_to_use),
            })
        })
        .collect();

    let quality = report.code_quality.as_ref().map(|q| {
        json!({
            "readability": text(&q.readability_score),
            "maintainability": text(&q.maintainability_score),
            "style": text(&q.style_score),
            "comments": opt(&q.comments),
            "good": q.good_practices,
            "bad": q.bad_practices,
        })
    });

    let interview = report.interview_perspective.as_ref().map(|i| {
        let verdict = match &i.would_pass_interview {
            Some(flag) if flag.is_set() => "would pass",
            Some(_) => "would not pass",
            None => "no verdict",
        };
        json!({
            "verdict": verdict,
            "level": opt(&i.interview_level),
            "feedback": opt(&i.feedback),
            "questions": i.follow_up_questions,
            "hints": i.hints_for_optimization,
        })
    });

    let learning = report.learning_recommendations.as_ref().map(|l| {
        json!({
            "concepts": l.concepts_to_review,
            "problems": l.similar_problems,
            "resources": l.resources,
        })
    });

    let risk = report.risk_analysis.as_ref().map(|r| {
        let rows: Vec<Value> = [
            ("Performance", &r.performance_risk),
            ("Memory", &r.memory_risk),
            ("Edge cases", &r.edge_case_risk),
            ("Production", &r.production_readiness),
        ]
        .iter()
        .filter_map(|(label, v)| v.as_ref().map(|v| json!({"label": label, "value": v})))
        .collect();
        rows
    });

    let similarity = report.template_similarity.as_ref().map(|t| {
        let resembles = t.resembles_common_pattern.as_ref().is_some_and(|f| f.is_set());
        let mut s = if resembles {
            format!(
                "resembles {}",
                t.pattern_name.as_deref().unwrap_or("a common template")
            )
        } else {
            "original approach".to_string()
        };
        if let Some(u) = &t.uniqueness_score {
            s.push_str(&format!(", uniqueness {}", u));
        }
        s
    });

    let improvements = report.progressive_improvements.as_ref().map(|p| {
        let steps: Vec<Value> = p
            .improvement_path
            .iter()
            .enumerate()
            .map(|(idx, step)| {
                json!({
                    "step": idx + 1,
                    "target": text(&step.target_score),
                    "what": opt(&step.what_to_improve),
                    "changes": step.key_changes,
                    "code": step.code_example.as_deref().map(strip_code_fences),
                })
            })
            .collect();
        json!({
            "current": p.current_score.as_ref().map(|s| s.to_string()),
            "steps": steps,
        })
    });

    json!({
        "meta": {
            "language": meta.language,
            "timestamp": meta.timestamp,
            "model": meta.model,
            "tokens": if meta.tokens_used > 0 { json!(meta.tokens_used) } else { Value::Null },
        },
        "scoring": scoring,
        "problem": opt(&report.problem_understanding),
        "patterns": list(&patterns),
        "logic": logic,
        "complexity": complexity,
        "issues": list(&issues),
        "suggestions": list(&suggestions),
        "alternatives": list(&alternatives),
        "quality": quality,
        "interview": interview,
        "learning": learning,
        "risk": risk.filter(|rows| !rows.is_empty()),
        "similarity": similarity,
        "improved_snippet": report.improved_code_snippet.as_deref().map(strip_code_fences),
        "feedback": opt(&report.overall_feedback),
        "improvements": improvements,
    })
}

/// Collapse the blank lines left behind by skipped template sections
fn squeeze_blank_lines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut blanks = 0;
    for line in s.lines() {
        if line.trim().is_empty() {
            blanks += 1;
            if blanks > 1 {
                continue;
            }
        } else {
            blanks = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

pub fn render_review(report: &ReviewReport, meta: &ReviewMetadata) -> Result<String> {
    let mut handlebars = Handlebars::new();
    // Terminal output, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string("review", REVIEW_TEMPLATE)
        .context("Failed to register review template")?;

    let rendered = handlebars
        .render("review", &review_view(report, meta))
        .context("Failed to render review report")?;

    Ok(squeeze_blank_lines(&rendered))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ReviewMetadata {
        ReviewMetadata {
            model: "llama-3.1-8b-instant".to_string(),
            language: "python".to_string(),
            timestamp: "2026-10-18T09:30:00.000Z".to_string(),
            tokens_used: 1500,
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```python\nprint(1)\n```"),
            "print(1)"
        );
        assert_eq!(strip_code_fences("```\nx = 1\ny = 2\n```\n"), "x = 1\ny = 2");
        assert_eq!(strip_code_fences("plain code"), "plain code");
        assert_eq!(strip_code_fences("```cpp\nint x;```"), "int x;");
    }

    #[test]
    fn test_bands() {
        assert_eq!(score_band(8.0), ScoreBand::High);
        assert_eq!(score_band(6.5), ScoreBand::Medium);
        assert_eq!(score_band(3.0), ScoreBand::Low);
        assert_eq!(grade_label("A+"), "excellent");
        assert_eq!(grade_label("B"), "good");
        assert_eq!(grade_label("C"), "fair");
        assert_eq!(grade_label("F"), "needs work");
    }

    #[test]
    fn test_render_run_success_with_metrics() {
        let result = RunResult {
            status: Some("success".to_string()),
            stdout: Some("42\n".to_string()),
            execution_time: Some(31.0),
            memory_used: Some(2048.0),
            compilation_time: Some(120.0),
            ..Default::default()
        };
        let (text, ok) = render_run(&result);
        assert!(ok);
        assert!(text.starts_with("42\n"));
        assert!(text.contains("✓ Execution Time: 31ms"));
        assert!(text.contains("✓ Memory Used: 2.00 KB"));
        assert!(text.contains("✓ Compilation Time: 120ms"));
    }

    #[test]
    fn test_render_run_without_output() {
        let result = RunResult {
            status: Some("success".to_string()),
            compilation_time: Some(0.0),
            ..Default::default()
        };
        let (text, ok) = render_run(&result);
        assert!(ok);
        assert!(text.starts_with("(Program executed but produced no output)"));
        assert!(!text.contains("Compilation Time"));
    }

    #[test]
    fn test_render_run_failure() {
        let result = RunResult {
            status: Some("error".to_string()),
            error: Some("Code execution failed".to_string()),
            ..Default::default()
        };
        assert_eq!(render_run(&result), ("Code execution failed".to_string(), false));

        let (text, ok) = render_run(&RunResult::default());
        assert!(!ok);
        assert_eq!(text, "Execution failed");
    }

    #[test]
    fn test_render_review_report() {
        let report: ReviewReport = serde_json::from_value(json!({
            "problem_understanding": "Find the maximum subarray sum",
            "identified_patterns": [
                {"pattern_name": "Kadane's Algorithm", "confidence": "92%", "description": "Running max"}
            ],
            "logic_evaluation": {
                "is_correct": true,
                "edge_cases_coverage": {"score": "4/5", "not_covered": ["all negative"]}
            },
            "optimization_suggestions": [
                {"suggestion": "Avoid copying", "expected_improvement": "O(n²) → O(n)"}
            ],
            "scoring": {"overall_score": "8/10", "grade": "A"},
            "progressive_improvements": {
                "current_score": "8/10",
                "improvement_path": [{
                    "target_score": "9-10/10",
                    "what_to_improve": "Handle empty input",
                    "code_example": "```python\nif a < b:\n    print(a)\n```",
                    "key_changes": ["guard"]
                }]
            }
        }))
        .unwrap();

        let text = render_review(&report, &meta()).unwrap();
        assert!(text.starts_with("═══ AI Code Review Report ═══"));
        assert!(text.contains("python • 2026-10-18T09:30:00.000Z • llama-3.1-8b-instant • 1500 tokens"));
        assert!(text.contains("Grade A (excellent, high)"));
        assert!(text.contains("• Kadane's Algorithm (92%): Running max"));
        assert!(text.contains("✅ Logic Evaluation: correct"));
        assert!(text.contains("✗ all negative"));
        assert!(text.contains("[O(n²) → O(n)]"));
        assert!(text.contains("── Step 1: 9-10/10 ──"));
        assert!(text.contains("if a < b:\n    print(a)"));
        assert!(!text.contains("```"));
        assert!(!text.contains("&lt;"));
        assert!(!text.contains("Risk Analysis"));
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn test_render_empty_report() {
        let text = render_review(&ReviewReport::default(), &meta()).unwrap();
        assert!(text.starts_with("═══ AI Code Review Report ═══"));
        assert!(!text.contains("Overall"));
    }
}
