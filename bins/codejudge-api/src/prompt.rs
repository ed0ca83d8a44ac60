// Review prompt rendering

pub const SYSTEM_PROMPT: &str = "You are an elite code reviewer, algorithm expert, and interview coach.
Your goal is to provide comprehensive, multi-dimensional code analysis that goes beyond basic evaluation.
Identify ALL possible algorithm patterns, provide interview-ready insights, and mentor the student.
Always respond in valid JSON format only, with no additional text before or after the JSON.";

/// Schema the model is asked to fill, followed by the completeness rules for code examples
const RESPONSE_SCHEMA: &str = r#"Provide your analysis in this EXACT JSON structure with ALL fields:

{
  "problem_understanding": "Brief description of what the code attempts to solve",

  "identified_patterns": [
    {
      "pattern_name": "Primary algorithm/pattern name (e.g., Two Pointer, Sliding Window, Dynamic Programming)",
      "confidence": "percentage (e.g., 85%)",
      "description": "Why this pattern fits"
    },
    {
      "pattern_name": "Secondary or alternative pattern detected",
      "confidence": "percentage",
      "description": "Alternative interpretation"
    }
  ],

  "logic_evaluation": {
    "is_correct": true/false,
    "correctness_confidence": "percentage (e.g., 90%)",
    "explanation": "Detailed logic analysis with reasoning",
    "edge_cases_coverage": {
      "score": "X/5",
      "covered": ["list of handled edge cases"],
      "not_covered": ["list of missing edge cases"],
      "critical_gaps": ["most important missing validations"]
    }
  },

  "complexity_analysis": {
    "time_complexity": {
      "current": "Big-O notation",
      "justification": "Step-by-step breakdown",
      "best_case": "Best case Big-O",
      "worst_case": "Worst case Big-O",
      "average_case": "Average case Big-O"
    },
    "space_complexity": {
      "current": "Big-O notation",
      "justification": "Memory usage breakdown",
      "auxiliary_space": "Extra space used"
    },
    "comparison_table": {
      "current_approach": {
        "time": "Big-O",
        "space": "Big-O"
      },
      "optimized_approach": {
        "time": "Potential better Big-O",
        "space": "Potential better Big-O",
        "description": "Brief description of optimized approach"
      }
    },
    "scalability_impact": "How this performs with large inputs (n > 10^4)"
  },

  "performance_issues": [
    {
      "issue": "Specific performance problem",
      "severity": "High/Medium/Low",
      "location": "Where in code",
      "impact": "Real-world consequence"
    }
  ],

  "optimization_suggestions": [
    {
      "suggestion": "Specific optimization",
      "expected_improvement": "e.g., O(n²) → O(n log n)",
      "difficulty": "Easy/Medium/Hard",
      "priority": "High/Medium/Low"
    }
  ],

  "alternative_approaches": [
    {
      "approach_name": "Alternative algorithm/pattern name",
      "description": "How it works conceptually",
      "complexity": "Time and space complexity",
      "when_to_use": "Best use case"
    }
  ],

  "code_quality": {
    "readability_score": 1-10,
    "maintainability_score": 1-10,
    "style_score": 1-10,
    "comments": "Detailed assessment of code style and readability",
    "good_practices": ["list of good coding practices found"],
    "bad_practices": ["list of issues found"]
  },

  "interview_perspective": {
    "would_pass_interview": true/false,
    "interview_level": "Entry/Mid/Senior",
    "feedback": "What interviewer would say about this solution",
    "follow_up_questions": [
      "Question 1 interviewer might ask",
      "Question 2 based on the code",
      "Question 3 to test deeper understanding"
    ],
    "hints_for_optimization": ["Hint without giving full solution"]
  },

  "learning_recommendations": {
    "concepts_to_review": ["Topics student should study based on code"],
    "similar_problems": ["Related problems to practice"],
    "resources": ["Suggested learning resources or topics"]
  },

  "risk_analysis": {
    "performance_risk": "Low/Medium/High and why",
    "memory_risk": "Assessment of memory safety",
    "edge_case_risk": "Risk of edge case failures",
    "production_readiness": "Would this work in production?"
  },

  "scoring": {
    "logic_correctness": "X/10",
    "efficiency": "X/10",
    "code_quality": "X/10",
    "scalability": "X/10",
    "overall_score": "X/10",
    "grade": "A+/A/B+/B/C/D/F"
  },

  "improved_code_snippet": "Optional: Show key optimization (not full rewrite)",

  "overall_feedback": "Comprehensive summary with encouragement and clear next steps",

  "template_similarity": {
    "resembles_common_pattern": true/false,
    "pattern_name": "If resembles a known template",
    "uniqueness_score": "X/10"
  },

  "progressive_improvements": {
    "current_score": "Current overall score (e.g., 5/10)",
    "improvement_path": [
      {
        "target_score": "6/10",
        "what_to_improve": "Specific improvement needed to reach this score",
        "code_example": "COMPLETE, FULL working code - NOT snippets. Show the ENTIRE solution with all imports, main method, and logic. NO ellipsis (...) or truncation.",
        "key_changes": ["List of specific changes made"]
      },
      {
        "target_score": "7/10",
        "what_to_improve": "Next level improvement",
        "code_example": "COMPLETE, FULL working code with cumulative improvements. Show ENTIRE solution from imports to closing braces. NO ... or partial code.",
        "key_changes": ["Additional changes on top of previous"]
      },
      {
        "target_score": "8/10",
        "what_to_improve": "Advanced optimization",
        "code_example": "COMPLETE, FULL optimized code. Show the COMPLETE working solution. NO truncation or ellipsis.",
        "key_changes": ["Further improvements"]
      },
      {
        "target_score": "9-10/10",
        "what_to_improve": "Near-perfect solution",
        "code_example": "COMPLETE, FULL production-ready code. Show the ENTIRE highly optimized solution with all details. NO ... or shortcuts.",
        "key_changes": ["Final touches for excellence"]
      }
    ]
  }
}

CRITICAL: Each code_example MUST be COMPLETE, RUNNABLE code with:
- All necessary imports
- Complete class/function definitions
- Full implementation (NO // ... or ellipsis)
- All edge case handling
- Closing braces and proper syntax

For scores below 8/10, ALWAYS provide the progressive_improvements section with FULL, COMPLETE code examples at each level.
Be thorough, insightful, and educational. Identify ALL possible patterns the code might be using."#;

/// Render the user message for a review of `code`
pub fn user_prompt(language: &str, code: &str, problem: Option<&str>) -> String {
    let context = problem
        .map(|p| format!("Problem Context: {}", p))
        .unwrap_or_default();

    format!(
        "Perform a comprehensive, competition-grade analysis of the following {language} code.\n\
         {context}\n\
         \n\
         Code to review:\n\
         ```{language}\n\
         {code}\n\
         ```\n\
         \n\
         {RESPONSE_SCHEMA}"
    )
}
