// Prompts for résumé ↔ job match analysis.

pub const MATCH_ANALYSIS_SYSTEM: &str = "You are an expert technical recruiter and career coach. \
    You give specific, actionable job-search advice grounded only in the documents provided. \
    You MUST respond with valid JSON only. Do NOT include any text outside the JSON object.";

pub const MATCH_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Cross-check the job description and the résumé below and perform five tasks:

1. strengths_analysis: list the skills or experiences in the résumé that directly match the job. For each, explain briefly why it matters for this role.
2. skill_gaps: list key skills the job requires that the résumé does not mention. Mark each one's importance as "core" (a hard requirement) or "bonus" (nice to have).
3. interview_questions: write 2 to 3 technical or situational questions an interviewer is most likely to ask this candidate for this role.
4. overall_suggestion: one sentence summarising how the candidate should improve the résumé for this job.
5. match_score: an integer from 0 to 100 for the overall fit, where 100 is a perfect match and 0 is no match.

Return exactly this JSON shape:

{
  "strengths_analysis": [{"skill": "<string>", "relevance": "<string>"}],
  "skill_gaps": [{"skill": "<string>", "importance": "core" | "bonus"}],
  "interview_questions": ["<string>"],
  "overall_suggestion": "<string>",
  "match_score": <integer 0-100>
}

---
<job_description>
{job_description}
</job_description>
---
<resume>
{resume_text}
</resume>
"#;
