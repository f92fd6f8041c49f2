pub const ANALYZE_SYSTEM: &str = "You are an experienced technical recruiter who compares \
    resumes against job descriptions and reports the fit honestly.";

pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Compare the resume below against the job description.

Return a JSON object with exactly these fields:
{
  "match_score": <integer 0-100, how well the resume fits the role>,
  "matched_keywords": [<skills, tools or qualifications from the job description that the resume shows>],
  "missing_keywords": [<skills, tools or qualifications the job description asks for that the resume does not show>],
  "strengths": [<short phrases naming the strongest points of the resume for this role>],
  "suggestions": [<concrete edits that would improve the fit, without inventing experience>],
  "summary": "<two or three sentences>"
}

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}"#;

pub const TAILOR_SYSTEM: &str = "You are an expert resume writer. You rewrite resumes so they \
    speak directly to a target role while staying strictly truthful.";

pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Rewrite the resume below so it is tailored to the job description.

Rules:
- Keep the candidate's real employers, titles, dates and education.
- Reorder and rephrase bullets to foreground what the role asks for.
- Use the job description's terminology where the resume supports it.
- Use a {tone} tone.
- Output plain text only: section headings in CAPITALS on their own line, bullets starting with "- ".
- Do not add commentary before or after the resume.

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}"#;
