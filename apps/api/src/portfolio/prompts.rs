// Resume extraction prompt templates.
// All prompts for the portfolio module are defined here.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are a precise resume data extractor. \
You extract structured information from resume text into JSON. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Use null for any field not found in the source document; never omit a key \
and never fabricate a value.";

pub const RESUME_PARSE_PROMPT: &str = r#"Extract the following fields from the resume below, in JSON format strictly matching this structure:

{
  "name": string,
  "title": string | null,
  "email": string | null,
  "about": string,
  "status": string | null,

  "socialLinks": {
    "github": string | null,
    "linkedin": string | null,
    "twitter": string | null
  },

  "experience": [
    {
      "role": string,
      "company": string,
      "duration": string,
      "description": string
    }
  ],

  "projects": [
    {
      "title": string,
      "description": string,
      "tech": [string],
      "link": string | null
    }
  ],

  "education": [
    {
      "degree": string,
      "school": string,
      "year": string
    }
  ],

  "skills": [string]
}

Rules for extraction:
- Use null for missing fields. Never omit a key.
- Convert multi-line paragraphs into clean prose sentences.
- Extract only real skills & technologies.
- Duration should be in readable form (e.g., "2020 - 2022").
- If a project's technologies are not listed, infer reasonable tech based on context.
- If multiple emails or links appear, choose the most professional.
- Return ONLY the JSON object — nothing else, no code fences.

RESUME TEXT:
{resume_text}"#;
