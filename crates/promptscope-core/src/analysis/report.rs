//! Best-effort reading of the `Response N:` blocks the analysis prompt asks for.
//!
//! The model's formatting is not guaranteed, so nothing here fails: text that
//! does not look like a report block is skipped and missing fields stay empty.
//! The raw analysis is always kept alongside whatever this extracts.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseEntry {
    pub index: u32,
    pub agent_response: String,
    pub relevant_segments: String,
    /// `None` when missing, unparseable or outside `0.0..=1.0`.
    pub influence_score: Option<f64>,
    pub evidence: String,
    pub explanation: String,
    pub user_influence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfluenceReport {
    pub entries: Vec<ResponseEntry>,
}

#[derive(Clone, Copy)]
enum Field {
    AgentResponse,
    RelevantSegments,
    InfluenceScore,
    Evidence,
    Explanation,
    UserInfluence,
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[\s#*]*response\s+(\d+)\s*:?[\s*]*$").expect("valid header regex")
    })
}

fn field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:[-*]\s+)?\**(agent response|relevant (?:system prompt )?segments|influence score|evidence|explanation|user influence)\**\s*:\s*\**\s*(.*)$",
        )
        .expect("valid field regex")
    })
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?(?:\d+(?:\.\d+)?|\.\d+)").expect("valid number regex"))
}

fn classify(label: &str) -> Field {
    let label = label.to_ascii_lowercase();
    if label.starts_with("agent") {
        Field::AgentResponse
    } else if label.starts_with("relevant") {
        Field::RelevantSegments
    } else if label.starts_with("influence") {
        Field::InfluenceScore
    } else if label.starts_with("evidence") {
        Field::Evidence
    } else if label.starts_with("explanation") {
        Field::Explanation
    } else {
        Field::UserInfluence
    }
}

fn parse_score(text: &str) -> Option<f64> {
    let m = number_re().find(text)?;
    let score: f64 = m.as_str().parse().ok()?;
    (0.0..=1.0).contains(&score).then_some(score)
}

/// Text slot for a field; the score has none since it is parsed in place.
fn slot(entry: &mut ResponseEntry, field: Field) -> Option<&mut String> {
    match field {
        Field::AgentResponse => Some(&mut entry.agent_response),
        Field::RelevantSegments => Some(&mut entry.relevant_segments),
        Field::Evidence => Some(&mut entry.evidence),
        Field::Explanation => Some(&mut entry.explanation),
        Field::UserInfluence => Some(&mut entry.user_influence),
        Field::InfluenceScore => None,
    }
}

fn push_text(target: &mut String, text: &str) {
    let text = text.trim().trim_end_matches("**").trim();
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(text);
}

impl InfluenceReport {
    pub fn parse(raw: &str) -> Self {
        let mut entries: Vec<ResponseEntry> = Vec::new();
        let mut current: Option<ResponseEntry> = None;
        let mut field: Option<Field> = None;

        for line in raw.lines() {
            if line.trim() == "```" {
                continue;
            }

            if let Some(caps) = header_re().captures(line) {
                if let Some(done) = current.take() {
                    entries.push(done);
                }
                let index = caps[1].parse().unwrap_or(entries.len() as u32 + 1);
                current = Some(ResponseEntry {
                    index,
                    ..Default::default()
                });
                field = None;
                continue;
            }

            let Some(entry) = current.as_mut() else {
                continue;
            };

            if let Some(caps) = field_re().captures(line) {
                let f = classify(&caps[1]);
                let value = caps.get(2).map_or("", |m| m.as_str());
                match slot(entry, f) {
                    Some(target) => {
                        push_text(target, strip_quotes(value));
                        field = Some(f);
                    }
                    None => {
                        entry.influence_score = parse_score(value);
                        field = None;
                    }
                }
                continue;
            }

            // Continuation of a multi-line field value.
            if let Some(target) = field.and_then(|f| slot(entry, f)) {
                push_text(target, line);
            }
        }

        if let Some(done) = current.take() {
            entries.push(done);
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean of the parsed influence scores, if any were found.
    pub fn mean_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self.entries.iter().filter_map(|e| e.influence_score).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}

fn strip_quotes(value: &str) -> &str {
    let v = value.trim();
    v.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .filter(|inner| !inner.contains('"'))
        .unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"
Response 1:
- Agent Response: "hello!"
- Relevant Segments: ["Be polite."]
- Influence Score: 0.85
- Evidence: "Be polite." -> "hello!"
- Explanation: The greeting reflects the politeness rule.
- User Influence: "hi"

Response 2:
- Agent Response: "Anything else?"
- Relevant Segments: []
- Influence Score: 0.10
- Evidence: none
- Explanation: Generic follow-up.
- User Influence: None
"#;

    #[test]
    fn parses_well_formed_blocks() {
        let report = InfluenceReport::parse(WELL_FORMED);
        assert_eq!(report.entries.len(), 2);

        let first = &report.entries[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.agent_response, "hello!");
        assert_eq!(first.relevant_segments, r#"["Be polite."]"#);
        assert_eq!(first.influence_score, Some(0.85));
        assert_eq!(first.explanation, "The greeting reflects the politeness rule.");
        assert_eq!(first.user_influence, "hi");
        assert_eq!(first.evidence, r#""Be polite." -> "hello!""#);

        assert_eq!(report.entries[1].index, 2);
        assert_eq!(report.entries[1].influence_score, Some(0.10));
    }

    #[test]
    fn tolerates_markdown_decoration_and_fences() {
        let raw = "```\n### **Response 3:**\n* **Influence Score:** 0.5\n* **Explanation:** first line\n  second line\n```";
        let report = InfluenceReport::parse(raw);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].index, 3);
        assert_eq!(report.entries[0].influence_score, Some(0.5));
        assert_eq!(report.entries[0].explanation, "first line\nsecond line");
    }

    #[test]
    fn out_of_range_scores_are_dropped() {
        let report = InfluenceReport::parse("Response 1:\n- Influence Score: 7\n");
        assert_eq!(report.entries[0].influence_score, None);

        let report = InfluenceReport::parse("Response 1:\n- Influence Score: X.XX\n");
        assert_eq!(report.entries[0].influence_score, None);
    }

    #[test]
    fn negative_scores_are_dropped() {
        let report = InfluenceReport::parse("Response 1:\n- Influence Score: -0.5\n");
        assert_eq!(report.entries[0].influence_score, None);
        assert_eq!(report.mean_score(), None);

        assert_eq!(parse_score("-.25"), None);
        assert_eq!(parse_score("0.00"), Some(0.0));
        assert_eq!(parse_score("1.00"), Some(1.0));
    }

    #[test]
    fn free_text_yields_empty_report() {
        let report = InfluenceReport::parse("The system prompt had a mild effect overall.");
        assert!(report.is_empty());
        assert_eq!(report.mean_score(), None);
    }

    #[test]
    fn mean_score_ignores_missing_values() {
        let raw = "Response 1:\n- Influence Score: 0.8\nResponse 2:\n- Evidence: x\nResponse 3:\n- Influence Score: 0.4\n";
        let report = InfluenceReport::parse(raw);
        assert_eq!(report.entries.len(), 3);
        let mean = report.mean_score().unwrap();
        assert!((mean - 0.6).abs() < 1e-9);
    }
}
