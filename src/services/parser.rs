//! Recovers candidate titles from the oracle's free-form reply.
//!
//! The oracle is asked for `{"movies": [{"title": ..., "why": ...}]}` but may
//! wrap it in a markdown fence, surround it with prose, or ignore the format
//! entirely. Recovery runs in stages: fence narrowing, brace slicing, strict
//! JSON parsing, and finally (when enabled) a line scan for numbered or bold
//! titles.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::{error::OrchestrationError, models::Candidate};

/// Field of the reply object holding the list of picks
const MOVIES_FIELD: &str = "movies";

fn fenced_object() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z]*\s*(\{.*?\})\s*```").expect("fence pattern is valid")
    })
}

fn bold_title() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+?)\*\*").expect("bold pattern is valid"))
}

fn numbered_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+[.)]\s+(.+)$").expect("numbered pattern is valid"))
}

/// Parses oracle replies into ordered candidates
#[derive(Debug, Clone)]
pub struct ResponseParser {
    min_candidates: usize,
    line_fallback: bool,
}

impl ResponseParser {
    pub fn new(min_candidates: usize, line_fallback: bool) -> Self {
        Self {
            min_candidates: min_candidates.max(1),
            line_fallback,
        }
    }

    /// Extracts candidates in the order the oracle listed them
    pub fn parse(&self, raw: &str) -> Result<Vec<Candidate>, OrchestrationError> {
        if raw.trim().is_empty() {
            return Err(OrchestrationError::malformed("empty response"));
        }

        let structured = match parse_structured(raw) {
            Ok(candidates) => candidates,
            Err(reason) => {
                tracing::debug!(reason = %reason, "Structured parse failed");
                if !self.line_fallback {
                    return Err(OrchestrationError::malformed(reason));
                }

                let scanned = scan_lines(raw);
                tracing::info!(
                    candidates = scanned.len(),
                    "Recovered candidates from line scan"
                );
                if scanned.is_empty() {
                    return Err(OrchestrationError::malformed(format!(
                        "{}; no numbered or bold titles found",
                        reason
                    )));
                }
                scanned
            }
        };

        if structured.len() < self.min_candidates {
            return Err(OrchestrationError::malformed(format!(
                "expected at least {} movies, found {}",
                self.min_candidates,
                structured.len()
            )));
        }

        Ok(structured)
    }
}

/// Narrows the reply to the JSON object it most likely contains
fn extract_json(raw: &str) -> Option<&str> {
    let narrowed = fenced_object()
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw)
        .trim();

    if narrowed.starts_with('{') {
        return Some(narrowed);
    }

    let start = narrowed.find('{')?;
    let end = narrowed.rfind('}')?;
    (end > start).then(|| &narrowed[start..=end])
}

fn parse_structured(raw: &str) -> Result<Vec<Candidate>, String> {
    let json = extract_json(raw).ok_or_else(|| "no JSON object found".to_string())?;

    let value: Value =
        serde_json::from_str(json).map_err(|e| format!("invalid JSON: {}", e))?;

    let entries = value
        .get(MOVIES_FIELD)
        .ok_or_else(|| format!("missing '{}' field", MOVIES_FIELD))?
        .as_array()
        .ok_or_else(|| format!("'{}' is not a list", MOVIES_FIELD))?;

    let candidates: Vec<Candidate> = entries.iter().filter_map(candidate_from_entry).collect();

    if candidates.is_empty() {
        return Err(format!("'{}' has no titled entries", MOVIES_FIELD));
    }

    Ok(candidates)
}

fn candidate_from_entry(entry: &Value) -> Option<Candidate> {
    let title = entry.get("title")?.as_str()?.trim();
    if title.is_empty() {
        return None;
    }

    // `reason` is an accepted alias when `why` is absent or not a string
    let reason = entry
        .get("why")
        .and_then(Value::as_str)
        .or_else(|| entry.get("reason").and_then(Value::as_str))
        .map(str::trim)
        .unwrap_or_default();

    Some(Candidate::new(title, reason))
}

/// Picks one title per line from bold spans or numbered list items
fn scan_lines(raw: &str) -> Vec<Candidate> {
    raw.lines()
        .filter_map(|line| {
            let title = if let Some(caps) = bold_title().captures(line) {
                caps.get(1)?.as_str().trim().to_string()
            } else {
                let caps = numbered_line().captures(line)?;
                clean_numbered_title(caps.get(1)?.as_str())
            };

            let title = title.trim_matches(|c| c == '"' || c == '*' || c == '_');
            (!title.is_empty()).then(|| Candidate::new(title.trim(), ""))
        })
        .collect()
}

/// Cuts a numbered item down to its title: drops the year in parentheses and
/// any dash-separated description. Colons stay, they are part of many titles.
fn clean_numbered_title(item: &str) -> String {
    let mut title = item;
    for separator in ["(", " - ", " – "] {
        if let Some(idx) = title.find(separator) {
            title = &title[..idx];
        }
    }
    title.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const THREE_MOVIES: &str = r#"{"movies": [
        {"title": "Inception", "why": "mind-bending"},
        {"title": "The Matrix", "why": "reality questioning"},
        {"title": "Interstellar", "why": "epic scale"}
    ]}"#;

    fn titles(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_parse_plain_json_keeps_order() {
        let parser = ResponseParser::new(3, true);
        let candidates = parser.parse(THREE_MOVIES).unwrap();

        assert_eq!(titles(&candidates), vec!["Inception", "The Matrix", "Interstellar"]);
        assert_eq!(candidates[0].reason, "mind-bending");
    }

    #[test]
    fn test_fenced_json_matches_unwrapped() {
        let parser = ResponseParser::new(3, true);
        let fenced = format!("```json\n{}\n```", THREE_MOVIES);
        let bare_fence = format!("Here you go:\n```\n{}\n```\nEnjoy!", THREE_MOVIES);

        let expected = parser.parse(THREE_MOVIES).unwrap();
        assert_eq!(parser.parse(&fenced).unwrap(), expected);
        assert_eq!(parser.parse(&bare_fence).unwrap(), expected);
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let parser = ResponseParser::new(3, true);
        let raw = format!(
            "Sure! Based on your mood, here are some picks: {} Hope you like them.",
            THREE_MOVIES
        );

        let candidates = parser.parse(&raw).unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[2].title, "Interstellar");
    }

    #[test]
    fn test_empty_response_is_malformed() {
        let parser = ResponseParser::new(1, true);
        for raw in ["", "   \n\t "] {
            let err = parser.parse(raw).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedResponse);
        }
    }

    #[test]
    fn test_prose_without_titles_is_malformed() {
        let parser = ResponseParser::new(1, true);
        let err = parser
            .parse("I'm sorry, I can't recommend movies right now.")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_too_few_entries_is_malformed() {
        let parser = ResponseParser::new(3, true);
        let raw = r#"{"movies": [{"title": "Inception", "why": "mind-bending"}]}"#;

        let err = parser.parse(raw).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
        assert!(err.detail.contains("at least 3"));

        assert_eq!(ResponseParser::new(1, true).parse(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_reason_defaults_to_empty() {
        let parser = ResponseParser::new(1, false);
        let raw = r#"{"movies": [{"title": "Heat"}, {"title": "Ronin", "reason": "car chases"}]}"#;

        let candidates = parser.parse(raw).unwrap();
        assert_eq!(candidates[0].reason, "");
        assert_eq!(candidates[1].reason, "car chases");
    }

    #[test]
    fn test_reason_alias_used_when_why_is_not_text() {
        let parser = ResponseParser::new(1, false);
        let raw = r#"{"movies": [
            {"title": "Heat", "why": null, "reason": "slow-burn heist"},
            {"title": "Ronin", "why": 7, "reason": "car chases"},
            {"title": "Drive", "why": "neon noir", "reason": "ignored"}
        ]}"#;

        let candidates = parser.parse(raw).unwrap();
        assert_eq!(candidates[0].reason, "slow-burn heist");
        assert_eq!(candidates[1].reason, "car chases");
        assert_eq!(candidates[2].reason, "neon noir");
    }

    #[test]
    fn test_untitled_entries_are_skipped() {
        let parser = ResponseParser::new(1, false);
        let raw = r#"{"movies": [{"title": ""}, {"why": "no title"}, "Heat", {"title": "Ronin"}]}"#;

        let candidates = parser.parse(raw).unwrap();
        assert_eq!(titles(&candidates), vec!["Ronin"]);
    }

    #[test]
    fn test_movies_not_a_list_without_fallback() {
        let parser = ResponseParser::new(1, false);
        let err = parser.parse(r#"{"movies": "Inception"}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
        assert!(err.detail.contains("not a list"));
    }

    #[test]
    fn test_broken_json_without_fallback() {
        let parser = ResponseParser::new(1, false);
        let err = parser
            .parse(r#"{"movies": [{"title": "Inception",}"#)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_fallback_bold_titles() {
        let parser = ResponseParser::new(3, true);
        let raw = "Here are three movies for an adventurous mood:\n\
                   1. **Raiders of the Lost Ark** - A globe-trotting treasure hunt.\n\
                   2. **Mad Max: Fury Road** - Relentless desert chase.\n\
                   3. **The Goonies** - Kids on a pirate-treasure quest.";

        let candidates = parser.parse(raw).unwrap();
        assert_eq!(
            titles(&candidates),
            vec!["Raiders of the Lost Ark", "Mad Max: Fury Road", "The Goonies"]
        );
        assert!(candidates.iter().all(|c| c.reason.is_empty()));
    }

    #[test]
    fn test_fallback_numbered_titles() {
        let parser = ResponseParser::new(3, true);
        let raw = "1. Amelie (2001) - whimsical Paris story\n\
                   2) Paddington 2 - pure kindness\n\
                   3. Chef (2014)";

        let candidates = parser.parse(raw).unwrap();
        assert_eq!(titles(&candidates), vec!["Amelie", "Paddington 2", "Chef"]);
    }

    #[test]
    fn test_fallback_keeps_colons_in_titles() {
        let parser = ResponseParser::new(1, true);
        let raw = "1. Mission: Impossible (1996)\n\
                   2. Star Wars: The Empire Strikes Back (1980)\n\
                   3. Alien: Covenant";

        let candidates = parser.parse(raw).unwrap();
        assert_eq!(
            titles(&candidates),
            vec![
                "Mission: Impossible",
                "Star Wars: The Empire Strikes Back",
                "Alien: Covenant"
            ]
        );
    }

    #[test]
    fn test_fallback_disabled() {
        let parser = ResponseParser::new(1, false);
        let err = parser.parse("1. **Amelie** - whimsical").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_titles_preserved_verbatim() {
        let parser = ResponseParser::new(1, true);
        let raw = r#"{"movies": [{"title": "  Léon: The Professional ", "why": "x"}]}"#;

        let candidates = parser.parse(raw).unwrap();
        assert_eq!(candidates[0].title, "Léon: The Professional");
    }
}
