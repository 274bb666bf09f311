use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{GlamError, Result};

// ---------------------------------------------------------------------------
// StepKeyword
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl StepKeyword {
    pub fn all() -> &'static [StepKeyword] {
        &[
            StepKeyword::Given,
            StepKeyword::When,
            StepKeyword::Then,
            StepKeyword::And,
            StepKeyword::But,
        ]
    }

    /// Canonical upper-case form used on serialize.
    pub fn as_str(self) -> &'static str {
        match self {
            StepKeyword::Given => "GIVEN",
            StepKeyword::When => "WHEN",
            StepKeyword::Then => "THEN",
            StepKeyword::And => "AND",
            StepKeyword::But => "BUT",
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StepKeyword {
    type Err = GlamError;

    /// Case-insensitive: `given`, `Given` and `GIVEN` are all accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GIVEN" => Ok(StepKeyword::Given),
            "WHEN" => Ok(StepKeyword::When),
            "THEN" => Ok(StepKeyword::Then),
            "AND" => Ok(StepKeyword::And),
            "BUT" => Ok(StepKeyword::But),
            _ => Err(GlamError::InvalidKeyword(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Step / Scenario / Document
// ---------------------------------------------------------------------------

/// One behavioral clause: a keyword plus the rest of the line, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub keyword: StepKeyword,
    pub text: String,
}

impl Step {
    pub fn new(keyword: StepKeyword, text: impl Into<String>) -> Self {
        Self {
            keyword,
            text: text.into(),
        }
    }
}

/// An ordered group of steps. An empty title means the scenario is untitled;
/// it still serializes with an explicit `Scenario: ` marker so that zero-step
/// scaffolds survive a round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
        }
    }
}

/// An ordered collection of scenarios parsed from one text block. Transient:
/// built from text, mutated in place by the owning editor, serialized on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub scenarios: Vec<Scenario>,
}

// ---------------------------------------------------------------------------
// Line classifier
// ---------------------------------------------------------------------------

const SCENARIO_MARKER: &str = "Scenario:";

/// Classification of a single raw line. Purely lexical — no lookback or
/// lookahead, stateless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    ScenarioMarker(String),
    Step(StepKeyword, String),
    Unrecognized,
}

static STEP_RE: OnceLock<Regex> = OnceLock::new();

fn step_re() -> &'static Regex {
    // Remainder is optional: a bare keyword is a step with empty text, which
    // keeps empty-text steps from being dropped on re-parse.
    STEP_RE.get_or_init(|| {
        Regex::new(r"(?i)^(given|when|then|and|but)(?:\s+(.*))?$").unwrap()
    })
}

pub fn classify_line(raw: &str) -> LineClass {
    let line = raw.trim();
    if line.is_empty() {
        return LineClass::Blank;
    }
    // Marker prefix is case-sensitive, unlike step keywords.
    if let Some(rest) = line.strip_prefix(SCENARIO_MARKER) {
        return LineClass::ScenarioMarker(rest.trim().to_string());
    }
    if let Some(caps) = step_re().captures(line) {
        // The keyword capture always matches one of the five variants.
        let keyword: StepKeyword = caps[1].parse().unwrap();
        let text = caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string();
        return LineClass::Step(keyword, text);
    }
    LineClass::Unrecognized
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A line the parser skipped: (1-based line number, trimmed text).
pub type SkippedLine = (usize, String);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a text block into scenarios. Never fails: blank and unrecognized
    /// lines are skipped, steps before any `Scenario:` marker open an implicit
    /// untitled scenario, and empty input yields an empty document.
    pub fn parse(text: &str) -> Self {
        Self::parse_inner(text, None)
    }

    /// Like [`Document::parse`], but also reports the non-blank lines that
    /// matched neither the marker nor the step pattern. Parsing behavior is
    /// identical — the skipped lines are informational only.
    pub fn parse_with_diagnostics(text: &str) -> (Self, Vec<SkippedLine>) {
        let mut skipped = Vec::new();
        let doc = Self::parse_inner(text, Some(&mut skipped));
        (doc, skipped)
    }

    fn parse_inner(text: &str, mut skipped: Option<&mut Vec<SkippedLine>>) -> Self {
        let mut scenarios = Vec::new();
        let mut current: Option<Scenario> = None;

        for (i, raw) in text.lines().enumerate() {
            match classify_line(raw) {
                LineClass::Blank => {}
                LineClass::ScenarioMarker(title) => {
                    if let Some(done) = current.take() {
                        scenarios.push(done);
                    }
                    current = Some(Scenario::new(title));
                }
                LineClass::Step(keyword, text) => {
                    current
                        .get_or_insert_with(|| Scenario::new(""))
                        .steps
                        .push(Step::new(keyword, text));
                }
                LineClass::Unrecognized => {
                    if let Some(out) = skipped.as_deref_mut() {
                        out.push((i + 1, raw.trim().to_string()));
                    }
                }
            }
        }
        if let Some(done) = current {
            scenarios.push(done);
        }

        Self { scenarios }
    }

    // ---------------------------------------------------------------------------
    // Serializer
    // ---------------------------------------------------------------------------

    /// Render the canonical text form: one `Scenario: <title>` marker per
    /// scenario, upper-case keywords, one blank line between scenario blocks,
    /// trailing blank lines trimmed, exactly one trailing newline. Incidental
    /// formatting of the source text is not preserved — only structure is.
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for scenario in &self.scenarios {
            lines.push(format!("{SCENARIO_MARKER} {}", scenario.title));
            for step in &scenario.steps {
                lines.push(format!("{} {}", step.keyword, step.text));
            }
            lines.push(String::new());
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return String::new();
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    // ---------------------------------------------------------------------------
    // Editor mutations
    // ---------------------------------------------------------------------------

    /// Append a new empty scenario, returning its index.
    pub fn add_scenario(&mut self, title: impl Into<String>) -> usize {
        self.scenarios.push(Scenario::new(title));
        self.scenarios.len() - 1
    }

    pub fn delete_scenario(&mut self, index: usize) -> Result<Scenario> {
        let len = self.scenarios.len();
        if index >= len {
            return Err(GlamError::IndexOutOfRange {
                what: "scenario",
                index,
                len,
            });
        }
        Ok(self.scenarios.remove(index))
    }

    pub fn set_title(&mut self, scenario: usize, title: impl Into<String>) -> Result<()> {
        self.scenario_mut(scenario)?.title = title.into();
        Ok(())
    }

    pub fn add_step(
        &mut self,
        scenario: usize,
        keyword: StepKeyword,
        text: impl Into<String>,
    ) -> Result<()> {
        self.scenario_mut(scenario)?.steps.push(Step::new(keyword, text));
        Ok(())
    }

    pub fn insert_step(
        &mut self,
        scenario: usize,
        index: usize,
        keyword: StepKeyword,
        text: impl Into<String>,
    ) -> Result<()> {
        let steps = &mut self.scenario_mut(scenario)?.steps;
        let len = steps.len();
        if index > len {
            return Err(GlamError::IndexOutOfRange {
                what: "step",
                index,
                len,
            });
        }
        steps.insert(index, Step::new(keyword, text));
        Ok(())
    }

    pub fn delete_step(&mut self, scenario: usize, index: usize) -> Result<Step> {
        let steps = &mut self.scenario_mut(scenario)?.steps;
        let len = steps.len();
        if index >= len {
            return Err(GlamError::IndexOutOfRange {
                what: "step",
                index,
                len,
            });
        }
        Ok(steps.remove(index))
    }

    /// Move a step within a scenario. Both indices refer to positions in the
    /// step list before the move.
    pub fn move_step(&mut self, scenario: usize, from: usize, to: usize) -> Result<()> {
        let steps = &mut self.scenario_mut(scenario)?.steps;
        let len = steps.len();
        for index in [from, to] {
            if index >= len {
                return Err(GlamError::IndexOutOfRange {
                    what: "step",
                    index,
                    len,
                });
            }
        }
        let step = steps.remove(from);
        steps.insert(to, step);
        Ok(())
    }

    fn scenario_mut(&mut self, index: usize) -> Result<&mut Scenario> {
        let len = self.scenarios.len();
        self.scenarios
            .get_mut(index)
            .ok_or(GlamError::IndexOutOfRange {
                what: "scenario",
                index,
                len,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_blank_and_whitespace() {
        assert_eq!(classify_line(""), LineClass::Blank);
        assert_eq!(classify_line("   \t  "), LineClass::Blank);
    }

    #[test]
    fn classify_scenario_marker() {
        assert_eq!(
            classify_line("Scenario: Login succeeds"),
            LineClass::ScenarioMarker("Login succeeds".to_string())
        );
        assert_eq!(
            classify_line("  Scenario:   padded title  "),
            LineClass::ScenarioMarker("padded title".to_string())
        );
        assert_eq!(
            classify_line("Scenario:"),
            LineClass::ScenarioMarker(String::new())
        );
    }

    #[test]
    fn classify_marker_is_case_sensitive() {
        // Lower-case "scenario:" is not the marker; it's not a keyword either.
        assert_eq!(classify_line("scenario: nope"), LineClass::Unrecognized);
    }

    #[test]
    fn classify_step_keywords_case_insensitive() {
        for raw in ["given x", "Given x", "GIVEN x", "gIvEn x"] {
            assert_eq!(
                classify_line(raw),
                LineClass::Step(StepKeyword::Given, "x".to_string()),
                "line: {raw}"
            );
        }
    }

    #[test]
    fn classify_step_preserves_text_verbatim() {
        assert_eq!(
            classify_line("WHEN the user clicks: Save, twice"),
            LineClass::Step(StepKeyword::When, "the user clicks: Save, twice".to_string())
        );
    }

    #[test]
    fn classify_bare_keyword_is_empty_step() {
        assert_eq!(
            classify_line("GIVEN"),
            LineClass::Step(StepKeyword::Given, String::new())
        );
        assert_eq!(
            classify_line("THEN   "),
            LineClass::Step(StepKeyword::Then, String::new())
        );
    }

    #[test]
    fn classify_keyword_must_be_whole_word() {
        assert_eq!(classify_line("GIVENx y"), LineClass::Unrecognized);
        assert_eq!(classify_line("random prose"), LineClass::Unrecognized);
    }

    #[test]
    fn parse_empty_input() {
        assert!(Document::parse("").scenarios.is_empty());
        assert!(Document::parse("\n\n  \n").scenarios.is_empty());
    }

    #[test]
    fn parse_example_end_to_end() {
        let input = "Scenario: Login succeeds\n\
                     GIVEN a registered user\n\
                     WHEN they submit valid credentials\n\
                     THEN they are redirected to the dashboard\n";
        let doc = Document::parse(input);
        assert_eq!(doc.scenarios.len(), 1);
        let sc = &doc.scenarios[0];
        assert_eq!(sc.title, "Login succeeds");
        assert_eq!(
            sc.steps,
            vec![
                Step::new(StepKeyword::Given, "a registered user"),
                Step::new(StepKeyword::When, "they submit valid credentials"),
                Step::new(StepKeyword::Then, "they are redirected to the dashboard"),
            ]
        );
    }

    #[test]
    fn parse_steps_before_marker_open_untitled_scenario() {
        let doc = Document::parse("WHEN nothing happens\n");
        assert_eq!(doc.scenarios.len(), 1);
        assert_eq!(doc.scenarios[0].title, "");
        assert_eq!(
            doc.scenarios[0].steps,
            vec![Step::new(StepKeyword::When, "nothing happens")]
        );
    }

    #[test]
    fn parse_leading_steps_then_marker_yields_two_scenarios() {
        let input = "GIVEN orphan step\nScenario: Titled\nTHEN outcome\n";
        let doc = Document::parse(input);
        assert_eq!(doc.scenarios.len(), 2);
        assert_eq!(doc.scenarios[0].title, "");
        assert_eq!(doc.scenarios[0].steps.len(), 1);
        assert_eq!(doc.scenarios[1].title, "Titled");
    }

    #[test]
    fn parse_consecutive_markers_yield_empty_scenario() {
        let input = "Scenario: First\nScenario: Second\nGIVEN a step\n";
        let doc = Document::parse(input);
        assert_eq!(doc.scenarios.len(), 2);
        assert_eq!(doc.scenarios[0].title, "First");
        assert!(doc.scenarios[0].steps.is_empty());
        assert_eq!(doc.scenarios[1].steps.len(), 1);
    }

    #[test]
    fn parse_skips_unrecognized_lines_silently() {
        let input = "Scenario: S\nGIVEN a\nsome stray prose\nTHEN b\n";
        let doc = Document::parse(input);
        assert_eq!(doc.scenarios.len(), 1);
        assert_eq!(doc.scenarios[0].steps.len(), 2);
    }

    #[test]
    fn parse_with_diagnostics_reports_skipped() {
        let input = "stray one\nScenario: S\nGIVEN a\nstray two\n";
        let (doc, skipped) = Document::parse_with_diagnostics(input);
        assert_eq!(doc.scenarios.len(), 1);
        assert_eq!(
            skipped,
            vec![(1, "stray one".to_string()), (4, "stray two".to_string())]
        );
    }

    #[test]
    fn parse_tolerates_extra_blank_lines() {
        let input = "\n\nScenario: S\n\n\nGIVEN a\n\nTHEN b\n\n\n";
        let doc = Document::parse(input);
        assert_eq!(doc.scenarios.len(), 1);
        assert_eq!(doc.scenarios[0].steps.len(), 2);
    }

    #[test]
    fn serialize_canonical_form() {
        let mut doc = Document::new();
        let i = doc.add_scenario("Login succeeds");
        doc.add_step(i, StepKeyword::Given, "a registered user").unwrap();
        doc.add_step(i, StepKeyword::When, "they submit valid credentials")
            .unwrap();
        let j = doc.add_scenario("Login fails");
        doc.add_step(j, StepKeyword::Then, "an error is shown").unwrap();

        assert_eq!(
            doc.to_text(),
            "Scenario: Login succeeds\n\
             GIVEN a registered user\n\
             WHEN they submit valid credentials\n\
             \n\
             Scenario: Login fails\n\
             THEN an error is shown\n"
        );
    }

    #[test]
    fn serialize_keywords_canonical_upper_case() {
        let doc = Document::parse("given x\nwhen y\nthen z\nand w\nbut v\n");
        let text = doc.to_text();
        for kw in ["GIVEN x", "WHEN y", "THEN z", "AND w", "BUT v"] {
            assert!(text.contains(kw), "missing: {kw}");
        }
    }

    #[test]
    fn serialize_empty_scenario_keeps_marker() {
        let mut doc = Document::new();
        doc.add_scenario("Scaffold only");
        assert_eq!(doc.to_text(), "Scenario: Scaffold only\n");
    }

    #[test]
    fn serialize_empty_document_is_empty() {
        assert_eq!(Document::new().to_text(), "");
    }

    #[test]
    fn serialize_ends_with_single_newline() {
        let mut doc = Document::new();
        doc.add_scenario("S");
        let text = doc.to_text();
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn round_trip_programmatic_document() {
        let mut doc = Document::new();
        let a = doc.add_scenario("First");
        doc.add_step(a, StepKeyword::Given, "setup").unwrap();
        doc.add_step(a, StepKeyword::But, "a caveat").unwrap();
        let b = doc.add_scenario("");
        doc.add_step(b, StepKeyword::When, "something: odd, punctuated!")
            .unwrap();
        doc.add_scenario("Empty scaffold");

        let text = doc.to_text();
        let reparsed = Document::parse(&text);
        assert_eq!(reparsed, doc);
        assert_eq!(reparsed.to_text(), text);
    }

    #[test]
    fn round_trip_normalizes_incidental_formatting() {
        let input = "  Scenario:  Padded \n\n\n  given spaced   text\n";
        let doc = Document::parse(input);
        let canonical = doc.to_text();
        assert_eq!(canonical, "Scenario: Padded\nGIVEN spaced   text\n");
        assert_eq!(Document::parse(&canonical), doc);
    }

    #[test]
    fn add_step_out_of_range_scenario() {
        let mut doc = Document::new();
        let err = doc.add_step(0, StepKeyword::Given, "x").unwrap_err();
        assert!(matches!(
            err,
            GlamError::IndexOutOfRange { what: "scenario", index: 0, len: 0 }
        ));
    }

    #[test]
    fn delete_step_preserves_order_of_remaining() {
        let mut doc = Document::new();
        let i = doc.add_scenario("S");
        doc.add_step(i, StepKeyword::Given, "a").unwrap();
        doc.add_step(i, StepKeyword::When, "b").unwrap();
        doc.add_step(i, StepKeyword::Then, "c").unwrap();

        doc.delete_step(i, 1).unwrap();
        let text = doc.to_text();
        assert_eq!(text, "Scenario: S\nGIVEN a\nTHEN c\n");
    }

    #[test]
    fn delete_step_out_of_range_leaves_document_intact() {
        let mut doc = Document::new();
        let i = doc.add_scenario("S");
        doc.add_step(i, StepKeyword::Given, "a").unwrap();
        assert!(doc.delete_step(i, 5).is_err());
        assert_eq!(doc.scenarios[0].steps.len(), 1);
    }

    #[test]
    fn move_step_reorders() {
        let mut doc = Document::new();
        let i = doc.add_scenario("S");
        doc.add_step(i, StepKeyword::Given, "a").unwrap();
        doc.add_step(i, StepKeyword::When, "b").unwrap();
        doc.add_step(i, StepKeyword::Then, "c").unwrap();

        doc.move_step(i, 2, 0).unwrap();
        let texts: Vec<&str> = doc.scenarios[0]
            .steps
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
    }

    #[test]
    fn move_step_validates_both_indices() {
        let mut doc = Document::new();
        let i = doc.add_scenario("S");
        doc.add_step(i, StepKeyword::Given, "a").unwrap();
        assert!(doc.move_step(i, 0, 3).is_err());
        assert!(doc.move_step(i, 3, 0).is_err());
        assert_eq!(doc.scenarios[0].steps[0].text, "a");
    }

    #[test]
    fn insert_step_at_end_and_middle() {
        let mut doc = Document::new();
        let i = doc.add_scenario("S");
        doc.add_step(i, StepKeyword::Given, "a").unwrap();
        doc.insert_step(i, 1, StepKeyword::Then, "z").unwrap();
        doc.insert_step(i, 1, StepKeyword::When, "m").unwrap();
        let texts: Vec<&str> = doc.scenarios[0]
            .steps
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec!["a", "m", "z"]);
        assert!(doc.insert_step(i, 7, StepKeyword::And, "x").is_err());
    }

    #[test]
    fn set_title_renames_scenario() {
        let mut doc = Document::new();
        let i = doc.add_scenario("Draft");
        doc.set_title(i, "Final").unwrap();
        assert_eq!(doc.scenarios[0].title, "Final");
        assert!(doc.set_title(3, "x").is_err());
    }

    #[test]
    fn delete_scenario_shifts_order() {
        let mut doc = Document::new();
        doc.add_scenario("A");
        doc.add_scenario("B");
        doc.add_scenario("C");
        doc.delete_scenario(1).unwrap();
        let titles: Vec<&str> = doc.scenarios.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert!(doc.delete_scenario(5).is_err());
    }

    #[test]
    fn empty_step_text_survives_round_trip() {
        let mut doc = Document::new();
        let i = doc.add_scenario("S");
        doc.add_step(i, StepKeyword::Given, "").unwrap();
        let text = doc.to_text();
        let reparsed = Document::parse(&text);
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn keyword_serde_upper_case() {
        let json = serde_json::to_string(&StepKeyword::Given).unwrap();
        assert_eq!(json, "\"GIVEN\"");
        let back: StepKeyword = serde_json::from_str("\"THEN\"").unwrap();
        assert_eq!(back, StepKeyword::Then);
    }
}
