//! Gherkin feature file parsing.
//!
//! Supports the subset the contract suites use: `Feature:`, an optional
//! `Background:`, `Scenario:` blocks, step lines introduced by
//! Given/When/Then/And/But/`*`, `@tags`, `#` comments and free-form
//! description lines under `Feature:`.

use std::fmt;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureParseError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: no 'Feature:' header before content")]
    MissingFeature { line: usize },

    #[error("line {line}: step outside of a Scenario or Background")]
    StepOutsideScenario { line: usize },

    #[error("line {line}: '{keyword}' is not supported")]
    Unsupported { line: usize, keyword: String },

    #[error("line {line}: unexpected text '{text}'")]
    Unexpected { line: usize, text: String },
}

/// Keyword that introduced a step line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Given,
    When,
    Then,
    And,
    But,
    Star,
}

impl Keyword {
    const ALL: [(&'static str, Keyword); 6] = [
        ("Given ", Keyword::Given),
        ("When ", Keyword::When),
        ("Then ", Keyword::Then),
        ("And ", Keyword::And),
        ("But ", Keyword::But),
        ("* ", Keyword::Star),
    ];

    /// Split a trimmed line into keyword and step text.
    fn split(line: &str) -> Option<(Keyword, &str)> {
        Self::ALL.iter().find_map(|(prefix, keyword)| {
            line.strip_prefix(prefix)
                .map(|rest| (*keyword, rest.trim()))
        })
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Keyword::Given => "Given",
            Keyword::When => "When",
            Keyword::Then => "Then",
            Keyword::And => "And",
            Keyword::But => "But",
            Keyword::Star => "*",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLine {
    pub keyword: Keyword,
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub tags: Vec<String>,
    pub line: usize,
    pub steps: Vec<StepLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feature {
    pub name: String,
    pub description: Vec<String>,
    pub background: Vec<StepLine>,
    pub scenarios: Vec<Scenario>,
}

enum Section {
    Header,
    Background,
    Scenario,
}

impl Feature {
    pub fn from_file(path: &Path) -> Result<Self, FeatureParseError> {
        let content = std::fs::read_to_string(path).map_err(|source| FeatureParseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(source: &str) -> Result<Self, FeatureParseError> {
        let mut feature: Option<Feature> = None;
        let mut section = Section::Header;
        let mut pending_tags: Vec<String> = Vec::new();

        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('@') {
                pending_tags.extend(trimmed.split_whitespace().map(str::to_string));
                continue;
            }

            if let Some(name) = trimmed.strip_prefix("Feature:") {
                feature = Some(Feature {
                    name: name.trim().to_string(),
                    ..Feature::default()
                });
                pending_tags.clear();
                section = Section::Header;
                continue;
            }

            let Some(current) = feature.as_mut() else {
                return Err(FeatureParseError::MissingFeature { line });
            };

            for unsupported in ["Scenario Outline:", "Scenario Template:", "Examples:", "Rule:"] {
                if trimmed.starts_with(unsupported) {
                    return Err(FeatureParseError::Unsupported {
                        line,
                        keyword: unsupported.trim_end_matches(':').to_string(),
                    });
                }
            }

            if trimmed.starts_with("Background:") {
                section = Section::Background;
                continue;
            }

            if let Some(name) = trimmed
                .strip_prefix("Scenario:")
                .or_else(|| trimmed.strip_prefix("Example:"))
            {
                current.scenarios.push(Scenario {
                    name: name.trim().to_string(),
                    tags: std::mem::take(&mut pending_tags),
                    line,
                    steps: Vec::new(),
                });
                section = Section::Scenario;
                continue;
            }

            match (Keyword::split(trimmed), &section) {
                (Some((keyword, text)), Section::Background) => {
                    current.background.push(StepLine {
                        keyword,
                        text: text.to_string(),
                        line,
                    });
                }
                (Some((keyword, text)), Section::Scenario) => {
                    if let Some(scenario) = current.scenarios.last_mut() {
                        scenario.steps.push(StepLine {
                            keyword,
                            text: text.to_string(),
                            line,
                        });
                    }
                }
                (Some(_), Section::Header) => {
                    return Err(FeatureParseError::StepOutsideScenario { line });
                }
                (None, Section::Header) => current.description.push(trimmed.to_string()),
                (None, _) => {
                    return Err(FeatureParseError::Unexpected {
                        line,
                        text: trimmed.to_string(),
                    });
                }
            }
        }

        feature.ok_or(FeatureParseError::MissingFeature { line: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Contract for the agify API
Feature: Agify age estimation
  As a consumer I want stable responses

  Background:
    Given the API endpoint is "https://api.agify.io"

  @smoke
  Scenario: Known name
    Given the query parameter "name" is set to "edzelle"
    When I send the request
    Then the response status code should be 200
    And the response should have a JSON content type

  Scenario: Invalid name
    * the query parameter "name" is set to "r2d2"
    When I prepare the request
    Then the request should be invalid
"#;

    #[test]
    fn test_parse_sample() {
        let feature = Feature::parse(SAMPLE).unwrap();

        assert_eq!(feature.name, "Agify age estimation");
        assert_eq!(feature.description, vec!["As a consumer I want stable responses"]);
        assert_eq!(feature.background.len(), 1);
        assert_eq!(feature.scenarios.len(), 2);

        let known = &feature.scenarios[0];
        assert_eq!(known.name, "Known name");
        assert_eq!(known.tags, vec!["@smoke"]);
        assert_eq!(known.steps.len(), 4);
        assert_eq!(known.steps[3].keyword, Keyword::And);
        assert_eq!(known.steps[3].text, "the response should have a JSON content type");

        let invalid = &feature.scenarios[1];
        assert!(invalid.tags.is_empty());
        assert_eq!(invalid.steps[0].keyword, Keyword::Star);
    }

    #[test]
    fn test_step_before_scenario_is_rejected() {
        let err = Feature::parse("Feature: x\n  Given something\n").unwrap_err();
        assert!(matches!(err, FeatureParseError::StepOutsideScenario { line: 2 }));
    }

    #[test]
    fn test_outline_is_unsupported() {
        let err = Feature::parse("Feature: x\nScenario Outline: y\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: 'Scenario Outline' is not supported");
    }

    #[test]
    fn test_missing_feature_header() {
        assert!(matches!(
            Feature::parse("Scenario: orphan\n").unwrap_err(),
            FeatureParseError::MissingFeature { line: 1 }
        ));
        assert!(matches!(
            Feature::parse("# only comments\n").unwrap_err(),
            FeatureParseError::MissingFeature { line: 0 }
        ));
    }
}
