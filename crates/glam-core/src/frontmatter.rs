use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

const DELIMITER: &str = "---";

/// A markdown document split into optional YAML frontmatter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub frontmatter: Option<serde_yaml::Mapping>,
    pub body: String,
}

/// Split a markdown document into frontmatter and body. A document without a
/// leading `---` block has no frontmatter and the whole text as body. An
/// opening delimiter with no closing one is treated the same way.
pub fn parse(text: &str) -> Result<Parsed> {
    let Some(rest) = strip_open_delimiter(text) else {
        return Ok(Parsed {
            frontmatter: None,
            body: text.to_string(),
        });
    };

    let Some((yaml, body)) = split_close_delimiter(rest) else {
        return Ok(Parsed {
            frontmatter: None,
            body: text.to_string(),
        });
    };

    let frontmatter: serde_yaml::Mapping = if yaml.trim().is_empty() {
        serde_yaml::Mapping::new()
    } else {
        serde_yaml::from_str(yaml)?
    };

    Ok(Parsed {
        frontmatter: Some(frontmatter),
        body: body.trim_start_matches('\n').to_string(),
    })
}

/// Parse and decode the frontmatter into a typed struct at the boundary.
pub fn parse_typed<T: DeserializeOwned>(text: &str) -> Result<(Option<T>, String)> {
    let parsed = parse(text)?;
    match parsed.frontmatter {
        None => Ok((None, parsed.body)),
        Some(mapping) => {
            let meta = serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))?;
            Ok((Some(meta), parsed.body))
        }
    }
}

fn strip_open_delimiter(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    rest.strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))
}

fn split_close_delimiter(rest: &str) -> Option<(&str, &str)> {
    // The closing delimiter is a `---` on its own line.
    for (pos, line) in line_spans(rest) {
        if line.trim_end_matches('\r') == DELIMITER {
            let yaml = &rest[..pos];
            let after = &rest[pos + line.len()..];
            return Some((yaml, after.strip_prefix('\n').unwrap_or(after)));
        }
    }
    None
}

fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut pos = 0;
    text.split_inclusive('\n').map(move |chunk| {
        let start = pos;
        pos += chunk.len();
        (start, chunk.trim_end_matches('\n'))
    })
}

// ---------------------------------------------------------------------------
// Compose
// ---------------------------------------------------------------------------

/// Render the canonical frontmatter + body form.
pub fn compose<T: Serialize>(frontmatter: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    let mut out = String::with_capacity(yaml.len() + body.len() + 16);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    out.push_str(DELIMITER);
    out.push('\n');
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_frontmatter() {
        let text = "---\nfeature_id: auth\nspec_id: [a, b]\n---\n\nGIVEN x\n";
        let parsed = parse(text).unwrap();
        let fm = parsed.frontmatter.unwrap();
        assert_eq!(fm["feature_id"], serde_yaml::Value::from("auth"));
        assert_eq!(parsed.body, "GIVEN x\n");
    }

    #[test]
    fn parse_without_frontmatter() {
        let text = "# Just markdown\n\nGIVEN x\n";
        let parsed = parse(text).unwrap();
        assert!(parsed.frontmatter.is_none());
        assert_eq!(parsed.body, text);
    }

    #[test]
    fn parse_unclosed_block_is_all_body() {
        let text = "---\nfeature_id: auth\nno closing delimiter\n";
        let parsed = parse(text).unwrap();
        assert!(parsed.frontmatter.is_none());
        assert_eq!(parsed.body, text);
    }

    #[test]
    fn parse_empty_frontmatter_block() {
        let text = "---\n---\nbody\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.frontmatter, Some(serde_yaml::Mapping::new()));
        assert_eq!(parsed.body, "body\n");
    }

    #[test]
    fn parse_invalid_yaml_errors() {
        let text = "---\n: [unbalanced\n---\nbody\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn compose_round_trips() {
        let mut fm = serde_yaml::Mapping::new();
        fm.insert("feature_id".into(), "auth-login".into());
        let text = compose(&fm, "GIVEN a user\n").unwrap();
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.frontmatter, Some(fm));
        assert_eq!(parsed.body, "GIVEN a user\n");
    }

    #[test]
    fn compose_empty_body_has_no_trailing_blank() {
        let mut fm = serde_yaml::Mapping::new();
        fm.insert("context_id".into(), "aws".into());
        let text = compose(&fm, "").unwrap();
        assert!(text.ends_with("---\n"));
    }

    #[test]
    fn parse_typed_decodes_struct() {
        #[derive(serde::Deserialize)]
        struct Meta {
            feature_id: String,
        }
        let text = "---\nfeature_id: auth\n---\nbody\n";
        let (meta, body) = parse_typed::<Meta>(text).unwrap();
        assert_eq!(meta.unwrap().feature_id, "auth");
        assert_eq!(body, "body\n");
    }
}
