use std::fmt;

use crate::{Field, ModelError};

/// Piece of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Field),
}

/// Request path with `{field}` placeholders, e.g. `/tasks/{taskId}/register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template. Placeholders must name a known [`Field`].
    pub fn parse(template: &str) -> Result<Self, ModelError> {
        let invalid = |reason: &str| ModelError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };
        if !template.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut segments = Vec::new();
        let mut rest = template;
        while !rest.is_empty() {
            match rest.find('{') {
                Some(open) => {
                    let (literal, tail) = rest.split_at(open);
                    if literal.contains('}') {
                        return Err(invalid("unbalanced '}'"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(literal.to_string()));
                    }
                    let close = tail.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
                    let name = &tail[1..close];
                    if name.is_empty() || name.contains('{') {
                        return Err(invalid("empty or nested placeholder"));
                    }
                    let field = name
                        .parse::<Field>()
                        .map_err(|_| invalid(&format!("unknown field '{name}'")))?;
                    segments.push(Segment::Placeholder(field));
                    rest = &tail[close + 1..];
                }
                None => {
                    if rest.contains('}') {
                        return Err(invalid("unbalanced '}'"));
                    }
                    segments.push(Segment::Literal(rest.to_string()));
                    rest = "";
                }
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Fields referenced by placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(f) => Some(*f),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
