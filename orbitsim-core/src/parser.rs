use crate::ast::{BodyDecl, Scenario, SimulateDecl, TrailDecl};
use crate::diagnostics::Span;
use crate::engine::AU;
use glam::DVec2;
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Helper to track byte offsets while parsing
struct ParseContext {
    line_offsets: Vec<usize>, // Byte offset of start of each line
    len: usize,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        let mut offset = 0;
        for ch in source.chars() {
            offset += ch.len_utf8();
            if ch == '\n' {
                line_offsets.push(offset);
            }
        }
        Self {
            line_offsets,
            len: source.len(),
        }
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_offsets.get(line).copied().unwrap_or(self.len)
    }

    /// Span covering the entire line
    fn full_line_span(&self, line: usize) -> Span {
        Span::new(self.line_start(line), self.line_start(line + 1))
    }
}

/// Parse a scenario from source text
pub fn parse_scenario(source: &str) -> Result<Scenario, ParseError> {
    let ctx = ParseContext::new(source);
    let mut bodies = Vec::new();
    let mut simulate = None;
    let mut trail = None;

    for (i, raw) in source.lines().enumerate() {
        let line = raw.trim();
        let span = Some(ctx.full_line_span(i));

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("body ") {
            bodies.push(parse_body(line, span)?);
        } else if line.starts_with("simulate ") {
            if simulate.is_some() {
                return Err(ParseError::new("Duplicate 'simulate' declaration", span));
            }
            simulate = Some(parse_simulate(line, span)?);
        } else if line.starts_with("trail ") {
            if trail.is_some() {
                return Err(ParseError::new("Duplicate 'trail' declaration", span));
            }
            trail = Some(parse_trail(line, span)?);
        } else {
            return Err(ParseError::new(
                format!(
                    "Unexpected token: {}",
                    line.split_whitespace().next().unwrap_or("")
                ),
                span,
            ));
        }
    }

    log::debug!("parsed scenario with {} bodies", bodies.len());

    Ok(Scenario {
        bodies,
        simulate: simulate.unwrap_or_default(),
        trail: trail.unwrap_or_default(),
    })
}

/// Parse a body declaration:
/// `body name at (x, y) [velocity (vx, vy)] mass m [reference]`
fn parse_body(line: &str, span: Option<Span>) -> Result<BodyDecl, ParseError> {
    let rest = line
        .strip_prefix("body ")
        .ok_or_else(|| ParseError::new("Expected 'body' keyword", span))?;

    let at_pos = rest.find(" at ").ok_or_else(|| {
        ParseError::new(format!("Expected 'at' in body declaration: {}", line), span)
    })?;

    let name = rest[..at_pos].trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(ParseError::new(
            format!("Invalid body name '{}'", name),
            span,
        ));
    }
    let rest = &rest[at_pos + 4..];

    let (position, rest) = parse_vec2(rest, line, span)?;
    let mut rest = rest.trim_start();

    let mut velocity = DVec2::ZERO;
    if let Some(after) = rest.strip_prefix("velocity") {
        let (v, after) = parse_vec2(after, line, span)?;
        velocity = v;
        rest = after.trim_start();
    }

    let rest = rest.strip_prefix("mass ").ok_or_else(|| {
        ParseError::new(format!("Expected 'mass' in body declaration: {}", line), span)
    })?;

    let (mass_str, reference) = match rest.trim().strip_suffix("reference") {
        Some(mass_str) => (mass_str, true),
        None => (rest, false),
    };
    let mass = parse_quantity(mass_str, span)?;

    Ok(BodyDecl {
        name: name.to_string(),
        position,
        velocity,
        mass,
        reference,
        span,
    })
}

/// Parse a simulate declaration: `simulate dt = x steps = n`
fn parse_simulate(line: &str, span: Option<Span>) -> Result<SimulateDecl, ParseError> {
    let rest = line
        .strip_prefix("simulate ")
        .ok_or_else(|| ParseError::new("Expected 'simulate' keyword", span))?;

    let mut decl = SimulateDecl::default();
    for (key, value) in parse_assignments(rest, span)? {
        match key {
            "dt" => decl.dt = parse_quantity(value, span)?,
            "steps" => decl.steps = parse_count(value, span)? as u64,
            other => {
                return Err(ParseError::new(
                    format!("Unknown simulate parameter '{}'", other),
                    span,
                ))
            }
        }
    }
    Ok(decl)
}

/// Parse a trail declaration: `trail max = n`
fn parse_trail(line: &str, span: Option<Span>) -> Result<TrailDecl, ParseError> {
    let rest = line
        .strip_prefix("trail ")
        .ok_or_else(|| ParseError::new("Expected 'trail' keyword", span))?;

    let mut decl = TrailDecl::default();
    for (key, value) in parse_assignments(rest, span)? {
        match key {
            "max" => decl.max = Some(parse_count(value, span)?),
            other => {
                return Err(ParseError::new(
                    format!("Unknown trail parameter '{}'", other),
                    span,
                ))
            }
        }
    }
    Ok(decl)
}

/// Split `a = 1 b = 2` into key/value pairs
fn parse_assignments(rest: &str, span: Option<Span>) -> Result<Vec<(&str, &str)>, ParseError> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() % 3 != 0 {
        return Err(ParseError::new(
            format!("Expected 'key = value' pairs: {}", rest),
            span,
        ));
    }

    tokens
        .chunks(3)
        .map(|chunk| {
            if chunk[1] != "=" {
                return Err(ParseError::new(
                    format!("Expected '=' after '{}'", chunk[0]),
                    span,
                ));
            }
            Ok((chunk[0], chunk[2]))
        })
        .collect()
}

/// Parse `(x, y)` at the start of `rest`, returning the vector and the remainder
fn parse_vec2<'a>(
    rest: &'a str,
    line: &str,
    span: Option<Span>,
) -> Result<(DVec2, &'a str), ParseError> {
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('(').ok_or_else(|| {
        ParseError::new(format!("Expected '(' in vector: {}", line), span)
    })?;
    let end = inner.find(')').ok_or_else(|| {
        ParseError::new(format!("Expected ')' in vector: {}", line), span)
    })?;

    let coords: Vec<&str> = inner[..end].split(',').map(|s| s.trim()).collect();
    if coords.len() != 2 {
        return Err(ParseError::new(
            format!("Expected two coordinates in vector: {}", line),
            span,
        ));
    }

    let x = parse_quantity(coords[0], span)?;
    let y = parse_quantity(coords[1], span)?;
    Ok((DVec2::new(x, y), &inner[end + 1..]))
}

/// Parse a number with an optional `au` or `km` unit suffix
pub fn parse_quantity(s: &str, span: Option<Span>) -> Result<f64, ParseError> {
    let s = s.trim();
    let (number, scale) = if let Some(n) = s.strip_suffix("au") {
        (n, AU)
    } else if let Some(n) = s.strip_suffix("km") {
        (n, 1000.0)
    } else {
        (s, 1.0)
    };

    number
        .trim()
        .parse::<f64>()
        .map(|v| v * scale)
        .map_err(|_| ParseError::new(format!("Invalid number: '{}'", s), span))
}

fn parse_count(s: &str, span: Option<Span>) -> Result<usize, ParseError> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| ParseError::new(format!("Invalid count: '{}'", s), span))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_units() {
        assert_eq!(parse_quantity("2", None).unwrap(), 2.0);
        assert_eq!(parse_quantity("3 km", None).unwrap(), 3000.0);
        assert_eq!(parse_quantity("-1au", None).unwrap(), -AU);
        assert!(parse_quantity("fast", None).is_err());
    }

    #[test]
    fn assignments_require_equals() {
        assert!(parse_assignments("dt 5 steps", None).is_err());
        let pairs = parse_assignments("dt = 5 steps = 2", None).unwrap();
        assert_eq!(pairs, vec![("dt", "5"), ("steps", "2")]);
    }

    #[test]
    fn error_span_points_at_offending_line() {
        let err = parse_scenario("body a at (0, 0) mass 1\nbogus line").unwrap_err();
        assert_eq!(err.span(), Some(Span::new(24, 34)));
    }
}
