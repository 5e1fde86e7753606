//! Shape list loading
//!
//! Line format, one ornament per line:
//!
//! ```text
//! # comment
//! CUBE=[RED, TOP-LEFT, 0]
//! torus = ["random", "bottom-right", 1]
//! ```
//!
//! Paths ending in `.json` are read as an array of
//! `{ "shape", "color", "position", "screen" }` objects instead.
//! Bad lines are skipped with a warning; an unreadable or empty file yields
//! the single default ornament.

use crate::color::ColorKind;
use crate::geometry::ShapeKind;
use crate::placement::Anchor;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "./ornament.ini";

/// One configured ornament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeConfig {
    pub shape: ShapeKind,
    pub color: ColorKind,
    pub position: Anchor,
    pub screen: i32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Cube,
            color: ColorKind::Green,
            position: Anchor::Center,
            screen: 0,
        }
    }
}

/// Why a configuration line was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("missing '='")]
    MissingEquals,
    #[error("missing [ ] around the fields")]
    MissingBrackets,
    #[error("expected 3 comma-separated fields, found {0}")]
    FieldCount(usize),
    #[error("unknown shape '{0}'")]
    UnknownShape(String),
    #[error("unknown color '{0}'")]
    UnknownColor(String),
    #[error("unknown position '{0}'")]
    UnknownPosition(String),
}

/// Trim whitespace and one pair of surrounding double quotes
fn clean_token(raw: &str) -> &str {
    let t = raw.trim();
    t.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map_or(t, str::trim)
}

/// Parse one `SHAPE=[COLOR, POSITION, SCREEN]` record.
/// Blank lines and comments return `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShapeConfig>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (lhs, rhs) = line.split_once('=').ok_or(LineError::MissingEquals)?;
    let open = rhs.find('[').ok_or(LineError::MissingBrackets)?;
    let close = rhs.find(']').ok_or(LineError::MissingBrackets)?;
    if close < open {
        return Err(LineError::MissingBrackets);
    }

    let fields: Vec<&str> = rhs[open + 1..close]
        .split(',')
        .map(clean_token)
        .filter(|f| !f.is_empty())
        .collect();
    let [color, position, screen] = fields.as_slice() else {
        return Err(LineError::FieldCount(fields.len()));
    };

    let shape_token = clean_token(lhs);
    let shape = shape_token
        .parse()
        .map_err(|()| LineError::UnknownShape(shape_token.to_string()))?;
    let color = color
        .parse()
        .map_err(|()| LineError::UnknownColor(color.to_string()))?;
    let position = position
        .parse()
        .map_err(|()| LineError::UnknownPosition(position.to_string()))?;
    let screen = screen.parse::<i32>().unwrap_or_else(|_| {
        warn!("screen '{}' is not an integer, using 0", screen);
        0
    });

    Ok(Some(ShapeConfig {
        shape,
        color,
        position,
        screen,
    }))
}

/// Parse every line, warning about and skipping bad ones.
/// Returns the default record if nothing valid was found.
pub fn parse_str(text: &str) -> Vec<ShapeConfig> {
    let mut shapes = Vec::new();
    for (number, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(shape)) => shapes.push(shape),
            Ok(None) => {},
            Err(e) => warn!("line {}: {} in '{}', skipped", number + 1, e, line.trim()),
        }
    }
    or_default(shapes)
}

fn or_default(shapes: Vec<ShapeConfig>) -> Vec<ShapeConfig> {
    if shapes.is_empty() {
        info!("no valid ornaments configured, using default");
        vec![ShapeConfig::default()]
    } else {
        shapes
    }
}

/// Load the shape list from `path`. Never fails; problems fall back to the
/// default ornament.
pub fn load(path: impl AsRef<Path>) -> Vec<ShapeConfig> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("cannot read {}: {}, using default", path.display(), e);
            return vec![ShapeConfig::default()];
        },
    };

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        match serde_json::from_str::<Vec<ShapeConfig>>(&text) {
            Ok(shapes) => or_default(shapes),
            Err(e) => {
                warn!("invalid JSON in {}: {}, using default", path.display(), e);
                vec![ShapeConfig::default()]
            },
        }
    } else {
        parse_str(&text)
    }
}
