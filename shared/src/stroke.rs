use serde::{Deserialize, Serialize};

use crate::{InkError, Point, Result, Transform};

/// How the drawing surface spells a pen lift inside a point list.
pub const PEN_UP_MARKER: &str = "?, ?";

const CORRESPONDENCE_POINTS: usize = 4;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum PenSample {
    #[serde(rename = "pen:down")]
    Down(Point),
    #[serde(rename = "pen:up")]
    Up,
}

/// One object captured by the drawing surface: its pen path and the four
/// points its canvas transform is derived from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CapturedStroke {
    pub samples: Vec<PenSample>,
    /// `[p00, p01, p10, p11]`: `p00` maps to `p10` and `p01` maps to `p11`.
    pub correspondence: [Point; CORRESPONDENCE_POINTS],
}

impl CapturedStroke {
    /// Builds a stroke from `"x, y"` entries. The last four entries are the
    /// correspondence points, everything before them is the pen path.
    pub fn from_point_strings<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        if entries.len() < CORRESPONDENCE_POINTS {
            return Err(InkError::MissingCorrespondence {
                found: entries.len(),
            });
        }
        let (path, tail) = entries.split_at(entries.len() - CORRESPONDENCE_POINTS);
        let samples = path
            .iter()
            .map(|entry| parse_sample(entry.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let mut correspondence = [Point::ORIGIN; CORRESPONDENCE_POINTS];
        for (slot, entry) in correspondence.iter_mut().zip(tail) {
            *slot = parse_point(entry.as_ref())?;
        }
        Ok(Self {
            samples,
            correspondence,
        })
    }

    /// Parses a polyline command string such as
    /// `AttachCopyToView[Polyline[(1, 2), (?, ?), (3, 4), true], 1, (0, 0), (1, 0), (0, 1), (1, 1)]`.
    pub fn parse_command(command: &str) -> Result<Self> {
        let entries = command_points(command)?;
        Self::from_point_strings(&entries)
    }

    pub fn transform(&self) -> Result<Transform> {
        let [p00, p01, p10, p11] = self.correspondence;
        Transform::solve(p00, p01, p10, p11)
    }
}

pub fn parse_point(text: &str) -> Result<Point> {
    let malformed = || InkError::MalformedPoint {
        input: text.to_string(),
    };
    let (x, y) = text.split_once(',').ok_or_else(malformed)?;
    let x = x.trim().parse::<f64>().map_err(|_| malformed())?;
    let y = y.trim().parse::<f64>().map_err(|_| malformed())?;
    let point = Point::new(x, y);
    if !point.is_finite() {
        return Err(malformed());
    }
    Ok(point)
}

pub fn parse_sample(text: &str) -> Result<PenSample> {
    if is_pen_up(text) {
        return Ok(PenSample::Up);
    }
    parse_point(text).map(PenSample::Down)
}

fn is_pen_up(text: &str) -> bool {
    matches!(text.split_once(','), Some((x, y)) if x.trim() == "?" && y.trim() == "?")
}

/// Contents of every `(...)` group, starting at the first parenthesis.
fn command_points(command: &str) -> Result<Vec<&str>> {
    let malformed = || InkError::MalformedCommand {
        input: command.to_string(),
    };
    let start = command.find('(').ok_or_else(malformed)?;
    command[start..]
        .split('(')
        .skip(1)
        .map(|chunk| {
            chunk
                .split_once(')')
                .map(|(inner, _)| inner.trim())
                .ok_or_else(malformed)
        })
        .collect()
}
