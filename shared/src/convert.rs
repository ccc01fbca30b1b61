use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{CapturedStroke, InkDocument, InkError, Result, Transform};

/// Read access to the objects captured by a drawing surface.
pub trait StrokeSource {
    /// Number of captured strokes. A source that cannot enumerate its
    /// strokes reports an error rather than an empty count.
    fn stroke_count(&self) -> Result<usize>;
    /// The polyline command string of the stroke at `index`.
    fn stroke_command(&self, index: usize) -> Result<String>;
}

impl<S: AsRef<str>> StrokeSource for [S] {
    fn stroke_count(&self) -> Result<usize> {
        Ok(self.len())
    }

    fn stroke_command(&self, index: usize) -> Result<String> {
        self.get(index)
            .map(|command| command.as_ref().to_string())
            .ok_or_else(|| InkError::Source {
                index,
                message: "index out of range".to_string(),
            })
    }
}

impl<S: AsRef<str>> StrokeSource for Vec<S> {
    fn stroke_count(&self) -> Result<usize> {
        self.as_slice().stroke_count()
    }

    fn stroke_command(&self, index: usize) -> Result<String> {
        self.as_slice().stroke_command(index)
    }
}

/// What to do with a stroke whose points or transform cannot be used.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StrokePolicy {
    /// Fail the whole conversion; no document is rendered.
    #[default]
    Abort,
    /// Leave the stroke out of the document and report it.
    Skip,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionOptions {
    pub on_invalid_stroke: StrokePolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedStroke {
    pub index: usize,
    pub error: InkError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub inkml: String,
    /// Strokes that made it into the document.
    pub strokes: usize,
    pub skipped: Vec<SkippedStroke>,
}

/// Converts every stroke of `source` into one InkML document annotated with
/// `annotation`.
///
/// Returns `Ok(None)` when there is nothing to write: the source is empty or
/// every stroke was skipped. A source that fails to enumerate its strokes is
/// an error whatever the [`StrokePolicy`].
pub fn convert<S: StrokeSource + ?Sized>(
    source: &S,
    annotation: &str,
    options: &ConversionOptions,
) -> Result<Option<Conversion>> {
    let count = source.stroke_count().inspect_err(|error| {
        warn!("Failed to enumerate strokes: {error}");
    })?;
    if count == 0 {
        debug!("No strokes captured, nothing to convert");
        return Ok(None);
    }

    let mut document = InkDocument::new();
    let mut skipped = Vec::new();
    for index in 0..count {
        // Parse and solve before touching the document so a bad stroke never
        // leaves a context without its trace group.
        match prepare_stroke(source, index) {
            Ok((stroke, transform)) => {
                let context = document.add_canvas_transform_and_context(transform);
                let group = document.add_trace_group_with_context(context, &stroke.samples)?;
                debug!(
                    "Converted stroke {index} into {group} samples={}",
                    stroke.samples.len()
                );
            }
            Err(error) => match options.on_invalid_stroke {
                StrokePolicy::Abort => {
                    warn!("Aborting conversion at stroke {index}: {error}");
                    return Err(error);
                }
                StrokePolicy::Skip => {
                    warn!("Skipping stroke {index}: {error}");
                    skipped.push(SkippedStroke { index, error });
                }
            },
        }
    }

    if document.trace_group_count() == 0 {
        warn!("All {count} strokes were skipped, no document produced");
        return Ok(None);
    }

    document.add_annotation(annotation);
    let inkml = document.render();
    info!(
        "Converted {} of {count} strokes bytes={}",
        document.trace_group_count(),
        inkml.len()
    );
    Ok(Some(Conversion {
        inkml,
        strokes: document.trace_group_count(),
        skipped,
    }))
}

fn prepare_stroke<S: StrokeSource + ?Sized>(
    source: &S,
    index: usize,
) -> Result<(CapturedStroke, Transform)> {
    let command = source.stroke_command(index)?;
    let stroke = CapturedStroke::parse_command(&command)?;
    let transform = stroke.transform()?;
    Ok((stroke, transform))
}
