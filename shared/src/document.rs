use std::fmt;

use quick_xml::escape::escape;

use crate::{InkError, PenSample, Point, Result, Transform};

pub const INKML_NAMESPACE: &str = "http://www.w3.org/2003/InkML";
pub const ANNOTATION_TYPE: &str = "equationInTeX";

macro_rules! element_id {
    ($name:ident, $prefix:literal) => {
        /// Sequential element identifier, starting at 1. Displays as the
        /// InkML `xml:id` value.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

element_id!(CanvasTransformId, "canvasTransform");
element_id!(ContextId, "context");
element_id!(TraceGroupId, "traceGroup");

#[derive(Clone, Debug)]
struct Definition {
    canvas_transform: CanvasTransformId,
    transform: Transform,
    context: ContextId,
}

#[derive(Clone, Debug)]
struct TraceGroup {
    id: TraceGroupId,
    context: ContextId,
    traces: Vec<Vec<Point>>,
}

/// Append-only builder for one InkML document.
///
/// Each stroke is added in two steps: [`add_canvas_transform_and_context`]
/// defines the transform and a context pointing at it, then
/// [`add_trace_group`] adds the stroke's traces under the context created
/// last. [`add_trace_group_with_context`] names the context explicitly
/// instead of relying on call order.
///
/// [`add_canvas_transform_and_context`]: InkDocument::add_canvas_transform_and_context
/// [`add_trace_group`]: InkDocument::add_trace_group
/// [`add_trace_group_with_context`]: InkDocument::add_trace_group_with_context
#[derive(Clone, Debug, Default)]
pub struct InkDocument {
    definitions: Vec<Definition>,
    annotations: Vec<String>,
    trace_groups: Vec<TraceGroup>,
    canvas_transform_counter: u32,
    context_counter: u32,
    trace_group_counter: u32,
}

impl InkDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_canvas_transform_and_context(&mut self, transform: Transform) -> ContextId {
        self.canvas_transform_counter += 1;
        let canvas_transform = CanvasTransformId(self.canvas_transform_counter);
        self.context_counter += 1;
        let context = ContextId(self.context_counter);
        self.definitions.push(Definition {
            canvas_transform,
            transform,
            context,
        });
        context
    }

    /// Adds a trace group under the most recently created context.
    pub fn add_trace_group(&mut self, samples: &[PenSample]) -> Result<TraceGroupId> {
        let context = self.latest_context().ok_or(InkError::NoContext)?;
        Ok(self.push_trace_group(context, samples))
    }

    pub fn add_trace_group_with_context(
        &mut self,
        context: ContextId,
        samples: &[PenSample],
    ) -> Result<TraceGroupId> {
        if context.0 == 0 || context.0 > self.context_counter {
            return Err(InkError::UnknownContext(context));
        }
        Ok(self.push_trace_group(context, samples))
    }

    pub fn add_annotation(&mut self, text: &str) {
        self.annotations.push(text.to_string());
    }

    pub fn latest_context(&self) -> Option<ContextId> {
        self.definitions.last().map(|definition| definition.context)
    }

    pub fn canvas_transform_count(&self) -> usize {
        self.canvas_transform_counter as usize
    }

    pub fn context_count(&self) -> usize {
        self.context_counter as usize
    }

    pub fn trace_group_count(&self) -> usize {
        self.trace_group_counter as usize
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.annotations.is_empty() && self.trace_groups.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("<ink xmlns=\"{INKML_NAMESPACE}\">\n"));
        out.push_str("  <definitions>\n");
        for definition in &self.definitions {
            out.push_str(&format!(
                "    <canvasTransform xml:id=\"{}\">\n",
                definition.canvas_transform
            ));
            out.push_str(&format!(
                "      <mapping type=\"affine\"><affine>{}</affine></mapping>\n",
                definition.transform
            ));
            out.push_str("    </canvasTransform>\n");
            out.push_str(&format!(
                "    <context xml:id=\"{}\" canvasTransformRef=\"#{}\"/>\n",
                definition.context, definition.canvas_transform
            ));
        }
        out.push_str("  </definitions>\n");
        for annotation in &self.annotations {
            out.push_str(&format!(
                "  <annotation type=\"{ANNOTATION_TYPE}\">${}$</annotation>\n",
                escape(annotation.as_str())
            ));
        }
        for group in &self.trace_groups {
            out.push_str(&format!(
                "  <traceGroup xml:id=\"{}\" contextRef=\"#{}\">\n",
                group.id, group.context
            ));
            for trace in &group.traces {
                out.push_str(&format!("    <trace>{}</trace>\n", trace_text(trace)));
            }
            out.push_str("  </traceGroup>\n");
        }
        out.push_str("</ink>\n");
        out
    }

    fn push_trace_group(&mut self, context: ContextId, samples: &[PenSample]) -> TraceGroupId {
        self.trace_group_counter += 1;
        let id = TraceGroupId(self.trace_group_counter);
        self.trace_groups.push(TraceGroup {
            id,
            context,
            traces: split_traces(samples),
        });
        id
    }
}

/// Splits samples into pen-down runs. Runs left empty by repeated or
/// leading pen lifts are dropped.
fn split_traces(samples: &[PenSample]) -> Vec<Vec<Point>> {
    let mut traces = Vec::new();
    let mut current = Vec::new();
    for sample in samples {
        match *sample {
            PenSample::Down(point) => current.push(point),
            PenSample::Up => {
                if !current.is_empty() {
                    traces.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        traces.push(current);
    }
    traces
}

fn trace_text(trace: &[Point]) -> String {
    trace
        .iter()
        .map(|point| format!("{} {}", point.x, point.y))
        .collect::<Vec<_>>()
        .join(", ")
}
