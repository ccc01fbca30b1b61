use serde::{Deserialize, Serialize};

mod convert;
mod document;
mod error;
mod geometry;
mod stroke;

pub use convert::{
    convert, Conversion, ConversionOptions, SkippedStroke, StrokePolicy, StrokeSource,
};
pub use document::{
    CanvasTransformId, ContextId, InkDocument, TraceGroupId, ANNOTATION_TYPE, INKML_NAMESPACE,
};
pub use error::{InkError, Result};
pub use geometry::{Transform, TRANSFORM_DECIMALS};
pub use stroke::{parse_point, parse_sample, CapturedStroke, PenSample, PEN_UP_MARKER};

/// A raw device coordinate as reported by the drawing surface.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
