use thiserror::Error;

use crate::ContextId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InkError {
    /// The source points are collinear with the origin, so no linear map
    /// sends them to the targets.
    #[error("degenerate transform: denominator is {denominator}")]
    DegenerateTransform { denominator: f64 },

    #[error("malformed point: {input:?}")]
    MalformedPoint { input: String },

    #[error("malformed stroke command: {input:?}")]
    MalformedCommand { input: String },

    #[error("stroke needs 4 correspondence points, found {found}")]
    MissingCorrespondence { found: usize },

    #[error("no context has been defined for the trace group")]
    NoContext,

    #[error("unknown context: #{0}")]
    UnknownContext(ContextId),

    #[error("failed to enumerate strokes from source: {message}")]
    Enumerate { message: String },

    #[error("failed to read stroke {index} from source: {message}")]
    Source { index: usize, message: String },
}

pub type Result<T> = std::result::Result<T, InkError>;
