use thiserror::Error;

/// Why a landmark frame was rejected at the tracker boundary.
///
/// Frames are validated once, when they are built; nothing past
/// `LandmarkFrame` ever sees a malformed hand.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("hand has {got} landmarks, expected {expected}")]
    WrongPointCount { expected: usize, got: usize },
    #[error("landmark {landmark} has a non-finite coordinate")]
    NonFinite { landmark: usize },
    #[error("face centre has a non-finite coordinate")]
    NonFiniteFace,
    #[error("frame timestamp {0} is not finite")]
    NonFiniteTimestamp(f64),
    #[error("unknown handedness code {0}")]
    UnknownHandedness(f32),
    #[error("flat buffer length {got} is not a multiple of {expected}")]
    Truncated { expected: usize, got: usize },
    #[error("too many hands in one frame ({0})")]
    TooManyHands(usize),
    #[error("too many faces in one frame ({0})")]
    TooManyFaces(usize),
}
