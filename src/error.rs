use thiserror::Error;

pub type Result<T> = std::result::Result<T, FemError>;

/// Failures of model construction, assembly and solve.
///
/// Everything except `NumericalFailure` means the model itself is
/// misconfigured: the current solve is aborted and nothing partial is
/// returned.
#[derive(Debug, Error)]
pub enum FemError {
    #[error("unable to locate {0}")]
    IoMissing(String),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),
    #[error("degenerate geometry in element {element}: jacobian determinant {jacob_det:e}")]
    Geometry { element: usize, jacob_det: f64 },
    #[error("numerical failure: {0}")]
    NumericalFailure(String),
}

impl FemError {
    pub fn schema(message: impl Into<String>) -> Self {
        FemError::Schema(message.into())
    }
    /// Re-tags a geometry error raised by a kernel with the element it came from.
    pub fn in_element(self, ielem: usize) -> Self {
        match self {
            FemError::Geometry { jacob_det, .. } => FemError::Geometry {
                element: ielem,
                jacob_det,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for FemError {
    fn from(err: serde_json::Error) -> Self {
        FemError::Schema(err.to_string())
    }
}

impl From<csv::Error> for FemError {
    fn from(err: csv::Error) -> Self {
        FemError::IoMissing(err.to_string())
    }
}

impl From<std::io::Error> for FemError {
    fn from(err: std::io::Error) -> Self {
        FemError::IoMissing(err.to_string())
    }
}
