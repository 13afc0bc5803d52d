use std::fmt;

#[derive(Debug)]
pub enum EdgeError {
    /// Pixel vector length doesn't match width * height
    BufferSizeMismatch { expected: usize, got: usize },
    /// A configuration value that can't drive a run
    InvalidConfig { field: &'static str, reason: &'static str },
    /// The worker pool could not be started
    ThreadPool(rayon::ThreadPoolBuildError),
    /// Raster decode/encode failure
    Image(image::ImageError),
}

impl fmt::Display for EdgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferSizeMismatch { expected, got } => {
                write!(f, "pixel buffer: expected {expected} elements, got {got}")
            }
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config `{field}`: {reason}")
            }
            Self::ThreadPool(e) => write!(f, "failed to build worker pool: {e}"),
            Self::Image(e) => write!(f, "image i/o: {e}"),
        }
    }
}

impl std::error::Error for EdgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ThreadPool(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for EdgeError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e)
    }
}

impl From<image::ImageError> for EdgeError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}
