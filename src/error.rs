pub type Result<T> = std::result::Result<T, ResizeError>;

/// Failure to produce an output image
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResizeError {
    #[error("invalid size {width}x{height}: dimensions must be finite and positive")]
    InvalidSize { width: f64, height: f64 },

    #[error("source image is empty")]
    EmptySource,

    #[error("crop bounds ({x}, {y}, {width}x{height}) do not intersect the source image")]
    EmptyCrop {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
}

impl ResizeError {
    pub fn invalid_size(width: f64, height: f64) -> Self {
        Self::InvalidSize { width, height }
    }

    pub fn context_unavailable(msg: impl Into<String>) -> Self {
        Self::ContextUnavailable(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_stable() {
        assert!(ResizeError::invalid_size(0.0, 10.0)
            .to_string()
            .starts_with("invalid size 0x10"));
        assert_eq!(ResizeError::EmptySource.to_string(), "source image is empty");
        assert!(ResizeError::context_unavailable("too large")
            .to_string()
            .contains("graphics context unavailable: too large"));
    }
}
