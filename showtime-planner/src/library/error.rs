//! Library error types.

use crate::domain::{EventId, MovieId, TheaterId};

/// A rejected library edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("movie title must not be empty")]
    EmptyTitle,

    #[error("theater name must not be empty")]
    EmptyName,

    #[error("movie runtime must be at least one minute")]
    ZeroRuntime,

    #[error("movie rank must be a positive integer")]
    InvalidRank,

    #[error("unknown movie: {0}")]
    UnknownMovie(MovieId),

    #[error("unknown theater: {0}")]
    UnknownTheater(TheaterId),

    #[error("unknown event: {0}")]
    UnknownEvent(EventId),
}

impl LibraryError {
    /// Whether the error names an id that doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LibraryError::UnknownMovie(_)
                | LibraryError::UnknownTheater(_)
                | LibraryError::UnknownEvent(_)
        )
    }
}

/// Error reading or writing the library document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("library document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("library document must be a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Library(#[from] LibraryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            LibraryError::UnknownMovie(MovieId::new("m9")).to_string(),
            "unknown movie: m9"
        );
        assert_eq!(
            LibraryError::ZeroRuntime.to_string(),
            "movie runtime must be at least one minute"
        );

        let err = StoreError::from(LibraryError::EmptyTitle);
        assert_eq!(err.to_string(), "movie title must not be empty");
    }

    #[test]
    fn not_found_classification() {
        assert!(LibraryError::UnknownEvent(EventId::new("e1")).is_not_found());
        assert!(!LibraryError::EmptyId.is_not_found());
    }
}
