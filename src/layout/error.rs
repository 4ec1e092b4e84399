use thiserror::Error;

/// Failure of a whole layout pass. The `Display` text is what users see.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid size {width}x{height} for node `{id}`")]
    InvalidSizing { id: String, width: f32, height: f32 },
    #[error("rank solver returned no position for node `{id}`")]
    MissingPosition { id: String },
    #[error("rank solver panicked: {0}")]
    SolverPanicked(String),
}

/// Best-effort text of a caught panic payload.
pub(super) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_are_rendered_verbatim() {
        let caught = std::panic::catch_unwind(|| panic!("index out of bounds")).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "index out of bounds");
        let caught = std::panic::catch_unwind(|| panic!("{} failed", "rank")).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "rank failed");
        let err = LayoutError::SolverPanicked("boom".to_string());
        assert_eq!(err.to_string(), "rank solver panicked: boom");
    }
}
