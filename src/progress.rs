//! The optional progress/cancellation sink invoked at section boundaries
//! (§6 "Progress callback"; §4 "Suspension points").
//!
//! Primitive I/O in this crate is synchronous; the only place a caller gets
//! a chance to observe progress or ask for cancellation is between the five
//! top-level sections of a document (header, color mode data, image
//! resources, layer and mask information, image data) and between major
//! steps of tree construction/flattening. [`Progress::report`] is the single
//! call site every section boundary goes through.

/// Whether to keep going after a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    /// Proceed to the next section.
    Continue,
    /// Abort; the caller surfaces [`crate::error::PsdError::Cancelled`].
    Break,
}

/// A progress sink: `(task_name, fraction_done) -> ControlFlow`, called at
/// section boundaries during read/write.
pub struct Progress<'a> {
    sink: Option<Box<dyn FnMut(&str, f32) -> ControlFlow + 'a>>,
}

impl<'a> Progress<'a> {
    /// No-op progress tracking.
    pub fn none() -> Progress<'a> {
        Progress { sink: None }
    }

    /// Wrap a callback closure as a progress sink.
    pub fn new(sink: impl FnMut(&str, f32) -> ControlFlow + 'a) -> Progress<'a> {
        Progress {
            sink: Some(Box::new(sink)),
        }
    }

    /// Report progress on `task_name` at `fraction_done` (`0.0..=1.0`),
    /// returning whether the caller should keep going. Always `Continue`
    /// when no sink was installed.
    pub fn report(&mut self, task_name: &str, fraction_done: f32) -> ControlFlow {
        match &mut self.sink {
            Some(sink) => {
                let flow = sink(task_name, fraction_done);
                tracing::debug!(task_name, fraction_done, ?flow, "progress");
                flow
            }
            None => ControlFlow::Continue,
        }
    }
}

impl<'a> Default for Progress<'a> {
    fn default() -> Progress<'a> {
        Progress::none()
    }
}

impl<'a> std::fmt::Debug for Progress<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("installed", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sink_always_continues() {
        let mut progress = Progress::none();
        assert_eq!(progress.report("header", 0.0), ControlFlow::Continue);
    }

    #[test]
    fn sink_can_request_abort() {
        let mut progress = Progress::new(|_task, fraction| {
            if fraction > 0.5 {
                ControlFlow::Break
            } else {
                ControlFlow::Continue
            }
        });
        assert_eq!(progress.report("layers", 0.1), ControlFlow::Continue);
        assert_eq!(progress.report("layers", 0.9), ControlFlow::Break);
    }
}
