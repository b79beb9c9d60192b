//! Observed lifecycle state of a remote job.

/// Remote job state as last observed by a status fetch.
///
/// `Completed` and `Failed` are terminal: once either is observed the job
/// never transitions again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus<T> {
    /// Accepted, not yet started.
    Pending,
    /// Running.
    Processing,
    /// Finished successfully.
    Completed(T),
    /// Finished unsuccessfully, with the backend's message.
    Failed(String),
}

impl<T> JobStatus<T> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed(_) | JobStatus::Failed(_))
    }

    /// Short lowercase name, matching the backend's wire vocabulary.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed(_) => "completed",
            JobStatus::Failed(_) => "failed",
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> JobStatus<U> {
        match self {
            JobStatus::Pending => JobStatus::Pending,
            JobStatus::Processing => JobStatus::Processing,
            JobStatus::Completed(result) => JobStatus::Completed(f(result)),
            JobStatus::Failed(message) => JobStatus::Failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!JobStatus::<()>::Pending.is_terminal());
        assert!(!JobStatus::<()>::Processing.is_terminal());
        assert!(JobStatus::Completed(()).is_terminal());
        assert!(JobStatus::<()>::Failed("x".into()).is_terminal());
    }

    #[test]
    fn map_preserves_state() {
        assert_eq!(JobStatus::Completed(2).map(|n| n * 10), JobStatus::Completed(20));
        assert_eq!(
            JobStatus::<i32>::Failed("boom".into()).map(|n| n * 10),
            JobStatus::Failed("boom".into())
        );
        assert_eq!(JobStatus::<i32>::Processing.map(|n| n + 1).label(), "processing");
    }
}
