use std::fmt::Display;

use anyhow::Result;

/// How a pipeline treats failures of one of its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first error aborts the whole run.
    FailFast,
    /// Errors are logged and degrade to an empty result.
    BestEffort,
}

/// Source fetch, bundle url decoding and catalog file writes.
pub const CATALOG_IO: FailurePolicy = FailurePolicy::FailFast;

/// A failed resolution only loses that image's slot in the aggregate.
pub const TAG_RESOLUTION: FailurePolicy = FailurePolicy::BestEffort;

/// The write of the aggregated latest image file.
pub const IMAGE_AGGREGATE_IO: FailurePolicy = FailurePolicy::FailFast;

impl FailurePolicy {
    pub fn handle<T, C>(self, context: C, result: Result<T>) -> Result<Option<T>>
    where
        C: Display + Send + Sync + 'static,
    {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) => match self {
                Self::FailFast => Err(error.context(context)),
                Self::BestEffort => {
                    log::warn!("{}: {:?}", context, error);
                    Ok(None)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_fail_fast_propagates_errors() {
        let handled = FailurePolicy::FailFast.handle("context", Ok(1));
        assert_eq!(handled.unwrap(), Some(1));

        let handled = FailurePolicy::FailFast.handle("context", Err::<i32, _>(anyhow!("boom")));
        let error = handled.unwrap_err();
        assert_eq!(error.to_string(), "context");
    }

    #[test]
    fn test_best_effort_degrades_errors() {
        let handled = FailurePolicy::BestEffort.handle("context", Ok(1));
        assert_eq!(handled.unwrap(), Some(1));

        let handled = FailurePolicy::BestEffort.handle("context", Err::<i32, _>(anyhow!("boom")));
        assert_eq!(handled.unwrap(), None);
    }
}
