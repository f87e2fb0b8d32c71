//! Multi-document workflows with compensating steps.
//!
//! A [`Saga`] runs its steps in order. When a step fails, every step that
//! already completed is compensated in reverse order and the original error is
//! handed back unchanged, together with any compensation that also failed.

use std::fmt::Display;

use async_trait::async_trait;
use tracing::{debug, error, warn};

/// One reversible unit of work in a [`Saga`].
#[async_trait]
pub trait SagaStep<E>: Send {
    /// Short label used in logs and failure reports.
    fn name(&self) -> &'static str;

    /// Apply the step's side effect.
    async fn execute(&mut self) -> Result<(), E>;

    /// Undo the side effect of a successful [`SagaStep::execute`].
    ///
    /// Steps with no inverse keep the default no-op.
    async fn compensate(&mut self) -> Result<(), E> {
        Ok(())
    }
}

/// A compensation that could not be applied.
#[derive(Debug)]
pub struct CompensationFailure<E> {
    pub step: &'static str,
    pub error: E,
}

/// Outcome of a saga whose forward path failed.
#[derive(Debug)]
pub struct SagaFailure<E> {
    /// Step whose execution failed.
    pub step: &'static str,

    /// The error returned by the failed step.
    pub error: E,

    /// Compensations that failed while rolling back, in rollback order.
    pub compensation_failures: Vec<CompensationFailure<E>>,
}

impl<E> SagaFailure<E> {
    /// Whether every completed step was rolled back.
    #[must_use]
    pub fn fully_compensated(&self) -> bool {
        self.compensation_failures.is_empty()
    }
}

/// Ordered list of steps executed as one logical operation.
pub struct Saga<E> {
    name: &'static str,
    steps: Vec<Box<dyn SagaStep<E>>>,
}

impl<E> Saga<E>
where
    E: Display + Send,
{
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn step(mut self, step: impl SagaStep<E> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Execute every step, compensating completed ones on the first failure.
    ///
    /// # Errors
    ///
    /// Returns a [`SagaFailure`] carrying the failing step's original error.
    pub async fn run(self) -> Result<(), SagaFailure<E>> {
        let saga = self.name;
        let mut completed: Vec<Box<dyn SagaStep<E>>> = Vec::with_capacity(self.steps.len());

        for mut step in self.steps {
            debug!(saga, step = step.name(), "executing saga step");

            if let Err(error) = step.execute().await {
                let failed = step.name();

                warn!(saga, step = failed, %error, "saga step failed, compensating");

                let compensation_failures = compensate(saga, completed).await;

                return Err(SagaFailure {
                    step: failed,
                    error,
                    compensation_failures,
                });
            }

            completed.push(step);
        }

        Ok(())
    }
}

async fn compensate<E>(
    saga: &'static str,
    completed: Vec<Box<dyn SagaStep<E>>>,
) -> Vec<CompensationFailure<E>>
where
    E: Display + Send,
{
    let mut failures = Vec::new();

    for mut step in completed.into_iter().rev() {
        let name = step.name();

        match step.compensate().await {
            Ok(()) => debug!(saga, step = name, "compensated saga step"),
            Err(error) => {
                error!(saga, step = name, %error, "failed to compensate saga step");

                failures.push(CompensationFailure { step: name, error });
            }
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use testresult::TestResult;

    use super::*;

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recorded {
        name: &'static str,
        journal: Journal,
        fail_execute: bool,
        fail_compensate: bool,
    }

    impl Recorded {
        fn new(name: &'static str, journal: &Journal) -> Self {
            Self {
                name,
                journal: Arc::clone(journal),
                fail_execute: false,
                fail_compensate: false,
            }
        }

        fn failing(mut self) -> Self {
            self.fail_execute = true;
            self
        }

        fn irreversible(mut self) -> Self {
            self.fail_compensate = true;
            self
        }

        fn record(&self, entry: String) {
            if let Ok(mut journal) = self.journal.lock() {
                journal.push(entry);
            }
        }
    }

    #[async_trait]
    impl SagaStep<String> for Recorded {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn execute(&mut self) -> Result<(), String> {
            if self.fail_execute {
                return Err(format!("{} exploded", self.name));
            }

            self.record(format!("execute {}", self.name));

            Ok(())
        }

        async fn compensate(&mut self) -> Result<(), String> {
            if self.fail_compensate {
                return Err(format!("{} cannot be undone", self.name));
            }

            self.record(format!("compensate {}", self.name));

            Ok(())
        }
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().map(|j| j.clone()).unwrap_or_default()
    }

    #[tokio::test]
    async fn runs_all_steps_in_order() -> TestResult {
        let journal = Journal::default();

        Saga::new("test")
            .step(Recorded::new("a", &journal))
            .step(Recorded::new("b", &journal))
            .step(Recorded::new("c", &journal))
            .run()
            .await
            .map_err(|failure| failure.error)?;

        assert_eq!(entries(&journal), ["execute a", "execute b", "execute c"]);

        Ok(())
    }

    #[tokio::test]
    async fn compensates_completed_steps_in_reverse() {
        let journal = Journal::default();

        let result = Saga::new("test")
            .step(Recorded::new("a", &journal))
            .step(Recorded::new("b", &journal))
            .step(Recorded::new("c", &journal).failing())
            .step(Recorded::new("d", &journal))
            .run()
            .await;

        assert!(
            matches!(&result, Err(failure) if failure.step == "c" && failure.fully_compensated()),
            "expected failure at c, got {result:?}"
        );
        assert_eq!(
            entries(&journal),
            ["execute a", "execute b", "compensate b", "compensate a"]
        );
    }

    #[tokio::test]
    async fn returns_original_error_when_compensation_fails() {
        let journal = Journal::default();

        let result = Saga::new("test")
            .step(Recorded::new("a", &journal))
            .step(Recorded::new("b", &journal).irreversible())
            .step(Recorded::new("c", &journal).failing())
            .run()
            .await;

        let Err(failure) = result else {
            panic!("expected saga to fail");
        };

        assert_eq!(failure.error, "c exploded");
        assert_eq!(failure.compensation_failures.len(), 1);
        assert_eq!(failure.compensation_failures[0].step, "b");
        assert_eq!(
            entries(&journal),
            ["execute a", "execute b", "compensate a"]
        );
    }

    #[tokio::test]
    async fn first_step_failure_compensates_nothing() {
        let journal = Journal::default();

        let result = Saga::new("test")
            .step(Recorded::new("a", &journal).failing())
            .step(Recorded::new("b", &journal))
            .run()
            .await;

        assert!(
            matches!(&result, Err(failure) if failure.step == "a"),
            "expected failure at a, got {result:?}"
        );
        assert!(entries(&journal).is_empty());
    }
}
