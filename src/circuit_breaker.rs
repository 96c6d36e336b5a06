use failsafe::{backoff, failure_policy, Config, StateMachine};
use std::time::Duration;

/// Circuit breaker guarding one lead source.
pub type SourceBreaker =
    StateMachine<failure_policy::ConsecutiveFailures<backoff::Exponential>, ()>;

/// Creates a circuit breaker for a lead source API.
///
/// # Configuration
///
/// - **Failure threshold**: 5 consecutive failed fetches open the circuit.
/// - **Backoff**: Exponential from 10s to 60s before a trial fetch is allowed.
///
/// While open, refreshes skip the source and report it as failed instead of
/// waiting on the fetch timeout every time.
///
/// # Example
///
/// ```rust
/// use rust_leads_api::circuit_breaker::create_source_circuit_breaker;
/// use failsafe::CircuitBreaker;
///
/// let breaker = create_source_circuit_breaker();
/// assert!(breaker.is_call_permitted());
/// ```
pub fn create_source_circuit_breaker() -> SourceBreaker {
    let backoff_strategy = backoff::exponential(Duration::from_secs(10), Duration::from_secs(60));

    let failure_policy = failure_policy::consecutive_failures(5, backoff_strategy);

    Config::new().failure_policy(failure_policy).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use failsafe::{CircuitBreaker, Error};

    #[test]
    fn test_breaker_opens_after_consecutive_failures() {
        let breaker = create_source_circuit_breaker();

        for _ in 0..5 {
            let result: Result<(), Error<&str>> = breaker.call(|| Err::<(), &str>("502 from source"));
            assert!(matches!(result, Err(Error::Inner("502 from source"))));
        }

        assert!(!breaker.is_call_permitted());
        let result: Result<(), Error<&str>> = breaker.call(|| Ok::<(), &str>(()));
        assert!(matches!(result, Err(Error::Rejected)));
    }

    #[test]
    fn test_success_resets_failure_streak() {
        let breaker = create_source_circuit_breaker();

        for _ in 0..4 {
            let _: Result<(), Error<&str>> = breaker.call(|| Err::<(), &str>("timeout"));
        }
        let result: Result<usize, Error<&str>> = breaker.call(|| Ok::<usize, &str>(12));
        assert_eq!(result.unwrap(), 12);

        let _: Result<(), Error<&str>> = breaker.call(|| Err::<(), &str>("timeout"));
        assert!(breaker.is_call_permitted());
    }
}
