//! Bounded polling on an injectable clock.

use std::io;
use std::thread;
use std::time::Duration;

use clara_config::RetryPolicy;

/// Source of delays between probes.
pub trait Clock: Send {
    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Clock`] that really sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Result of one probe, or of a whole poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// The awaited condition holds.
    Ready,
    /// The condition does not hold yet.
    NotReady,
    /// Every attempt ran without the condition holding.
    Exhausted,
}

/// Sleeps one interval before each probe, for at most `policy.attempts`
/// probes.
///
/// Returns [`PollState::Ready`] as soon as a probe reports it and
/// [`PollState::Exhausted`] once the attempts run out. A probe error aborts
/// the poll.
pub fn poll_until<C, P>(policy: RetryPolicy, clock: &C, mut probe: P) -> io::Result<PollState>
where
    C: Clock + ?Sized,
    P: FnMut() -> io::Result<PollState>,
{
    for _ in 0..policy.attempts {
        clock.sleep(policy.interval());
        if probe()? == PollState::Ready {
            return Ok(PollState::Ready);
        }
    }
    Ok(PollState::Exhausted)
}
