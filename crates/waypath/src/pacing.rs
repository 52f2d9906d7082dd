//! Cooperative execution: a step loop shared by the synchronous and the
//! paced (cancellable) entry points.

use waypath_core::{CancelToken, Node};

use crate::error::SearchError;
use crate::traits::Stepper;

/// Step interval for paced runs.
///
/// Every `yield_every` steps a paced run hands control to the caller's
/// `on_yield` callback and then polls its [`CancelToken`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pacing {
    yield_every: usize,
}

impl Pacing {
    pub const DEFAULT_INTERVAL: usize = 1024;

    /// Yield every `yield_every` steps (at least 1).
    pub fn new(yield_every: usize) -> Self {
        Self {
            yield_every: yield_every.max(1),
        }
    }

    #[inline]
    pub fn yield_every(&self) -> usize {
        self.yield_every
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

/// Step budget plus cancellation check, threaded through a run.
pub(crate) struct Pacer<'a> {
    token: &'a CancelToken,
    every: u64,
    steps: u64,
    on_yield: &'a mut dyn FnMut(u64),
}

impl<'a> Pacer<'a> {
    pub(crate) fn new(pacing: Pacing, token: &'a CancelToken, on_yield: &'a mut dyn FnMut(u64)) -> Self {
        Self {
            token,
            every: pacing.yield_every as u64,
            steps: 0,
            on_yield,
        }
    }

    /// Account for one step about to run. Yields and polls the token at
    /// interval boundaries; fails before the step if cancelled.
    pub(crate) fn tick(&mut self) -> Result<(), SearchError> {
        if self.steps % self.every == 0 {
            if self.steps > 0 {
                (self.on_yield)(self.steps);
            }
            if self.token.is_cancelled() {
                log::debug!("search cancelled after {} steps", self.steps);
                return Err(SearchError::Cancelled);
            }
        }
        self.steps += 1;
        Ok(())
    }
}

/// Step `search` until `done` accepts a freshly fixed node or the search
/// is exhausted.
pub(crate) fn drive<S: Stepper + ?Sized>(
    search: &mut S,
    mut done: impl FnMut(Node) -> bool,
    mut pacer: Option<&mut Pacer<'_>>,
) -> Result<Option<Node>, SearchError> {
    loop {
        if let Some(p) = pacer.as_deref_mut() {
            p.tick()?;
        }
        match search.step()? {
            None => return Ok(None),
            Some(node) if done(node) => return Ok(Some(node)),
            Some(_) => {}
        }
    }
}
