//! At-most-one in-flight render per surface.
//!
//! Requests that arrive while a render is running collapse into a single "render again" flag, so
//! the backlog per surface stays bounded no matter how fast time or props change.

use std::sync::{Mutex, MutexGuard};

use crate::foundation::error::ClipstackResult;

/// Render lifecycle of one surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A render is in flight.
    Rendering,
    /// A render is in flight and at least one request arrived meanwhile.
    RenderingPendingRetrigger,
}

/// What the caller of [`RenderCoalescer::request`] should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderRequest {
    /// Start rendering now.
    Start,
    /// A render is already running; it will be followed by exactly one more.
    Coalesced,
}

/// What the caller of [`RenderCoalescer::finish`] should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderFinish {
    /// Done; the surface reflects the latest request.
    Idle,
    /// Requests arrived during the render; render once more.
    RenderAgain,
}

/// The bare state machine; one event at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderCoalescer {
    state: RenderState,
}

impl RenderCoalescer {
    /// Idle coalescer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Record a render request.
    pub fn request(&mut self) -> RenderRequest {
        match self.state {
            RenderState::Idle => {
                self.state = RenderState::Rendering;
                RenderRequest::Start
            }
            RenderState::Rendering | RenderState::RenderingPendingRetrigger => {
                self.state = RenderState::RenderingPendingRetrigger;
                RenderRequest::Coalesced
            }
        }
    }

    /// Record completion of the in-flight render.
    pub fn finish(&mut self) -> RenderFinish {
        match self.state {
            RenderState::RenderingPendingRetrigger => {
                self.state = RenderState::Rendering;
                RenderFinish::RenderAgain
            }
            RenderState::Rendering | RenderState::Idle => {
                self.state = RenderState::Idle;
                RenderFinish::Idle
            }
        }
    }

    /// Drop any in-flight or pending render.
    pub fn reset(&mut self) {
        self.state = RenderState::Idle;
    }
}

/// Outcome of [`LayerSurface::request_render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPass {
    /// This call rendered, `passes` times in total (1 plus retriggers).
    Rendered {
        /// Number of render invocations performed by this call.
        passes: u32,
    },
    /// Another call is rendering and will pick up this input.
    Coalesced,
}

struct LayerInner<I> {
    coalescer: RenderCoalescer,
    latest: Option<I>,
}

/// A surface's render gate: holds the latest requested input and runs renders one at a time.
///
/// The lock is never held while rendering, so a render may itself request another render (which
/// coalesces) and other threads may request concurrently.
pub struct LayerSurface<I> {
    inner: Mutex<LayerInner<I>>,
}

impl<I> Default for LayerSurface<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> LayerSurface<I> {
    /// Idle gate with no input.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LayerInner {
                coalescer: RenderCoalescer::new(),
                latest: None,
            }),
        }
    }

    /// Current render state.
    pub fn state(&self) -> RenderState {
        self.lock().coalescer.state()
    }

    /// Request a render of `input`.
    ///
    /// If a render is already in flight the input replaces any pending one and the call returns
    /// [`RenderPass::Coalesced`] immediately. Otherwise `render` runs with the newest input until no
    /// further requests arrived during the last pass. An error or panic from `render` returns the
    /// gate to idle; a pending input stays queued for the next request.
    pub fn request_render(
        &self,
        input: I,
        mut render: impl FnMut(&I) -> ClipstackResult<()>,
    ) -> ClipstackResult<RenderPass> {
        let mut next = {
            let mut inner = self.lock();
            inner.latest = Some(input);
            match inner.coalescer.request() {
                RenderRequest::Coalesced => return Ok(RenderPass::Coalesced),
                RenderRequest::Start => inner.latest.take(),
            }
        };

        let mut passes = 0u32;
        loop {
            if let Some(input) = next.take() {
                passes = passes.saturating_add(1);
                let guard = ResetOnExit { layer: self };
                render(&input)?;
                guard.disarm();
            }

            let mut inner = self.lock();
            match inner.coalescer.finish() {
                RenderFinish::Idle => return Ok(RenderPass::Rendered { passes }),
                RenderFinish::RenderAgain => {
                    tracing::trace!(passes, "coalesced render retrigger");
                    next = inner.latest.take();
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, LayerInner<I>> {
        // No code panics while holding the lock; a poisoned guard still holds valid state.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Returns the gate to idle unless disarmed, so a render that errors or panics never leaves the
/// surface stuck in [`RenderState::Rendering`].
struct ResetOnExit<'a, I> {
    layer: &'a LayerSurface<I>,
}

impl<I> ResetOnExit<'_, I> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl<I> Drop for ResetOnExit<'_, I> {
    fn drop(&mut self) {
        self.layer.lock().coalescer.reset();
    }
}

impl<I> std::fmt::Debug for LayerSurface<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerSurface")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/coalesce.rs"]
mod tests;
