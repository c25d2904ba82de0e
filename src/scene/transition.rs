use std::sync::{Arc, Mutex};

use crate::effects::composite::composite_transition;
use crate::effects::transitions::{TransitionKind, transition_progress};
use crate::foundation::error::ClipstackResult;
use crate::render::renderer::Renderer;
use crate::render::surface::Surface;
use crate::scene::node::SceneNode;

/// Timing of a transition window centered on the junction of two elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionTiming {
    /// Window length in seconds.
    pub duration: f64,
    /// Window start; progress is 0 here.
    pub transition_start: f64,
    /// End of the outgoing element.
    pub outgoing_end_time: f64,
    /// Start of the incoming element.
    pub incoming_start_time: f64,
    /// How far before its end the outgoing element is sampled once the window passes it.
    pub outgoing_clamp_epsilon: f64,
}

impl TransitionTiming {
    /// Progress in `[0, 1)` at `time`, `None` outside the window.
    pub fn progress(&self, time: f64) -> Option<f64> {
        transition_progress(time, self.transition_start, self.duration)
    }

    /// Time at which the outgoing node is drawn, never past its last visible instant.
    pub fn outgoing_time(&self, time: f64) -> f64 {
        time.min(self.outgoing_end_time - self.outgoing_clamp_epsilon)
    }

    /// Time at which the incoming node is drawn, never before its first visible instant.
    pub fn incoming_time(&self, time: f64) -> f64 {
        time.max(self.incoming_start_time)
    }
}

/// Blends an outgoing and an incoming node across their junction.
///
/// Inside the window both nodes render into private off-target buffers which are then composited
/// onto the target; outside it both render straight to the target and gate themselves.
pub struct TransitionNode {
    kind: TransitionKind,
    timing: TransitionTiming,
    outgoing: Arc<SceneNode>,
    incoming: Arc<SceneNode>,
    buffers: Mutex<Option<TransitionBuffers>>,
}

struct TransitionBuffers {
    a: Surface,
    b: Surface,
}

impl TransitionBuffers {
    fn matches(&self, width: u32, height: u32) -> bool {
        self.a.width() == width && self.a.height() == height
    }
}

impl TransitionNode {
    /// Wrap `outgoing` and `incoming`.
    pub fn new(
        kind: TransitionKind,
        timing: TransitionTiming,
        outgoing: Arc<SceneNode>,
        incoming: Arc<SceneNode>,
    ) -> Self {
        Self {
            kind,
            timing,
            outgoing,
            incoming,
            buffers: Mutex::new(None),
        }
    }

    /// Blend kind.
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Window timing.
    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// The node fading out.
    pub fn outgoing(&self) -> &SceneNode {
        &self.outgoing
    }

    /// The node fading in.
    pub fn incoming(&self) -> &SceneNode {
        &self.incoming
    }

    pub(crate) fn render(
        &self,
        renderer: &mut Renderer,
        target: &mut Surface,
        time: f64,
    ) -> ClipstackResult<()> {
        let Some(progress) = self.timing.progress(time) else {
            self.outgoing.render(renderer, target, time)?;
            return self.incoming.render(renderer, target, time);
        };

        let (w, h) = (target.width(), target.height());
        let mut guard = self
            .buffers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !guard.as_ref().is_some_and(|b| b.matches(w, h)) {
            *guard = Some(TransitionBuffers {
                a: Surface::new(w, h)?,
                b: Surface::new(w, h)?,
            });
        }
        let Some(bufs) = guard.as_mut() else {
            return Ok(());
        };

        bufs.a.clear();
        bufs.b.clear();
        self.outgoing
            .render(renderer, &mut bufs.a, self.timing.outgoing_time(time))?;
        self.incoming
            .render(renderer, &mut bufs.b, self.timing.incoming_time(time))?;

        composite_transition(
            target.data_mut(),
            bufs.a.data(),
            bufs.b.data(),
            w,
            h,
            self.kind,
            progress,
        )
    }
}

impl std::fmt::Debug for TransitionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionNode")
            .field("kind", &self.kind)
            .field("timing", &self.timing)
            .field("outgoing", &self.outgoing)
            .field("incoming", &self.incoming)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/transition.rs"]
mod tests;
