//! Frame loop
//!
//! The host calls [`FrameLoop::on_frame`] from its display refresh callback
//! and keeps rescheduling until the loop reports [`FrameStatus::Stopped`].
//! Nothing ticks until every sprite image has loaded, in any order.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::LoopError;
use crate::platform::ViewportProvider;
use crate::render::RenderSink;
use crate::session::GameSession;

/// Images the game needs before it can start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Player,
    Shard,
    Enemy,
}

impl AssetKind {
    pub const ALL: [AssetKind; 3] = [AssetKind::Player, AssetKind::Shard, AssetKind::Enemy];

    fn index(self) -> usize {
        match self {
            AssetKind::Player => 0,
            AssetKind::Shard => 1,
            AssetKind::Enemy => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Player => "player",
            AssetKind::Shard => "shard",
            AssetKind::Enemy => "enemy",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join over the required assets, independent of arrival order
#[derive(Debug, Clone, Default)]
pub struct AssetBarrier {
    ready: [bool; 3],
}

impl AssetBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one asset ready. Returns true only on the call that completes the set.
    pub fn mark_ready(&mut self, kind: AssetKind) -> bool {
        let was_complete = self.is_complete();
        self.ready[kind.index()] = true;
        !was_complete && self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.ready.iter().all(|&r| r)
    }

    pub fn missing(&self) -> Vec<AssetKind> {
        AssetKind::ALL
            .into_iter()
            .filter(|k| !self.ready[k.index()])
            .collect()
    }
}

/// Shared stop flag for a frame loop
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Assets still loading
    Waiting,
    /// Ticking on every refresh (including after game over)
    Running,
    /// Cancelled or failed to start; never resumes
    Stopped,
}

/// What a single refresh callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Waiting,
    Ticked,
    Stopped,
}

/// Refresh-driven game loop
#[derive(Debug)]
pub struct FrameLoop {
    phase: LoopPhase,
    barrier: AssetBarrier,
    cancel: CancelToken,
    startup_timeout_ms: Option<f64>,
    waiting_since_ms: Option<f64>,
    frames: u64,
}

impl FrameLoop {
    /// `startup_timeout_ms` of `None` waits for assets forever
    pub fn new(startup_timeout_ms: Option<f64>) -> Self {
        Self {
            phase: LoopPhase::Waiting,
            barrier: AssetBarrier::new(),
            cancel: CancelToken::new(),
            startup_timeout_ms,
            waiting_since_ms: None,
            frames: 0,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Frames ticked while running
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.stop();
    }

    /// Record an asset load; starts the loop once all are in
    pub fn asset_ready(&mut self, kind: AssetKind) {
        if self.phase != LoopPhase::Waiting {
            log::debug!("Asset {} ready while {:?}, ignoring", kind, self.phase);
            return;
        }

        log::debug!("Asset {} ready", kind);
        if self.barrier.mark_ready(kind) {
            log::info!("All assets loaded, starting frame loop");
            self.phase = LoopPhase::Running;
        }
    }

    /// Handle one display refresh at `now_ms`
    pub fn on_frame<V, S>(
        &mut self,
        now_ms: f64,
        session: &mut GameSession<V>,
        sink: &mut S,
    ) -> Result<FrameStatus, LoopError>
    where
        V: ViewportProvider,
        S: RenderSink + ?Sized,
    {
        if self.cancel.is_cancelled() {
            self.stop();
        }

        match self.phase {
            LoopPhase::Stopped => Ok(FrameStatus::Stopped),
            LoopPhase::Waiting => {
                let since = *self.waiting_since_ms.get_or_insert(now_ms);
                let waited_ms = now_ms - since;
                match self.startup_timeout_ms {
                    Some(timeout) if waited_ms > timeout => {
                        let missing = self.barrier.missing();
                        log::error!("Gave up waiting for assets {:?} after {} ms", missing, waited_ms);
                        self.stop();
                        Err(LoopError::AssetTimeout { missing, waited_ms })
                    }
                    _ => Ok(FrameStatus::Waiting),
                }
            }
            LoopPhase::Running => {
                session.tick(sink);
                self.frames += 1;
                Ok(FrameStatus::Ticked)
            }
        }
    }

    fn stop(&mut self) {
        if self.phase != LoopPhase::Stopped {
            log::info!("Frame loop stopped after {} frames", self.frames);
            self.phase = LoopPhase::Stopped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use crate::platform::Viewport;
    use crate::render::DrawList;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn session() -> GameSession<Viewport> {
        GameSession::new(Viewport::new(800.0, 600.0), InputState::new())
    }

    fn all_ready(lp: &mut FrameLoop) {
        for kind in AssetKind::ALL {
            lp.asset_ready(kind);
        }
    }

    #[test]
    fn test_barrier_any_order() {
        let orders = [
            [AssetKind::Player, AssetKind::Shard, AssetKind::Enemy],
            [AssetKind::Enemy, AssetKind::Player, AssetKind::Shard],
            [AssetKind::Shard, AssetKind::Enemy, AssetKind::Player],
        ];
        for order in orders {
            let mut barrier = AssetBarrier::new();
            assert!(!barrier.mark_ready(order[0]));
            assert!(!barrier.mark_ready(order[1]));
            assert!(barrier.mark_ready(order[2]));
            assert!(barrier.is_complete());
            // Fires only once
            assert!(!barrier.mark_ready(order[0]));
        }
    }

    #[test]
    fn test_barrier_duplicate_signal_does_not_complete() {
        let mut barrier = AssetBarrier::new();
        barrier.mark_ready(AssetKind::Player);
        barrier.mark_ready(AssetKind::Player);
        barrier.mark_ready(AssetKind::Shard);
        assert!(!barrier.is_complete());
        assert_eq!(barrier.missing(), vec![AssetKind::Enemy]);
    }

    #[test]
    fn test_waits_for_assets() {
        let mut lp = FrameLoop::new(None);
        let mut s = session();
        let mut sink = DrawList::new("label");

        lp.asset_ready(AssetKind::Enemy);
        lp.asset_ready(AssetKind::Player);
        for i in 0..10 {
            let status = lp.on_frame(i as f64 * FRAME_MS, &mut s, &mut sink);
            assert_eq!(status, Ok(FrameStatus::Waiting));
        }
        assert_eq!(s.snapshot().ticks, 0);
        assert!(sink.commands().is_empty());

        lp.asset_ready(AssetKind::Shard);
        assert_eq!(lp.phase(), LoopPhase::Running);
        assert_eq!(lp.on_frame(200.0, &mut s, &mut sink), Ok(FrameStatus::Ticked));
        assert_eq!(s.snapshot().ticks, 1);
        assert!(!sink.commands().is_empty());
    }

    #[test]
    fn test_runs_fixed_number_of_ticks_then_cancel() {
        let mut lp = FrameLoop::new(None);
        let token = lp.cancel_token();
        let mut s = session();
        let mut sink = DrawList::new("label");
        all_ready(&mut lp);

        for i in 0..30 {
            assert_eq!(
                lp.on_frame(i as f64 * FRAME_MS, &mut s, &mut sink),
                Ok(FrameStatus::Ticked)
            );
        }
        token.cancel();
        assert_eq!(lp.on_frame(1000.0, &mut s, &mut sink), Ok(FrameStatus::Stopped));
        assert_eq!(lp.phase(), LoopPhase::Stopped);
        assert_eq!(lp.frames(), 30);
        assert_eq!(s.snapshot().ticks, 30);

        // Late asset signals do not restart a stopped loop
        lp.asset_ready(AssetKind::Player);
        assert_eq!(lp.phase(), LoopPhase::Stopped);
    }

    #[test]
    fn test_cancel_while_waiting() {
        let mut lp = FrameLoop::new(None);
        let mut s = session();
        let mut sink = DrawList::new("label");
        lp.cancel();
        all_ready(&mut lp);
        assert_eq!(lp.phase(), LoopPhase::Stopped);
        assert_eq!(lp.on_frame(0.0, &mut s, &mut sink), Ok(FrameStatus::Stopped));
    }

    #[test]
    fn test_keeps_running_after_game_over() {
        let mut lp = FrameLoop::new(None);
        let mut s = session();
        let mut sink = DrawList::new("label");
        all_ready(&mut lp);

        // Walk the player into the enemy until health runs out
        s.input_mut().handle_key("ArrowRight", true);
        let mut t = 0.0;
        while !s.is_game_over() {
            assert_eq!(lp.on_frame(t, &mut s, &mut sink), Ok(FrameStatus::Ticked));
            t += FRAME_MS;
            assert!(t < 60_000.0, "player never died");
        }

        let ticks = s.snapshot().ticks;
        for _ in 0..5 {
            assert_eq!(lp.on_frame(t, &mut s, &mut sink), Ok(FrameStatus::Ticked));
            t += FRAME_MS;
        }
        assert_eq!(s.snapshot().ticks, ticks);
        assert!(sink.commands().iter().any(|c| matches!(
            c,
            crate::render::DrawCommand::Text { text, .. } if text == "Game Over!"
        )));
    }

    #[test]
    fn test_startup_timeout() {
        let mut lp = FrameLoop::new(Some(500.0));
        let mut s = session();
        let mut sink = DrawList::new("label");
        lp.asset_ready(AssetKind::Shard);

        assert_eq!(lp.on_frame(1000.0, &mut s, &mut sink), Ok(FrameStatus::Waiting));
        assert_eq!(lp.on_frame(1500.0, &mut s, &mut sink), Ok(FrameStatus::Waiting));
        let err = lp.on_frame(1600.0, &mut s, &mut sink).unwrap_err();
        assert_eq!(
            err,
            LoopError::AssetTimeout {
                missing: vec![AssetKind::Player, AssetKind::Enemy],
                waited_ms: 600.0,
            }
        );
        assert_eq!(lp.phase(), LoopPhase::Stopped);
        assert_eq!(lp.on_frame(1700.0, &mut s, &mut sink), Ok(FrameStatus::Stopped));
        assert!(err.to_string().contains("600 ms"));
    }

    #[test]
    fn test_no_timeout_once_running() {
        let mut lp = FrameLoop::new(Some(10.0));
        let mut s = session();
        let mut sink = DrawList::new("label");
        lp.on_frame(0.0, &mut s, &mut sink).expect("within timeout");
        all_ready(&mut lp);
        assert_eq!(lp.on_frame(10_000.0, &mut s, &mut sink), Ok(FrameStatus::Ticked));
    }
}
