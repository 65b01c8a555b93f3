//! Render sink
//!
//! The session hands a snapshot to a [`RenderSink`] once per frame. The
//! bundled [`DrawList`] turns that snapshot into a flat list of 2D canvas
//! commands which the host replays onto its drawing surface.

use glam::Vec2;

use crate::frame::AssetKind;
use crate::session::SessionSnapshot;
use crate::consts::SHARD_SIZE;

/// Consumer of session state, called once per frame
pub trait RenderSink {
    fn render(&mut self, frame: &SessionSnapshot<'_>);
}

/// HUD and overlay styling
pub mod style {
    pub const HUD_FONT: &str = "16px sans-serif";
    pub const HUD_COLOR: &str = "#fff";
    pub const GAME_OVER_FONT: &str = "48px sans-serif";
    pub const GAME_OVER_COLOR: &str = "red";
    pub const GAME_OVER_TEXT: &str = "Game Over!";

    /// Text anchors (baseline-left)
    pub const SCORE_POS: (f32, f32) = (20.0, 30.0);
    pub const HEALTH_POS: (f32, f32) = (20.0, 50.0);
    /// Label sits this far in from the right edge
    pub const LABEL_INSET: f32 = 120.0;
    pub const LABEL_Y: f32 = 30.0;
    /// Overlay is shifted left of center by roughly half its width
    pub const GAME_OVER_OFFSET: f32 = 100.0;
}

/// A single 2D drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole surface
    Clear { width: f32, height: f32 },
    /// Draw a loaded image stretched to the given box
    Sprite { asset: AssetKind, pos: Vec2, size: Vec2 },
    /// Fill text at a baseline-left anchor
    Text {
        text: String,
        pos: Vec2,
        font: &'static str,
        color: &'static str,
    },
}

/// Records draw commands for the latest frame
#[derive(Debug, Clone)]
pub struct DrawList {
    label: String,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::with_capacity(16),
        }
    }

    /// Commands for the most recent frame, in paint order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    fn text(&mut self, text: String, pos: Vec2, font: &'static str, color: &'static str) {
        self.commands.push(DrawCommand::Text {
            text,
            pos,
            font,
            color,
        });
    }
}

impl RenderSink for DrawList {
    fn render(&mut self, frame: &SessionSnapshot<'_>) {
        use style::*;

        self.commands.clear();
        let vp = frame.viewport;
        let world = frame.world;

        self.commands.push(DrawCommand::Clear {
            width: vp.width,
            height: vp.height,
        });

        self.commands.push(DrawCommand::Sprite {
            asset: AssetKind::Player,
            pos: world.player.pos,
            size: world.player.size,
        });

        for shard in world.remaining_shards() {
            self.commands.push(DrawCommand::Sprite {
                asset: AssetKind::Shard,
                pos: shard.pos,
                size: Vec2::splat(SHARD_SIZE),
            });
        }

        self.commands.push(DrawCommand::Sprite {
            asset: AssetKind::Enemy,
            pos: world.enemy.pos,
            size: world.enemy.size,
        });

        self.text(
            format!("Score: {}", frame.score),
            Vec2::from(SCORE_POS),
            HUD_FONT,
            HUD_COLOR,
        );
        self.text(
            format!("Health: {}", frame.health),
            Vec2::from(HEALTH_POS),
            HUD_FONT,
            HUD_COLOR,
        );
        self.text(
            self.label.clone(),
            Vec2::new(vp.width - LABEL_INSET, LABEL_Y),
            HUD_FONT,
            HUD_COLOR,
        );

        if frame.terminal {
            self.text(
                GAME_OVER_TEXT.to_string(),
                Vec2::new(vp.width / 2.0 - GAME_OVER_OFFSET, vp.height / 2.0),
                GAME_OVER_FONT,
                GAME_OVER_COLOR,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Viewport;
    use crate::sim::World;

    fn snapshot(world: &World, health: i32) -> SessionSnapshot<'_> {
        SessionSnapshot {
            world,
            score: 7,
            health,
            terminal: health <= 0,
            viewport: Viewport::new(800.0, 600.0),
            ticks: 0,
        }
    }

    fn texts(list: &DrawList) -> Vec<&str> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frame_layout() {
        let world = World::spawn(Viewport::new(800.0, 600.0));
        let mut list = DrawList::new("Shard Runner");
        list.render(&snapshot(&world, 3));

        let cmds = list.commands();
        assert_eq!(
            cmds[0],
            DrawCommand::Clear {
                width: 800.0,
                height: 600.0
            }
        );
        assert!(matches!(cmds[1], DrawCommand::Sprite { asset: AssetKind::Player, .. }));
        assert!(matches!(cmds[2], DrawCommand::Sprite { asset: AssetKind::Shard, .. }));
        assert!(matches!(cmds[3], DrawCommand::Sprite { asset: AssetKind::Shard, .. }));
        assert!(matches!(cmds[4], DrawCommand::Sprite { asset: AssetKind::Enemy, .. }));
        assert_eq!(texts(&list), vec!["Score: 7", "Health: 3", "Shard Runner"]);

        match &cmds[7] {
            DrawCommand::Text { pos, .. } => assert_eq!(*pos, Vec2::new(680.0, 30.0)),
            other => panic!("expected label text, got {:?}", other),
        }
    }

    #[test]
    fn test_collected_shards_hidden() {
        let mut world = World::spawn(Viewport::new(800.0, 600.0));
        world.shards[0].collected = true;
        let mut list = DrawList::new("label");
        list.render(&snapshot(&world, 3));

        let shards: Vec<_> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite {
                    asset: AssetKind::Shard,
                    pos,
                    size,
                } => Some((*pos, *size)),
                _ => None,
            })
            .collect();
        assert_eq!(shards, vec![(Vec2::new(400.0, 450.0), Vec2::splat(20.0))]);
    }

    #[test]
    fn test_game_over_overlay() {
        let world = World::spawn(Viewport::new(800.0, 600.0));
        let mut list = DrawList::new("label");
        list.render(&snapshot(&world, 0));

        match list.commands().last() {
            Some(DrawCommand::Text {
                text,
                pos,
                font,
                color,
            }) => {
                assert_eq!(text, "Game Over!");
                assert_eq!(*pos, Vec2::new(300.0, 300.0));
                assert_eq!(*font, style::GAME_OVER_FONT);
                assert_eq!(*color, "red");
            }
            other => panic!("expected overlay, got {:?}", other),
        }
    }

    #[test]
    fn test_render_replaces_previous_frame() {
        let world = World::spawn(Viewport::new(800.0, 600.0));
        let mut list = DrawList::new("label");
        list.render(&snapshot(&world, 3));
        let n = list.commands().len();
        list.render(&snapshot(&world, 3));
        assert_eq!(list.commands().len(), n);
    }
}
