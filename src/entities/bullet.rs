//! Letter projectile.

use web_sys::CanvasRenderingContext2d;

use crate::stage::{ActCtx, Actor, ActorBody};

use super::BULLET_SPEED;

const BULLET_FONT: &str = "16px 'Arial'";

/// A single character flying along a fixed line from its spawn point toward
/// the aim point taken at fire time. The direction never re-targets.
pub struct TextBullet {
    body: ActorBody,
    text: String,
    ux: f64,
    uy: f64,
}

impl TextBullet {
    /// Returns `None` when the aim point coincides with the spawn point, as
    /// no direction can be derived from that.
    pub fn aimed(spawn: (f64, f64), dest: (f64, f64)) -> Option<Self> {
        let dx = dest.0 - spawn.0;
        let dy = dest.1 - spawn.1;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return None;
        }
        Some(Self {
            body: ActorBody {
                x: spawn.0,
                y: spawn.1,
                visible: true,
                ..ActorBody::default()
            },
            text: "a".to_string(),
            ux: dx / len,
            uy: dy / len,
        })
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Actor for TextBullet {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn act(&mut self, ctx: &mut ActCtx<'_>) {
        self.body.x += self.ux * BULLET_SPEED * ctx.delta;
        self.body.y += self.uy * BULLET_SPEED * ctx.delta;

        let (width, height) = ctx.measure_text(&self.text);
        self.body.width = width;
        self.body.height = height;

        // Point-in-box test against every hittable actor; a bullet can take
        // out overlapping enemies in the same frame.
        let targets = ctx.targets();
        for target in targets {
            if target.bounds.contains(self.body.x, self.body.y) {
                ctx.kill(target.id.clone());
            }
        }

        let out_of_world = self.body.x < 0.0
            || self.body.x > ctx.world_width()
            || self.body.y < 0.0
            || self.body.y > ctx.world_height();
        if out_of_world {
            if let Some(id) = self.body.id.clone() {
                ctx.remove(id);
            }
        }
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d) {
        ctx.set_font(BULLET_FONT);
        ctx.set_text_align("center");
        ctx.set_fill_style_str("yellow");
        let _ = ctx.fill_text(&self.text, self.body.x, self.body.y);
    }
}
