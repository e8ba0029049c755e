//! Bouncing enemy built from a chat profile.

use web_sys::CanvasRenderingContext2d;

use crate::stage::{ActCtx, Actor, ActorBody, Rect};

use super::avatar::AvatarSprite;
use super::spawner::LiveCounter;
use super::{CHARACTER_SIZE, ENEMY_SPEED_X, ENEMY_SPEED_Y};

pub struct Enemy {
    body: ActorBody,
    avatar: AvatarSprite,
    vx: f64,
    vy: f64,
    live: LiveCounter,
}

impl Enemy {
    pub fn new(avatar: AvatarSprite, live: LiveCounter) -> Self {
        Self {
            body: ActorBody {
                width: CHARACTER_SIZE,
                height: CHARACTER_SIZE,
                visible: avatar.ready(),
                ..ActorBody::default()
            },
            avatar,
            vx: ENEMY_SPEED_X,
            vy: ENEMY_SPEED_Y,
            live,
        }
    }
}

impl Actor for Enemy {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn act(&mut self, ctx: &mut ActCtx<'_>) {
        self.body.x += self.vx * ctx.delta;
        self.body.y += self.vy * ctx.delta;

        // Direction guards keep an enemy that overshot a wall from getting
        // stuck flipping every frame.
        if self.body.x <= 0.0 && self.vx < 0.0 {
            self.vx = -self.vx;
        }
        if self.body.x + CHARACTER_SIZE >= ctx.world_width() && self.vx >= 0.0 {
            self.vx = -self.vx;
        }

        if self.body.y <= 0.0 && self.vy < 0.0 {
            self.vy = -self.vy;
        }
        if self.body.y + CHARACTER_SIZE >= ctx.world_height() && self.vy >= 0.0 {
            self.vy = -self.vy;
        }

        self.body.visible = self.avatar.ready();
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d) {
        self.avatar.draw(ctx, &self.body);
    }

    fn target_box(&self) -> Option<Rect> {
        Some(self.body.bounds())
    }

    fn on_death(&mut self) {
        self.live.decrement();
    }
}
