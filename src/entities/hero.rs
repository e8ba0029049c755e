//! The player character.

use web_sys::CanvasRenderingContext2d;

use crate::input::{PadAxis, PadButton, PointerButton};
use crate::stage::{ActCtx, Actor, ActorBody};

use super::avatar::AvatarSprite;
use super::bullet::TextBullet;
use super::{BULLET_COOLDOWN_TIME, CHARACTER_SIZE, GRAVITY, GROUND_Y, HERO_SPEED, JUMP_VELOCITY};

/// Direction from a stick axis: rounded to swallow resting-position noise,
/// then reduced to -1, 0 or 1.
fn axis_direction(value: f64) -> f64 {
    let rounded = value.round();
    if rounded > 0.0 {
        1.0
    } else if rounded < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub struct Hero {
    body: ActorBody,
    avatar: AvatarSprite,
    vy: f64,
    on_ground: bool,
    bullet_cooldown: f64,
}

impl Hero {
    pub fn new(avatar: AvatarSprite) -> Self {
        Self {
            body: ActorBody {
                width: CHARACTER_SIZE,
                height: CHARACTER_SIZE,
                visible: avatar.ready(),
                ..ActorBody::default()
            },
            avatar,
            vy: 0.0,
            on_ground: false,
            bullet_cooldown: 0.0,
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.body.x = x;
        self.body.y = y;
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    fn shoot(&self, ctx: &mut ActCtx<'_>, dest_x: f64, dest_y: f64) {
        let center_x = self.body.x + self.body.width / 2.0;
        let center_y = self.body.y + self.body.height / 2.0;
        if let Some(bullet) = TextBullet::aimed((center_x, center_y), (dest_x, dest_y)) {
            ctx.spawn(Box::new(bullet));
        }
    }
}

impl Actor for Hero {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn act(&mut self, ctx: &mut ActCtx<'_>) {
        let input = ctx.input;
        let delta = ctx.delta;
        let viewport = ctx.viewport();
        let pad = input.first_pad().cloned();

        // left-right movement; the stick overrides the keys when present
        let mut dir = 0.0;
        if input.key_pressed("ArrowRight") {
            dir = 1.0;
        }
        if input.key_pressed("ArrowLeft") {
            dir = -1.0;
        }
        if let Some(axis) = pad.as_ref().and_then(|p| p.axis(PadAxis::LsX)) {
            dir = axis_direction(axis);
        }
        self.body.x += delta * HERO_SPEED * dir;

        if self.body.x <= 0.0 && dir < 0.0 {
            self.body.x = 0.0;
        }
        if self.body.x + CHARACTER_SIZE >= ctx.world_width() && dir > 0.0 {
            self.body.x = ctx.world_width() - CHARACTER_SIZE;
        }

        // gravity and jump
        if self.on_ground {
            let pad_jump = pad.as_ref().is_some_and(|p| p.button_pressed(PadButton::A));
            if pad_jump || input.key_pressed("Space") {
                self.vy = JUMP_VELOCITY;
                self.on_ground = false;
            }
        }

        self.vy += GRAVITY * delta;
        self.body.y += self.vy * delta;

        if self.body.y >= GROUND_Y {
            self.body.y = GROUND_Y;
            self.vy = 0.0;
            self.on_ground = true;
        }

        // shoot
        self.bullet_cooldown -= delta;

        if self.bullet_cooldown <= 0.0 {
            self.bullet_cooldown = BULLET_COOLDOWN_TIME;

            if input.pointer.button_pressed(PointerButton::Left) {
                if let Some((sx, sy)) = input.pointer.position {
                    let (world_x, world_y) = viewport.unproject(sx, sy);
                    self.shoot(ctx, world_x, world_y);
                }
            }
            if let Some(pad) = pad
                .as_ref()
                .filter(|p| p.button_pressed(PadButton::Rt))
            {
                let center_x = self.body.x + self.body.width / 2.0;
                let center_y = self.body.y + self.body.height / 2.0;
                let aim_x = pad.axis(PadAxis::RsX).unwrap_or(0.0);
                let aim_y = pad.axis(PadAxis::RsY).unwrap_or(0.0);
                self.shoot(ctx, center_x + aim_x, center_y + aim_y);
            }
        }

        self.body.visible = self.avatar.ready();
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d) {
        self.avatar.draw(ctx, &self.body);
    }
}
