//! # The Droid
//!
//! One tick of player movement, as a pure function of the current
//! [`PlayerState`] and the frame's [`KeySnapshot`]:
//!
//! ```text
//!            up pressed               counter > 3
//!   Idle ─────────────────▶ JumpPrep1 ───────────▶ Airborne1 ──┐
//!    ▲  ╲                                            │ up       │
//!    │   ╲ walked off the apple                      ▼ pressed  │
//!    │    ╰──────────────────────────────▶ Airborne1 JumpPrep2  │
//!    │                                                 │        │
//!    │        landed (apple or ground)                 ▼        │
//!    ╰──────────────────────────────────────────── Airborne2 ◀──╯
//! ```
//!
//! [`PlayerState::step`] never touches the sprite. It returns the next state
//! and a [`SpriteUpdate`] that [`PlayerController`] applies to the droid's
//! [`SpriteSlot`].

use gba::{
    input::{KeySnapshot, Keys},
    sprite::SpriteSlot,
};

pub const GRAVITY: f32 = 0.3;
pub const LAUNCH_VELOCITY: f32 = 4.0;
/// Holding up only extends the ascent while rising faster than this.
pub const BOOST_THRESHOLD: f32 = 0.5;
pub const BOOST: f32 = 0.2;
pub const JUMP_PREP_TICKS: u16 = 3;
pub const WALK_TICKS: u16 = 5;

pub const GROUND_Y: i16 = 120;
pub const OVERSCAN_LEFT: i16 = -16;
pub const SCREEN_WIDTH: i16 = gba::SCREEN_WIDTH;

pub const PLATFORM_X: i16 = 160;
pub const PLATFORM_Y: i16 = 120;
pub const PLATFORM_HALF_WIDTH: i16 = 11;
/// How far above the apple's origin the droid stands on it.
pub const PLATFORM_RISE: i16 = 13;

pub const START_X: i16 = 120;
pub const START_Y: i16 = 120;

/// Character (base tile) indices on the sprite sheet.
pub mod frames {
    pub const IDLE: u16 = 0;
    pub const WALK_A: u16 = 2;
    pub const WALK_B: u16 = 4;
    pub const JUMP_PREP: u16 = 6;
    pub const ASCEND: u16 = 8;
    pub const DESCEND: u16 = 10;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub gravity: f32,
    pub launch_velocity: f32,
    pub boost_threshold: f32,
    pub boost: f32,
    pub jump_prep_ticks: u16,
    pub walk_ticks: u16,
    pub ground_y: i16,
    pub overscan_left: i16,
    pub screen_width: i16,
    pub platform_x: i16,
    pub platform_y: i16,
    pub platform_half_width: i16,
    pub platform_rise: i16,
    pub start_x: i16,
    pub start_y: i16,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PlayerConfig {
    pub const DEFAULT: PlayerConfig = PlayerConfig {
        gravity: GRAVITY,
        launch_velocity: LAUNCH_VELOCITY,
        boost_threshold: BOOST_THRESHOLD,
        boost: BOOST,
        jump_prep_ticks: JUMP_PREP_TICKS,
        walk_ticks: WALK_TICKS,
        ground_y: GROUND_Y,
        overscan_left: OVERSCAN_LEFT,
        screen_width: SCREEN_WIDTH,
        platform_x: PLATFORM_X,
        platform_y: PLATFORM_Y,
        platform_half_width: PLATFORM_HALF_WIDTH,
        platform_rise: PLATFORM_RISE,
        start_x: START_X,
        start_y: START_Y,
    };

    /// The y the droid has while standing on the apple.
    pub const fn platform_height(&self) -> i16 {
        self.platform_y - self.platform_rise
    }

    /// Strictly inside the apple's footprint.
    pub const fn over_platform(&self, x: i16) -> bool {
        self.platform_x - self.platform_half_width < x && x < self.platform_x + self.platform_half_width
    }

    /// Leaving one side of the screen re-enters from the other.
    pub const fn wrap_x(&self, x: i16) -> i16 {
        if x < self.overscan_left {
            self.screen_width
        } else if self.screen_width < x {
            self.overscan_left
        } else {
            x
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    JumpPrep1,
    Airborne1,
    JumpPrep2,
    Airborne2,
}

impl Phase {
    pub const fn is_airborne(self) -> bool {
        matches!(self, Phase::Airborne1 | Phase::Airborne2)
    }

    pub const fn is_preparing(self) -> bool {
        matches!(self, Phase::JumpPrep1 | Phase::JumpPrep2)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// The sheet draws the droid facing right.
    pub const fn h_flip(self) -> bool {
        matches!(self, Facing::Left)
    }
}

/// Four-step walk animation: 2, 0, 4, 0, ...
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkCycle(u8);

impl WalkCycle {
    const FRAMES: [u16; 4] = [frames::WALK_A, frames::IDLE, frames::WALK_B, frames::IDLE];

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Step once, returning the character to show.
    pub fn advance(&mut self) -> u16 {
        let character = Self::FRAMES[self.0 as usize & 3];
        self.0 = (self.0 + 1) & 3;
        character
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub phase: Phase,
    pub x: i16,
    pub y: i16,
    /// Upward positive.
    pub vy: f32,
    /// Ticks counted by the walk timer and the jump preparation.
    pub counter: u16,
    pub walk: WalkCycle,
    /// Last character picked by the walk logic.
    pub character: u16,
    pub facing: Facing,
}

/// What the droid's sprite should change to after a tick. `None` leaves the
/// slot's buffered value alone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SpriteUpdate {
    pub character: Option<u16>,
    pub position: Option<(i16, i16)>,
    pub h_flip: Option<bool>,
}

impl SpriteUpdate {
    pub fn apply(&self, slot: &mut SpriteSlot) {
        if let Some(flip) = self.h_flip {
            slot.set_h_flip(flip);
        }
        if let Some(character) = self.character {
            slot.set_character(character);
        }
        if let Some((x, y)) = self.position {
            slot.set_position(x, y);
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    pub state: PlayerState,
    pub sprite: SpriteUpdate,
}

impl PlayerState {
    pub const fn new(x: i16, y: i16) -> Self {
        Self {
            phase: Phase::Idle,
            x,
            y,
            vy: 0.0,
            counter: 0,
            walk: WalkCycle(0),
            character: frames::IDLE,
            facing: Facing::Right,
        }
    }

    /// Advance one tick.
    pub fn step(&self, keys: &KeySnapshot, config: &PlayerConfig) -> Step {
        let next = *self;
        match self.phase {
            Phase::Idle => next.idle(keys, config),
            Phase::JumpPrep1 | Phase::JumpPrep2 => next.prepare(config),
            Phase::Airborne1 | Phase::Airborne2 => next.airborne(keys, config),
        }
    }

    /// Returns `counter` before incrementing it.
    fn tick_counter(&mut self) -> u16 {
        let elapsed = self.counter;
        self.counter = self.counter.wrapping_add(1);
        elapsed
    }

    fn move_horizontally(&mut self, keys: &KeySnapshot, config: &PlayerConfig, sprite: &mut SpriteUpdate) {
        if keys.is_held(Keys::LEFT) {
            self.x = self.x.saturating_sub(1);
            self.facing = Facing::Left;
            sprite.h_flip = Some(true);
        }
        if keys.is_held(Keys::RIGHT) {
            self.x = self.x.saturating_add(1);
            self.facing = Facing::Right;
            sprite.h_flip = Some(false);
        }
        self.x = config.wrap_x(self.x);
    }

    fn idle(mut self, keys: &KeySnapshot, config: &PlayerConfig) -> Step {
        let mut sprite = SpriteUpdate::default();

        if keys.just_pressed(Keys::UP) {
            self.phase = Phase::JumpPrep1;
            self.counter = 0;
            self.character = frames::IDLE;
            return Step { state: self, sprite };
        }

        self.move_horizontally(keys, config, &mut sprite);

        if keys.just_pressed(Keys::HORIZONTAL) {
            self.walk.reset();
            self.counter = 0;
        }
        if keys.just_released(Keys::HORIZONTAL) {
            self.character = frames::IDLE;
        }
        if keys.is_held(Keys::HORIZONTAL) && self.tick_counter() > config.walk_ticks {
            self.character = self.walk.advance();
            self.counter = 0;
        }

        // only an exact match counts as standing on the apple
        if self.y == config.platform_height() && !config.over_platform(self.x) {
            self.vy = 0.0;
            self.phase = Phase::Airborne1;
            self.walk.reset();
            return Step { state: self, sprite };
        }

        sprite.character = Some(self.character);
        sprite.position = Some((self.x, self.y));
        Step { state: self, sprite }
    }

    fn prepare(mut self, config: &PlayerConfig) -> Step {
        let sprite = SpriteUpdate {
            character: Some(frames::JUMP_PREP),
            ..SpriteUpdate::default()
        };

        if self.tick_counter() > config.jump_prep_ticks {
            self.vy = config.launch_velocity;
            self.phase = match self.phase {
                Phase::JumpPrep2 => Phase::Airborne2,
                _ => Phase::Airborne1,
            };
        }
        Step { state: self, sprite }
    }

    fn airborne(mut self, keys: &KeySnapshot, config: &PlayerConfig) -> Step {
        let mut sprite = SpriteUpdate::default();

        if keys.just_pressed(Keys::UP) && self.phase == Phase::Airborne1 {
            self.phase = Phase::JumpPrep2;
            self.counter = 0;
            return Step { state: self, sprite };
        }

        self.move_horizontally(keys, config, &mut sprite);

        if self.vy > config.boost_threshold && keys.is_held(Keys::UP) {
            self.vy += config.boost;
        }

        // smaller y is higher; the velocity is truncated toward zero
        self.y = self.y.saturating_sub(self.vy as i16);
        sprite.character = Some(if self.vy < 0.0 { frames::DESCEND } else { frames::ASCEND });

        if self.y < 0 {
            self.y = 0;
            self.vy = 0.0;
        }

        let platform = config.platform_height();
        if self.vy < 0.0 && config.over_platform(self.x) && self.y >= platform {
            self.y = platform;
            self.phase = Phase::Idle;
        }

        if self.y > config.ground_y {
            self.y = config.ground_y;
            self.phase = Phase::Idle;
        }

        sprite.position = Some((self.x, self.y));
        self.vy -= config.gravity;
        Step { state: self, sprite }
    }
}

/// Owns the droid's state and its sprite slot; the only writer of either.
#[derive(Debug)]
pub struct PlayerController {
    state: PlayerState,
    config: PlayerConfig,
    sprite: SpriteSlot,
}

impl PlayerController {
    /// Place the droid at the configured start, pulled onto the playfield:
    /// x into the wrap range and y between the top edge and the ground.
    pub fn new(mut sprite: SpriteSlot, config: PlayerConfig) -> Self {
        let x = config.start_x.max(config.overscan_left).min(config.screen_width);
        let y = config.start_y.max(0).min(config.ground_y);
        let state = PlayerState::new(x, y);
        sprite.set_position(state.x, state.y);
        sprite.set_character(state.character);
        Self { state, config, sprite }
    }

    pub fn tick(&mut self, keys: &KeySnapshot) -> Phase {
        let Step { state, sprite } = self.state.step(keys, &self.config);
        if state.phase != self.state.phase {
            log::debug!(
                "{:?} -> {:?} at ({}, {}) vy={:.1}",
                self.state.phase,
                state.phase,
                state.x,
                state.y,
                state.vy
            );
        }
        sprite.apply(&mut self.sprite);
        self.state = state;
        state.phase
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn sprite(&self) -> &SpriteSlot {
        &self.sprite
    }
}
