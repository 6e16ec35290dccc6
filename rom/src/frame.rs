//! # Frame Loop
//!
//! ```text
//! ┌─▶ wait for vblank
//! │   scan keys (once)
//! │   step the player
//! └── draw every slot
//! ```
//!
//! Nothing here knows whether it is on hardware. [`Platform`] is implemented
//! by [`gba::console::Console`] on the target and by the host runner's
//! in-memory platform elsewhere.

use gba::{
    input::KeySnapshot,
    oam::AttributeTable,
    sprite::{SizeClass, SpriteError, SpriteRegistry, SpriteSlot, init_sprites},
    video::VideoMemory,
};

use crate::{
    assets::characters,
    player::{Phase, PlayerConfig, PlayerController},
    stage,
};

pub const DROID_SLOT: u16 = 0;
pub const APPLE_SLOT: u16 = 1;
pub const WINDOW_SLOT: u16 = 2;

pub const WINDOW_X: i16 = 40;
pub const WINDOW_Y: i16 = 40;

pub trait Platform {
    type Oam: AttributeTable;

    /// Block until the next vertical blank.
    fn wait_vblank(&mut self);

    /// Poll the pad once and return this frame's edges.
    fn scan_keys(&mut self) -> KeySnapshot;

    fn oam(&mut self) -> &mut Self::Oam;
}

/// The droid, its two props and the registry their indices are bound in.
#[derive(Debug)]
pub struct Game {
    registry: SpriteRegistry,
    player: PlayerController,
    apple: SpriteSlot,
    window: SpriteSlot,
    frame: u16,
}

impl Game {
    /// Set up the stage and sprites and commit the first frame.
    pub fn new<A: AttributeTable, V: VideoMemory>(
        oam: &mut A,
        video: &mut V,
        config: PlayerConfig,
    ) -> Result<Game, SpriteError> {
        stage::install(video);

        let mut registry = init_sprites(oam)?;
        let droid = registry.slot(DROID_SLOT, characters::DROID, SizeClass::S16x16)?;
        let mut apple = registry.slot(APPLE_SLOT, characters::APPLE, SizeClass::S16x16)?;
        let mut window = registry.slot(WINDOW_SLOT, characters::WINDOW, SizeClass::S16x16)?;

        apple.set_position(config.platform_x, config.platform_y);
        window.set_position(WINDOW_X, WINDOW_Y);
        let player = PlayerController::new(droid, config);

        let game = Game { registry, player, apple, window, frame: 0 };
        game.draw(oam);

        let droid = game.player.sprite();
        log::info!(
            "droid({}, {}), apple({}, {}), window({}, {}), console test.",
            droid.x(),
            droid.y(),
            game.apple.x(),
            game.apple.y(),
            game.window.x(),
            game.window.y()
        );
        Ok(game)
    }

    /// One frame's worth of work, after the wait and the key scan.
    pub fn tick<A: AttributeTable>(&mut self, keys: &KeySnapshot, oam: &mut A) -> Phase {
        self.frame = self.frame.wrapping_add(1);
        let phase = self.player.tick(keys);
        self.draw(oam);
        phase
    }

    pub fn draw<A: AttributeTable>(&self, oam: &mut A) {
        self.player.sprite().draw(oam);
        self.apple.draw(oam);
        self.window.draw(oam);
    }

    pub fn frame(&self) -> u16 {
        self.frame
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn apple(&self) -> &SpriteSlot {
        &self.apple
    }

    pub fn window(&self) -> &SpriteSlot {
        &self.window
    }

    pub fn registry(&self) -> &SpriteRegistry {
        &self.registry
    }
}

/// The whole game, forever.
pub fn run<P: Platform>(platform: &mut P, game: &mut Game) -> ! {
    loop {
        step(platform, game);
    }
}

/// Run `frames` frames and return.
pub fn run_frames<P: Platform>(platform: &mut P, game: &mut Game, frames: u32) {
    for _ in 0..frames {
        step(platform, game);
    }
}

#[inline(always)]
fn step<P: Platform>(platform: &mut P, game: &mut Game) {
    platform.wait_vblank();
    let keys = platform.scan_keys();
    game.tick(&keys, platform.oam());
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
impl Platform for gba::console::Console {
    type Oam = gba::oam::Oam;

    #[inline(always)]
    fn wait_vblank(&mut self) {
        gba::console::Console::wait_vblank(self);
    }

    #[inline(always)]
    fn scan_keys(&mut self) -> KeySnapshot {
        gba::console::Console::scan_keys(self)
    }

    #[inline(always)]
    fn oam(&mut self) -> &mut gba::oam::Oam {
        &mut self.oam
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba::{
        input::{KeyPad, Keys},
        oam::{OamBuffer, ObjAttrs},
        video::VideoBuffer,
    };

    struct Scripted {
        oam: OamBuffer,
        keypad: KeyPad,
        script: Vec<Keys>,
        waits: usize,
    }

    impl Platform for Scripted {
        type Oam = OamBuffer;

        fn wait_vblank(&mut self) {
            self.waits += 1;
        }

        fn scan_keys(&mut self) -> KeySnapshot {
            let held = self.script.get(self.waits - 1).copied().unwrap_or_default();
            self.keypad.scan(held)
        }

        fn oam(&mut self) -> &mut OamBuffer {
            &mut self.oam
        }
    }

    fn setup(script: Vec<Keys>) -> (Scripted, Game) {
        let mut oam = OamBuffer::new();
        let mut video = Box::new(VideoBuffer::new());
        let game = Game::new(&mut oam, video.as_mut(), PlayerConfig::DEFAULT).unwrap();
        (Scripted { oam, keypad: KeyPad::new(), script, waits: 0 }, game)
    }

    #[test]
    fn startup_places_and_draws_three_sprites() {
        let (platform, game) = setup(vec![]);
        let entry = |i| *platform.oam.get(i).unwrap();

        assert_eq!((entry(0).x(), entry(0).y(), entry(0).tile()), (120, 120, 0));
        assert_eq!((entry(1).x(), entry(1).y(), entry(1).tile()), (160, 120, 64));
        assert_eq!((entry(2).x(), entry(2).y(), entry(2).tile()), (40, 40, 66));
        for i in 0..3 {
            assert_eq!((entry(i).shape(), entry(i).size()), (0, 1));
            assert!(!entry(i).hidden());
        }
        assert!(platform.oam.entries()[3..].iter().all(|e| *e == ObjAttrs::HIDDEN));
        assert_eq!(game.registry().bound_count(), 3);
        assert_eq!((game.apple().index(), game.apple().character()), (1, 64));
        assert_eq!((game.window().index(), game.window().character()), (2, 66));
        assert_eq!(game.frame(), 0);
    }

    #[test]
    fn each_frame_waits_then_draws() {
        let (mut platform, mut game) = setup(vec![Keys::RIGHT; 3]);
        let writes = platform.oam.writes();
        run_frames(&mut platform, &mut game, 3);

        assert_eq!(platform.waits, 3);
        assert_eq!(game.frame(), 3);
        assert_eq!(platform.oam.writes(), writes + 9);
        assert_eq!(platform.oam.get(0).unwrap().x(), 123);
    }

    #[test]
    fn frame_counter_wraps() {
        let (mut platform, mut game) = setup(vec![]);
        game.frame = u16::MAX;
        run_frames(&mut platform, &mut game, 1);
        assert_eq!(game.frame(), 0);
    }

    #[test]
    fn drawing_twice_changes_nothing() {
        let (mut platform, game) = setup(vec![]);
        let before = *platform.oam.entries();
        game.draw(&mut platform.oam);
        assert_eq!(*platform.oam.entries(), before);
    }
}
