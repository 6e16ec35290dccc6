mod script;

use anyhow::{Context, ensure};
use clap::Parser;
use droid::{
    Game, PlayerConfig,
    frame::{Platform, run_frames},
    player::{START_X, START_Y},
};
use gba::{
    input::{KeyPad, KeySnapshot},
    oam::OamBuffer,
    video::VideoBuffer,
};
use tracing::{Level, debug, info};
use tracing_subscriber::util::SubscriberInitExt;

use crate::script::Script;

#[derive(Parser)]
#[command(name = "droidsim")]
#[command(version, about = "Run the droid's frame loop headlessly with scripted input", long_about = None)]
struct Cli {
    /// Number of frames to run
    #[arg(short, long, default_value_t = 300)]
    frames: u32,

    /// Held keys per frame range, e.g. "up@0,right@10-40,left+up@60"
    #[arg(short, long, default_value = "")]
    input: String,

    #[arg(long, default_value_t = START_X, allow_negative_numbers = true)]
    start_x: i16,

    #[arg(long, default_value_t = START_Y)]
    start_y: i16,

    /// Print the droid's state every N frames
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    every: u32,

    /// Log phase changes and per-frame input
    #[arg(short, long)]
    verbose: bool,
}

/// In-memory console: OAM can be read back, vblank is instant.
struct SimPlatform {
    oam: OamBuffer,
    keypad: KeyPad,
    script: Script,
    frame: u32,
}

impl Platform for SimPlatform {
    type Oam = OamBuffer;

    fn wait_vblank(&mut self) {}

    fn scan_keys(&mut self) -> KeySnapshot {
        let held = self.script.held_at(self.frame);
        self.frame += 1;
        let keys = self.keypad.scan(held);
        if !keys.pressed.is_empty() || !keys.released.is_empty() {
            debug!(frame = self.frame - 1, pressed = ?keys.pressed, released = ?keys.released, "keys");
        }
        keys
    }

    fn oam(&mut self) -> &mut OamBuffer {
        &mut self.oam
    }
}

fn setup_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .compact()
        .finish()
        .init();
}

/// Start position from the command line, checked against the playfield.
fn player_config(cli: &Cli) -> anyhow::Result<PlayerConfig> {
    let config = PlayerConfig { start_x: cli.start_x, start_y: cli.start_y, ..PlayerConfig::DEFAULT };
    ensure!(
        (config.overscan_left..=config.screen_width).contains(&config.start_x),
        "--start-x {} is outside {}..={}",
        config.start_x,
        config.overscan_left,
        config.screen_width
    );
    ensure!(
        (0..=config.ground_y).contains(&config.start_y),
        "--start-y {} is outside 0..={}",
        config.start_y,
        config.ground_y
    );
    Ok(config)
}

fn report(frame: u32, game: &Game, oam: &OamBuffer) {
    let state = game.player().state();
    let drawn = oam.get(0).copied().unwrap_or_default();
    println!(
        "{frame:>5}  {:<9}  x={:>4} y={:>4} vy={:>6.2}  char={:>2} flip={}",
        format!("{:?}", state.phase),
        drawn.x(),
        drawn.y(),
        state.vy,
        drawn.tile(),
        u8::from(drawn.h_flip()),
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let script: Script = cli.input.parse().context("failed to parse --input")?;
    let config = player_config(&cli)?;
    if let Some(last) = script.last_frame().filter(|&last| last >= cli.frames) {
        info!(last, frames = cli.frames, "input runs past the last simulated frame");
    }

    let mut platform = SimPlatform { oam: OamBuffer::new(), keypad: KeyPad::new(), script, frame: 0 };
    let mut video = Box::new(VideoBuffer::new());
    let mut game = Game::new(&mut platform.oam, video.as_mut(), config).context("failed to set up sprites")?;

    report(0, &game, &platform.oam);
    for frame in 1..=cli.frames {
        run_frames(&mut platform, &mut game, 1);
        if frame % cli.every == 0 || frame == cli.frames {
            report(frame, &game, &platform.oam);
        }
    }

    info!(frames = cli.frames, oam_writes = platform.oam.writes(), "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use droid::player::Phase;

    fn sim(input: &str) -> (SimPlatform, Game) {
        let mut platform = SimPlatform {
            oam: OamBuffer::new(),
            keypad: KeyPad::new(),
            script: input.parse().unwrap(),
            frame: 0,
        };
        let mut video = Box::new(VideoBuffer::new());
        let game = Game::new(&mut platform.oam, video.as_mut(), PlayerConfig::DEFAULT).unwrap();
        (platform, game)
    }

    #[test]
    fn scripted_jump_leaves_the_ground() {
        let (mut platform, mut game) = sim("up@0");
        run_frames(&mut platform, &mut game, 6);
        assert_eq!(game.player().state().phase, Phase::Airborne1);
        run_frames(&mut platform, &mut game, 1);
        assert_eq!(platform.oam.get(0).unwrap().y(), 116);
        assert_eq!(platform.frame, 7);
    }

    #[test]
    fn scripted_walk_moves_one_pixel_per_frame() {
        let (mut platform, mut game) = sim("left@0-9");
        run_frames(&mut platform, &mut game, 20);
        assert_eq!(game.player().state().x, 110);
        assert!(platform.oam.get(0).unwrap().h_flip());
    }

    #[test]
    fn cli_rejects_a_zero_interval() {
        assert!(Cli::try_parse_from(["droidsim", "--every", "0"]).is_err());
        let cli = Cli::try_parse_from(["droidsim", "--start-x", "-10", "-i", "up@3"]).unwrap();
        assert_eq!((cli.start_x, cli.start_y, cli.frames), (-10, 120, 300));
        assert_eq!(cli.input, "up@3");
    }

    #[test]
    fn start_outside_the_playfield_is_rejected() {
        let cli = Cli::try_parse_from(["droidsim", "--start-x", "-32768", "-i", "left@0"]).unwrap();
        let err = player_config(&cli).unwrap_err();
        assert_eq!(err.to_string(), "--start-x -32768 is outside -16..=240");

        let cli = Cli::try_parse_from(["droidsim", "--start-y", "121"]).unwrap();
        assert!(player_config(&cli).is_err());

        let cli = Cli::try_parse_from(["droidsim", "--start-x", "-16", "--start-y", "0"]).unwrap();
        let config = player_config(&cli).unwrap();
        assert_eq!((config.start_x, config.start_y), (-16, 0));
    }
}
