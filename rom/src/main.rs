#![no_std]
#![no_main]

use droid::{Game, PlayerConfig, frame};
use gba::{console::Console, debug::init_vba_logger};
use log::LevelFilter;

#[unsafe(no_mangle)]
extern "C" fn main() -> ! {
    init_vba_logger(LevelFilter::Info);

    let mut console = Console::init();
    let mut game = match Game::new(&mut console.oam, &mut console.video, PlayerConfig::DEFAULT) {
        Ok(game) => game,
        Err(e) => panic!("{e}"),
    };

    frame::run(&mut console, &mut game)
}
