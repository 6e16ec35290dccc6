//! # droid
//!
//! A small platformer scene: a player-controlled droid that walks, jumps and
//! double-jumps around an apple it can stand on, drawn with hardware sprites
//! over a tiled background.
//!
//! - [`player`]: the movement state machine
//! - [`frame`]: startup and the per-frame loop
//! - [`stage`], [`assets`]: the background and the tile sheet

#![cfg_attr(not(test), no_std)]

pub mod assets;
pub mod frame;
pub mod player;
pub mod stage;

pub use frame::{Game, Platform};
pub use player::{PlayerConfig, PlayerController, PlayerState};
