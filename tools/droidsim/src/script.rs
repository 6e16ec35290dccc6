//! Input timelines: `KEYS@START[-END]` items separated by commas.
//!
//! ```text
//! up@0,right@10-40,left+up@60-62
//! ```
//!
//! Frame ranges are inclusive and may overlap; overlapping keys are OR'd.

use std::str::FromStr;

use anyhow::{Context, bail};
use gba::input::Keys;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hold {
    pub keys: Keys,
    pub start: u32,
    pub end: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    holds: Vec<Hold>,
}

impl Script {
    /// Keys held on `frame` (0-based).
    pub fn held_at(&self, frame: u32) -> Keys {
        self.holds
            .iter()
            .filter(|h| (h.start..=h.end).contains(&frame))
            .fold(Keys::empty(), |acc, h| acc | h.keys)
    }

    pub fn holds(&self) -> &[Hold] {
        &self.holds
    }

    /// Last frame anything is held on.
    pub fn last_frame(&self) -> Option<u32> {
        self.holds.iter().map(|h| h.end).max()
    }
}

fn parse_key(name: &str) -> anyhow::Result<Keys> {
    Ok(match name.trim().to_ascii_lowercase().as_str() {
        "a" => Keys::A,
        "b" => Keys::B,
        "select" => Keys::SELECT,
        "start" => Keys::START,
        "right" => Keys::RIGHT,
        "left" => Keys::LEFT,
        "up" => Keys::UP,
        "down" => Keys::DOWN,
        "r" => Keys::R,
        "l" => Keys::L,
        other => bail!("unknown key {other:?}"),
    })
}

fn parse_hold(item: &str) -> anyhow::Result<Hold> {
    let (names, frames) = item.split_once('@').context("expected KEYS@FRAME")?;

    let mut keys = Keys::empty();
    for name in names.split('+') {
        keys |= parse_key(name)?;
    }

    let (start, end) = match frames.split_once('-') {
        Some((start, end)) => (start, end),
        None => (frames, frames),
    };
    let start: u32 = start.trim().parse().with_context(|| format!("bad start frame {start:?}"))?;
    let end: u32 = end.trim().parse().with_context(|| format!("bad end frame {end:?}"))?;
    if end < start {
        bail!("frame range {start}-{end} runs backwards");
    }

    Ok(Hold { keys, start, end })
}

impl FromStr for Script {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Script> {
        let holds = s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| parse_hold(item).with_context(|| format!("in input item {item:?}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Script { holds })
    }
}
