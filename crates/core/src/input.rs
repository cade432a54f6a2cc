//! Per-tick input snapshot.
//!
//! The host samples its keyboard/mouse state once per frame and hands the
//! simulation a read-only `InputState`. Buttons are packed into a u16.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bitflags for held buttons plus the look delta accumulated this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    /// Raw bitfield of held inputs
    pub bits: u16,

    /// Mouse movement since the previous snapshot, in pixels.
    pub look_dx: f32,
    pub look_dy: f32,
}

impl InputState {
    // Movement
    pub const FORWARD: u16 = 1 << 0;
    pub const BACK: u16 = 1 << 1;
    pub const LEFT: u16 = 1 << 2;
    pub const RIGHT: u16 = 1 << 3;

    // Modifiers and actions
    pub const SPRINT: u16 = 1 << 4;
    pub const JUMP: u16 = 1 << 5;
    pub const FIRE: u16 = 1 << 6;

    /// Pointer lock is held; without it the game ignores the trigger.
    pub const LOCKED: u16 = 1 << 7;

    pub const fn new() -> Self {
        Self {
            bits: 0,
            look_dx: 0.0,
            look_dy: 0.0,
        }
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self {
            bits,
            look_dx: 0.0,
            look_dy: 0.0,
        }
    }

    /// Same buttons with a look delta attached.
    pub fn with_look(mut self, dx: f32, dy: f32) -> Self {
        self.look_dx = dx;
        self.look_dy = dy;
        self
    }

    #[inline]
    pub const fn is_pressed(&self, input: u16) -> bool {
        self.bits & input != 0
    }

    #[inline]
    pub fn set(&mut self, input: u16, pressed: bool) {
        if pressed {
            self.bits |= input;
        } else {
            self.bits &= !input;
        }
    }

    #[inline]
    pub const fn forward(&self) -> bool {
        self.is_pressed(Self::FORWARD)
    }

    #[inline]
    pub const fn back(&self) -> bool {
        self.is_pressed(Self::BACK)
    }

    #[inline]
    pub const fn left(&self) -> bool {
        self.is_pressed(Self::LEFT)
    }

    #[inline]
    pub const fn right(&self) -> bool {
        self.is_pressed(Self::RIGHT)
    }

    #[inline]
    pub const fn sprint(&self) -> bool {
        self.is_pressed(Self::SPRINT)
    }

    #[inline]
    pub const fn jump(&self) -> bool {
        self.is_pressed(Self::JUMP)
    }

    #[inline]
    pub const fn fire(&self) -> bool {
        self.is_pressed(Self::FIRE)
    }

    #[inline]
    pub const fn locked(&self) -> bool {
        self.is_pressed(Self::LOCKED)
    }

    /// Movement intent in camera space: -Z is forward, +X is right.
    /// Normalized when non-zero; opposite keys cancel.
    pub fn move_intent(&self) -> Vec3 {
        let mut intent = Vec3::ZERO;
        if self.forward() {
            intent.z -= 1.0;
        }
        if self.back() {
            intent.z += 1.0;
        }
        if self.left() {
            intent.x -= 1.0;
        }
        if self.right() {
            intent.x += 1.0;
        }
        intent.normalize_or_zero()
    }
}
