//! Momentum: is movement speeding up or slowing down?
//!
//! Compares the mean of the last 6 samples ("recent") with the mean of the 6
//! before them ("earlier"; everything before the recent block when fewer than
//! 12 samples exist). Both windows are anchored to the end of the sequence.
//! Exactly 6 samples is measured as stable with both averages equal.

use serde::{Deserialize, Serialize};

use crate::math::{mean, tail};

/// Size of the recent and earlier blocks.
pub const MOMENTUM_WINDOW: usize = 6;

/// Change in mean advancement (days) that counts as a real shift.
const SHIFT_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumDirection {
    Accelerating,
    Decelerating,
    Stable,
}

impl MomentumDirection {
    pub fn label(self) -> &'static str {
        match self {
            MomentumDirection::Accelerating => "accelerating",
            MomentumDirection::Decelerating => "decelerating",
            MomentumDirection::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Momentum {
    InsufficientData,
    Measured {
        direction: MomentumDirection,
        recent_average: f64,
        earlier_average: f64,
        /// `recent_average - earlier_average`.
        change: f64,
    },
}

impl Momentum {
    pub fn direction(&self) -> Option<MomentumDirection> {
        match self {
            Momentum::InsufficientData => None,
            Momentum::Measured { direction, .. } => Some(*direction),
        }
    }
}

pub fn momentum(days: &[f64]) -> Momentum {
    let n = days.len();
    if n < MOMENTUM_WINDOW {
        return Momentum::InsufficientData;
    }

    let split = n - MOMENTUM_WINDOW;
    let recent = &days[split..];
    // A single block is compared with itself: no shift.
    let earlier = if split == 0 {
        recent
    } else {
        tail(&days[..split], MOMENTUM_WINDOW)
    };

    let (Some(recent_average), Some(earlier_average)) = (mean(recent), mean(earlier)) else {
        return Momentum::InsufficientData;
    };

    let change = recent_average - earlier_average;
    let direction = if change > SHIFT_THRESHOLD {
        MomentumDirection::Accelerating
    } else if change < -SHIFT_THRESHOLD {
        MomentumDirection::Decelerating
    } else {
        MomentumDirection::Stable
    };

    Momentum::Measured {
        direction,
        recent_average,
        earlier_average,
        change,
    }
}
