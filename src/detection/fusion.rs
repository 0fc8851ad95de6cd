// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Position fusion - combines the background-diff and motion-diff peaks
//! into one estimated occupant location

/// Fuse the two independent peak estimates.
///
/// Both present: arithmetic mean. Motion absent: the background peak stands
/// alone (which may itself be absent). Motion present without a background
/// peak: no position. The last case is asymmetric: motion with no background
/// response counts as an unlocatable disturbance, not a position fix.
pub fn fuse_position(background_peak: Option<f64>, motion_peak: Option<f64>) -> Option<f64> {
    match (background_peak, motion_peak) {
        (Some(back), Some(motion)) => Some((back + motion) / 2.0),
        (back, None) => back,
        (None, Some(_)) => None,
    }
}
