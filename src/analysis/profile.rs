// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Derived intensity profiles - background diff, noise-floor filtering,
//! inter-frame motion diff

/// Absolute difference between the current frame and the stored background.
/// Isolates everything that is not part of the empty-room baseline.
pub fn diff_profile(frame: &[u8], background: &[u8]) -> Vec<u8> {
    frame
        .iter()
        .zip(background.iter())
        .map(|(&a, &b)| a.abs_diff(b))
        .collect()
}

/// Subtract the uniform noise floor so the weakest response is zero.
/// Exposed for observability only; peak detection runs on the raw diff.
pub fn filtered_profile(diff: &[u8]) -> Vec<u8> {
    let floor = diff.iter().copied().min().unwrap_or(0);
    diff.iter().map(|&v| v - floor).collect()
}

/// Absolute difference between consecutive frames. Captures motion
/// independently of the baseline, so it stays useful while the background
/// is drifting.
pub fn inter_frame_profile(frame: &[u8], previous: &[u8]) -> Vec<u8> {
    frame
        .iter()
        .zip(previous.iter())
        .map(|(&a, &b)| a.abs_diff(b))
        .collect()
}
