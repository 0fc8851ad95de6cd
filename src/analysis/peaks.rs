// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Peak detection over derived intensity profiles

/// Locate the occupant peak in a profile.
///
/// A sample at index `i` (interior samples only) is a candidate iff it
/// exceeds `threshold`, rises strictly from the left, and does not rise to
/// the right (non-strict trailing tie allowance, so a flat-topped blob still
/// registers at its leading edge).
///
/// Zero candidates yields `None`. A single candidate is returned as-is. With
/// two or more candidates the two highest-valued ones are treated as twin
/// maxima of one blob and the midpoint of their indices is returned; value
/// ties keep scan order (stable sort).
pub fn find_peak(profile: &[u8], threshold: u8) -> Option<f64> {
    let mut candidates: Vec<usize> = Vec::new();
    for i in 1..profile.len().saturating_sub(1) {
        if profile[i] > threshold && profile[i] > profile[i - 1] && profile[i] >= profile[i + 1] {
            candidates.push(i);
        }
    }

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0] as f64),
        _ => {
            candidates.sort_by(|&a, &b| profile[b].cmp(&profile[a]));
            Some((candidates[0] + candidates[1]) as f64 / 2.0)
        }
    }
}

/// Index of the first occurrence of the profile maximum, reported only when
/// that maximum lies strictly inside `(floor, ceiling)`. Used for the
/// telemetry peak marker, not for classification.
pub fn telemetry_peak_index(profile: &[u8], floor: u8, ceiling: u8) -> Option<usize> {
    let mut max_value = 0u8;
    let mut max_index = 0usize;
    for (i, &v) in profile.iter().enumerate() {
        if v > max_value {
            max_value = v;
            max_index = i;
        }
    }

    if max_value > floor && max_value < ceiling {
        Some(max_index)
    } else {
        None
    }
}
