//! Signal processing - derived profiles and peak detection

mod peaks;
mod profile;

pub use peaks::{find_peak, telemetry_peak_index};
pub use profile::{diff_profile, filtered_profile, inter_frame_profile};
