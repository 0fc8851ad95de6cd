// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/bedwatch-rs

//! Occupant/state discriminant state machine
//!
//! Consumes the fused position from one processed frame plus the previous
//! frame's position and updates the coarse occupancy status. Position zones
//! (indices into the sensor scan, near end = bed, far end = door):
//!
//! - below `patient_zone_max`: the occupant resting in bed
//! - above `visitor_zone_min`: someone entering from the doorway
//! - the band in between carries no classification information on first
//!   appearance and acts as a hysteresis band on disappearance

use std::time::{Duration, Instant};
use tracing::debug;

use super::{Person, Status};
use crate::config::EngineConfig;

/// Alert issued once per bed-exit episode.
pub const MSG_OUT_OF_BED: &str = "Out of bed! Check immediately!";
/// Patient settled back after edge-sitting.
pub const MSG_RETURNED_TO_BED: &str = "Returned to bed";
/// Patient moved to the bed edge.
pub const MSG_EDGE_SITTING: &str = "Now sitting at the bed edge";
/// A non-patient entered the room.
pub const MSG_VISITOR_PRESENT: &str = "Visitor present";
/// The visitor left and the room settled.
pub const MSG_VISITOR_LEFT: &str = "The visitor has left";

/// Timer-backed discriminant over (status, person, position, previous
/// position). Exactly one status is active at any instant; `step` mutates it
/// at most once per processed frame.
pub struct OccupancyStateMachine {
    config: EngineConfig,
    status: Status,
    person: Option<Person>,
    reset_timer: Option<Instant>,
    exit_alert_armed: bool,
}

impl OccupancyStateMachine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            status: Status::BedOccupied,
            person: None,
            reset_timer: None,
            exit_alert_armed: true,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn person(&self) -> Option<Person> {
        self.person
    }

    /// Advance the state machine by one frame. Returns the human-readable
    /// notice when, and only when, the status changed on this step.
    pub fn step(
        &mut self,
        position: Option<f64>,
        prev_position: Option<f64>,
        now: Instant,
    ) -> Option<&'static str> {
        let before = self.status;

        match position {
            Some(p) => {
                // First position after a null run while the bed reads
                // occupied: classify who appeared by where they appeared.
                if prev_position.is_none() && self.status == Status::BedOccupied {
                    if p < self.config.patient_zone_max {
                        self.person = Some(Person::Patient);
                        self.status = Status::BedOccupied;
                    } else if p > self.config.visitor_zone_min {
                        self.person = Some(Person::Other);
                        self.status = Status::VisitorPresent;
                    }
                }

                // Patient movement tracking needs a continuous track, so a
                // previous position is required.
                if self.person == Some(Person::Patient) && prev_position.is_some() {
                    self.status = if p <= self.config.edge_sit_max {
                        Status::EdgeSitting
                    } else {
                        Status::OutOfBed
                    };
                }
            }
            None => {
                if let Some(prev) = prev_position {
                    // The track just vanished; judge by where it was last
                    // seen. Positions inside (patient_zone_max, bed_exit_min]
                    // are the hysteresis band and leave the status unchanged.
                    match self.person {
                        Some(Person::Patient) => {
                            if prev <= self.config.patient_zone_max {
                                self.status = Status::BedOccupied;
                            } else if prev > self.config.bed_exit_min {
                                self.status = Status::OutOfBed;
                            }
                        }
                        Some(Person::Other) => {
                            if prev > self.config.visitor_zone_min {
                                self.reset_timer = Some(now);
                            }
                        }
                        None => {}
                    }
                } else if self.status == Status::VisitorPresent {
                    // Quiet room with the visitor last seen at the doorway:
                    // after the decay window, assume they left.
                    if let Some(started) = self.reset_timer {
                        let window = Duration::from_millis(self.config.visitor_reset_ms);
                        if now.duration_since(started) > window {
                            self.status = Status::BedOccupied;
                            self.person = None;
                            self.reset_timer = None;
                        }
                    }
                }
            }
        }

        if self.status != before {
            debug!(from = ?before, to = ?self.status, "occupancy status changed");
            self.notice(before)
        } else {
            None
        }
    }

    fn notice(&mut self, previous: Status) -> Option<&'static str> {
        match self.status {
            Status::BedOccupied => match previous {
                Status::EdgeSitting => Some(MSG_RETURNED_TO_BED),
                Status::VisitorPresent => Some(MSG_VISITOR_LEFT),
                _ => None,
            },
            Status::EdgeSitting => {
                self.exit_alert_armed = true;
                Some(MSG_EDGE_SITTING)
            }
            Status::OutOfBed => {
                // One-shot: not re-sent while continuously out of bed.
                if self.exit_alert_armed {
                    self.exit_alert_armed = false;
                    Some(MSG_OUT_OF_BED)
                } else {
                    None
                }
            }
            Status::VisitorPresent => Some(MSG_VISITOR_PRESENT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> OccupancyStateMachine {
        OccupancyStateMachine::new(EngineConfig::default())
    }

    #[test]
    fn test_first_near_position_classifies_patient() {
        let mut sm = machine();
        let msg = sm.step(Some(50.0), None, Instant::now());
        assert_eq!(sm.person(), Some(Person::Patient));
        assert_eq!(sm.status(), Status::BedOccupied);
        assert_eq!(msg, None);
    }

    #[test]
    fn test_patient_moving_far_goes_out_of_bed() {
        let mut sm = machine();
        let now = Instant::now();
        sm.step(Some(50.0), None, now);
        let msg = sm.step(Some(120.0), Some(50.0), now);
        assert_eq!(sm.status(), Status::OutOfBed);
        assert_eq!(msg, Some(MSG_OUT_OF_BED));
    }

    #[test]
    fn test_hysteresis_band_keeps_status_on_disappearance() {
        let mut sm = machine();
        let now = Instant::now();
        sm.step(Some(50.0), None, now);
        sm.step(Some(120.0), Some(50.0), now);
        // Track lost at 120, inside (70, 150]: status unchanged.
        let msg = sm.step(None, Some(120.0), now);
        assert_eq!(sm.status(), Status::OutOfBed);
        assert_eq!(msg, None);
    }

    #[test]
    fn test_disappearance_near_bed_returns_to_occupied() {
        let mut sm = machine();
        let now = Instant::now();
        sm.step(Some(50.0), None, now);
        sm.step(Some(90.0), Some(50.0), now);
        assert_eq!(sm.status(), Status::EdgeSitting);
        let msg = sm.step(None, Some(60.0), now);
        assert_eq!(sm.status(), Status::BedOccupied);
        assert_eq!(msg, Some(MSG_RETURNED_TO_BED));
    }

    #[test]
    fn test_exit_alert_is_one_shot_until_rearmed() {
        let mut sm = machine();
        let now = Instant::now();
        sm.step(Some(50.0), None, now);

        // Edge-sit, out, back via edge-sit, out again: alert both times.
        assert_eq!(sm.step(Some(90.0), Some(50.0), now), Some(MSG_EDGE_SITTING));
        assert_eq!(sm.step(Some(120.0), Some(90.0), now), Some(MSG_OUT_OF_BED));
        assert_eq!(sm.step(Some(90.0), Some(120.0), now), Some(MSG_EDGE_SITTING));
        assert_eq!(sm.step(Some(120.0), Some(90.0), now), Some(MSG_OUT_OF_BED));
    }

    #[test]
    fn test_out_of_bed_without_armed_alert_is_silent() {
        let mut sm = machine();
        let now = Instant::now();
        sm.step(Some(50.0), None, now);
        sm.step(Some(120.0), Some(50.0), now); // consumes the alert
        sm.step(None, Some(60.0), now); // back to BedOccupied, no edge-sit
        assert_eq!(sm.status(), Status::BedOccupied);
        let msg = sm.step(Some(120.0), Some(50.0), now);
        assert_eq!(sm.status(), Status::OutOfBed);
        assert_eq!(msg, None);
    }

    #[test]
    fn test_far_first_position_is_a_visitor() {
        let mut sm = machine();
        let msg = sm.step(Some(200.0), None, Instant::now());
        assert_eq!(sm.person(), Some(Person::Other));
        assert_eq!(sm.status(), Status::VisitorPresent);
        assert_eq!(msg, Some(MSG_VISITOR_PRESENT));
    }

    #[test]
    fn test_visitor_departure_after_decay_window() {
        let mut sm = machine();
        let t0 = Instant::now();
        sm.step(Some(200.0), None, t0);
        // Visitor last seen at the doorway, then the room goes quiet.
        sm.step(None, Some(200.0), t0);
        // Before the window elapses nothing changes.
        let msg = sm.step(None, None, t0 + Duration::from_millis(4000));
        assert_eq!(sm.status(), Status::VisitorPresent);
        assert_eq!(msg, None);
        // After >5000ms the visitor is assumed gone and person is cleared.
        let msg = sm.step(None, None, t0 + Duration::from_millis(5001));
        assert_eq!(sm.status(), Status::BedOccupied);
        assert_eq!(sm.person(), None);
        assert_eq!(msg, Some(MSG_VISITOR_LEFT));
    }

    #[test]
    fn test_midrange_first_position_classifies_nobody() {
        let mut sm = machine();
        sm.step(Some(120.0), None, Instant::now());
        assert_eq!(sm.person(), None);
        assert_eq!(sm.status(), Status::BedOccupied);
    }
}
