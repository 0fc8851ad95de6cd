//! Detection module - position fusion, occupancy state machine, and
//! background recalibration policy

mod fusion;
mod recalibration;
mod state;

pub use fusion::fuse_position;
pub use recalibration::BackgroundRecalibrator;
pub use state::{
    OccupancyStateMachine, MSG_EDGE_SITTING, MSG_OUT_OF_BED, MSG_RETURNED_TO_BED,
    MSG_VISITOR_LEFT, MSG_VISITOR_PRESENT,
};

use serde::{Deserialize, Serialize};

/// Coarse physical state of the monitored occupant.
///
/// Serialized as the numeric status codes the dashboard consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    /// Resting in bed
    BedOccupied = 1,
    /// Sitting at the bed edge
    EdgeSitting = 2,
    /// Left the bed
    OutOfBed = 3,
    /// A visitor is in the room
    VisitorPresent = 4,
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Status::BedOccupied),
            2 => Ok(Status::EdgeSitting),
            3 => Ok(Status::OutOfBed),
            4 => Ok(Status::VisitorPresent),
            other => Err(format!("invalid status code: {other}")),
        }
    }
}

/// Who the detected person is believed to be, classified from where they
/// first appear relative to the bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Person {
    /// The monitored occupant
    Patient = 1,
    /// Anyone else (caregiver, family, visitor)
    Other = 2,
}

impl From<Person> for u8 {
    fn from(person: Person) -> u8 {
        person as u8
    }
}

impl TryFrom<u8> for Person {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Person::Patient),
            2 => Ok(Person::Other),
            other => Err(format!("invalid person code: {other}")),
        }
    }
}
