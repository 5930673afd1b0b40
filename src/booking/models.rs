//! Booking and directory domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The five wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Hospital,
    Department,
    Doctor,
    DateTime,
    Confirm,
}

impl BookingStep {
    /// 1-based position, for progress displays.
    pub fn number(&self) -> u8 {
        match self {
            Self::Hospital => 1,
            Self::Department => 2,
            Self::Doctor => 3,
            Self::DateTime => 4,
            Self::Confirm => 5,
        }
    }
}

impl std::fmt::Display for BookingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hospital => write!(f, "hospital"),
            Self::Department => write!(f, "department"),
            Self::Doctor => write!(f, "doctor"),
            Self::DateTime => write!(f, "date_time"),
            Self::Confirm => write!(f, "confirm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub rating: f32,
    /// Departments offering appointments at this hospital
    pub departments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    pub experience: String,
    pub education: String,
    /// Human-readable weekday availability, e.g. "Mon, Wed, Fri"
    pub availability: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Stable identifier within one availability snapshot, e.g. "14:30"
    pub id: String,
    /// Display label, e.g. "2:30 PM"
    pub label: String,
    pub available: bool,
}

/// Contact fields required to submit a booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContact {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// The accumulated wizard selection. Fields fill strictly in order; clearing
/// one clears everything after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingSelection {
    pub hospital: Option<Hospital>,
    pub department: Option<String>,
    pub doctor: Option<Doctor>,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
}

/// Receipt for a submitted booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Synthesized confirmation identifier, e.g. "APT-0042"
    pub id: String,
    pub hospital: String,
    pub department: String,
    pub doctor: String,
    pub date: NaiveDate,
    pub slot_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers_are_ordered() {
        let steps = [
            BookingStep::Hospital,
            BookingStep::Department,
            BookingStep::Doctor,
            BookingStep::DateTime,
            BookingStep::Confirm,
        ];
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.number() as usize, i + 1);
        }
    }

    #[test]
    fn test_step_display() {
        assert_eq!(BookingStep::DateTime.to_string(), "date_time");
        assert_eq!(BookingStep::Hospital.to_string(), "hospital");
    }
}
