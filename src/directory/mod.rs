//! Directory data sources for hospitals, doctors and slot availability.
//!
//! The booking wizard talks to a `DirectoryProvider` rather than any
//! concrete backend, so the timer-backed mock can be swapped for a
//! deterministic one in tests (or a real one in an embedding application).

mod seed;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::booking::{Doctor, Hospital, TimeSlot};
use crate::config::DirectoryConfig;

#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Hospitals available for booking.
    async fn fetch_hospitals(&self) -> Result<Vec<Hospital>>;
    /// Doctors practicing the given department at a hospital.
    async fn fetch_doctors(&self, hospital_id: u32, department: &str) -> Result<Vec<Doctor>>;
    /// Slot availability for a doctor on a date. Computed once per call;
    /// callers treat the result as a snapshot.
    async fn fetch_slots(&self, doctor_id: u32, date: NaiveDate) -> Result<Vec<TimeSlot>>;
}

/// Timer-backed provider serving seeded data, standing in for a real
/// hospital-network backend. Every fetch sleeps for the configured delay
/// and resolves exactly once; slot availability is randomized per fetch.
pub struct MockDirectory {
    config: DirectoryConfig,
}

impl MockDirectory {
    pub fn new(config: DirectoryConfig) -> Self {
        Self { config }
    }

    async fn simulate_latency(&self) {
        if self.config.fetch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.fetch_delay_ms)).await;
        }
    }
}

#[async_trait]
impl DirectoryProvider for MockDirectory {
    async fn fetch_hospitals(&self) -> Result<Vec<Hospital>> {
        self.simulate_latency().await;
        Ok(seed::hospitals())
    }

    async fn fetch_doctors(&self, hospital_id: u32, department: &str) -> Result<Vec<Doctor>> {
        debug!("Fetching doctors for hospital {} / {}", hospital_id, department);
        self.simulate_latency().await;
        Ok(seed::doctors(department))
    }

    async fn fetch_slots(&self, doctor_id: u32, date: NaiveDate) -> Result<Vec<TimeSlot>> {
        debug!("Fetching slots for doctor {} on {}", doctor_id, date);
        self.simulate_latency().await;

        let availability = self.config.slot_availability.clamp(0.0, 1.0);
        let mut rng = rand::rng();
        let mut slots = Vec::new();
        for hour in self.config.open_hour..self.config.close_hour {
            for minute in [0, 30] {
                let (display_hour, meridiem) = match hour {
                    0 => (12, "AM"),
                    1..=11 => (hour, "AM"),
                    12 => (12, "PM"),
                    _ => (hour - 12, "PM"),
                };
                slots.push(TimeSlot {
                    id: format!("{:02}:{:02}", hour, minute),
                    label: format!("{}:{:02} {}", display_hour, minute, meridiem),
                    available: rng.random_bool(availability),
                });
            }
        }
        Ok(slots)
    }
}

/// Deterministic provider with fixed data and no latency, for tests and
/// embedders that load their own directory.
#[derive(Default)]
pub struct StaticDirectory {
    pub hospitals: Vec<Hospital>,
    pub doctors: Vec<Doctor>,
    pub slots: Vec<TimeSlot>,
}

#[async_trait]
impl DirectoryProvider for StaticDirectory {
    async fn fetch_hospitals(&self) -> Result<Vec<Hospital>> {
        Ok(self.hospitals.clone())
    }

    async fn fetch_doctors(&self, _hospital_id: u32, _department: &str) -> Result<Vec<Doctor>> {
        Ok(self.doctors.clone())
    }

    async fn fetch_slots(&self, _doctor_id: u32, _date: NaiveDate) -> Result<Vec<TimeSlot>> {
        Ok(self.slots.clone())
    }
}

/// Filter hospitals by a case-insensitive name or address match.
pub fn search_hospitals<'a>(hospitals: &'a [Hospital], query: &str) -> Vec<&'a Hospital> {
    let query = query.to_lowercase();
    hospitals
        .iter()
        .filter(|h| {
            h.name.to_lowercase().contains(&query) || h.address.to_lowercase().contains(&query)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock() -> MockDirectory {
        MockDirectory::new(DirectoryConfig {
            fetch_delay_ms: 0,
            ..DirectoryConfig::default()
        })
    }

    #[tokio::test]
    async fn test_seeded_hospitals() {
        let hospitals = mock().fetch_hospitals().await.unwrap();
        assert_eq!(hospitals.len(), 4);
        for hospital in &hospitals {
            assert!(!hospital.departments.is_empty());
            assert!(hospital.rating > 0.0);
        }
    }

    #[tokio::test]
    async fn test_doctors_carry_requested_department() {
        let doctors = mock().fetch_doctors(1, "Cardiology").await.unwrap();
        assert_eq!(doctors.len(), 3);
        assert!(doctors.iter().all(|d| d.specialty == "Cardiology"));
    }

    #[tokio::test]
    async fn test_slots_cover_clinic_hours() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let slots = mock().fetch_slots(1, date).await.unwrap();

        // two half-hour slots per open hour
        assert_eq!(slots.len(), (17 - 9) * 2);
        assert_eq!(slots.first().unwrap().id, "09:00");
        assert_eq!(slots.first().unwrap().label, "9:00 AM");
        assert_eq!(slots.last().unwrap().id, "16:30");
        assert_eq!(slots.last().unwrap().label, "4:30 PM");
    }

    #[tokio::test]
    async fn test_slot_availability_bounds() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();

        let all = MockDirectory::new(DirectoryConfig {
            fetch_delay_ms: 0,
            slot_availability: 1.0,
            ..DirectoryConfig::default()
        });
        assert!(all
            .fetch_slots(1, date)
            .await
            .unwrap()
            .iter()
            .all(|s| s.available));

        let none = MockDirectory::new(DirectoryConfig {
            fetch_delay_ms: 0,
            slot_availability: 0.0,
            ..DirectoryConfig::default()
        });
        assert!(none
            .fetch_slots(1, date)
            .await
            .unwrap()
            .iter()
            .all(|s| !s.available));
    }

    #[tokio::test]
    async fn test_search_hospitals_by_name_and_address() {
        let hospitals = mock().fetch_hospitals().await.unwrap();

        let by_name = search_hospitals(&hospitals, "westside");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Westside Medical Center");

        let by_address = search_hospitals(&hospitals, "boulevard");
        assert_eq!(by_address.len(), 1);
        assert_eq!(by_address[0].name, "Eastside Health Institute");

        assert_eq!(search_hospitals(&hospitals, "").len(), 4);
        assert!(search_hospitals(&hospitals, "nowhere").is_empty());
    }
}
