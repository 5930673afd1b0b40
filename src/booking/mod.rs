//! The appointment-booking wizard.
//!
//! A five-step ordered flow: hospital → department → doctor → date/time →
//! confirmation. Each step's selection is a precondition for advancing, and
//! changing an earlier selection clears everything downstream of it.
//! Transitions that are not legal in the current step are logged no-ops.

mod models;
pub mod validation;

pub use models::{
    BookingSelection, BookingStep, Confirmation, Doctor, Hospital, PatientContact, TimeSlot,
};

use chrono::NaiveDate;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::directory::{self, DirectoryProvider};
use validation::{validate_email, validate_full_name, validate_phone, ValidationErrorBuilder};

#[derive(Debug, Error)]
pub enum BookingError {
    /// The submission is incomplete; field names map to their problems.
    /// Surfaced as a blocking message, never a state transition.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(HashMap<String, Vec<String>>),
}

pub struct BookingWizard {
    directory: Arc<dyn DirectoryProvider>,
    step: BookingStep,
    selection: BookingSelection,
    hospitals: Vec<Hospital>,
    doctors: Vec<Doctor>,
    slots: Vec<TimeSlot>,
    confirmation: Option<Confirmation>,
}

impl BookingWizard {
    pub fn new(directory: Arc<dyn DirectoryProvider>) -> Self {
        Self {
            directory,
            step: BookingStep::Hospital,
            selection: BookingSelection::default(),
            hospitals: Vec::new(),
            doctors: Vec::new(),
            slots: Vec::new(),
            confirmation: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    /// Slot availability snapshot for the selected date.
    pub fn available_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.confirmation.is_some()
    }

    /// Populate the hospital list for step one. A fetch error degrades to an
    /// empty list; there is no retry.
    pub async fn load_hospitals(&mut self) -> &[Hospital] {
        match self.directory.fetch_hospitals().await {
            Ok(list) => self.hospitals = list,
            Err(err) => {
                warn!("Hospital directory fetch failed: {:#}", err);
                self.hospitals.clear();
            }
        }
        &self.hospitals
    }

    /// Filter the loaded hospitals by name or address.
    pub fn search_hospitals(&self, query: &str) -> Vec<&Hospital> {
        directory::search_hospitals(&self.hospitals, query)
    }

    /// Whether the field owned by `step` is filled in.
    pub fn can_proceed(&self, step: BookingStep) -> bool {
        match step {
            BookingStep::Hospital => self.selection.hospital.is_some(),
            BookingStep::Department => self.selection.department.is_some(),
            BookingStep::Doctor => self.selection.doctor.is_some(),
            BookingStep::DateTime => {
                self.selection.date.is_some() && self.selection.time_slot.is_some()
            }
            BookingStep::Confirm => false,
        }
    }

    /// Choose a hospital. Legal only in the hospital step; clears every
    /// downstream selection and advances to department choice.
    pub fn select_hospital(&mut self, hospital: Hospital) -> bool {
        if self.step != BookingStep::Hospital {
            debug!("select_hospital ignored in step {}", self.step);
            return false;
        }

        debug!("Hospital selected: {}", hospital.name);
        self.selection.hospital = Some(hospital);
        self.clear_department_and_beyond();
        self.step = BookingStep::Department;
        true
    }

    /// Choose a department offered by the selected hospital and fetch its
    /// doctors. A fetch error degrades to an empty doctor list.
    pub async fn select_department(&mut self, department: &str) -> bool {
        if self.step != BookingStep::Department {
            debug!("select_department ignored in step {}", self.step);
            return false;
        }
        let Some(hospital) = self.selection.hospital.clone() else {
            debug!("select_department ignored without a hospital");
            return false;
        };
        if !hospital.departments.iter().any(|d| d == department) {
            debug!(
                "select_department ignored: {} not offered at {}",
                department, hospital.name
            );
            return false;
        }

        self.selection.department = Some(department.to_string());
        self.clear_doctor_and_beyond();

        match self.directory.fetch_doctors(hospital.id, department).await {
            Ok(list) => self.doctors = list,
            Err(err) => {
                warn!("Doctor directory fetch failed: {:#}", err);
                self.doctors.clear();
            }
        }

        self.step = BookingStep::Doctor;
        true
    }

    /// Choose a doctor. Legal only in the doctor step with a department set.
    pub fn select_doctor(&mut self, doctor: Doctor) -> bool {
        if self.step != BookingStep::Doctor || self.selection.department.is_none() {
            debug!("select_doctor ignored in step {}", self.step);
            return false;
        }

        debug!("Doctor selected: {}", doctor.name);
        self.selection.doctor = Some(doctor);
        self.clear_date_and_beyond();
        self.step = BookingStep::DateTime;
        true
    }

    /// Choose a date and fetch the slot availability snapshot for it. The
    /// previously selected slot is cleared. A fetch error degrades silently
    /// to an empty slot list; there is no retry.
    pub async fn select_date(&mut self, date: NaiveDate) -> bool {
        if self.step != BookingStep::DateTime {
            debug!("select_date ignored in step {}", self.step);
            return false;
        }
        let Some(doctor) = self.selection.doctor.clone() else {
            debug!("select_date ignored without a doctor");
            return false;
        };

        self.selection.date = Some(date);
        self.selection.time_slot = None;

        match self.directory.fetch_slots(doctor.id, date).await {
            Ok(slots) => self.slots = slots,
            Err(err) => {
                warn!("Slot availability fetch failed: {:#}", err);
                self.slots.clear();
            }
        }
        true
    }

    /// Choose a slot from the last fetched snapshot and advance to the
    /// confirmation step. Unknown or unavailable slots are no-ops; the
    /// snapshot is trusted as fetched and not re-validated here.
    pub fn select_slot(&mut self, slot_id: &str) -> bool {
        if self.step != BookingStep::DateTime || self.selection.date.is_none() {
            debug!("select_slot ignored in step {}", self.step);
            return false;
        }
        let Some(slot) = self.slots.iter().find(|s| s.id == slot_id) else {
            debug!("select_slot ignored: unknown slot {}", slot_id);
            return false;
        };
        if !slot.available {
            debug!("select_slot ignored: slot {} unavailable", slot_id);
            return false;
        }

        self.selection.time_slot = Some(slot.clone());
        self.step = BookingStep::Confirm;
        true
    }

    /// Advance one step. Legal only from the first three steps (reaching the
    /// confirmation step goes through `select_slot`), and only when the
    /// current step's selection is made.
    pub fn go_next(&mut self) -> bool {
        if !self.can_proceed(self.step) {
            debug!("go_next ignored: step {} incomplete", self.step);
            return false;
        }
        let next = match self.step {
            BookingStep::Hospital => BookingStep::Department,
            BookingStep::Department => BookingStep::Doctor,
            BookingStep::Doctor => BookingStep::DateTime,
            BookingStep::DateTime | BookingStep::Confirm => {
                debug!("go_next ignored in step {}", self.step);
                return false;
            }
        };
        self.step = next;
        true
    }

    /// Move to the previous step, clearing the selection owned by the step
    /// being left (and everything downstream of it). The destination step's
    /// own selection survives.
    pub fn go_back(&mut self) -> bool {
        match self.step {
            BookingStep::Hospital => {
                debug!("go_back ignored in the first step");
                false
            }
            BookingStep::Department => {
                self.clear_department_and_beyond();
                self.step = BookingStep::Hospital;
                true
            }
            BookingStep::Doctor => {
                self.clear_doctor_and_beyond();
                self.step = BookingStep::Department;
                true
            }
            BookingStep::DateTime => {
                self.clear_date_and_beyond();
                self.step = BookingStep::Doctor;
                true
            }
            BookingStep::Confirm => {
                self.confirmation = None;
                self.step = BookingStep::DateTime;
                true
            }
        }
    }

    /// Submit the booking. Legal only in the confirmation step with a slot
    /// selected, complete contact details and the terms accepted; anything
    /// missing surfaces as a blocking validation error without a state
    /// change. Submitting again after success returns the same receipt.
    pub fn submit(
        &mut self,
        contact: &PatientContact,
        terms_accepted: bool,
    ) -> Result<Confirmation, BookingError> {
        if let Some(existing) = &self.confirmation {
            debug!("submit after success returns existing confirmation");
            return Ok(existing.clone());
        }

        let mut builder = ValidationErrorBuilder::new();
        if self.step != BookingStep::Confirm || self.selection.time_slot.is_none() {
            builder.add("time_slot", "A time slot must be selected");
        }
        builder.check("full_name", validate_full_name(&contact.full_name));
        builder.check("phone", validate_phone(&contact.phone));
        builder.check("email", validate_email(&contact.email));
        if !terms_accepted {
            builder.add("terms", "The terms and conditions must be accepted");
        }
        builder.finish()?;

        let confirmation = match (
            &self.selection.hospital,
            &self.selection.department,
            &self.selection.doctor,
            self.selection.date,
            &self.selection.time_slot,
        ) {
            (Some(hospital), Some(department), Some(doctor), Some(date), Some(slot)) => {
                Confirmation {
                    id: format!("APT-{:04}", rand::rng().random_range(0..10_000)),
                    hospital: hospital.name.clone(),
                    department: department.clone(),
                    doctor: doctor.name.clone(),
                    date,
                    slot_label: slot.label.clone(),
                }
            }
            _ => {
                let mut errors = HashMap::new();
                errors.insert(
                    "booking".to_string(),
                    vec!["The booking selection is incomplete".to_string()],
                );
                return Err(BookingError::Validation(errors));
            }
        };

        info!(
            "Appointment {} booked with {} on {} at {}",
            confirmation.id, confirmation.doctor, confirmation.date, confirmation.slot_label
        );
        self.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }

    /// Start over: empty selection, back to the hospital step. Legal from
    /// any state, including after submission.
    pub fn reset(&mut self) {
        debug!("Booking wizard reset");
        self.selection = BookingSelection::default();
        self.doctors.clear();
        self.slots.clear();
        self.confirmation = None;
        self.step = BookingStep::Hospital;
    }

    fn clear_department_and_beyond(&mut self) {
        self.selection.department = None;
        self.clear_doctor_and_beyond();
    }

    fn clear_doctor_and_beyond(&mut self) {
        self.selection.doctor = None;
        self.doctors.clear();
        self.clear_date_and_beyond();
    }

    fn clear_date_and_beyond(&mut self) {
        self.selection.date = None;
        self.selection.time_slot = None;
        self.slots.clear();
        self.confirmation = None;
    }
}
