//! In-memory ledger mirroring the medical-connect contract rules.
//!
//! DESIGN
//! ======
//! The deployed contract keeps global counters (doctors, patients,
//! consultations, owner) plus per-account local state. This ledger applies the
//! same rules without touching a chain: an account registers once, only
//! doctors submit proof of work, only patients rate doctors or raise the
//! emergency flag. Ratings accumulate onto the rated doctor's
//! `rating_sum`/`rating_count` so averages can be served back.
//!
//! Nothing is persisted; a restart returns to the seeded demo state.

use std::collections::HashMap;

use records::{
    EmergencyPatient, GlobalStats, MAX_RATING, MIN_RATING, NearbyDoctor, USER_TYPE_DOCTOR, USER_TYPE_PATIENT,
    UserInfo,
};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Account already registered")]
    AlreadyRegistered(String),
    #[error("Only registered doctors can submit proof of work")]
    NotDoctor(String),
    #[error("Only registered patients can perform this action")]
    NotPatient(String),
    #[error("Rating must be between 1 and 5")]
    InvalidRating(i64),
}

impl LedgerError {
    /// Address or value the error refers to.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::AlreadyRegistered(address) | Self::NotDoctor(address) | Self::NotPatient(address) => address.clone(),
            Self::InvalidRating(rating) => rating.to_string(),
        }
    }
}

/// Most recent proof of work recorded against a doctor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowEntry {
    pub pow_id: u64,
    pub patient_address: String,
    pub treatment_description: String,
    pub timestamp: u64,
}

/// Local state for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub user_type: u8,
    pub name: String,
    pub specialization: Option<String>,
    pub location: Option<String>,
    pub rating_sum: u64,
    pub rating_count: u64,
    pub consultations_count: u64,
    pub emergency_status: u8,
    pub last_pow: Option<PowEntry>,
    /// `(doctor_address, rating)` of the patient's last rating.
    pub last_rating: Option<(String, u8)>,
}

impl Account {
    #[must_use]
    pub fn doctor(name: &str, specialization: &str) -> Self {
        Self {
            user_type: USER_TYPE_DOCTOR,
            name: name.to_owned(),
            specialization: Some(specialization.to_owned()),
            location: None,
            rating_sum: 0,
            rating_count: 0,
            consultations_count: 0,
            emergency_status: 0,
            last_pow: None,
            last_rating: None,
        }
    }

    #[must_use]
    pub fn patient(name: &str) -> Self {
        Self { user_type: USER_TYPE_PATIENT, specialization: None, ..Self::doctor(name, "") }
    }

    #[must_use]
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_owned());
        self
    }

    fn is_doctor(&self) -> bool {
        self.user_type == USER_TYPE_DOCTOR
    }

    fn is_patient(&self) -> bool {
        self.user_type == USER_TYPE_PATIENT
    }

    #[allow(clippy::cast_precision_loss)]
    fn average_rating(&self) -> f64 {
        if self.rating_count == 0 {
            return 0.0;
        }
        self.rating_sum as f64 / self.rating_count as f64
    }
}

// =============================================================================
// LEDGER
// =============================================================================

#[derive(Debug, Clone)]
pub struct Ledger {
    owner: String,
    accounts: HashMap<String, Account>,
    total_doctors: u64,
    total_patients: u64,
    total_consultations: u64,
}

impl Ledger {
    #[must_use]
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            accounts: HashMap::new(),
            total_doctors: 0,
            total_patients: 0,
            total_consultations: 0,
        }
    }

    /// Insert an account directly, bumping the matching global counter.
    /// Used for seeding; skips the registered-once check.
    pub fn insert(&mut self, address: &str, account: Account) {
        if account.is_doctor() {
            self.total_doctors += 1;
        } else if account.is_patient() {
            self.total_patients += 1;
        }
        self.accounts.insert(address.to_owned(), account);
    }

    /// Account prior consultations that happened outside this ledger.
    pub fn add_prior_consultations(&mut self, count: u64) {
        self.total_consultations += count;
    }

    /// Register a doctor.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyRegistered`] if the address already has a role.
    pub fn register_doctor(&mut self, address: &str, name: &str, specialization: &str) -> Result<UserInfo, LedgerError> {
        self.ensure_unregistered(address)?;
        self.insert(address, Account::doctor(name, specialization));
        Ok(self.user_info(address))
    }

    /// Register a patient.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyRegistered`] if the address already has a role.
    pub fn register_patient(&mut self, address: &str, name: &str) -> Result<UserInfo, LedgerError> {
        self.ensure_unregistered(address)?;
        self.insert(address, Account::patient(name));
        Ok(self.user_info(address))
    }

    /// Record a proof of work and return its id (the new consultation total).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotDoctor`] unless `doctor` is a registered doctor.
    pub fn submit_pow(
        &mut self,
        doctor: &str,
        patient: &str,
        treatment_description: &str,
        timestamp: u64,
    ) -> Result<u64, LedgerError> {
        let pow_id = self.total_consultations + 1;
        let account = self
            .accounts
            .get_mut(doctor)
            .filter(|a| a.is_doctor())
            .ok_or_else(|| LedgerError::NotDoctor(doctor.to_owned()))?;

        account.consultations_count += 1;
        account.last_pow = Some(PowEntry {
            pow_id,
            patient_address: patient.to_owned(),
            treatment_description: treatment_description.to_owned(),
            timestamp,
        });
        self.total_consultations = pow_id;
        Ok(pow_id)
    }

    /// Rate a doctor on a 1–5 scale.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRating`] for out-of-range ratings and
    /// [`LedgerError::NotPatient`] unless `patient` is a registered patient.
    pub fn rate_doctor(&mut self, patient: &str, doctor: &str, rating: i64) -> Result<(), LedgerError> {
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(&i64::from(*r)))
            .ok_or(LedgerError::InvalidRating(rating))?;

        let rater = self
            .accounts
            .get_mut(patient)
            .filter(|a| a.is_patient())
            .ok_or_else(|| LedgerError::NotPatient(patient.to_owned()))?;
        rater.last_rating = Some((doctor.to_owned(), rating));

        if let Some(rated) = self.accounts.get_mut(doctor).filter(|a| a.is_doctor()) {
            rated.rating_sum += u64::from(rating);
            rated.rating_count += 1;
        }
        Ok(())
    }

    /// Raise or clear a patient's emergency flag.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotPatient`] unless `patient` is a registered patient.
    pub fn set_emergency(&mut self, patient: &str, emergency: bool) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(patient)
            .filter(|a| a.is_patient())
            .ok_or_else(|| LedgerError::NotPatient(patient.to_owned()))?;
        account.emergency_status = u8::from(emergency);
        Ok(())
    }

    #[must_use]
    pub fn account(&self, address: &str) -> Option<&Account> {
        self.accounts.get(address)
    }

    #[must_use]
    pub fn user_info(&self, address: &str) -> UserInfo {
        let Some(account) = self.accounts.get(address) else {
            return UserInfo::unregistered(address);
        };
        UserInfo {
            address: address.to_owned(),
            user_type: account.user_type,
            name: account.name.clone(),
            specialization: account.specialization.clone(),
            rating_sum: account.rating_sum,
            rating_count: account.rating_count,
            consultations_count: account.consultations_count,
            emergency_status: account.emergency_status,
            registered: true,
        }
    }

    #[must_use]
    pub fn stats(&self) -> GlobalStats {
        GlobalStats {
            total_doctors: self.total_doctors,
            total_patients: self.total_patients,
            total_consultations: self.total_consultations,
            owner: self.owner.clone(),
        }
    }

    /// Patients currently flagged as in emergency, ordered by name.
    #[must_use]
    pub fn emergency_patients(&self) -> Vec<EmergencyPatient> {
        let mut patients: Vec<EmergencyPatient> = self
            .accounts
            .iter()
            .filter(|(_, a)| a.is_patient() && a.emergency_status == 1)
            .map(|(address, a)| EmergencyPatient {
                address: address.clone(),
                name: a.name.clone(),
                emergency_status: a.emergency_status,
                location: location_or_unknown(a),
            })
            .collect();
        patients.sort_by(|a, b| a.name.cmp(&b.name));
        patients
    }

    /// Registered doctors, ordered by name. A `location` keeps only doctors
    /// whose location contains it, ignoring case.
    #[must_use]
    pub fn nearby_doctors(&self, location: Option<&str>) -> Vec<NearbyDoctor> {
        let needle = location
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_lowercase);

        let mut doctors: Vec<NearbyDoctor> = self
            .accounts
            .iter()
            .filter(|(_, a)| a.is_doctor())
            .filter(|(_, a)| match &needle {
                Some(needle) => a
                    .location
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(needle)),
                None => true,
            })
            .map(|(address, a)| NearbyDoctor {
                address: address.clone(),
                name: a.name.clone(),
                specialization: a.specialization.clone().unwrap_or_default(),
                rating: a.average_rating(),
                location: location_or_unknown(a),
                consultations_count: a.consultations_count,
            })
            .collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        doctors
    }

    fn ensure_unregistered(&self, address: &str) -> Result<(), LedgerError> {
        if self.accounts.contains_key(address) {
            return Err(LedgerError::AlreadyRegistered(address.to_owned()));
        }
        Ok(())
    }
}

fn location_or_unknown(account: &Account) -> String {
    account.location.clone().unwrap_or_else(|| "Unknown".to_owned())
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
