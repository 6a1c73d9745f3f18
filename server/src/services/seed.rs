//! Demo accounts loaded into the ledger at startup.

use super::ledger::{Account, Ledger};

pub const DEMO_OWNER: &str = "DEMO_OWNER";
pub const DEMO_PRIOR_CONSULTATIONS: u64 = 500;

struct DemoDoctor {
    address: &'static str,
    name: &'static str,
    specialization: &'static str,
    location: &'static str,
    consultations: u64,
    /// Rating in tenths over ten ratings, e.g. 48 -> 4.8.
    rating_tenths: u64,
}

const DEMO_DOCTORS: &[DemoDoctor] = &[
    DemoDoctor {
        address: "DEMO_DOCTOR_1",
        name: "Dr. Alice Johnson",
        specialization: "Emergency Medicine",
        location: "New York, NY",
        consultations: 150,
        rating_tenths: 48,
    },
    DemoDoctor {
        address: "DEMO_DOCTOR_2",
        name: "Dr. Bob Wilson",
        specialization: "General Practice",
        location: "Brooklyn, NY",
        consultations: 200,
        rating_tenths: 45,
    },
    DemoDoctor {
        address: "DEMO_DOCTOR_3",
        name: "Dr. Carol Davis",
        specialization: "Cardiology",
        location: "Queens, NY",
        consultations: 120,
        rating_tenths: 49,
    },
];

const DEMO_PATIENTS: &[(&str, &str, &str)] = &[
    ("DEMO_PATIENT_1", "John Doe", "New York, NY"),
    ("DEMO_PATIENT_2", "Jane Smith", "Brooklyn, NY"),
];

/// Ledger pre-populated with the demo doctors and patients. Both demo
/// patients start in emergency.
#[must_use]
pub fn demo_ledger() -> Ledger {
    let mut ledger = Ledger::new(DEMO_OWNER);

    for d in DEMO_DOCTORS {
        let mut account = Account::doctor(d.name, d.specialization).with_location(d.location);
        account.consultations_count = d.consultations;
        account.rating_sum = d.rating_tenths;
        account.rating_count = 10;
        ledger.insert(d.address, account);
    }

    for (address, name, location) in DEMO_PATIENTS {
        let mut account = Account::patient(name).with_location(location);
        account.emergency_status = 1;
        ledger.insert(address, account);
    }

    ledger.add_prior_consultations(DEMO_PRIOR_CONSULTATIONS);
    ledger
}
