use super::*;
use std::time::Instant;

fn instant() -> DemoContract {
    DemoContract::new(Duration::ZERO)
}

fn assert_demo_tx(tx_id: &str) {
    let suffix = tx_id.strip_prefix(TX_PREFIX).unwrap();
    assert_eq!(suffix.len(), 9, "{tx_id}");
    assert!(suffix.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()), "{tx_id}");
}

// =============================================================
// writes
// =============================================================

#[tokio::test]
async fn writes_return_demo_transaction_ids() {
    let contract = instant();
    assert_demo_tx(&contract.register_doctor("Dr. A", "GP").await.unwrap());
    assert_demo_tx(&contract.register_patient("Pat").await.unwrap());
    assert_demo_tx(&contract.submit_proof_of_work("P1", "Checkup").await.unwrap());
    assert_demo_tx(&contract.rate_doctor("D1", 5).await.unwrap());
    assert_demo_tx(&contract.set_emergency_status(true).await.unwrap());
}

#[test]
fn transaction_ids_differ() {
    assert_ne!(demo_transaction_id(), demo_transaction_id());
}

#[tokio::test]
async fn writes_wait_for_the_delay() {
    let contract = DemoContract::new(Duration::from_millis(30));
    let started = Instant::now();
    contract.register_patient("Pat").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn invalid_rating_fails_immediately() {
    let contract = DemoContract::new(Duration::from_secs(60));
    for rating in [0, 6] {
        let started = Instant::now();
        assert_eq!(contract.rate_doctor("D1", rating).await, Err(ContractError::InvalidRating(rating)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}

// =============================================================
// reads + config
// =============================================================

#[tokio::test]
async fn reads_return_demo_records() {
    let contract = instant();
    let info = contract.get_user_info("ANY").await;
    assert_eq!(info.address, "ANY");
    assert_eq!(info.name, "Demo User");
    assert!((info.average_rating() - 4.0).abs() < f64::EPSILON);

    let stats = contract.get_global_stats().await;
    assert_eq!((stats.total_doctors, stats.total_patients, stats.total_consultations), (5, 20, 50));
}

#[test]
fn config_update_is_recorded() {
    let contract = instant();
    assert!(contract.config().is_none());
    contract.update_contract_config(42, "APPADDR");
    assert_eq!(contract.config(), Some(ContractConfig { app_id: 42, app_address: "APPADDR".into() }));
}
