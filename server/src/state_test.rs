use super::*;

#[tokio::test]
async fn new_state_is_demo_seeded() {
    let settings = Settings::from_lookup(|_| None).unwrap();
    let state = AppState::new(&settings);
    let stats = state.ledger.read().await.stats();
    assert_eq!(stats.total_doctors, 3);
    assert_eq!(stats.total_patients, 2);
    assert_eq!(state.challenges.pending(), 0);
}

#[tokio::test]
async fn clones_share_ledger() {
    let state = test_helpers::empty_app_state();
    let other = state.clone();
    other.ledger.write().await.register_patient("P1", "Pat").unwrap();
    assert_eq!(state.ledger.read().await.stats().total_patients, 1);
}

#[test]
fn clones_share_challenges() {
    let state = test_helpers::test_app_state();
    let challenge = state.clone().challenges.issue();
    assert!(state.challenges.consume(&challenge.nonce));
}
