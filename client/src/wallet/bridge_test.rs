use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

struct ScriptedApprover {
    answer: Result<Vec<String>, WalletError>,
    seen: Mutex<Vec<Pairing>>,
    calls: AtomicUsize,
}

impl ScriptedApprover {
    fn new(answer: Result<Vec<String>, WalletError>) -> Arc<Self> {
        Arc::new(Self { answer, seen: Mutex::new(Vec::new()), calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl PairingApprover for ScriptedApprover {
    async fn approve(&self, pairing: &Pairing) -> Result<Vec<String>, WalletError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(pairing.clone());
        self.answer.clone()
    }
}

// =============================================================
// pairing uri
// =============================================================

#[test]
fn pairing_uri_carries_topic_bridge_and_key() {
    let pairing = Pairing::new("topic-1", "abcd", DEFAULT_BRIDGE_URL).unwrap();
    assert_eq!(pairing.uri, "wc:topic-1@1?bridge=https%3A%2F%2Fbridge.walletconnect.org&key=abcd");
}

#[test]
fn generated_pairings_are_unique() {
    let a = Pairing::generate(DEFAULT_BRIDGE_URL).unwrap();
    let b = Pairing::generate(DEFAULT_BRIDGE_URL).unwrap();
    assert_ne!(a.topic, b.topic);
    assert_ne!(a.key, b.key);
    assert_eq!(a.key.len(), 64);
    assert!(a.uri.starts_with(&format!("wc:{}@1?", a.topic)));
}

#[test]
fn invalid_bridge_url_is_rejected() {
    assert!(matches!(Pairing::generate("not a url"), Err(WalletError::Session(_))));
}

// =============================================================
// sessions
// =============================================================

#[tokio::test]
async fn approved_session_is_reused_until_disconnect() {
    let approver = ScriptedApprover::new(Ok(vec!["ADDR".into()]));
    let wallet = BridgeWallet::new(DEFAULT_BRIDGE_URL, approver.clone());

    assert_eq!(wallet.connect().await.unwrap(), vec!["ADDR".to_owned()]);
    assert_eq!(wallet.connect().await.unwrap(), vec!["ADDR".to_owned()]);
    assert_eq!(approver.calls.load(Ordering::SeqCst), 1);

    wallet.disconnect().await.unwrap();
    wallet.connect().await.unwrap();
    assert_eq!(approver.calls.load(Ordering::SeqCst), 2);

    let seen = approver.seen.lock().unwrap();
    assert_ne!(seen[0].topic, seen[1].topic);
}

#[tokio::test]
async fn declined_pairing_keeps_no_session() {
    let approver = ScriptedApprover::new(Err(WalletError::Rejected));
    let wallet = BridgeWallet::new(DEFAULT_BRIDGE_URL, approver.clone());
    assert_eq!(wallet.connect().await, Err(WalletError::Rejected));
    assert_eq!(wallet.connect().await, Err(WalletError::Rejected));
    assert_eq!(approver.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_approval_is_no_accounts() {
    let wallet = BridgeWallet::new(DEFAULT_BRIDGE_URL, ScriptedApprover::new(Ok(Vec::new())));
    assert_eq!(wallet.connect().await, Err(WalletError::NoAccounts("WalletConnect")));
}
