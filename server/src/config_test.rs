use std::collections::HashMap;

use super::*;

fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    Settings::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn defaults_when_nothing_set() {
    let settings = settings_from(&[]).unwrap();
    assert_eq!(settings.environment, "development");
    assert_eq!(settings.port, DEFAULT_PORT);
    assert_eq!(settings.network, Network::Testnet);
    assert_eq!(settings.algod_url, "https://testnet-api.algonode.cloud");
    assert_eq!(settings.indexer_url, "https://testnet-idx.algonode.cloud");
    assert_eq!(settings.cors_origins, vec!["http://localhost:5173", "http://127.0.0.1:5173"]);
    assert_eq!(settings.challenge_ttl_secs, DEFAULT_CHALLENGE_TTL_SECS);
    assert!(settings.algod_token.is_empty());
}

#[test]
fn mainnet_switches_endpoint_defaults() {
    let settings = settings_from(&[("ALGORAND_NETWORK", "mainnet")]).unwrap();
    assert_eq!(settings.network, Network::Mainnet);
    assert_eq!(settings.algod_url, "https://mainnet-api.algonode.cloud");
}

#[test]
fn explicit_urls_override_network_defaults() {
    let settings = settings_from(&[("ALGOD_URL", "http://localhost:4001")]).unwrap();
    assert_eq!(settings.algod_url, "http://localhost:4001");
}

#[test]
fn unknown_network_is_an_error() {
    let err = settings_from(&[("ALGORAND_NETWORK", "devnet")]).unwrap_err();
    assert!(matches!(err, ConfigError::Network(_)));
}

#[test]
fn invalid_port_is_an_error() {
    let err = settings_from(&[("PORT", "eighty")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
}

#[test]
fn origins_are_trimmed_and_blank_entries_dropped() {
    assert_eq!(parse_origins(" https://a.example , ,https://b.example,"), vec!["https://a.example", "https://b.example"]);
}

#[test]
fn star_origin_allows_any() {
    let settings = settings_from(&[("CORS_ORIGINS", "*")]).unwrap();
    assert!(settings.allows_any_origin());
    assert!(!settings_from(&[]).unwrap().allows_any_origin());
}
