/*
    End-to-End Integration Test

    Runs the full pipeline with the real CSIDH-512 primitive and the operating
    system's randomness source, then reads the document back the way a
    consumer would:
    - document shape and hex widths
    - the persisted public key passes validation again
    - the persisted secret re-derives the persisted public key
    - two runs never produce the same pair
*/

use dhgen_core::csidh::{Csidh512, CsidhPrivateKey};
use dhgen_core::primitive::IsogenyDh;
use dhgen_core::{pipeline, Config, KeyPairDocument};
use rand::rngs::OsRng;
use tempfile::tempdir;

/// **End-to-End Test: Generate, Persist, Reload**
///
/// Scenario:
/// 1. Generate two key pairs into two files
/// 2. Reload both documents from disk
/// 3. Check field names, widths and lowercase hex
/// 4. Re-derive the first public key from its persisted secret
/// 5. Check the two runs differ
#[test]
fn test_end_to_end_generate_and_reload() {
    let dir = tempdir().unwrap();
    let csidh = Csidh512::new();

    println!("Phase 1: generating two key pairs...");
    let first_path = dir.path().join("first.json");
    let second_path = dir.path().join("second.json");
    pipeline::run(&Config::with_output_path(&first_path), csidh, &mut OsRng).unwrap();
    pipeline::run(&Config::with_output_path(&second_path), csidh, &mut OsRng).unwrap();

    println!("Phase 2: reloading documents...");
    let first = KeyPairDocument::load(&first_path).unwrap();
    let second = KeyPairDocument::load(&second_path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&first_path).unwrap()).unwrap();
    let fields = raw.as_object().unwrap();
    assert_eq!(fields.len(), 2);
    assert!(fields.contains_key("dhSecret"));
    assert!(fields.contains_key("dhPublic"));

    for doc in [&first, &second] {
        assert_eq!(doc.dh_secret().len(), 74);
        assert_eq!(doc.dh_public().len(), 128);
        assert!(doc
            .dh_secret()
            .chars()
            .chain(doc.dh_public().chars())
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    println!("Phase 3: re-deriving the public key...");
    let secret = first.secret_bytes().unwrap();
    let public = first.public_bytes().unwrap();
    let sk = CsidhPrivateKey::from_bytes(&secret).unwrap();
    let pk = csidh.derive_public_key(&sk, &mut OsRng).unwrap();
    assert_eq!(csidh.export_public_key(&pk), public);
    assert!(csidh.validate_public_key(&pk, &mut OsRng));

    println!("Phase 4: comparing runs...");
    assert_ne!(first.dh_secret(), second.dh_secret());
    assert_ne!(first.dh_public(), second.dh_public());
}
