use quizledger_core::{derive_record_address, UserId};

#[test]
fn derivation_is_deterministic_and_stable() {
    let user = UserId::from_bytes([0x11; 32]);

    let first = derive_record_address(&user);
    let second = derive_record_address(&user);
    assert_eq!(first, second);

    // Fixed vector: changing the derivation rule is a breaking change for
    // every already-persisted record, so pin the exact output.
    assert_eq!(
        first.to_hex(),
        "beae4fdcefcd918d5a6d6af8d64227c4b527230b79b9e65ee09a861a059aea40"
    );
}

#[test]
fn distinct_identities_derive_distinct_addresses() {
    let user_a = UserId::from_bytes([0x11; 32]);
    let user_b = UserId::from_bytes([0x22; 32]);

    let address_a = derive_record_address(&user_a);
    let address_b = derive_record_address(&user_b);
    assert_ne!(address_a, address_b);

    assert_eq!(
        address_b.to_hex(),
        "069c126098c363417f534e1d1e9667ab34de22e80fef8485a24b7045a9c3e7b9"
    );
}

#[test]
fn address_hex_form_matches_raw_bytes() {
    let user = UserId::from_bytes([0x33; 32]);
    let address = derive_record_address(&user);

    let hex_form = address.to_hex();
    assert_eq!(hex_form.len(), 64);
    assert_eq!(hex::decode(&hex_form).unwrap(), address.as_bytes());
}
