//! Config file to signed, decoded and validated transaction.

#![allow(clippy::indexing_slicing, clippy::unwrap_used)]

use std::sync::Arc;
use vmauth_actions::Transfer;
use vmauth_auth::{Eip712Factory, Secp256k1Factory};
use vmauth_chain::{Action, AuthFactory, Base, ChainError, Transaction};
use vmauth_codec::Address;
use vmauth_operations::{load_config, run_startup_sequence, Runtime};

const CONFIG: &str = r#"
chain:
  chain_id: "2c7iUW3kCDwRA9ZFd5bjZZc8iDy68uAsFSBahjqSZGttiTDSNH"
  validity_window_ms: 10000
  max_actions_per_tx: 2

presentation:
  hrp: "test"
  decimals: 6

observability:
  log_level: "warn"
"#;

const NOW_MS: i64 = 1_717_111_220_000;

fn runtime() -> Runtime {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vmauth.yaml");
    std::fs::write(&path, CONFIG).unwrap();
    run_startup_sequence(&load_config(&path).unwrap()).unwrap()
}

fn transfer_tx(runtime: &Runtime, actions: usize) -> Transaction {
    let base = Base {
        timestamp: NOW_MS + 5_000,
        chain_id: runtime.rules.chain_id,
        max_fee: 1_000_000,
    };
    let actions = (0..actions)
        .map(|i| {
            Arc::new(Transfer {
                to: Address::new(0, [i as u8 + 1; 32]),
                value: 2_500_000,
            }) as Arc<dyn Action>
        })
        .collect();
    Transaction::new(base, actions)
}

#[test]
fn test_configured_runtime_signs_and_verifies() {
    let runtime = runtime();
    let factories: [Box<dyn AuthFactory>; 2] = [
        Box::new(Secp256k1Factory::from_slice(&[7u8; 32]).unwrap()),
        Box::new(Eip712Factory::from_slice(&[7u8; 32], Arc::clone(&runtime.typed_tx)).unwrap()),
    ];

    for factory in &factories {
        let signed = transfer_tx(&runtime, 1)
            .sign(factory.as_ref(), &runtime.registry)
            .unwrap();
        let decoded = Transaction::unmarshal(&signed.to_bytes().unwrap(), &runtime.registry).unwrap();
        decoded.verify_auth().unwrap();
        decoded.validate(&*runtime.rules, NOW_MS).unwrap();
    }
}

#[test]
fn test_presentation_flows_into_typed_data() {
    let runtime = runtime();
    let typed = runtime
        .typed_tx
        .typed_data(&transfer_tx(&runtime, 1))
        .unwrap();
    assert_eq!(typed.message["maxFee"], "1.000000");
    assert_eq!(typed.message["params"]["value"], "2.500000");
    assert!(typed.message["params"]["to"]
        .as_str()
        .unwrap()
        .starts_with("test1"));
}

#[test]
fn test_configured_limits_apply() {
    let runtime = runtime();
    let factory = Secp256k1Factory::from_slice(&[7u8; 32]).unwrap();
    let signed = transfer_tx(&runtime, 3)
        .sign(&factory, &runtime.registry)
        .unwrap();
    assert_eq!(
        signed.validate(&*runtime.rules, NOW_MS).unwrap_err(),
        ChainError::TooManyActions { count: 3, max: 2 }
    );

    let late = transfer_tx(&runtime, 1);
    assert!(matches!(
        late.validate(&*runtime.rules, NOW_MS - 20_000),
        Err(ChainError::TimestampTooFar { .. })
    ));
}
