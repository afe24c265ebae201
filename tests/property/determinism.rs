//! Property-based tests for determinism guarantees

use clonekit::clone::{derive_address, proxy_init_code, implementation_of, proxy_runtime_code};
use clonekit::codec::LeafRecord;
use clonekit::types::{Address, U256};
use proptest::prelude::*;

/// Test that clone address derivation is a pure function of its inputs
#[test]
fn test_clone_address_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                any::<[u8; 20]>(),
                any::<[u8; 20]>(),
                any::<[u8; 32]>(),
                any::<[u8; 32]>(),
            ),
            |(implementation, deployer, salt1, salt2)| {
                let implementation = Address(implementation);
                let deployer = Address(deployer);

                let first = derive_address(&implementation, &deployer, &salt1);
                let second = derive_address(&implementation, &deployer, &salt1);
                assert_eq!(first, second);

                // Distinct salts land on distinct addresses barring a keccak collision
                if salt1 != salt2 {
                    prop_assert_ne!(first, derive_address(&implementation, &deployer, &salt2));
                }

                Ok(())
            },
        )
        .unwrap();
}

/// Test that the proxy template always embeds the implementation it was built for
#[test]
fn test_proxy_template_embeds_implementation_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<[u8; 20]>(), |bytes| {
            let implementation = Address(bytes);
            let runtime = proxy_runtime_code(&implementation);
            prop_assert_eq!(implementation_of(&runtime), Some(implementation));
            prop_assert!(proxy_init_code(&implementation).ends_with(&runtime));
            Ok(())
        })
        .unwrap();
}

/// Test that leaf digests depend only on the record
#[test]
fn test_leaf_digest_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                any::<[u8; 20]>(),
                any::<u64>(),
                any::<u64>(),
                any::<[u8; 20]>(),
            ),
            |(claimant, quantity, price, currency)| {
                let record = LeafRecord::Claim {
                    claimant: Address(claimant),
                    quantity: U256::from(quantity),
                    price_per_unit: U256::from(price),
                    currency: Address(currency),
                };
                let again = record.clone();
                prop_assert_eq!(record.digest().unwrap(), again.digest().unwrap());

                let airdrop = LeafRecord::Airdrop {
                    claimant: Address(claimant),
                    amount: U256::from(quantity),
                };
                prop_assert_ne!(record.digest().unwrap(), airdrop.digest().unwrap());

                Ok(())
            },
        )
        .unwrap();
}
