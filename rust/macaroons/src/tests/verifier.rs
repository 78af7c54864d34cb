mod first_party {
    use crate::{
        error::VerificationError,
        tests::fixtures::{bank_macaroon, ROOT_KEY},
        Caveat, Macaroon, SecretKey, Verifier,
    };

    #[test]
    fn it_verifies_a_macaroon_without_caveats() {
        assert_eq!(Verifier::default().verify(&bank_macaroon(), ROOT_KEY), Ok(()));
    }

    #[test]
    fn it_fails_with_the_wrong_root_key() {
        assert_eq!(
            Verifier::default().verify(&bank_macaroon(), b"another key"),
            Err(VerificationError::SignatureMismatch)
        );
    }

    #[test]
    fn it_satisfies_an_exact_predicate() {
        let macaroon = bank_macaroon()
            .add_first_party_caveat("account = 3735928559")
            .unwrap();

        assert!(Verifier::default()
            .satisfy_exact("account = 3735928559")
            .is_valid(&macaroon, ROOT_KEY));
    }

    #[test]
    fn it_requires_every_caveat_to_be_satisfied() {
        let macaroon = bank_macaroon()
            .add_first_party_caveat("account = 3735928559")
            .unwrap()
            .add_first_party_caveat("credit_allowed = true")
            .unwrap();

        assert_eq!(
            Verifier::default().verify(&macaroon, ROOT_KEY),
            Err(VerificationError::UnsatisfiedCaveat(
                b"account = 3735928559".to_vec()
            ))
        );
        assert_eq!(
            Verifier::default()
                .satisfy_exact("account = 3735928559")
                .verify(&macaroon, ROOT_KEY),
            Err(VerificationError::UnsatisfiedCaveat(
                b"credit_allowed = true".to_vec()
            ))
        );
    }

    #[test]
    fn it_tolerates_satisfiers_for_caveats_that_are_absent() {
        let macaroon = bank_macaroon()
            .add_first_party_caveat("account = 3735928559")
            .unwrap();

        let verifier = Verifier::default()
            .satisfy_exact("account = 3735928559")
            .satisfy_exact("IP = 127.0.0.1")
            .satisfy_exact("browser = Chrome")
            .satisfy_exact("action = deposit");

        assert!(verifier.is_valid(&macaroon, ROOT_KEY));
    }

    #[test]
    fn it_satisfies_with_a_general_predicate() {
        let macaroon = bank_macaroon()
            .add_first_party_caveat("time < 2030-01-01T00:00:00Z")
            .unwrap();

        let verifier = Verifier::default().satisfy_general(|predicate| predicate.starts_with(b"time < "));
        assert!(verifier.is_valid(&macaroon, ROOT_KEY));

        let verifier = Verifier::default().satisfy_general(|predicate| predicate.starts_with(b"time > "));
        assert!(!verifier.is_valid(&macaroon, ROOT_KEY));
    }

    #[test]
    fn it_satisfies_with_a_caveat_check() {
        let macaroon = bank_macaroon()
            .add_first_party_caveat("action = read")
            .unwrap();

        let verifier = Verifier::default().satisfy_caveat(|caveat: &Caveat| {
            caveat
                .predicate()
                .map(|predicate| predicate == b"action = read")
                .unwrap_or(false)
        });

        assert!(verifier.is_valid(&macaroon, ROOT_KEY));
    }

    #[test]
    fn it_verifies_the_java_usage_scenario() {
        let key = SecretKey::generate();
        let macaroon = Macaroon::create("macaroon/java", "javaUsage", &key)
            .add_first_party_caveat("account = 1234")
            .unwrap()
            .add_first_party_caveat("admin = true")
            .unwrap()
            .add_first_party_caveat("actions in read,write")
            .unwrap();

        let verifier = Verifier::default()
            .satisfy_exact("account = 1234")
            .satisfy_general(|predicate| predicate == b"admin = true")
            .satisfy_general(|predicate| {
                std::str::from_utf8(predicate)
                    .ok()
                    .and_then(|predicate| predicate.strip_prefix("actions in "))
                    .map(|actions| actions.split(',').any(|action| action == "read"))
                    .unwrap_or(false)
            });
        assert!(verifier.is_valid(&macaroon, &key));

        let verifier = Verifier::default()
            .satisfy_exact("account = 1234")
            .satisfy_field("admin", true)
            .satisfy_field_contains("actions", ["read".to_owned()]);
        assert!(verifier.is_valid(&macaroon, &key));

        let verifier = Verifier::default().satisfy_caveat(Caveat::is_first_party);
        assert!(verifier.is_valid(&macaroon, &key));

        let macaroon = Macaroon::create("macaroon/java", "javaUsage", &key)
            .add_first_party_caveat("account = 1234")
            .unwrap()
            .add_first_party_caveat("admin = true")
            .unwrap()
            .add_first_party_caveat("actions contains {read, write}")
            .unwrap();

        let verifier = Verifier::default()
            .satisfy_exact("account = 1234")
            .satisfy_general(|predicate| predicate == b"admin = true")
            .satisfy_general(|predicate| {
                std::str::from_utf8(predicate)
                    .ok()
                    .and_then(|predicate| predicate.strip_prefix("actions contains {"))
                    .and_then(|actions| actions.strip_suffix('}'))
                    .map(|actions| actions.split(',').any(|action| action.trim() == "read"))
                    .unwrap_or(false)
            });
        assert_eq!(verifier.verify(&macaroon, &key), Ok(()));
    }

    #[test]
    fn it_never_lets_a_satisfier_accept_a_third_party_caveat() {
        let macaroon = bank_macaroon()
            .add_third_party_caveat("http://auth.mybank/", &SecretKey::generate(), "cid")
            .unwrap();

        let verifier = Verifier::default()
            .satisfy_general(|_| true)
            .satisfy_caveat(|_| true)
            .satisfy_exact("cid");

        assert_eq!(
            verifier.verify(&macaroon, ROOT_KEY),
            Err(VerificationError::MissingDischarge(b"cid".to_vec()))
        );
    }

    #[test]
    fn it_can_be_shared_between_threads() {
        let macaroon = bank_macaroon().add_first_party_caveat("account = 1").unwrap();
        let verifier = std::sync::Arc::new(Verifier::default().satisfy_exact("account = 1"));

        let handles = (0..4)
            .map(|_| {
                let verifier = verifier.clone();
                let macaroon = macaroon.clone();
                std::thread::spawn(move || verifier.is_valid(&macaroon, ROOT_KEY))
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}

mod tampering {
    use crate::{
        error::VerificationError,
        macaroon::Macaroon,
        tests::fixtures::{bank_macaroon, macaroon_with_discharge, ROOT_KEY},
        Caveat, Signature, Verifier,
    };

    fn rebuild(macaroon: &Macaroon, identifier: &[u8], caveats: Vec<Caveat>, signature: Signature) -> Macaroon {
        Macaroon::from_parts(
            macaroon.location().to_owned(),
            identifier.to_vec(),
            caveats,
            signature,
        )
    }

    fn verifier() -> Verifier {
        Verifier::default().satisfy_general(|_| true)
    }

    #[test]
    fn it_detects_a_removed_caveat() {
        let macaroon = bank_macaroon()
            .add_first_party_caveat("account = 1")
            .unwrap()
            .add_first_party_caveat("admin = false")
            .unwrap();

        let stripped = rebuild(
            &macaroon,
            macaroon.identifier(),
            macaroon.caveats()[..1].to_vec(),
            macaroon.signature(),
        );

        assert_eq!(
            verifier().verify(&stripped, ROOT_KEY),
            Err(VerificationError::SignatureMismatch)
        );
    }

    #[test]
    fn it_detects_reordered_caveats() {
        let macaroon = bank_macaroon()
            .add_first_party_caveat("a = 1")
            .unwrap()
            .add_first_party_caveat("b = 2")
            .unwrap();

        let mut caveats = macaroon.caveats().to_vec();
        caveats.reverse();
        let reordered = rebuild(&macaroon, macaroon.identifier(), caveats, macaroon.signature());

        assert!(!verifier().is_valid(&reordered, ROOT_KEY));
    }

    #[test]
    fn it_detects_a_changed_identifier() {
        let macaroon = bank_macaroon();
        let changed = rebuild(
            &macaroon,
            b"we used our secret kez",
            Vec::new(),
            macaroon.signature(),
        );

        assert!(!verifier().is_valid(&changed, ROOT_KEY));
    }

    #[test]
    fn it_detects_a_flipped_byte_in_a_third_party_caveat() {
        let (macaroon, discharge) = macaroon_with_discharge();
        let verifier = verifier().satisfy_discharge(discharge);
        assert_eq!(verifier.verify(&macaroon, ROOT_KEY), Ok(()));

        let flip = |flip_vid: bool| {
            let caveats = macaroon
                .caveats()
                .iter()
                .map(|caveat| match caveat {
                    Caveat::ThirdParty { location, cid, vid } => {
                        let (mut cid, mut vid) = (cid.clone(), vid.clone());
                        if flip_vid {
                            vid[5] ^= 0x01;
                        } else {
                            cid[0] ^= 0x01;
                        }
                        Caveat::third_party(location.clone(), cid, vid)
                    }
                    first_party => first_party.clone(),
                })
                .collect();

            rebuild(&macaroon, macaroon.identifier(), caveats, macaroon.signature())
        };

        assert_eq!(
            verifier.verify(&flip(true), ROOT_KEY),
            Err(VerificationError::SignatureMismatch)
        );
        assert_eq!(
            verifier.verify(&flip(false), ROOT_KEY),
            Err(VerificationError::SignatureMismatch)
        );
    }

    #[test]
    fn it_ignores_the_location() {
        let macaroon = bank_macaroon().add_first_party_caveat("a = 1").unwrap();
        let moved = Macaroon::from_parts(
            "http://elsewhere/".into(),
            macaroon.identifier().to_vec(),
            macaroon.caveats().to_vec(),
            macaroon.signature(),
        );

        assert!(verifier().is_valid(&moved, ROOT_KEY));
    }
}

mod options {
    use crate::{verifier::DEFAULT_MAX_DISCHARGE_DEPTH, DischargeBinding, Verifier, VerifierOptions};

    #[test]
    fn it_defaults_to_unbound_discharges_ten_levels_deep() {
        let options = VerifierOptions::default();

        assert_eq!(options.max_discharge_depth, DEFAULT_MAX_DISCHARGE_DEPTH);
        assert_eq!(options.max_discharge_depth, 10);
        assert_eq!(options.discharge_binding, DischargeBinding::Unbound);
    }

    #[test]
    fn it_deserializes_partial_options() {
        let options: VerifierOptions =
            serde_json::from_str(r#"{ "discharge_binding": "bound" }"#).unwrap();

        assert_eq!(
            options,
            VerifierOptions {
                max_discharge_depth: 10,
                discharge_binding: DischargeBinding::Bound,
            }
        );
    }

    #[test]
    fn it_configures_options_with_the_builder() {
        let verifier = Verifier::default()
            .with_max_discharge_depth(3)
            .requiring_bound_discharges();

        assert_eq!(verifier.options().max_discharge_depth, 3);
        assert_eq!(verifier.options().discharge_binding, DischargeBinding::Bound);

        let verifier = verifier.with_options(VerifierOptions::default());
        assert_eq!(verifier.options(), &VerifierOptions::default());
    }
}
