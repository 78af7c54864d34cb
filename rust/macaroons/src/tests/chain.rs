mod signatures {
    use crate::{
        chain::SignatureChain,
        crypto::derive_key,
        tests::fixtures::{bank_macaroon, IDENTIFIER, ROOT_KEY},
        Caveat,
    };

    #[test]
    fn it_derives_the_initial_signature_from_the_root_key() {
        let chain = SignatureChain::new(ROOT_KEY, IDENTIFIER.as_bytes());

        assert_eq!(
            chain.signature().to_hex(),
            "e3d9e02908526c4c0039ae15114115d97fdd68bf2ba379b342aaf0f617d0552f"
        );
    }

    #[test]
    fn it_chains_first_party_caveats() {
        let macaroon = bank_macaroon()
            .add_first_party_caveat("account = 3735928559")
            .unwrap();

        assert_eq!(
            macaroon.signature().to_hex(),
            "1efe4763f290dbce0c1d08477367e11f4eee456a64933cf662d79772dbb82128"
        );

        let macaroon = macaroon
            .add_first_party_caveat("time < 2015-01-01T00:00")
            .unwrap()
            .add_first_party_caveat("email = alice@example.org")
            .unwrap();

        assert_eq!(
            macaroon.signature().to_hex(),
            "882e6d59496ed5245edb7ab5b8839ecd63e5d504e54839804f164070d8eed952"
        );
    }

    #[test]
    fn it_replays_to_the_same_signature() {
        let caveats = vec![
            Caveat::first_party("account = 3735928559"),
            Caveat::third_party("http://auth.mybank/", "cid", vec![7u8; 72]),
            Caveat::first_party("email = alice@example.org"),
        ];

        let appended = caveats
            .iter()
            .fold(SignatureChain::new(ROOT_KEY, IDENTIFIER.as_bytes()), |chain, caveat| {
                chain.append(caveat)
            });
        let replay = SignatureChain::replay(&derive_key(ROOT_KEY), IDENTIFIER.as_bytes(), &caveats);

        assert_eq!(replay.signature(), appended.signature());
        assert_eq!(replay.steps().len(), 3);
    }

    #[test]
    fn it_reports_the_signature_before_each_caveat() {
        let macaroon = bank_macaroon();
        let first = macaroon.add_first_party_caveat("account = 3735928559").unwrap();
        let second = first.add_first_party_caveat("admin = true").unwrap();

        let replay = SignatureChain::replay(
            &derive_key(ROOT_KEY),
            second.identifier(),
            second.caveats(),
        );

        assert_eq!(replay.steps()[0].prior, macaroon.signature());
        assert_eq!(replay.steps()[1].prior, first.signature());
        assert_eq!(replay.steps()[1].caveat, &second.caveats()[1]);
    }

    #[test]
    fn it_does_not_confuse_third_party_fields() {
        let chain = SignatureChain::new(ROOT_KEY, IDENTIFIER.as_bytes());

        assert_ne!(
            chain.append_third_party(b"ab", b"c").signature(),
            chain.append_third_party(b"a", b"bc").signature()
        );
        assert_ne!(
            chain.append_third_party(b"x", b"y").signature(),
            chain.append_third_party(b"y", b"x").signature()
        );
    }

    #[test]
    fn it_leaves_the_receiver_untouched_when_appending() {
        let chain = SignatureChain::new(ROOT_KEY, IDENTIFIER.as_bytes());
        let before = chain.signature();
        let _ = chain.append_first_party(b"account = 1");

        assert_eq!(chain.signature(), before);
    }
}

mod keys {
    use crate::crypto::{derive_key, generate_secret_key, KeyError, SecretKey};

    #[test]
    fn it_derives_keys_deterministically() {
        assert_eq!(derive_key(b"root"), derive_key(b"root"));
        assert_ne!(derive_key(b"root"), derive_key(b"Root"));
        assert_ne!(derive_key(b""), derive_key(&[0u8]));
    }

    #[test]
    fn it_generates_distinct_keys() {
        assert_ne!(generate_secret_key(), generate_secret_key());
    }

    #[test]
    fn it_never_prints_key_material() {
        let key = SecretKey::from_bytes([0xab; 32]);
        assert_eq!(format!("{key:?}"), "SecretKey(..)");
    }

    #[test]
    fn it_only_accepts_slices_of_the_right_length() {
        assert!(SecretKey::try_from(&[1u8; 32][..]).is_ok());
        assert_eq!(
            SecretKey::try_from(&[1u8; 31][..]),
            Err(KeyError::InvalidLength(31))
        );
    }
}
