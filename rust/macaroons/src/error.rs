use thiserror::Error;

/// The reasons a macaroon may be rejected by a [crate::verifier::Verifier]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The recomputed chain differs from the stored signature: the macaroon
    /// was tampered with, corrupted, or is being checked with the wrong key
    #[error("Signature does not match the caveat chain")]
    SignatureMismatch,

    /// A first-party caveat was not accepted by any registered satisfier
    #[error("No satisfier accepted caveat {:?}", String::from_utf8_lossy(.0))]
    UnsatisfiedCaveat(Vec<u8>),

    /// No discharge macaroon was supplied for a third-party caveat
    #[error("No discharge supplied for third-party caveat {:?}", String::from_utf8_lossy(.0))]
    MissingDischarge(Vec<u8>),

    /// Discharges referred to further discharges more deeply than allowed
    #[error("Discharge macaroons are nested more than {0} levels deep")]
    DischargeChainTooDeep(usize),

    /// The discharge supplied for a caveat carries a different identifier
    #[error("Discharge identifier does not match third-party caveat {:?}", String::from_utf8_lossy(.0))]
    DischargeIdentifierMismatch(Vec<u8>),

    /// The verification key of a third-party caveat could not be recovered
    #[error("Could not recover the verification key of third-party caveat {:?}", String::from_utf8_lossy(.0))]
    UndecryptableCaveat(Vec<u8>),
}

/// Failures while extending a macaroon with a new caveat
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacaroonError {
    #[error("Caveat is {size} bytes, but caveats must be smaller than {limit} bytes")]
    CaveatTooLarge { size: usize, limit: usize },

    #[error("A macaroon may hold at most {0} caveats")]
    TooManyCaveats(usize),

    #[error("Could not encrypt the verification key of a third-party caveat")]
    Encryption,
}

/// Failures while decoding a serialized macaroon
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unsupported serialization version {0}")]
    UnsupportedVersion(u64),

    #[error("Serialized macaroon ended unexpectedly")]
    UnexpectedEnd,

    #[error("Unexpected field of type {0}")]
    UnexpectedField(u64),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Signature must be 32 bytes, but got {0} bytes")]
    InvalidSignatureLength(usize),

    #[error("Malformed length or field type")]
    InvalidVarint,

    #[error("Found {0} unexpected bytes after the signature")]
    TrailingBytes(usize),

    #[error("Location is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
