use crate::{
    caveat::Caveat,
    crypto::Signature,
    error::DecodeError,
    macaroon::Macaroon,
};

/// The only serialization version this crate reads and writes
pub const VERSION: u8 = 2;

/// Field types of the V2 binary format
pub mod field_type {
    pub const EOS: u64 = 0;
    pub const LOCATION: u64 = 1;
    pub const IDENTIFIER: u64 = 2;
    pub const VID: u64 = 4;
    pub const SIGNATURE: u64 = 6;
}

/// Encode a macaroon in the V2 binary format:
///
/// ```text
/// version [location] identifier EOS { [location] identifier [vid] EOS }* EOS signature
/// ```
///
/// Every field is written as `varint(type) varint(length) bytes`; empty
/// locations are left out.
pub fn serialize(macaroon: &Macaroon) -> Vec<u8> {
    let mut encoder = Encoder::default();

    encoder.version();
    encoder.optional_field(field_type::LOCATION, macaroon.location().as_bytes());
    encoder.field(field_type::IDENTIFIER, macaroon.identifier());
    encoder.end_of_section();

    for caveat in macaroon.caveats() {
        match caveat {
            Caveat::FirstParty { predicate } => {
                encoder.field(field_type::IDENTIFIER, predicate);
            }
            Caveat::ThirdParty { location, cid, vid } => {
                encoder.optional_field(field_type::LOCATION, location.as_bytes());
                encoder.field(field_type::IDENTIFIER, cid);
                encoder.field(field_type::VID, vid);
            }
        }
        encoder.end_of_section();
    }

    encoder.end_of_section();
    encoder.field(field_type::SIGNATURE, macaroon.signature().as_bytes());

    encoder.into_bytes()
}

/// Decode a macaroon from the V2 binary format, rejecting anything that
/// [serialize] would not have produced
pub fn deserialize(bytes: &[u8]) -> Result<Macaroon, DecodeError> {
    let mut decoder = Decoder::new(bytes);

    decoder.version()?;

    let location = decoder.optional_field(field_type::LOCATION)?;
    let location = String::from_utf8(location.unwrap_or_default().to_vec())?;
    let identifier = decoder.field(field_type::IDENTIFIER, "identifier")?.to_vec();
    decoder.end_of_section()?;

    let mut caveats = Vec::new();
    while decoder.peek_type()? != field_type::EOS {
        caveats.push(decoder.caveat()?);
    }
    decoder.end_of_section()?;

    let signature = decoder.field(field_type::SIGNATURE, "signature")?;
    let signature = Signature::from_slice(signature)
        .ok_or(DecodeError::InvalidSignatureLength(signature.len()))?;

    decoder.finish()?;

    Ok(Macaroon::from_parts(location, identifier, caveats, signature))
}

#[derive(Default)]
struct Encoder {
    bytes: Vec<u8>,
}

impl Encoder {
    fn version(&mut self) {
        self.bytes.push(VERSION);
    }

    fn varint(&mut self, value: u64) {
        let mut buffer = unsigned_varint::encode::u64_buffer();
        self.bytes
            .extend_from_slice(unsigned_varint::encode::u64(value, &mut buffer));
    }

    fn field(&mut self, field_type: u64, data: &[u8]) {
        self.varint(field_type);
        self.varint(data.len() as u64);
        self.bytes.extend_from_slice(data);
    }

    fn optional_field(&mut self, field_type: u64, data: &[u8]) {
        if !data.is_empty() {
            self.field(field_type, data);
        }
    }

    fn end_of_section(&mut self) {
        self.varint(field_type::EOS);
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

struct Decoder<'a> {
    remaining: &'a [u8],
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Decoder { remaining: bytes }
    }

    fn version(&mut self) -> Result<(), DecodeError> {
        let (version, rest) = self
            .remaining
            .split_first()
            .ok_or(DecodeError::UnexpectedEnd)?;

        if *version != VERSION {
            return Err(DecodeError::UnsupportedVersion(*version as u64));
        }

        self.remaining = rest;
        Ok(())
    }

    fn varint(&mut self) -> Result<u64, DecodeError> {
        let (value, rest) = decode_varint(self.remaining)?;
        self.remaining = rest;
        Ok(value)
    }

    fn peek_type(&self) -> Result<u64, DecodeError> {
        Ok(decode_varint(self.remaining)?.0)
    }

    fn take(&mut self, length: u64) -> Result<&'a [u8], DecodeError> {
        let length = usize::try_from(length).map_err(|_| DecodeError::UnexpectedEnd)?;
        if length > self.remaining.len() {
            return Err(DecodeError::UnexpectedEnd);
        }

        let (data, rest) = self.remaining.split_at(length);
        self.remaining = rest;
        Ok(data)
    }

    /// Read a field that must be present and of the given type
    fn field(&mut self, expected: u64, name: &'static str) -> Result<&'a [u8], DecodeError> {
        match self.peek_type()? {
            field_type::EOS => Err(DecodeError::MissingField(name)),
            found if found != expected => Err(DecodeError::UnexpectedField(found)),
            _ => {
                self.varint()?;
                let length = self.varint()?;
                self.take(length)
            }
        }
    }

    /// Read a field of the given type if it is the next one
    fn optional_field(&mut self, expected: u64) -> Result<Option<&'a [u8]>, DecodeError> {
        if self.peek_type()? != expected {
            return Ok(None);
        }

        self.varint()?;
        let length = self.varint()?;
        Ok(Some(self.take(length)?))
    }

    fn end_of_section(&mut self) -> Result<(), DecodeError> {
        match self.varint()? {
            field_type::EOS => Ok(()),
            found => Err(DecodeError::UnexpectedField(found)),
        }
    }

    fn caveat(&mut self) -> Result<Caveat, DecodeError> {
        let location = self.optional_field(field_type::LOCATION)?;
        let identifier = self.field(field_type::IDENTIFIER, "caveat identifier")?.to_vec();
        let vid = self.optional_field(field_type::VID)?;
        self.end_of_section()?;

        let caveat = match (location, vid) {
            (None, None) => Caveat::FirstParty {
                predicate: identifier,
            },
            // Only third-party caveats carry a location
            (Some(_), None) => return Err(DecodeError::MissingField("vid")),
            (location, Some(vid)) => Caveat::ThirdParty {
                location: String::from_utf8(location.unwrap_or_default().to_vec())?,
                cid: identifier,
                vid: vid.to_vec(),
            },
        };

        Ok(caveat)
    }

    fn finish(self) -> Result<(), DecodeError> {
        match self.remaining.len() {
            0 => Ok(()),
            trailing => Err(DecodeError::TrailingBytes(trailing)),
        }
    }
}

fn decode_varint(bytes: &[u8]) -> Result<(u64, &[u8]), DecodeError> {
    unsigned_varint::decode::u64(bytes).map_err(|error| match error {
        unsigned_varint::decode::Error::Insufficient => DecodeError::UnexpectedEnd,
        _ => DecodeError::InvalidVarint,
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_varint, deserialize, serialize, VERSION};
    use crate::{error::DecodeError, Macaroon};

    #[test]
    fn it_lays_out_the_fields_in_order() {
        let macaroon = Macaroon::create("l", "i", b"key")
            .add_first_party_caveat("p")
            .unwrap();
        let bytes = serialize(&macaroon);

        let mut expected = vec![VERSION, 1, 1, b'l', 2, 1, b'i', 0, 2, 1, b'p', 0, 0, 6, 32];
        expected.extend_from_slice(macaroon.signature().as_bytes());

        assert_eq!(bytes, expected);
    }

    #[test]
    fn it_omits_an_empty_location() {
        let macaroon = Macaroon::create("", "i", b"key");
        let bytes = serialize(&macaroon);

        assert_eq!(&bytes[..6], &[VERSION, 2, 1, b'i', 0, 0]);
        assert_eq!(deserialize(&bytes).unwrap(), macaroon);
    }

    #[test]
    fn it_reports_truncated_varints() {
        assert!(matches!(
            decode_varint(&[0x80]),
            Err(DecodeError::UnexpectedEnd)
        ));
        assert!(matches!(decode_varint(&[]), Err(DecodeError::UnexpectedEnd)));
        assert_eq!(decode_varint(&[0xac, 0x02, 0x07]).unwrap(), (300, &[0x07u8][..]));
    }

    #[test]
    fn it_rejects_a_located_caveat_without_a_vid() {
        let mut bytes = vec![VERSION, 2, 1, b'i', 0];
        bytes.extend_from_slice(&[1, 1, b'l', 2, 1, b'p', 0, 0, 6, 32]);
        bytes.extend_from_slice(&[0u8; 32]);

        assert!(matches!(
            deserialize(&bytes),
            Err(DecodeError::MissingField("vid"))
        ));
    }
}
