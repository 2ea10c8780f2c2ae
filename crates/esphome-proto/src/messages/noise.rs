//! Noise PSK rotation, requested over an already-encrypted session.

use crate::catalog;
use crate::error::Result;
use crate::wire::{
    bytes_field_size, decode_fields, write_bool_field, bool_field_size, write_bytes_field,
    FieldValue, ProtoMessage,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoiseEncryptionSetKeyRequest {
    /// Raw 32-byte pre-shared key (already base64-decoded by the caller).
    pub key: Vec<u8>,
}

impl ProtoMessage for NoiseEncryptionSetKeyRequest {
    const MESSAGE_TYPE: u16 = catalog::NOISE_ENCRYPTION_SET_KEY_REQUEST;
    const ESTIMATED_SIZE: u32 = 48;

    fn calculate_size(&self) -> usize {
        bytes_field_size(1, &self.key)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_bytes_field(1, &self.key, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            if let (1, FieldValue::LengthDelimited(b)) = (field, value) {
                msg.key = b.to_vec();
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoiseEncryptionSetKeyResponse {
    pub success: bool,
}

impl ProtoMessage for NoiseEncryptionSetKeyResponse {
    const MESSAGE_TYPE: u16 = catalog::NOISE_ENCRYPTION_SET_KEY_RESPONSE;
    const ESTIMATED_SIZE: u32 = 8;

    fn calculate_size(&self) -> usize {
        bool_field_size(1, self.success)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        write_bool_field(1, self.success, out);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let mut msg = Self::default();
        decode_fields(data, |field, value| {
            if let (1, FieldValue::Varint(v)) = (field, value) {
                msg.success = v != 0;
            }
            Ok(())
        })?;
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_key_round_trip() {
        let msg = NoiseEncryptionSetKeyRequest { key: vec![7u8; 32] };
        let mut out = Vec::new();
        msg.encode(&mut out);
        assert_eq!(out.len(), msg.calculate_size());
        assert_eq!(NoiseEncryptionSetKeyRequest::decode(&out).unwrap(), msg);
    }
}
