//! Field-level wire format: tags, wire types, and the `ProtoMessage` contract
//! every concrete message in [`crate::messages`] implements.

use crate::error::{ProtoError, Result};
use crate::varint::{read_varint, varint_size, write_varint};

/// protobuf wire types used by the native API message set. Group
/// start/end (3/4) never appear in ESPHome's proto3 schemas and are not
/// modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    fn from_tag_bits(bits: u8) -> Result<Self> {
        match bits {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            other => Err(ProtoError::UnsupportedWireType(other)),
        }
    }
}

/// A decoded field: its number and its raw value, already wire-type-decoded
/// into one of the four possible shapes.
pub enum FieldValue<'a> {
    Varint(u64),
    Fixed64(u64),
    LengthDelimited(&'a [u8]),
    Fixed32(u32),
}

/// A message type in the native API's codec. `MESSAGE_TYPE` and
/// `ESTIMATED_SIZE` are compile-time facts about the schema; `calculate_size`
/// and `encode` must agree exactly (encode emits precisely
/// `calculate_size()` bytes), which the batch buffer pre-reservation in
/// `esphome-core` depends on.
pub trait ProtoMessage: Sized {
    /// The message's id in the shared message catalog (see [`crate::catalog`]).
    const MESSAGE_TYPE: u16;

    /// A schema-derived size hint used only to pre-size growable buffers;
    /// it need not equal the runtime-computed size.
    const ESTIMATED_SIZE: u32;

    /// Exact encoded length of `self`, in bytes, not including the frame
    /// header or the leading message-type/length fields the frame helper
    /// adds.
    fn calculate_size(&self) -> usize;

    /// Appends the exact encoding of `self` to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Decodes a message body (no frame header, no type/length prefix).
    /// Unknown field numbers are silently skipped per the wire type's
    /// self-describing length, matching the original implementation's
    /// tolerant decoding.
    fn decode(data: &[u8]) -> Result<Self>;
}

/// Drives the generic decode loop over a message body, calling `visit` for
/// every known or unknown field. `visit` returns `Ok(true)` if it consumed
/// the field, `Ok(false)` if the field was not recognized (in which case
/// the loop has already skipped it and simply continues).
pub fn decode_fields<'a>(
    mut data: &'a [u8],
    mut visit: impl FnMut(u32, FieldValue<'a>) -> Result<()>,
) -> Result<()> {
    while !data.is_empty() {
        let (tag, tag_len) = read_varint(data)?;
        data = &data[tag_len..];
        let field_number = (tag >> 3) as u32;
        let wire_type = WireType::from_tag_bits((tag & 0x7) as u8)?;
        match wire_type {
            WireType::Varint => {
                let (value, len) = read_varint(data)?;
                data = &data[len..];
                visit(field_number, FieldValue::Varint(value))?;
            }
            WireType::Fixed64 => {
                if data.len() < 8 {
                    return Err(ProtoError::TruncatedFixed);
                }
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(&data[..8]);
                data = &data[8..];
                visit(field_number, FieldValue::Fixed64(u64::from_le_bytes(bytes)))?;
            }
            WireType::LengthDelimited => {
                let (len, len_len) = read_varint(data)?;
                data = &data[len_len..];
                let len = len as usize;
                if data.len() < len {
                    return Err(ProtoError::TruncatedField {
                        expected: len,
                        actual: data.len(),
                    });
                }
                let (field_bytes, rest) = data.split_at(len);
                data = rest;
                visit(field_number, FieldValue::LengthDelimited(field_bytes))?;
            }
            WireType::Fixed32 => {
                if data.len() < 4 {
                    return Err(ProtoError::TruncatedFixed);
                }
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(&data[..4]);
                data = &data[4..];
                visit(field_number, FieldValue::Fixed32(u32::from_le_bytes(bytes)))?;
            }
        }
    }
    Ok(())
}

fn write_tag(field_number: u32, wire_type: WireType, out: &mut Vec<u8>) {
    write_varint((u64::from(field_number) << 3) | wire_type as u64, out);
}

fn tag_size(field_number: u32) -> usize {
    varint_size((u64::from(field_number)) << 3)
}

/// Decodes a `LengthDelimited` field as a UTF-8 string, failing if the
/// bytes are not valid UTF-8.
pub fn as_string(field: u32, bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| ProtoError::InvalidUtf8 { field })
}

pub fn write_varint_field(field_number: u32, value: u64, out: &mut Vec<u8>) {
    if value == 0 {
        return;
    }
    write_tag(field_number, WireType::Varint, out);
    write_varint(value, out);
}

pub fn varint_field_size(field_number: u32, value: u64) -> usize {
    if value == 0 {
        return 0;
    }
    tag_size(field_number) + varint_size(value)
}

pub fn write_bool_field(field_number: u32, value: bool, out: &mut Vec<u8>) {
    if value {
        write_varint_field(field_number, 1, out);
    }
}

pub fn bool_field_size(field_number: u32, value: bool) -> usize {
    if value {
        varint_field_size(field_number, 1)
    } else {
        0
    }
}

pub fn write_sint32_field(field_number: u32, value: i32, out: &mut Vec<u8>) {
    write_varint_field(field_number, crate::varint::zigzag_encode(value as i64), out);
}

pub fn sint32_field_size(field_number: u32, value: i32) -> usize {
    varint_field_size(field_number, crate::varint::zigzag_encode(value as i64))
}

/// Writes a (possibly negative) `int32`/`enum` field using protobuf's
/// sign-extended-to-64-bit varint rule.
pub fn write_int32_field(field_number: u32, value: i32, out: &mut Vec<u8>) {
    write_varint_field(
        field_number,
        crate::varint::int32_to_varint_value(value),
        out,
    )
}

pub fn int32_field_size(field_number: u32, value: i32) -> usize {
    varint_field_size(field_number, crate::varint::int32_to_varint_value(value))
}

pub fn write_fixed32_field(field_number: u32, value: u32, out: &mut Vec<u8>) {
    if value == 0 {
        return;
    }
    write_tag(field_number, WireType::Fixed32, out);
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn fixed32_field_size(field_number: u32, value: u32) -> usize {
    if value == 0 {
        0
    } else {
        tag_size(field_number) + 4
    }
}

pub fn write_float_field(field_number: u32, value: f32, out: &mut Vec<u8>) {
    if value == 0.0 {
        return;
    }
    write_tag(field_number, WireType::Fixed32, out);
    out.extend_from_slice(&value.to_le_bytes());
}

pub fn float_field_size(field_number: u32, value: f32) -> usize {
    if value == 0.0 {
        0
    } else {
        tag_size(field_number) + 4
    }
}

pub fn write_string_field(field_number: u32, value: &str, out: &mut Vec<u8>) {
    if value.is_empty() {
        return;
    }
    write_tag(field_number, WireType::LengthDelimited, out);
    write_varint(value.len() as u64, out);
    out.extend_from_slice(value.as_bytes());
}

pub fn string_field_size(field_number: u32, value: &str) -> usize {
    if value.is_empty() {
        0
    } else {
        tag_size(field_number) + varint_size(value.len() as u64) + value.len()
    }
}

pub fn write_bytes_field(field_number: u32, value: &[u8], out: &mut Vec<u8>) {
    if value.is_empty() {
        return;
    }
    write_tag(field_number, WireType::LengthDelimited, out);
    write_varint(value.len() as u64, out);
    out.extend_from_slice(value);
}

pub fn bytes_field_size(field_number: u32, value: &[u8]) -> usize {
    if value.is_empty() {
        0
    } else {
        tag_size(field_number) + varint_size(value.len() as u64) + value.len()
    }
}

/// Writes a nested-message field (length-delimited submessage), always
/// emitted even when the submessage encodes to zero bytes — ESPHome relies
/// on presence of the tag to distinguish "absent" from "default".
pub fn write_message_field<M: ProtoMessage>(field_number: u32, msg: &M, out: &mut Vec<u8>) {
    write_tag(field_number, WireType::LengthDelimited, out);
    write_varint(msg.calculate_size() as u64, out);
    msg.encode(out);
}

pub fn message_field_size<M: ProtoMessage>(field_number: u32, msg: &M) -> usize {
    let inner = msg.calculate_size();
    tag_size(field_number) + varint_size(inner as u64) + inner
}
