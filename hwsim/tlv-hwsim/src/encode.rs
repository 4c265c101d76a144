//! Attribute table to window.
//!
//! Encoding runs in two passes. The first walks the table against the policy, rejects anything
//! the decoder would not accept back and sums the record sizes. The second writes through a
//! [`WindowWriter`] only once the total is known to fit, so a failed call never leaves a partial
//! window behind.

use alloc::{vec, vec::Vec};

#[cfg(feature = "tracing")]
use tracing::debug;
use window_hwsim::WindowWriter;

use crate::{
    record::padded_record_len, AttrValue, AttributeKind, AttributePolicy, AttributeTable,
    AttributeType, EncodeError, PolicyTable, MAX_NESTING_DEPTH, TLV_ALIGNTO,
};

/// Number of bytes `attrs` occupies once encoded, after validating it against `policy`.
pub fn encoded_len(
    attrs: &AttributeTable<'_>,
    policy: &PolicyTable<'_>,
) -> Result<usize, EncodeError> {
    table_len(attrs, policy, 0)
}

/// Encodes `attrs` into a new buffer no larger than `capacity`.
///
/// The returned buffer is exactly as long as the encoded table.
pub fn encode(
    attrs: &AttributeTable<'_>,
    policy: &PolicyTable<'_>,
    capacity: usize,
) -> Result<Vec<u8>, EncodeError> {
    let required = encoded_len(attrs, policy)?;
    check_capacity(required, capacity)?;
    let mut buf = vec![0u8; required];
    let written = write_all(attrs, policy, &mut buf)?;
    buf.truncate(written);
    Ok(buf)
}

/// Encodes `attrs` at the start of `dst` and returns the number of bytes written.
///
/// `dst.len()` is the capacity. On error `dst` is left untouched.
pub fn encode_into(
    attrs: &AttributeTable<'_>,
    policy: &PolicyTable<'_>,
    dst: &mut [u8],
) -> Result<usize, EncodeError> {
    let required = encoded_len(attrs, policy)?;
    check_capacity(required, dst.len())?;
    write_all(attrs, policy, dst)
}

fn check_capacity(required: usize, capacity: usize) -> Result<(), EncodeError> {
    if required > capacity {
        #[cfg(feature = "tracing")]
        debug!(
            "encoded table needs {} bytes, window holds {}",
            required, capacity
        );
        return Err(EncodeError::CapacityExceeded { required, capacity });
    }
    Ok(())
}

fn write_all(
    attrs: &AttributeTable<'_>,
    policy: &PolicyTable<'_>,
    dst: &mut [u8],
) -> Result<usize, EncodeError> {
    let mut writer = WindowWriter::new(dst);
    write_table(&mut writer, attrs, policy, 0)?;
    Ok(writer.position())
}

fn table_len(
    attrs: &AttributeTable<'_>,
    policy: &PolicyTable<'_>,
    depth: usize,
) -> Result<usize, EncodeError> {
    if let Some(missing) = policy.required_types().find(|t| !attrs.contains(*t)) {
        return Err(EncodeError::MissingAttribute(missing));
    }

    let mut total = 0usize;
    for (attr_type, value) in attrs.iter() {
        let entry = policy
            .lookup(attr_type)
            .ok_or(EncodeError::UnknownType(attr_type))?;
        for item in occurrences(attr_type, entry, value)? {
            let len = payload_len(attr_type, entry, item, depth)?;
            total = total.saturating_add(padded_record_len(len));
        }
    }
    Ok(total)
}

/// The values to emit as separate records: each list element for a repeatable attribute, the
/// value itself otherwise.
fn occurrences<'a, 'w>(
    attr_type: AttributeType,
    entry: &AttributePolicy<'_>,
    value: &'a AttrValue<'w>,
) -> Result<&'a [AttrValue<'w>], EncodeError> {
    match (entry.repeatable, value) {
        (true, AttrValue::List(items)) if items.is_empty() => {
            Err(EncodeError::InvalidValue(attr_type))
        }
        (true, AttrValue::List(items)) => Ok(items.as_slice()),
        (true, _) | (false, AttrValue::List(_)) => Err(EncodeError::KindMismatch(attr_type)),
        (false, value) => Ok(core::slice::from_ref(value)),
    }
}

fn payload_len(
    attr_type: AttributeType,
    entry: &AttributePolicy<'_>,
    value: &AttrValue<'_>,
    depth: usize,
) -> Result<usize, EncodeError> {
    let len = match (entry.kind, value) {
        (AttributeKind::Flag, AttrValue::Flag) => 0,
        (AttributeKind::U8, AttrValue::U8(_)) | (AttributeKind::S8, AttrValue::S8(_)) => 1,
        (AttributeKind::U16, AttrValue::U16(_)) | (AttributeKind::S16, AttrValue::S16(_)) => 2,
        (AttributeKind::U32, AttrValue::U32(_)) | (AttributeKind::S32, AttrValue::S32(_)) => 4,
        (AttributeKind::U64, AttrValue::U64(_)) | (AttributeKind::S64, AttrValue::S64(_)) => 8,
        (AttributeKind::Unsigned, AttrValue::Unsigned(v)) => {
            if *v <= u32::MAX as u64 && entry.min_length <= 4 {
                4
            } else {
                8
            }
        }
        (AttributeKind::Signed, AttrValue::Signed(v)) => {
            if i32::try_from(*v).is_ok() && entry.min_length <= 4 {
                4
            } else {
                8
            }
        }
        (AttributeKind::String, AttrValue::Str(s)) => {
            if s.contains('\0') {
                return Err(EncodeError::InvalidValue(attr_type));
            }
            s.len()
        }
        (AttributeKind::NulString, AttrValue::Str(s)) => {
            if s.contains('\0') {
                return Err(EncodeError::InvalidValue(attr_type));
            }
            s.len() + 1
        }
        (AttributeKind::Binary, AttrValue::Bytes(b)) => b.len(),
        (AttributeKind::Nested(inner), AttrValue::Nested(table)) => {
            let depth = depth + 1;
            if depth > MAX_NESTING_DEPTH {
                return Err(EncodeError::NestingTooDeep);
            }
            table_len(table, inner, depth)?
        }
        _ => return Err(EncodeError::KindMismatch(attr_type)),
    };

    if !entry.accepts_length(len) {
        return Err(EncodeError::LengthPolicyViolation(attr_type));
    }
    Ok(len)
}

fn write_table(
    writer: &mut WindowWriter<'_>,
    attrs: &AttributeTable<'_>,
    policy: &PolicyTable<'_>,
    depth: usize,
) -> Result<(), EncodeError> {
    for (attr_type, value) in attrs.iter() {
        let entry = policy
            .lookup(attr_type)
            .ok_or(EncodeError::UnknownType(attr_type))?;
        for item in occurrences(attr_type, entry, value)? {
            write_record(writer, attr_type, entry, item, depth)?;
        }
    }
    Ok(())
}

fn write_record(
    writer: &mut WindowWriter<'_>,
    attr_type: AttributeType,
    entry: &AttributePolicy<'_>,
    value: &AttrValue<'_>,
    depth: usize,
) -> Result<(), EncodeError> {
    let len = payload_len(attr_type, entry, value, depth)?;
    let len_field = u16::try_from(len).map_err(|_| EncodeError::InvalidValue(attr_type))?;

    writer.write_u16_le(attr_type)?;
    writer.write_u16_le(len_field)?;

    match value {
        AttrValue::Flag => {}
        AttrValue::U8(v) => writer.write_u8(*v)?,
        AttrValue::U16(v) => writer.write_u16_le(*v)?,
        AttrValue::U32(v) => writer.write_u32_le(*v)?,
        AttrValue::U64(v) => writer.write_all(&v.to_le_bytes())?,
        AttrValue::S8(v) => writer.write_all(&v.to_le_bytes())?,
        AttrValue::S16(v) => writer.write_all(&v.to_le_bytes())?,
        AttrValue::S32(v) => writer.write_all(&v.to_le_bytes())?,
        AttrValue::S64(v) => writer.write_all(&v.to_le_bytes())?,
        AttrValue::Unsigned(v) if len == 4 => writer.write_u32_le(*v as u32)?,
        AttrValue::Unsigned(v) => writer.write_all(&v.to_le_bytes())?,
        AttrValue::Signed(v) if len == 4 => writer.write_all(&(*v as i32).to_le_bytes())?,
        AttrValue::Signed(v) => writer.write_all(&v.to_le_bytes())?,
        AttrValue::Str(s) => {
            writer.write_all(s.as_bytes())?;
            if matches!(entry.kind, AttributeKind::NulString) {
                writer.write_u8(0)?;
            }
        }
        AttrValue::Bytes(b) => writer.write_all(b)?,
        AttrValue::Nested(table) => {
            if let AttributeKind::Nested(inner) = entry.kind {
                write_table(writer, table, inner, depth + 1)?;
            }
        }
        AttrValue::List(_) => return Err(EncodeError::KindMismatch(attr_type)),
    }

    writer.pad_to_alignment(TLV_ALIGNTO)?;
    Ok(())
}
