//! Window to attribute table.
//!
//! The decoder walks the window record by record through a [`WindowReader`], so every access is
//! bounds-checked, and builds the table only from records that pass their policy. The first error
//! aborts the walk and the partially built table is dropped.

use alloc::borrow::Cow;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};
use window_hwsim::WindowReader;

use crate::{
    AttrValue, AttributeKind, AttributePolicy, AttributeTable, AttributeType, DecodeError,
    PolicyTable, RawRecord, ValidationMode, MAX_NESTING_DEPTH,
};

/// Decodes every record in `window` against `policy`.
///
/// Returns the complete table, or the first error encountered. Structural errors, length policy
/// violations, invalid payloads and missing required attributes are fatal in both modes; unknown
/// types and duplicates are fatal only in [`ValidationMode::Strict`].
pub fn decode<'w>(
    window: &'w [u8],
    policy: &PolicyTable<'_>,
    mode: ValidationMode,
) -> Result<AttributeTable<'w>, DecodeError> {
    decode_table(window, policy, mode, 0).map_err(|e| {
        #[cfg(feature = "tracing")]
        debug!("rejected {} byte window ({:?}): {}", window.len(), mode, e);
        e
    })
}

fn decode_table<'w>(
    window: &'w [u8],
    policy: &PolicyTable<'_>,
    mode: ValidationMode,
    depth: usize,
) -> Result<AttributeTable<'w>, DecodeError> {
    let mut reader = WindowReader::new(window);
    let mut table = AttributeTable::new();

    while !reader.is_exhausted() {
        let record = RawRecord::read(&mut reader)?;
        let attr_type = record.attr_type;

        let Some(entry) = policy.lookup(attr_type) else {
            match mode {
                ValidationMode::Strict => return Err(DecodeError::UnknownType(attr_type)),
                ValidationMode::Liberal => {
                    #[cfg(feature = "tracing")]
                    trace!("skipping unknown attribute {}", record);
                    continue;
                }
            }
        };

        if !entry.accepts_length(record.payload.len()) {
            return Err(DecodeError::LengthPolicyViolation(attr_type));
        }

        let value = decode_payload(attr_type, entry, record.payload, mode, depth)?;

        if entry.repeatable {
            table.append(attr_type, value);
        } else if table.contains(attr_type) {
            match mode {
                ValidationMode::Strict => return Err(DecodeError::DuplicateAttribute(attr_type)),
                ValidationMode::Liberal => {
                    #[cfg(feature = "tracing")]
                    debug!("attribute {} repeated, keeping the later value", attr_type);
                    table.insert(attr_type, value);
                }
            }
        } else {
            table.insert(attr_type, value);
        }
    }

    if let Some(missing) = policy.required_types().find(|t| !table.contains(*t)) {
        return Err(DecodeError::MissingAttribute(missing));
    }

    Ok(table)
}

fn decode_payload<'w>(
    attr_type: AttributeType,
    entry: &AttributePolicy<'_>,
    payload: &'w [u8],
    mode: ValidationMode,
    depth: usize,
) -> Result<AttrValue<'w>, DecodeError> {
    let invalid = || DecodeError::InvalidPayload(attr_type);

    let value = match entry.kind {
        AttributeKind::Flag => AttrValue::Flag,
        AttributeKind::U8 => AttrValue::U8(u8::from_le_bytes(fixed(payload).ok_or_else(invalid)?)),
        AttributeKind::U16 => {
            AttrValue::U16(u16::from_le_bytes(fixed(payload).ok_or_else(invalid)?))
        }
        AttributeKind::U32 => {
            AttrValue::U32(u32::from_le_bytes(fixed(payload).ok_or_else(invalid)?))
        }
        AttributeKind::U64 => {
            AttrValue::U64(u64::from_le_bytes(fixed(payload).ok_or_else(invalid)?))
        }
        AttributeKind::S8 => AttrValue::S8(i8::from_le_bytes(fixed(payload).ok_or_else(invalid)?)),
        AttributeKind::S16 => {
            AttrValue::S16(i16::from_le_bytes(fixed(payload).ok_or_else(invalid)?))
        }
        AttributeKind::S32 => {
            AttrValue::S32(i32::from_le_bytes(fixed(payload).ok_or_else(invalid)?))
        }
        AttributeKind::S64 => {
            AttrValue::S64(i64::from_le_bytes(fixed(payload).ok_or_else(invalid)?))
        }
        AttributeKind::Unsigned => match payload.len() {
            4 => {
                AttrValue::Unsigned(u32::from_le_bytes(fixed(payload).ok_or_else(invalid)?) as u64)
            }
            8 => AttrValue::Unsigned(u64::from_le_bytes(fixed(payload).ok_or_else(invalid)?)),
            _ => return Err(invalid()),
        },
        AttributeKind::Signed => match payload.len() {
            4 => {
                AttrValue::Signed(i32::from_le_bytes(fixed(payload).ok_or_else(invalid)?) as i64)
            }
            8 => AttrValue::Signed(i64::from_le_bytes(fixed(payload).ok_or_else(invalid)?)),
            _ => return Err(invalid()),
        },
        AttributeKind::String => {
            let text = payload.strip_suffix(&[0]).unwrap_or(payload);
            AttrValue::Str(Cow::Borrowed(utf8_without_nul(text).ok_or_else(invalid)?))
        }
        AttributeKind::NulString => {
            let text = payload.strip_suffix(&[0]).ok_or_else(invalid)?;
            AttrValue::Str(Cow::Borrowed(utf8_without_nul(text).ok_or_else(invalid)?))
        }
        AttributeKind::Binary => AttrValue::Bytes(Cow::Borrowed(payload)),
        AttributeKind::Nested(inner) => {
            let depth = depth + 1;
            if depth > MAX_NESTING_DEPTH {
                return Err(DecodeError::NestingTooDeep);
            }
            AttrValue::Nested(decode_table(payload, inner, mode, depth)?)
        }
    };
    Ok(value)
}

#[inline]
fn fixed<const N: usize>(payload: &[u8]) -> Option<[u8; N]> {
    payload.try_into().ok()
}

fn utf8_without_nul(bytes: &[u8]) -> Option<&str> {
    if bytes.contains(&0) {
        return None;
    }
    core::str::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{vec, vec::Vec};

    static INNER: [Option<AttributePolicy<'static>>; 2] =
        [None, Some(AttributePolicy::new(AttributeKind::U16))];
    static INNER_POLICY: PolicyTable<'static> = PolicyTable::new(&INNER);

    static ENTRIES: [Option<AttributePolicy<'static>>; 9] = [
        None,
        Some(AttributePolicy::new(AttributeKind::U32)),
        Some(AttributePolicy::new(AttributeKind::Flag)),
        Some(AttributePolicy::new(AttributeKind::String).max_len(8)),
        Some(AttributePolicy::new(AttributeKind::NulString)),
        Some(AttributePolicy::new(AttributeKind::Binary).exact_len(6)),
        Some(AttributePolicy::new(AttributeKind::U8).repeatable()),
        Some(AttributePolicy::nested(&INNER_POLICY)),
        Some(AttributePolicy::new(AttributeKind::Signed)),
    ];
    static POLICY: PolicyTable<'static> = PolicyTable::new(&ENTRIES);

    static REQUIRED_ENTRIES: [Option<AttributePolicy<'static>>; 3] = [
        None,
        Some(AttributePolicy::new(AttributeKind::U8)),
        Some(AttributePolicy::new(AttributeKind::U8).required()),
    ];
    static REQUIRED_POLICY: PolicyTable<'static> = PolicyTable::new(&REQUIRED_ENTRIES);

    // Type 1 nests itself.
    static RECURSIVE_ENTRIES: [Option<AttributePolicy<'static>>; 2] =
        [None, Some(AttributePolicy::nested(&RECURSIVE_POLICY))];
    static RECURSIVE_POLICY: PolicyTable<'static> = PolicyTable::new(&RECURSIVE_ENTRIES);

    fn record(attr_type: u16, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&attr_type.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        out.extend_from_slice(payload);
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }

    fn both_modes(window: &[u8]) -> [Result<AttributeTable<'_>, DecodeError>; 2] {
        [
            decode(window, &POLICY, ValidationMode::Strict),
            decode(window, &POLICY, ValidationMode::Liberal),
        ]
    }

    #[test]
    fn test_decode_u32() {
        let window = [0x01, 0x00, 0x04, 0x00, 0x2a, 0x00, 0x00, 0x00];
        for result in both_modes(&window) {
            let table = result.unwrap();
            assert_eq!(table.len(), 1);
            assert_eq!(table.get_u32(1), Some(42));
        }
    }

    #[test]
    fn test_empty_window_is_empty_table() {
        for result in both_modes(&[]) {
            assert!(result.unwrap().is_empty());
        }
    }

    #[test]
    fn test_header_without_payload_overflows() {
        for result in both_modes(&[0x01, 0x00, 0x04, 0x00]) {
            assert_eq!(result, Err(DecodeError::LengthOverflow));
        }
    }

    #[test]
    fn test_short_header_truncated() {
        let mut window = record(2, &[]);
        window.extend_from_slice(&[0x01, 0x00]);
        for result in both_modes(&window) {
            assert_eq!(result, Err(DecodeError::Truncated));
        }
    }

    #[test]
    fn test_missing_padding_misaligned() {
        let window = [0x06, 0x00, 0x01, 0x00, 0x07, 0x00];
        for result in both_modes(&window) {
            assert_eq!(result, Err(DecodeError::Misaligned));
        }
    }

    #[test]
    fn test_unknown_type_strict_vs_liberal() {
        let mut window = record(1, &42u32.to_le_bytes());
        window.extend(record(200, b"whatever"));

        assert_eq!(
            decode(&window, &POLICY, ValidationMode::Strict),
            Err(DecodeError::UnknownType(200))
        );
        let table = decode(&window, &POLICY, ValidationMode::Liberal).unwrap();
        assert_eq!(table, AttributeTable::new().with(1, 42u32));
    }

    #[test]
    fn test_empty_policy_slot_is_unknown() {
        let window = record(0, &[1, 2, 3, 4]);
        assert_eq!(
            decode(&window, &POLICY, ValidationMode::Strict),
            Err(DecodeError::UnknownType(0))
        );
        assert!(decode(&window, &POLICY, ValidationMode::Liberal)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_length_policy_violation_in_both_modes() {
        let window = record(5, &[1, 2, 3, 4, 5]);
        for result in both_modes(&window) {
            assert_eq!(result, Err(DecodeError::LengthPolicyViolation(5)));
        }
        let window = record(1, &[1, 2]);
        for result in both_modes(&window) {
            assert_eq!(result, Err(DecodeError::LengthPolicyViolation(1)));
        }
    }

    #[test]
    fn test_duplicate_strict_vs_liberal() {
        let mut window = record(1, &1u32.to_le_bytes());
        window.extend(record(2, &[]));
        window.extend(record(1, &2u32.to_le_bytes()));

        assert_eq!(
            decode(&window, &POLICY, ValidationMode::Strict),
            Err(DecodeError::DuplicateAttribute(1))
        );
        let table = decode(&window, &POLICY, ValidationMode::Liberal).unwrap();
        assert_eq!(table.get_u32(1), Some(2));
        let order: Vec<_> = table.iter().map(|(t, _)| t).collect();
        assert_eq!(order, [1, 2]);
    }

    #[test]
    fn test_repeatable_collects_list() {
        let mut window = record(6, &[1]);
        window.extend(record(6, &[2]));
        window.extend(record(6, &[3]));
        for result in both_modes(&window) {
            let table = result.unwrap();
            assert_eq!(
                table.get(6),
                Some(&AttrValue::List(vec![
                    AttrValue::U8(1),
                    AttrValue::U8(2),
                    AttrValue::U8(3)
                ]))
            );
        }
    }

    #[test]
    fn test_strings() {
        let window = record(3, b"wlan0\0");
        let table = decode(&window, &POLICY, ValidationMode::Strict).unwrap();
        assert_eq!(table.get_str(3), Some("wlan0"));
        let window = record(3, b"wlan0");
        let table = decode(&window, &POLICY, ValidationMode::Strict).unwrap();
        assert_eq!(table.get_str(3), Some("wlan0"));
        assert_eq!(
            decode(&record(3, b"wl\0an0"), &POLICY, ValidationMode::Strict),
            Err(DecodeError::InvalidPayload(3))
        );
        assert_eq!(
            decode(&record(3, &[0xff, 0xfe]), &POLICY, ValidationMode::Liberal),
            Err(DecodeError::InvalidPayload(3))
        );

        let window = record(4, b"phy0\0");
        let table = decode(&window, &POLICY, ValidationMode::Strict).unwrap();
        assert_eq!(table.get_str(4), Some("phy0"));
        assert_eq!(
            decode(&record(4, b"phy0"), &POLICY, ValidationMode::Strict),
            Err(DecodeError::InvalidPayload(4))
        );
        assert_eq!(
            decode(&record(4, b"ph\0y0\0"), &POLICY, ValidationMode::Strict),
            Err(DecodeError::InvalidPayload(4))
        );
    }

    #[test]
    fn test_string_borrows_from_window() {
        let window = record(4, b"phy0\0");
        let table = decode(&window, &POLICY, ValidationMode::Strict).unwrap();
        match table.get(4) {
            Some(AttrValue::Str(Cow::Borrowed(s))) => assert_eq!(s.as_ptr(), window[4..].as_ptr()),
            other => panic!("expected borrowed string, got {other:?}"),
        }
    }

    #[test]
    fn test_variable_width_integers() {
        let window = record(8, &(-61i32).to_le_bytes());
        let table = decode(&window, &POLICY, ValidationMode::Strict).unwrap();
        assert_eq!(table.get(8), Some(&AttrValue::Signed(-61)));
        let window = record(8, &(i64::MIN).to_le_bytes());
        let table = decode(&window, &POLICY, ValidationMode::Strict).unwrap();
        assert_eq!(table.get_i64(8), Some(i64::MIN));
        assert_eq!(
            decode(&record(8, &[0; 6]), &POLICY, ValidationMode::Strict),
            Err(DecodeError::InvalidPayload(8))
        );
    }

    #[test]
    fn test_nested() {
        let inner = record(1, &0x0102u16.to_le_bytes());
        let window = record(7, &inner);
        let table = decode(&window, &POLICY, ValidationMode::Strict).unwrap();
        let nested = table.get_nested(7).unwrap();
        assert_eq!(nested.get(1), Some(&AttrValue::U16(0x0102)));

        // Unknown type inside the nested table follows the same mode.
        let mut inner = record(1, &[0, 0]);
        inner.extend(record(9, &[]));
        let window = record(7, &inner);
        assert_eq!(
            decode(&window, &POLICY, ValidationMode::Strict),
            Err(DecodeError::UnknownType(9))
        );
        assert!(decode(&window, &POLICY, ValidationMode::Liberal).is_ok());
    }

    #[test]
    fn test_nesting_depth_cap() {
        let nest = |levels: usize| {
            let mut window = Vec::new();
            for _ in 0..levels {
                window = record(1, &window);
            }
            window
        };
        let window = nest(MAX_NESTING_DEPTH);
        assert!(decode(&window, &RECURSIVE_POLICY, ValidationMode::Strict).is_ok());
        let window = nest(MAX_NESTING_DEPTH + 1);
        assert_eq!(
            decode(&window, &RECURSIVE_POLICY, ValidationMode::Strict),
            Err(DecodeError::NestingTooDeep)
        );
    }

    #[test]
    fn test_missing_required_in_both_modes() {
        let window = record(1, &[9]);
        assert_eq!(
            decode(&window, &REQUIRED_POLICY, ValidationMode::Strict),
            Err(DecodeError::MissingAttribute(2))
        );
        assert_eq!(
            decode(&window, &REQUIRED_POLICY, ValidationMode::Liberal),
            Err(DecodeError::MissingAttribute(2))
        );
        let mut window = window;
        window.extend(record(2, &[1]));
        assert!(decode(&window, &REQUIRED_POLICY, ValidationMode::Strict).is_ok());
    }
}
