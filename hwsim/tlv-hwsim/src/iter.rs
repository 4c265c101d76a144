//! Raw record iterator.

use window_hwsim::WindowReader;

use crate::{DecodeError, RawRecord};

/// Iterator over the records of a window, in wire order.
///
/// Checks framing only, no policy. Yields `Err` once on the first structural error and then stops.
#[derive(Debug, Clone)]
pub struct RawRecords<'w> {
    reader: WindowReader<'w>,
    failed: bool,
}

impl<'w> RawRecords<'w> {
    /// Creates an iterator over the records in `window`.
    pub fn new(window: &'w [u8]) -> Self {
        Self {
            reader: WindowReader::new(window),
            failed: false,
        }
    }
}

impl<'w> Iterator for RawRecords<'w> {
    type Item = Result<RawRecord<'w>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_exhausted() {
            return None;
        }

        match RawRecord::read(&mut self.reader) {
            Ok(record) => Some(Ok(record)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_records_in_order() {
        let window = [
            0x02, 0x00, 0x01, 0x00, 0x05, 0x00, 0x00, 0x00, // type 2, u8 5
            0x01, 0x00, 0x00, 0x00, // type 1, empty
        ];
        let records: Vec<_> = RawRecords::new(&window)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].attr_type, 2);
        assert_eq!(records[0].payload, &[5]);
        assert_eq!(records[1].attr_type, 1);
        assert!(records[1].payload.is_empty());
    }

    #[test]
    fn test_empty_window() {
        assert!(RawRecords::new(&[]).next().is_none());
    }

    #[test]
    fn test_error_stops_iteration() {
        let window = [0x01, 0x00, 0x00, 0x00, 0x03, 0x00, 0x01];
        let mut iter = RawRecords::new(&window);
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(iter.next().unwrap(), Err(DecodeError::Truncated));
        assert!(iter.next().is_none());
    }
}
