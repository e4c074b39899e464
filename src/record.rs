//! Generic record parsing and serialization
//!
//! Every record (entity, object, table, table record, block) is read the
//! same way: pairs are offered to the record's field dispatch one at a time
//! until the next code 0. Pairs it does not claim are captured rather than
//! dropped: `102 {` groups, `1001` XDATA, and anything else lands in an
//! overflow list.

use crate::error::Result;
use crate::handles::HandleMap;
use crate::io::dxf::reader::{is_group_start, read_group, read_xdata, CodePairBuffer};
use crate::io::dxf::{is_handle_code, CodePair, CodePairGroup};
use crate::types::{DxfVersion, Handle, Vector2, Vector3};
use crate::xdata::ExtendedData;

/// Data every record carries besides its own fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordExtras {
    /// `102 {NAME` groups, in file order
    pub extension_data_groups: Vec<CodePairGroup>,
    pub xdata: ExtendedData,
    /// Pairs no field claimed
    pub excess_code_pairs: Vec<CodePair>,
}

impl RecordExtras {
    pub(crate) fn add_extension_data_pairs(&self, pairs: &mut Vec<CodePair>) {
        for group in &self.extension_data_groups {
            group.add_value_pairs(pairs);
        }
    }

    pub(crate) fn add_xdata_pairs(&self, pairs: &mut Vec<CodePair>) {
        self.xdata.add_value_pairs(pairs);
    }

    /// Rewrite handles held in `102` groups and XDATA after renumbering.
    pub(crate) fn remap_handles(&mut self, map: &HandleMap) {
        for group in &mut self.extension_data_groups {
            group.for_each_pair_mut(&mut |pair| crate::handles::remap_handle_pair(pair, map));
        }
        self.xdata.remap_handles(map);
    }

    /// Re-emit overflow pairs. Handle-valued pairs are dropped since every
    /// handle is reassigned on write and these would dangle.
    pub(crate) fn add_excess_pairs(&self, pairs: &mut Vec<CodePair>) {
        pairs.extend(
            self.excess_code_pairs
                .iter()
                .filter(|p| !is_handle_code(p.code))
                .cloned(),
        );
    }
}

/// A record that can be read from and written to code pairs.
pub trait DxfRecord {
    /// Parse state that lives for one [`populate_from_buffer`] call, e.g. the
    /// last subclass marker seen or how many times a code has repeated.
    type ReadState: Default;

    /// Claim `pair` for a field. Returns `false` to leave it to the engine.
    fn try_set_pair(&mut self, pair: &CodePair, state: &mut Self::ReadState) -> bool;

    fn extras_mut(&mut self) -> &mut RecordExtras;

    /// Post-processing once the record's last pair has been consumed.
    fn after_read(&mut self, _state: Self::ReadState) -> Result<()> {
        Ok(())
    }

    /// Append this record's pairs, starting with its `0` type pair.
    fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, version: DxfVersion, output_handles: bool);
}

/// Fill `record` from the buffer until the next code 0.
///
/// The caller has already consumed the record's `0` pair.
pub fn populate_from_buffer<T: DxfRecord>(record: &mut T, buffer: &mut CodePairBuffer<'_>) -> Result<()> {
    let mut state = T::ReadState::default();
    while let Some(pair) = buffer.try_peek() {
        if pair.code == 0 {
            break;
        }
        if record.try_set_pair(pair, &mut state) {
            buffer.advance()?;
        } else if is_group_start(pair) {
            let group = read_group(buffer)?;
            record.extras_mut().extension_data_groups.push(group);
        } else if pair.code == 1001 {
            read_xdata(buffer, &mut record.extras_mut().xdata)?;
        } else {
            let pair = pair.clone();
            record.extras_mut().excess_code_pairs.push(pair);
            buffer.advance()?;
        }
    }
    record.after_read(state)
}

/// A collection length for a 16-bit count field, saturating at `i16::MAX`.
pub(crate) fn short_count(len: usize) -> i16 {
    i16::try_from(len).unwrap_or_else(|_| {
        tracing::warn!(len, "count does not fit a 16-bit field");
        i16::MAX
    })
}

/// A collection length for a 32-bit count field, saturating at `i32::MAX`.
pub(crate) fn integer_count(len: usize) -> i32 {
    i32::try_from(len).unwrap_or_else(|_| {
        tracing::warn!(len, "count does not fit a 32-bit field");
        i32::MAX
    })
}

pub(crate) fn push_handle(pairs: &mut Vec<CodePair>, code: i32, handle: Handle) {
    pairs.push(CodePair::handle(code, handle));
}

pub(crate) fn push_point(pairs: &mut Vec<CodePair>, code: i32, point: &Vector3) {
    pairs.push(CodePair::double(code, point.x));
    pairs.push(CodePair::double(code + 10, point.y));
    pairs.push(CodePair::double(code + 20, point.z));
}

pub(crate) fn push_point2(pairs: &mut Vec<CodePair>, code: i32, point: &Vector2) {
    pairs.push(CodePair::double(code, point.x));
    pairs.push(CodePair::double(code + 10, point.y));
}

/// Write an extrusion direction only when it differs from +Z.
pub(crate) fn push_normal(pairs: &mut Vec<CodePair>, code: i32, normal: &Vector3) {
    if *normal != Vector3::UNIT_Z {
        push_point(pairs, code, normal);
    }
}

/// Set the X, Y or Z component selected by `pair.code` relative to `base`.
pub(crate) fn set_point_component(point: &mut Vector3, base: i32, pair: &CodePair) -> bool {
    match pair.code - base {
        0 => point.x = pair.double_value(),
        10 => point.y = pair.double_value(),
        20 => point.z = pair.double_value(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_saturate() {
        assert_eq!(short_count(12), 12);
        assert_eq!(short_count(40_000), i16::MAX);
        assert_eq!(integer_count(70_000), 70_000);
        assert_eq!(integer_count(usize::MAX), i32::MAX);
    }

    #[derive(Default)]
    struct Sample {
        name: String,
        count: i16,
        extras: RecordExtras,
    }

    impl DxfRecord for Sample {
        type ReadState = usize;

        fn try_set_pair(&mut self, pair: &CodePair, seen: &mut usize) -> bool {
            *seen += 1;
            match pair.code {
                2 => self.name = pair.string_value(),
                70 => self.count = pair.short_value(),
                _ => return false,
            }
            true
        }

        fn extras_mut(&mut self) -> &mut RecordExtras {
            &mut self.extras
        }

        fn add_value_pairs(&self, pairs: &mut Vec<CodePair>, _: DxfVersion, _: bool) {
            pairs.push(CodePair::string(2, self.name.clone()));
        }
    }

    #[test]
    fn test_unclaimed_pairs_are_captured() {
        let mut buffer = CodePairBuffer::from_pairs([
            CodePair::string(2, "NAME"),
            CodePair::string(102, "{ACAD_REACTORS"),
            CodePair::string(330, "A"),
            CodePair::string(102, "}"),
            CodePair::short(70, 4),
            CodePair::double(40, 1.25),
            CodePair::string(1001, "APP"),
            CodePair::string(1000, "v"),
            CodePair::string(0, "NEXT"),
        ])
        .unwrap();
        let mut record = Sample::default();
        populate_from_buffer(&mut record, &mut buffer).unwrap();

        assert_eq!(record.name, "NAME");
        assert_eq!(record.count, 4);
        assert_eq!(record.extras.extension_data_groups.len(), 1);
        assert_eq!(record.extras.excess_code_pairs, vec![CodePair::double(40, 1.25)]);
        assert!(record.extras.xdata.get("APP").is_some());
        assert!(buffer.is_at(0, "NEXT"));
    }

    #[test]
    fn test_excess_handles_are_not_written() {
        let extras = RecordExtras {
            excess_code_pairs: vec![CodePair::string(340, "1F"), CodePair::short(71, 1)],
            ..Default::default()
        };
        let mut pairs = Vec::new();
        extras.add_excess_pairs(&mut pairs);
        assert_eq!(pairs, vec![CodePair::short(71, 1)]);
    }
}
