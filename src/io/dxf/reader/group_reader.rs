//! Parsers for `102` application groups and XDATA

use super::buffer::CodePairBuffer;
use crate::error::Result;
use crate::io::dxf::{CodePair, CodePairGroup};
use crate::types::Vector3;
use crate::xdata::{ExtendedData, XDataValue};

/// Whether `pair` opens a `102 {NAME` group.
pub fn is_group_start(pair: &CodePair) -> bool {
    pair.code == 102 && pair.as_str().is_some_and(|s| s.starts_with('{'))
}

/// Read a `102 {NAME` group up to its matching `102 }`.
///
/// The buffer must be positioned on the opening pair. Nested groups recurse.
/// A code 0 ends the group early without being consumed.
pub fn read_group(buffer: &mut CodePairBuffer<'_>) -> Result<CodePairGroup> {
    let opening = buffer.peek()?;
    let name = opening.as_str().unwrap_or("{").trim_start_matches('{').to_string();
    buffer.advance()?;

    let mut group = CodePairGroup::new(name);
    while let Some(pair) = buffer.try_peek() {
        if pair.code == 0 {
            tracing::debug!(offset = pair.offset, "group ended by code 0");
            break;
        }
        if pair.code == 102 && pair.as_str() == Some("}") {
            buffer.advance()?;
            break;
        }
        if is_group_start(pair) {
            let nested = read_group(buffer)?;
            group.add_group(nested);
            continue;
        }
        let pair = pair.clone();
        group.add_pair(pair);
        buffer.advance()?;
    }
    Ok(group)
}

/// Read consecutive `1001` application blocks into `xdata`.
///
/// The buffer must be positioned on a `1001` pair. Stops before the first
/// pair with a code below 1000.
pub fn read_xdata(buffer: &mut CodePairBuffer<'_>, xdata: &mut ExtendedData) -> Result<()> {
    while let Some(pair) = buffer.try_peek() {
        if pair.code != 1001 {
            break;
        }
        let application = pair.string_value();
        buffer.advance()?;
        let values = read_xdata_items(buffer, false)?;
        xdata.extend(application, values);
    }
    Ok(())
}

fn read_xdata_items(buffer: &mut CodePairBuffer<'_>, nested: bool) -> Result<Vec<XDataValue>> {
    let mut values = Vec::new();
    while let Some(pair) = buffer.try_peek() {
        if pair.code < 1000 || pair.code == 1001 {
            break;
        }
        let pair = pair.clone();
        match pair.code {
            1002 if pair.as_str() == Some("{") => {
                buffer.advance()?;
                values.push(XDataValue::List(read_xdata_items(buffer, true)?));
            }
            1002 => {
                buffer.advance()?;
                if nested {
                    return Ok(values);
                }
                tracing::warn!(offset = pair.offset, "unbalanced XDATA list terminator");
            }
            1010..=1013 => {
                let point = read_point(buffer, pair.code)?;
                values.push(match pair.code {
                    1010 => XDataValue::Point3D(point),
                    1011 => XDataValue::Position3D(point),
                    1012 => XDataValue::Displacement3D(point),
                    _ => XDataValue::Direction3D(point),
                });
            }
            _ => {
                buffer.advance()?;
                values.push(match pair.code {
                    1000 => XDataValue::String(pair.string_value()),
                    1003 => XDataValue::LayerName(pair.string_value()),
                    1004 => match hex::decode(pair.as_str().unwrap_or_default()) {
                        Ok(data) => XDataValue::BinaryData(data),
                        Err(_) => XDataValue::Other(pair),
                    },
                    1005 => XDataValue::Handle(pair.handle_value()),
                    1040 => XDataValue::Real(pair.double_value()),
                    1041 => XDataValue::Distance(pair.double_value()),
                    1042 => XDataValue::ScaleFactor(pair.double_value()),
                    1070 => XDataValue::Integer16(pair.short_value()),
                    1071 => XDataValue::Integer32(pair.integer_value()),
                    _ => XDataValue::Other(pair),
                });
            }
        }
    }
    Ok(values)
}

/// Read an X pair and its optional Y (`code + 10`) and Z (`code + 20`) pairs.
fn read_point(buffer: &mut CodePairBuffer<'_>, code: i32) -> Result<Vector3> {
    let mut point = Vector3::ZERO;
    point.x = buffer.peek()?.double_value();
    buffer.advance()?;
    if let Some(pair) = buffer.try_peek().filter(|p| p.code == code + 10) {
        point.y = pair.double_value();
        buffer.advance()?;
    }
    if let Some(pair) = buffer.try_peek().filter(|p| p.code == code + 20) {
        point.z = pair.double_value();
        buffer.advance()?;
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(pairs: Vec<CodePair>) -> CodePairBuffer<'static> {
        CodePairBuffer::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_read_nested_group() {
        let mut b = buffer(vec![
            CodePair::string(102, "{ACAD_XDICTIONARY"),
            CodePair::string(360, "1F"),
            CodePair::string(102, "{INNER"),
            CodePair::string(1, "x"),
            CodePair::string(102, "}"),
            CodePair::string(102, "}"),
            CodePair::string(0, "LINE"),
        ]);
        let group = read_group(&mut b).unwrap();
        assert_eq!(group.name.as_deref(), Some("ACAD_XDICTIONARY"));
        assert_eq!(group.items.len(), 2);
        assert_eq!(group.pairs().next().and_then(|p| p.as_str()), Some("1F"));
        assert!(b.is_at(0, "LINE"));
    }

    #[test]
    fn test_group_stops_at_code_zero() {
        let mut b = buffer(vec![
            CodePair::string(102, "{OPEN"),
            CodePair::string(330, "2"),
            CodePair::string(0, "ENDSEC"),
        ]);
        let group = read_group(&mut b).unwrap();
        assert_eq!(group.items.len(), 1);
        assert!(b.is_at(0, "ENDSEC"));
    }

    #[test]
    fn test_read_xdata_with_points_and_lists() {
        let mut b = buffer(vec![
            CodePair::string(1001, "APP"),
            CodePair::string(1000, "text"),
            CodePair::double(1010, 1.0),
            CodePair::double(1020, 2.0),
            CodePair::double(1030, 3.0),
            CodePair::string(1002, "{"),
            CodePair::short(1070, 7),
            CodePair::string(1002, "}"),
            CodePair::string(1001, "OTHER"),
            CodePair::double(1041, 4.5),
            CodePair::string(0, "LINE"),
        ]);
        let mut xdata = ExtendedData::new();
        read_xdata(&mut b, &mut xdata).unwrap();
        assert_eq!(
            xdata.get("APP").unwrap(),
            &[
                XDataValue::String("text".into()),
                XDataValue::Point3D(Vector3::new(1.0, 2.0, 3.0)),
                XDataValue::List(vec![XDataValue::Integer16(7)]),
            ]
        );
        assert_eq!(xdata.get("OTHER").unwrap(), &[XDataValue::Distance(4.5)]);
        assert!(b.is_at(0, "LINE"));
    }

    #[test]
    fn test_xdata_point_without_z() {
        let mut b = buffer(vec![
            CodePair::string(1001, "APP"),
            CodePair::double(1011, 1.0),
            CodePair::double(1021, 2.0),
            CodePair::double(1040, 9.0),
        ]);
        let mut xdata = ExtendedData::new();
        read_xdata(&mut b, &mut xdata).unwrap();
        assert_eq!(
            xdata.get("APP").unwrap(),
            &[
                XDataValue::Position3D(Vector3::new(1.0, 2.0, 0.0)),
                XDataValue::Real(9.0)
            ]
        );
    }
}
