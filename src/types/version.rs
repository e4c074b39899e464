//! DXF file format versions

use std::fmt;

/// A DXF format version, identified in files by the `$ACADVER` header variable.
///
/// Variants are ordered, so version gates read naturally as comparisons
/// (`version >= DxfVersion::AC1015`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DxfVersion {
    /// Release 10
    AC1006,
    /// Release 11 and 12
    AC1009,
    /// Release 13
    AC1012,
    /// Release 14
    AC1014,
    /// AutoCAD 2000
    AC1015,
    /// AutoCAD 2004
    AC1018,
    /// AutoCAD 2007
    AC1021,
    /// AutoCAD 2010
    AC1024,
    /// AutoCAD 2013
    AC1027,
    /// AutoCAD 2018
    #[default]
    AC1032,
}

impl DxfVersion {
    /// All known versions, oldest first.
    pub const ALL: [DxfVersion; 10] = [
        DxfVersion::AC1006,
        DxfVersion::AC1009,
        DxfVersion::AC1012,
        DxfVersion::AC1014,
        DxfVersion::AC1015,
        DxfVersion::AC1018,
        DxfVersion::AC1021,
        DxfVersion::AC1024,
        DxfVersion::AC1027,
        DxfVersion::AC1032,
    ];

    /// Parse the `$ACADVER` string.
    pub fn from_version_string(s: &str) -> Option<Self> {
        let version = match s.trim() {
            "AC1006" => DxfVersion::AC1006,
            "AC1009" => DxfVersion::AC1009,
            "AC1012" => DxfVersion::AC1012,
            "AC1014" => DxfVersion::AC1014,
            "AC1015" => DxfVersion::AC1015,
            "AC1018" => DxfVersion::AC1018,
            "AC1021" => DxfVersion::AC1021,
            "AC1024" => DxfVersion::AC1024,
            "AC1027" => DxfVersion::AC1027,
            "AC1032" => DxfVersion::AC1032,
            _ => return None,
        };
        Some(version)
    }

    /// The `$ACADVER` string for this version.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DxfVersion::AC1006 => "AC1006",
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1012 => "AC1012",
            DxfVersion::AC1014 => "AC1014",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }

    /// Maintenance version written as `$ACADMAINTVER`.
    pub const fn maintenance_version(&self) -> i16 {
        match self {
            DxfVersion::AC1015 | DxfVersion::AC1018 => 20,
            DxfVersion::AC1021 | DxfVersion::AC1024 | DxfVersion::AC1027 => 105,
            DxfVersion::AC1032 => 125,
            _ => 0,
        }
    }

    /// Versions up to and including AutoCAD 2004 store non-ASCII text as `\U+XXXX`.
    pub fn uses_unicode_escapes(&self) -> bool {
        *self <= DxfVersion::AC1018
    }

    /// AutoCAD 2007 and later files are always UTF-8.
    pub fn is_utf8(&self) -> bool {
        *self >= DxfVersion::AC1021
    }

    /// Release 13 introduced subclass markers, owner handles, CLASSES and OBJECTS.
    pub fn has_object_model(&self) -> bool {
        *self >= DxfVersion::AC1012
    }

    /// Binary files from Release 13 on use 2-byte codes and 1-byte booleans.
    pub fn uses_wide_binary_codes(&self) -> bool {
        self.has_object_model()
    }

    /// AutoCAD 2000 introduced the 290-299 boolean group codes.
    pub fn supports_bool_codes(&self) -> bool {
        *self >= DxfVersion::AC1015
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_round_trip() {
        for version in DxfVersion::ALL {
            assert_eq!(DxfVersion::from_version_string(version.as_str()), Some(version));
        }
        assert_eq!(DxfVersion::from_version_string("AC9999"), None);
    }

    #[test]
    fn test_version_gates() {
        assert!(DxfVersion::AC1018.uses_unicode_escapes());
        assert!(!DxfVersion::AC1021.uses_unicode_escapes());
        assert!(DxfVersion::AC1021.is_utf8());
        assert!(!DxfVersion::AC1009.has_object_model());
        assert!(DxfVersion::AC1012.uses_wide_binary_codes());
        assert!(DxfVersion::AC1009 < DxfVersion::AC1032);
    }
}
