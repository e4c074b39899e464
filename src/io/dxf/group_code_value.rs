//! Value type of each group code range

/// The primitive type a group code's value carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCodeValueType {
    String,
    Double,
    Int16,
    Int32,
    Int64,
    Bool,
}

impl GroupCodeValueType {
    /// Map a group code to its value type.
    ///
    /// Total over all integers: codes outside the documented ranges carry strings.
    pub const fn from_code(code: i32) -> Self {
        use GroupCodeValueType::*;
        match code {
            0..=9 => String,
            10..=59 => Double,
            60..=79 => Int16,
            90..=99 => Int32,
            100..=102 | 105 => String,
            110..=149 => Double,
            160..=169 => Int64,
            170..=179 => Int16,
            210..=239 => Double,
            250 => Int16,
            270..=289 => Int16,
            290..=299 => Bool,
            300..=369 => String,
            370..=389 => Int16,
            390..=399 => String,
            400..=409 => Int16,
            410..=419 => String,
            420..=429 => Int32,
            430..=439 => String,
            440..=449 => Int32,
            450..=459 => Int64,
            460..=469 => Double,
            470..=481 => String,
            999 => String,
            1000..=1009 => String,
            1010..=1059 => Double,
            1060..=1070 => Int16,
            1071 => Int32,
            _ => String,
        }
    }
}

/// Codes whose string value is a hexadecimal handle.
pub const fn is_handle_code(code: i32) -> bool {
    matches!(code, 5 | 105 | 320..=369 | 390..=399 | 480 | 481 | 1005)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_boundaries() {
        use GroupCodeValueType::*;
        let cases = [
            (0, String),
            (9, String),
            (10, Double),
            (59, Double),
            (60, Int16),
            (79, Int16),
            (80, String),
            (90, Int32),
            (102, String),
            (105, String),
            (110, Double),
            (160, Int64),
            (170, Int16),
            (210, Double),
            (250, Int16),
            (251, String),
            (280, Int16),
            (290, Bool),
            (300, String),
            (370, Int16),
            (390, String),
            (400, Int16),
            (420, Int32),
            (440, Int32),
            (450, Int64),
            (460, Double),
            (481, String),
            (999, String),
            (1005, String),
            (1010, Double),
            (1070, Int16),
            (1071, Int32),
        ];
        for (code, expected) in cases {
            assert_eq!(GroupCodeValueType::from_code(code), expected, "code {}", code);
        }
    }

    #[test]
    fn test_unlisted_codes_are_strings() {
        for code in [-5, 85, 150, 200, 500, 998, 1072, 5000, i32::MAX, i32::MIN] {
            assert_eq!(GroupCodeValueType::from_code(code), GroupCodeValueType::String);
        }
    }

    #[test]
    fn test_handle_codes() {
        assert!(is_handle_code(5));
        assert!(is_handle_code(330));
        assert!(is_handle_code(360));
        assert!(is_handle_code(1005));
        assert!(!is_handle_code(8));
    }
}
