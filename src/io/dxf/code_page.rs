//! `$DWGCODEPAGE` names and the legacy encodings they select.
//!
//! Only meaningful for files older than AutoCAD 2007; later files are UTF-8.

use ahash::AHashMap;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;

/// Code page name (lowercase) to encoding. The first name listed for an
/// encoding is the one written back out.
const CODE_PAGES: &[(&str, &Encoding)] = &[
    ("ansi_1252", encoding_rs::WINDOWS_1252),
    ("ansi_874", encoding_rs::WINDOWS_874),
    ("ansi_932", encoding_rs::SHIFT_JIS),
    ("ansi_936", encoding_rs::GBK),
    ("ansi_949", encoding_rs::EUC_KR),
    ("ansi_950", encoding_rs::BIG5),
    ("ansi_1250", encoding_rs::WINDOWS_1250),
    ("ansi_1251", encoding_rs::WINDOWS_1251),
    ("ansi_1253", encoding_rs::WINDOWS_1253),
    ("ansi_1254", encoding_rs::WINDOWS_1254),
    ("ansi_1255", encoding_rs::WINDOWS_1255),
    ("ansi_1256", encoding_rs::WINDOWS_1256),
    ("ansi_1257", encoding_rs::WINDOWS_1257),
    ("ansi_1258", encoding_rs::WINDOWS_1258),
    ("gb2312", encoding_rs::GBK),
    ("big5", encoding_rs::BIG5),
    ("korean", encoding_rs::EUC_KR),
    ("johab", encoding_rs::EUC_KR),
    ("dos850", encoding_rs::WINDOWS_1252),
    ("dos852", encoding_rs::WINDOWS_1250),
    ("dos855", encoding_rs::IBM866),
    ("dos866", encoding_rs::IBM866),
    ("dos857", encoding_rs::WINDOWS_1254),
    ("dos869", encoding_rs::WINDOWS_1253),
    ("iso8859-1", encoding_rs::WINDOWS_1252),
    ("iso8859-2", encoding_rs::ISO_8859_2),
    ("iso8859-3", encoding_rs::ISO_8859_3),
    ("iso8859-4", encoding_rs::ISO_8859_4),
    ("iso8859-5", encoding_rs::ISO_8859_5),
    ("iso8859-6", encoding_rs::ISO_8859_6),
    ("iso8859-7", encoding_rs::ISO_8859_7),
    ("iso8859-8", encoding_rs::ISO_8859_8),
    ("iso8859-9", encoding_rs::WINDOWS_1254),
    ("iso8859-10", encoding_rs::ISO_8859_10),
    ("iso8859-13", encoding_rs::ISO_8859_13),
    ("iso8859-14", encoding_rs::ISO_8859_14),
    ("iso8859-15", encoding_rs::ISO_8859_15),
    ("koi8-r", encoding_rs::KOI8_R),
    ("koi8-u", encoding_rs::KOI8_U),
];

static BY_NAME: Lazy<AHashMap<&'static str, &'static Encoding>> =
    Lazy::new(|| CODE_PAGES.iter().copied().collect());

/// Look up the encoding for a `$DWGCODEPAGE` value.
///
/// Returns `None` for unknown names and for ASCII or UTF-8, where the
/// reader's default decoding already applies.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase().replace("iso_", "iso");
    BY_NAME.get(name.as_str()).copied()
}

/// The `$DWGCODEPAGE` value to write for an encoding.
pub fn code_page_for_encoding(encoding: &'static Encoding) -> Option<String> {
    CODE_PAGES
        .iter()
        .find(|(_, e)| *e == encoding)
        .map(|(name, _)| name.to_ascii_uppercase())
}
