//! Static catalog of character sets recognized by MySQL/MariaDB.
//!
//! Read-only reference data for the `--list-encodings` CLI flag and for
//! warning about unknown `--source-encoding` values. No behavior beyond
//! lookup and iteration.

/// A character set known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    /// Identifier as accepted in `CHARACTER SET <name>` clauses.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// Character sets supported by MySQL, in server-reported order.
pub const ENCODINGS: &[Encoding] = &[
    Encoding { name: "big5", description: "Big5 Traditional Chinese" },
    Encoding { name: "dec8", description: "DEC West European" },
    Encoding { name: "cp850", description: "DOS West European" },
    Encoding { name: "hp8", description: "HP West European" },
    Encoding { name: "koi8r", description: "KOI8-R Relcom Russian" },
    Encoding { name: "latin1", description: "cp1252 West European" },
    Encoding { name: "latin2", description: "ISO 8859-2 Central European" },
    Encoding { name: "swe7", description: "7bit Swedish" },
    Encoding { name: "ascii", description: "US ASCII" },
    Encoding { name: "ujis", description: "EUC-JP Japanese" },
    Encoding { name: "sjis", description: "Shift-JIS Japanese" },
    Encoding { name: "hebrew", description: "ISO 8859-8 Hebrew" },
    Encoding { name: "tis620", description: "TIS620 Thai" },
    Encoding { name: "euckr", description: "EUC-KR Korean" },
    Encoding { name: "koi8u", description: "KOI8-U Ukrainian" },
    Encoding { name: "gb2312", description: "GB2312 Simplified Chinese" },
    Encoding { name: "greek", description: "ISO 8859-7 Greek" },
    Encoding { name: "cp1250", description: "Windows Central European" },
    Encoding { name: "gbk", description: "GBK Simplified Chinese" },
    Encoding { name: "latin5", description: "ISO 8859-9 Turkish" },
    Encoding { name: "armscii8", description: "ARMSCII-8 Armenian" },
    Encoding { name: "utf8", description: "UTF-8 Unicode" },
    Encoding { name: "ucs2", description: "UCS-2 Unicode" },
    Encoding { name: "cp866", description: "DOS Russian" },
    Encoding { name: "keybcs2", description: "DOS Kamenicky Czech-Slovak" },
    Encoding { name: "macce", description: "Mac Central European" },
    Encoding { name: "macroman", description: "Mac West European" },
    Encoding { name: "cp852", description: "DOS Central European" },
    Encoding { name: "latin7", description: "ISO 8859-13 Baltic" },
    Encoding { name: "utf8mb4", description: "UTF-8 Unicode" },
    Encoding { name: "cp1251", description: "Windows Cyrillic" },
    Encoding { name: "utf16", description: "UTF-16 Unicode" },
    Encoding { name: "utf16le", description: "UTF-16LE Unicode" },
    Encoding { name: "cp1256", description: "Windows Arabic" },
    Encoding { name: "cp1257", description: "Windows Baltic" },
    Encoding { name: "utf32", description: "UTF-32 Unicode" },
    Encoding { name: "binary", description: "Binary pseudo charset" },
    Encoding { name: "geostd8", description: "GEOSTD8 Georgian" },
    Encoding { name: "cp932", description: "SJIS for Windows Japanese" },
    Encoding { name: "eucjpms", description: "UJIS for Windows Japanese" },
    Encoding { name: "gb18030", description: "China National Standard GB18030" },
];

/// Look up a character set by name (case-insensitive).
pub fn lookup(name: &str) -> Option<&'static Encoding> {
    ENCODINGS.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_encodings() {
        assert_eq!(lookup("latin1").unwrap().description, "cp1252 West European");
        assert_eq!(lookup("utf8mb4").unwrap().description, "UTF-8 Unicode");
        assert_eq!(lookup("binary").unwrap().description, "Binary pseudo charset");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(lookup("LATIN1").is_some());
        assert!(lookup("Utf8").is_some());
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("latin9000").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_catalog_size() {
        assert_eq!(ENCODINGS.len(), 41);
    }
}
