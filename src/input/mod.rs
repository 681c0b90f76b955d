//! Input handling: byte loading, encoding and delimiter detection.
//!
//! The whole input (file or stdin) is loaded as bytes so the character
//! encoding can be sniffed before CSV parsing. Parsing itself is done by
//! the `csv` crate with standard quoting rules and flexible row lengths.

use std::io::{self, Read};
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

/// Delimiters considered during auto-detection.
const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Read the entire input from a file, or stdin when no path is given.
pub fn read_bytes(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path),
        None => {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

/// Decode raw bytes to a string, sniffing the encoding.
///
/// chardet supplies the charset guess; encoding_rs performs the decode,
/// falling back to lossy UTF-8 for unknown labels. Returns the decoded
/// text together with the name of the encoding actually used.
pub fn decode(bytes: &[u8]) -> (String, &'static str) {
    let (label, _confidence, _) = chardet::detect(bytes);
    let encoding = Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    (text.into_owned(), encoding.name())
}

/// Detect the field delimiter by counting candidates in the header line.
///
/// Ties go to the earlier candidate; a line without any candidate falls
/// back to a comma.
pub fn detect_delimiter(text: &str) -> char {
    let header = text.lines().next().unwrap_or("");

    let mut best = (',', 0);
    for sep in DELIMITER_CANDIDATES {
        let count = header.matches(sep).count();
        if count > best.1 {
            best = (sep, count);
        }
    }
    best.0
}

/// Build a CSV reader over decoded text.
///
/// Row lengths are flexible: short and long rows are handled by the
/// record builder, not rejected by the parser.
pub fn csv_reader(text: &str, delimiter: char) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decode_utf8() {
        let (text, encoding) = decode("name,age\nAlice,30\n".as_bytes());
        assert_eq!(encoding, "UTF-8");
        assert!(text.starts_with("name,age"));
    }

    #[test]
    fn test_decode_latin1() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let (text, _) = decode(bytes);
        assert!(text.contains("Soci"));
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
    }

    #[test]
    fn test_detect_delimiter_defaults_to_comma() {
        assert_eq!(detect_delimiter("single-column"), ',');
        assert_eq!(detect_delimiter(""), ',');
    }

    #[test]
    fn test_csv_reader_standard_quoting() {
        let text = "name,notes\n\"Smith, Jane\",\"said \"\"hi\"\"\"\n";
        let mut reader = csv_reader(text, ',');
        let row = reader.records().next().unwrap().unwrap();

        assert_eq!(&row[0], "Smith, Jane");
        assert_eq!(&row[1], "said \"hi\"");
    }

    #[test]
    fn test_csv_reader_flexible_rows() {
        let text = "a,b,c\n1\n1,2,3,4\n";
        let mut reader = csv_reader(text, ',');
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 4);
    }

    #[test]
    fn test_read_bytes_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"x,y\n1,2\n").unwrap();

        let bytes = read_bytes(Some(file.path())).unwrap();
        assert_eq!(bytes, b"x,y\n1,2\n");
    }
}
