//! Text catalog formats that feed a [`MapSource`]: Java-style properties
//! and flat YAML mappings, with file loading in a configurable encoding.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{CatalogParseError, SourceError};
use crate::source::MapSource;

/// Byte encoding of a properties file on disk.
///
/// Properties files historically default to Latin-1; UTF-8 is the modern
/// choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

/// Parse properties text into a source.
///
/// Supported syntax: `key = value` and `key: value`, `#`/`!` comments,
/// blank lines, backslash escapes (`\n`, `\r`, `\t`, `\uXXXX`, `\\`) and
/// backslash line continuation. Errors report the 1-based line where the
/// entry started.
pub fn parse_properties(src: &str) -> Result<MapSource, CatalogParseError> {
    let mut source = MapSource::new();
    let mut lines = src.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let line_no = idx + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_odd_backslashes(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, cont)) => {
                    let cont = cont.strip_suffix('\r').unwrap_or(cont);
                    logical.push_str(cont.trim_start());
                }
                None => break,
            }
        }

        let (key, value) = split_entry(&logical)
            .map_err(|msg| CatalogParseError::Syntax { line: line_no, msg })?;
        source.insert(key, value);
    }

    Ok(source)
}

/// Parse a flat YAML mapping into a source.
///
/// Only string→string mappings are accepted.
pub fn parse_yaml(src: &str) -> Result<MapSource, CatalogParseError> {
    let value: serde_yaml::Value = serde_yaml::from_str(src)
        .map_err(|e| CatalogParseError::Yaml(format!("yaml parse error: {e}")))?;
    let serde_yaml::Value::Mapping(raw) = value else {
        return Err(CatalogParseError::Yaml(
            "expected a top-level mapping".to_string(),
        ));
    };

    let mut source = MapSource::new();
    for (k, v) in raw {
        let Some(key) = k.as_str() else {
            return Err(CatalogParseError::Yaml("yaml keys must be strings".to_string()));
        };
        let Some(val) = v.as_str() else {
            return Err(CatalogParseError::Yaml(format!(
                "yaml value for key `{key}` must be a string"
            )));
        };
        source.insert(key, val);
    }
    Ok(source)
}

/// Read and parse a properties file.
pub fn load_properties(path: impl AsRef<Path>, encoding: Encoding) -> Result<MapSource, SourceError> {
    let path = path.as_ref();
    let text = read_to_string(path, encoding)?;
    Ok(parse_properties(&text)?)
}

/// Read and parse a YAML catalog file (always UTF-8).
pub fn load_yaml(path: impl AsRef<Path>) -> Result<MapSource, SourceError> {
    let path = path.as_ref();
    let text = read_to_string(path, Encoding::Utf8)?;
    Ok(parse_yaml(&text)?)
}

fn io_error(path: &Path, source: io::Error) -> SourceError {
    SourceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_to_string(path: &Path, encoding: Encoding) -> Result<String, SourceError> {
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    match encoding {
        Encoding::Utf8 => String::from_utf8(bytes)
            .map_err(|e| io_error(path, io::Error::new(io::ErrorKind::InvalidData, e))),
        Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
    }
}

fn ends_with_odd_backslashes(s: &str) -> bool {
    s.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> Result<(String, String), String> {
    // The separator is the first unescaped `=` or `:`.
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                let key = unescape(line[..i].trim())?;
                if key.is_empty() {
                    return Err("empty key".to_string());
                }
                let value = unescape(line[i + c.len_utf8()..].trim_start())?;
                return Ok((key, value));
            }
            _ => {}
        }
    }
    Err("expected `key = value` or `key: value`".to_string())
}

fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut it = s.chars();
    while let Some(c) = it.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(n) = it.next() else {
            return Err("dangling escape".to_string());
        };
        match n {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let hex: String = it.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err("truncated \\u escape".to_string());
                }
                let cp = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid \\u escape `\\u{hex}`"))?;
                let c = char::from_u32(cp)
                    .ok_or_else(|| format!("invalid \\u escape `\\u{hex}`"))?;
                out.push(c);
            }
            // Covers `\\`, `\:`, `\=`; unknown escapes keep the char as-is.
            _ => out.push(n),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MessageSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_basic_properties() {
        let src = "\
# comment
! also a comment
greeting = Hello
farewell: Goodbye

spaced   =   trimmed left only  ";
        let source = parse_properties(src).unwrap();
        assert_eq!(source.pattern("greeting").unwrap(), Some("Hello"));
        assert_eq!(source.pattern("farewell").unwrap(), Some("Goodbye"));
        assert_eq!(source.pattern("spaced").unwrap(), Some("trimmed left only  "));
    }

    #[test]
    fn unescapes_values() {
        let src = r"tabbed = a\tb
newline = a\nb
colon\:key = escaped separator
unicode = café";
        let source = parse_properties(src).unwrap();
        assert_eq!(source.pattern("tabbed").unwrap(), Some("a\tb"));
        assert_eq!(source.pattern("newline").unwrap(), Some("a\nb"));
        assert_eq!(source.pattern("colon:key").unwrap(), Some("escaped separator"));
        assert_eq!(source.pattern("unicode").unwrap(), Some("café"));
    }

    #[test]
    fn joins_continuation_lines() {
        let src = "long = first \\\n    second";
        let source = parse_properties(src).unwrap();
        assert_eq!(source.pattern("long").unwrap(), Some("first second"));
    }

    #[test]
    fn double_backslash_is_not_a_continuation() {
        let src = r"path = C\\";
        let source = parse_properties(src).unwrap();
        assert_eq!(source.pattern("path").unwrap(), Some("C\\"));
    }

    #[test]
    fn missing_separator_reports_line_number() {
        let src = "ok = fine\nbroken line\n";
        let err = parse_properties(src).unwrap_err();
        assert_eq!(
            err.to_string(),
            "properties syntax error at line 2: expected `key = value` or `key: value`"
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = parse_properties("= value").unwrap_err();
        assert!(matches!(err, CatalogParseError::Syntax { line: 1, .. }));
    }

    #[test]
    fn parses_yaml_mapping() {
        let src = "\
greeting: \"Hello {0}\"
farewell: Goodbye
";
        let source = parse_yaml(src).unwrap();
        assert_eq!(source.pattern("greeting").unwrap(), Some("Hello {0}"));
        assert_eq!(source.pattern("farewell").unwrap(), Some("Goodbye"));
    }

    #[test]
    fn yaml_rejects_non_string_values() {
        let err = parse_yaml("count: 3").unwrap_err();
        assert!(matches!(err, CatalogParseError::Yaml(_)));
    }

    #[test]
    fn yaml_rejects_non_mapping_documents() {
        let err = parse_yaml("- a\n- b").unwrap_err();
        assert!(matches!(err, CatalogParseError::Yaml(_)));
    }

    #[test]
    fn loads_latin1_properties_from_disk() {
        let path = std::env::temp_dir().join("patois-catalog-latin1.properties");
        std::fs::write(&path, b"greeting = caf\xe9\n").unwrap();
        let source = load_properties(&path, Encoding::Latin1).unwrap();
        assert_eq!(source.pattern("greeting").unwrap(), Some("café"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_surfaces_io_error_with_path() {
        let err = load_properties("/no/such/patois-catalog.properties", Encoding::Utf8).unwrap_err();
        let SourceError::Io { path, .. } = err else {
            panic!("expected an io error, got {err:?}");
        };
        assert_eq!(path, Path::new("/no/such/patois-catalog.properties"));
    }
}
