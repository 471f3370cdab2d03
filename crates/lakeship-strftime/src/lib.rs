//! PostgreSQL `to_char` templates to DuckDB `strftime`
//!
//! Compiles a `to_char(timestamp, template)` format into a chain of DuckDB
//! expressions producing the same text. A template compiles completely or not
//! at all: one directive without an exact equivalent fails the whole
//! template.

use thiserror::Error;
use tracing::trace;

mod chain;
mod directives;

pub use chain::{Segment, StrftimeChain};

use directives::{Piece, FILL_MODE, FILL_MODE_PREFIX, PLAIN};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Empty format string")]
    Empty,

    #[error("Unsupported to_char directive '{directive}' at offset {offset}")]
    UnsupportedDirective { directive: String, offset: usize },

    #[error("Unterminated quoted literal starting at offset {0}")]
    UnterminatedQuote(usize),

    #[error("Invalid strftime format: {0}")]
    Render(String),
}

/// Compiles `to_char` templates into the secondary engine's format language
pub trait FormatTranslator: Send + Sync {
    /// Compile without side effects; `Err` means the template cannot be
    /// reproduced exactly.
    fn try_compile(&self, format: &str) -> Result<StrftimeChain, FormatError>;

    /// Check-only mode
    fn is_convertible(&self, format: &str) -> bool {
        self.try_compile(format).is_ok()
    }
}

/// Translator for DuckDB's `strftime`
#[derive(Debug, Clone, Copy, Default)]
pub struct StrftimeTranslator;

impl FormatTranslator for StrftimeTranslator {
    fn try_compile(&self, format: &str) -> Result<StrftimeChain, FormatError> {
        let result = compile(format);
        if let Err(err) = &result {
            trace!(format, error = %err, "to_char template not convertible");
        }
        result
    }
}

fn unsupported(input: &str, offset: usize) -> FormatError {
    let directive: String = input[offset..]
        .chars()
        .take_while(|c| c.is_alphanumeric())
        .collect();
    FormatError::UnsupportedDirective { directive, offset }
}

fn piece_segment(piece: Piece) -> Option<Segment> {
    match piece {
        Piece::Spec(spec) => Some(Segment::Strftime(spec.to_string())),
        Piece::Upper(spec) => Some(Segment::Upper(spec.to_string())),
        Piece::Lower(spec) => Some(Segment::Lower(spec.to_string())),
        Piece::Quarter => Some(Segment::Quarter),
        Piece::Unsupported => None,
    }
}

/// Compile a whole template
pub fn compile(format: &str) -> Result<StrftimeChain, FormatError> {
    if format.is_empty() {
        return Err(FormatError::Empty);
    }

    let mut chain = StrftimeChain::default();
    let mut pos = 0;

    while pos < format.len() {
        let rest = &format[pos..];
        let Some(c) = rest.chars().next() else { break };

        match c {
            '"' => {
                let (literal, consumed) = quoted_literal(rest).ok_or(FormatError::UnterminatedQuote(pos))?;
                chain.push_literal(&literal);
                pos += consumed;
            }
            '\\' => {
                // `\"` is a literal quote; any other backslash is itself
                match rest[1..].chars().next() {
                    Some('"') => {
                        chain.push_literal("\"");
                        pos += 2;
                    }
                    _ => {
                        chain.push_literal("\\");
                        pos += 1;
                    }
                }
            }
            c if c.is_alphabetic() => {
                let (table, skip) = if rest.starts_with(FILL_MODE_PREFIX) {
                    (FILL_MODE, FILL_MODE_PREFIX.len())
                } else {
                    (PLAIN, 0)
                };
                let directive = directives::lookup(table, &rest[skip..])
                    .ok_or_else(|| unsupported(format, pos))?;
                let segment = piece_segment(directive.piece).ok_or_else(|| unsupported(format, pos))?;
                chain.push(segment);
                pos += skip + directive.pattern.len();
            }
            c => {
                let mut buf = [0u8; 4];
                chain.push_literal(c.encode_utf8(&mut buf));
                pos += c.len_utf8();
            }
        }
    }

    Ok(chain)
}

/// Text of a `"..."` literal at the start of `input` and the bytes consumed,
/// or `None` when the closing quote is missing.
fn quoted_literal(input: &str) -> Option<(String, usize)> {
    let mut literal = String::new();
    let mut chars = input.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((literal, i + 1)),
            '\\' => match chars.next() {
                Some((_, escaped)) => literal.push(escaped),
                None => return None,
            },
            c => literal.push(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(format: &str) -> Segment {
        let chain = compile(format).unwrap();
        assert_eq!(chain.segments().len(), 1, "{:?}", chain);
        chain.segments()[0].clone()
    }

    #[test]
    fn test_date_template() {
        assert_eq!(single("YYYY-MM-DD"), Segment::Strftime("%Y-%m-%d".to_string()));
    }

    #[test]
    fn test_time_template() {
        assert_eq!(
            single("HH24:MI:SS.MS"),
            Segment::Strftime("%H:%M:%S.%g".to_string())
        );
        assert_eq!(single("hh12 AM"), Segment::Strftime("%I %p".to_string()));
    }

    #[test]
    fn test_fill_mode() {
        assert_eq!(
            single("FMDD FMMonth YYYY"),
            Segment::Strftime("%-d %B %Y".to_string())
        );
    }

    #[test]
    fn test_quoted_and_escaped_literals() {
        assert_eq!(
            single(r#"YYYY "Year" \"MM\""#),
            Segment::Strftime("%Y Year \"%m\"".to_string())
        );
        assert_eq!(single("100% DD"), Segment::Strftime("100%% %d".to_string()));
    }

    #[test]
    fn test_case_variants_build_chain() {
        let chain = compile("DD MON YYYY").unwrap();
        assert_eq!(
            chain.segments(),
            &[
                Segment::Strftime("%d ".to_string()),
                Segment::Upper("%b".to_string()),
                Segment::Strftime(" %Y".to_string()),
            ]
        );
    }

    #[test]
    fn test_unmapped_directives_fail_whole_template() {
        for format in ["YYYY-MM-DD TZ", "Month", "Day", "WW", "J", "DDth", "TMMonth", "SSSS", "IDDD"] {
            assert!(
                matches!(compile(format), Err(FormatError::UnsupportedDirective { .. })),
                "{} should not compile",
                format
            );
        }
    }

    #[test]
    fn test_mixed_case_directives_are_rejected() {
        assert_eq!(single("yyyy-mm-dd hh24:mi:ss"), Segment::Strftime("%Y-%m-%d %H:%M:%S".to_string()));
        for format in ["Yyyy", "Dd", "Hh24", "mM", "YYYY-Mm-DD", "FMDd"] {
            assert!(
                matches!(compile(format), Err(FormatError::UnsupportedDirective { .. })),
                "{} should not compile",
                format
            );
        }
    }

    #[test]
    fn test_error_reports_offset() {
        assert_eq!(
            compile("YYYY-WW"),
            Err(FormatError::UnsupportedDirective {
                directive: "WW".to_string(),
                offset: 5
            })
        );
    }

    #[test]
    fn test_empty_and_unterminated() {
        assert_eq!(compile(""), Err(FormatError::Empty));
        assert_eq!(compile("YYYY \"abc"), Err(FormatError::UnterminatedQuote(5)));
    }

    #[test]
    fn test_translator_check_only() {
        let translator = StrftimeTranslator;
        assert!(translator.is_convertible("YYYY"));
        assert!(!translator.is_convertible("YYYY TZ"));
    }
}
