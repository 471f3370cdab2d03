//! `to_char` template directives and their DuckDB equivalents

/// What a directive compiles to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece {
    /// A `strftime` specifier
    Spec(&'static str),
    /// `upper(strftime(x, spec))`
    Upper(&'static str),
    /// `lower(strftime(x, spec))`
    Lower(&'static str),
    /// `quarter(x)`
    Quarter,
    /// Recognized, but the secondary engine cannot reproduce it
    Unsupported,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Directive {
    pub pattern: &'static str,
    /// Numeric fields are spelled all-upper or all-lower; textual fields use
    /// the case to pick capitalization and match exactly.
    pub lower_alias: bool,
    pub piece: Piece,
}

const fn ci(pattern: &'static str, piece: Piece) -> Directive {
    Directive { pattern, lower_alias: true, piece }
}

const fn cs(pattern: &'static str, piece: Piece) -> Directive {
    Directive { pattern, lower_alias: false, piece }
}

/// Directives without a fill-mode prefix. Longer patterns precede their
/// prefixes.
pub(crate) const PLAIN: &[Directive] = &[
    ci("HH24", Piece::Spec("%H")),
    ci("HH12", Piece::Spec("%I")),
    ci("HH", Piece::Spec("%I")),
    ci("IDDD", Piece::Unsupported),
    ci("IYYY", Piece::Spec("%G")),
    ci("ID", Piece::Spec("%u")),
    ci("IW", Piece::Spec("%V")),
    ci("YYYY", Piece::Spec("%Y")),
    ci("YY", Piece::Spec("%y")),
    // blank-padded to nine characters
    cs("MONTH", Piece::Unsupported),
    cs("Month", Piece::Unsupported),
    cs("month", Piece::Unsupported),
    cs("MON", Piece::Upper("%b")),
    cs("Mon", Piece::Spec("%b")),
    cs("mon", Piece::Lower("%b")),
    ci("MM", Piece::Spec("%m")),
    ci("MI", Piece::Spec("%M")),
    ci("MS", Piece::Spec("%g")),
    ci("SSSSS", Piece::Unsupported),
    ci("SSSS", Piece::Unsupported),
    ci("SS", Piece::Spec("%S")),
    ci("US", Piece::Spec("%f")),
    cs("AM", Piece::Spec("%p")),
    cs("PM", Piece::Spec("%p")),
    cs("am", Piece::Lower("%p")),
    cs("pm", Piece::Lower("%p")),
    ci("DDD", Piece::Spec("%j")),
    ci("DD", Piece::Spec("%d")),
    // blank-padded to nine characters
    cs("DAY", Piece::Unsupported),
    cs("Day", Piece::Unsupported),
    cs("day", Piece::Unsupported),
    cs("DY", Piece::Upper("%a")),
    cs("Dy", Piece::Spec("%a")),
    cs("dy", Piece::Lower("%a")),
    ci("Q", Piece::Quarter),
];

/// Directives following an `FM` (fill mode) prefix, which suppresses
/// padding.
pub(crate) const FILL_MODE: &[Directive] = &[
    ci("HH24", Piece::Spec("%-H")),
    ci("HH12", Piece::Spec("%-I")),
    ci("HH", Piece::Spec("%-I")),
    ci("MI", Piece::Spec("%-M")),
    ci("SSSSS", Piece::Unsupported),
    ci("SSSS", Piece::Unsupported),
    ci("SS", Piece::Spec("%-S")),
    ci("DDD", Piece::Spec("%-j")),
    ci("DD", Piece::Spec("%-d")),
    cs("MONTH", Piece::Upper("%B")),
    cs("Month", Piece::Spec("%B")),
    cs("month", Piece::Lower("%B")),
    cs("MON", Piece::Upper("%b")),
    cs("Mon", Piece::Spec("%b")),
    cs("mon", Piece::Lower("%b")),
    ci("MM", Piece::Spec("%-m")),
    cs("DAY", Piece::Upper("%A")),
    cs("Day", Piece::Spec("%A")),
    cs("day", Piece::Lower("%A")),
    cs("DY", Piece::Upper("%a")),
    cs("Dy", Piece::Spec("%a")),
    cs("dy", Piece::Lower("%a")),
    cs("AM", Piece::Spec("%p")),
    cs("PM", Piece::Spec("%p")),
    cs("am", Piece::Lower("%p")),
    cs("pm", Piece::Lower("%p")),
    ci("ID", Piece::Spec("%u")),
    ci("Q", Piece::Quarter),
];

pub(crate) const FILL_MODE_PREFIX: &str = "FM";

impl Directive {
    pub fn matches(&self, input: &str) -> bool {
        match input.get(..self.pattern.len()) {
            Some(head) if self.lower_alias => head == self.pattern || is_lower_spelling(head, self.pattern),
            Some(head) => head == self.pattern,
            None => false,
        }
    }
}

fn is_lower_spelling(head: &str, pattern: &str) -> bool {
    head.bytes()
        .zip(pattern.bytes())
        .all(|(h, p)| h == p.to_ascii_lowercase())
}

/// First directive in `table` that `input` starts with
pub(crate) fn lookup(table: &[Directive], input: &str) -> Option<Directive> {
    table.iter().copied().find(|d| d.matches(input))
}
