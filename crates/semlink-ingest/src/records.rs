// SPDX-License-Identifier: Apache-2.0

use semlink_core::NONE_TOKEN;
use semlink_model::{
    normalize_class_label, strip_verb_suffix, FrameResolution, GroupId, InstanceFragment,
    InstanceId, MergeField, ParseError as IdParseError, Provenance, RolesetId, ALL_MERGE_FIELDS,
};
use std::fmt::{Display, Formatter};

const GOLD_MARKER: &str = "gold";
const NOUN_SUFFIX: &str = "-n";

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    ColumnCount { expected: &'static str, found: usize },
    InvalidNumber(String),
    EmptyField(&'static str),
    InvalidField(String),
}

/// A rejected annotation line. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ParseErrorKind::ColumnCount { expected, found } => write!(
                f,
                "line {}: expected {expected} columns, found {found}",
                self.line
            ),
            ParseErrorKind::InvalidNumber(raw) => {
                write!(f, "line {}: invalid number `{raw}`", self.line)
            }
            ParseErrorKind::EmptyField(name) => write!(f, "line {}: empty {name}", self.line),
            ParseErrorKind::InvalidField(msg) => write!(f, "line {}: {msg}", self.line),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<IdParseError> for ParseErrorKind {
    fn from(e: IdParseError) -> Self {
        match e {
            IdParseError::InvalidNumber(_, raw) => Self::InvalidNumber(raw),
            IdParseError::Empty(name) => Self::EmptyField(name),
            other => Self::InvalidField(other.to_string()),
        }
    }
}

/// Annotation source a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    VerbNet,
    PropBank,
    OntoNotes,
    Unified,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VerbNet => "vn",
            Self::PropBank => "pb",
            Self::OntoNotes => "on",
            Self::Unified => "unified",
        }
    }

    /// Fields a record of this kind may merge into an existing instance.
    #[must_use]
    pub const fn merge_fields(self) -> &'static [MergeField] {
        match self {
            Self::VerbNet => &[MergeField::VnClass],
            Self::PropBank => &[MergeField::PbRoleset],
            Self::OntoNotes => &[MergeField::OnGroup],
            Self::Unified => &ALL_MERGE_FIELDS,
        }
    }
}

/// One whitespace-tokenized annotation line, tagged with its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawRecord<'a> {
    /// `file sent tok verb class`
    VerbNet(&'a str),
    /// `file sent tok tagger verb roleset dep...`
    PropBank(&'a str),
    /// `file sent tok verb group`
    OntoNotes(&'a str),
    /// `file sent tok [gold] verb vn fn pb on dep...|None`
    Unified(&'a str),
}

/// What an adapter made of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adapted {
    Fragment(InstanceFragment),
    Rejected { id: InstanceId, reason: &'static str },
}

impl<'a> RawRecord<'a> {
    #[must_use]
    pub const fn new(kind: RecordKind, line: &'a str) -> Self {
        match kind {
            RecordKind::VerbNet => Self::VerbNet(line),
            RecordKind::PropBank => Self::PropBank(line),
            RecordKind::OntoNotes => Self::OntoNotes(line),
            RecordKind::Unified => Self::Unified(line),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::VerbNet(_) => RecordKind::VerbNet,
            Self::PropBank(_) => RecordKind::PropBank,
            Self::OntoNotes(_) => RecordKind::OntoNotes,
            Self::Unified(_) => RecordKind::Unified,
        }
    }

    pub fn parse(&self, line_no: usize) -> Result<Adapted, ParseError> {
        let result = match *self {
            Self::VerbNet(line) => parse_verbnet(line),
            Self::PropBank(line) => parse_propbank(line),
            Self::OntoNotes(line) => parse_ontonotes(line),
            Self::Unified(line) => parse_unified(line),
        };
        result.map_err(|kind| ParseError {
            line: line_no,
            kind,
        })
    }
}

fn columns(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

fn expect_exact(cols: &[&str], n: usize, expected: &'static str) -> Result<(), ParseErrorKind> {
    if cols.len() == n {
        Ok(())
    } else {
        Err(ParseErrorKind::ColumnCount {
            expected,
            found: cols.len(),
        })
    }
}

fn expect_at_least(cols: &[&str], n: usize, expected: &'static str) -> Result<(), ParseErrorKind> {
    if cols.len() >= n {
        Ok(())
    } else {
        Err(ParseErrorKind::ColumnCount {
            expected,
            found: cols.len(),
        })
    }
}

fn instance_id(cols: &[&str]) -> Result<InstanceId, ParseErrorKind> {
    Ok(InstanceId::parse(cols[0], cols[1], cols[2])?)
}

fn is_placeholder(raw: &str) -> bool {
    raw == NONE_TOKEN || raw == "null"
}

fn optional<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, IdParseError>,
) -> Result<Option<T>, ParseErrorKind> {
    if is_placeholder(raw) {
        return Ok(None);
    }
    Ok(Some(parse(raw)?))
}

fn parse_verbnet(line: &str) -> Result<Adapted, ParseErrorKind> {
    let cols = columns(line);
    expect_exact(&cols, 5, "5")?;
    let id = instance_id(&cols)?;
    let mut fragment = InstanceFragment::new(id, strip_verb_suffix(cols[3]), Provenance::VerbNet);
    if !is_placeholder(cols[4]) {
        fragment.vn_class = normalize_class_label(cols[4]);
        if fragment.vn_class.is_none() {
            tracing::debug!(instance = %fragment.id, label = cols[4], "vn class label has no numeric part");
        }
    }
    Ok(Adapted::Fragment(fragment))
}

fn parse_propbank(line: &str) -> Result<Adapted, ParseErrorKind> {
    let cols = columns(line);
    expect_at_least(&cols, 6, "at least 6")?;
    let id = instance_id(&cols)?;
    let mut fragment = InstanceFragment::new(id, strip_verb_suffix(cols[4]), Provenance::PropBank);
    fragment.pb_roleset = optional(cols[5], RolesetId::parse)?;
    fragment.dependencies = Some(cols[6..].iter().map(ToString::to_string).collect());
    Ok(Adapted::Fragment(fragment))
}

fn parse_ontonotes(line: &str) -> Result<Adapted, ParseErrorKind> {
    let cols = columns(line);
    expect_exact(&cols, 5, "5")?;
    let id = instance_id(&cols)?;
    if cols[3].ends_with(NOUN_SUFFIX) {
        return Ok(Adapted::Rejected {
            id,
            reason: "noun sense",
        });
    }
    let mut fragment =
        InstanceFragment::new(id, strip_verb_suffix(cols[3]), Provenance::OntoNotes);
    fragment.on_group = optional(cols[4], GroupId::parse)?;
    Ok(Adapted::Fragment(fragment))
}

fn parse_unified(line: &str) -> Result<Adapted, ParseErrorKind> {
    let mut cols = columns(line);
    if cols.get(3) == Some(&GOLD_MARKER) {
        cols.remove(3);
    }
    expect_at_least(&cols, 8, "at least 8")?;
    let id = instance_id(&cols)?;
    let mut fragment =
        InstanceFragment::new(id, strip_verb_suffix(cols[3]), Provenance::PriorRelease);
    fragment.vn_class = if is_placeholder(cols[4]) {
        None
    } else {
        Some(normalize_class_label(cols[4]).ok_or_else(|| {
            ParseErrorKind::InvalidField(format!("vn class `{}` has no numeric part", cols[4]))
        })?)
    };
    fragment.fn_frame = FrameResolution::from_token(cols[5]);
    fragment.pb_roleset = optional(cols[6], RolesetId::parse)?;
    fragment.on_group = optional(cols[7], GroupId::parse)?;
    let deps = &cols[8..];
    fragment.dependencies = match deps {
        [] => None,
        [only] if is_placeholder(only) => None,
        _ => Some(deps.iter().map(ToString::to_string).collect()),
    };
    Ok(Adapted::Fragment(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(record: RawRecord<'_>) -> InstanceFragment {
        match record.parse(1).expect("parse") {
            Adapted::Fragment(f) => f,
            Adapted::Rejected { reason, .. } => panic!("rejected: {reason}"),
        }
    }

    #[test]
    fn verbnet_line_normalizes_class_and_verb() {
        let f = fragment(RawRecord::VerbNet("nw/wsj/00/wsj_0001.mrg 0 8 join-v vncls-22.1-2"));
        assert_eq!(f.id.source_file(), "wsj_0001.mrg");
        assert_eq!(f.verb, "join");
        assert_eq!(f.vn_class.as_ref().map(|c| c.as_str()), Some("22.1-2"));
    }

    #[test]
    fn propbank_line_keeps_trailing_dependencies() {
        let f = fragment(RawRecord::PropBank(
            "wsj_0001.mrg 0 8 gold join-v join.01 0:2-ARG0 7:0-rel",
        ));
        assert_eq!(f.verb, "join");
        assert_eq!(f.pb_roleset.as_ref().map(|r| r.as_str()), Some("join.01"));
        assert_eq!(
            f.dependencies,
            Some(vec!["0:2-ARG0".to_string(), "7:0-rel".to_string()])
        );
    }

    #[test]
    fn ontonotes_noun_senses_are_rejected() {
        let parsed = RawRecord::OntoNotes("wsj_0001.mrg 1 3 bank-n 2").parse(4).expect("parse");
        assert!(matches!(parsed, Adapted::Rejected { reason: "noun sense", .. }));
    }

    #[test]
    fn unified_line_skips_gold_marker_and_placeholders() {
        let f = fragment(RawRecord::Unified(
            "wsj_0001.mrg 0 8 gold join-v 22.1-2 NF join.01 null None",
        ));
        assert_eq!(f.verb, "join");
        assert_eq!(f.fn_frame, FrameResolution::NoMapping);
        assert!(f.on_group.is_none());
        assert!(f.dependencies.is_none());
    }

    #[test]
    fn wrong_column_count_names_the_line() {
        let err = RawRecord::VerbNet("wsj_0001.mrg 0 8 join").parse(17).expect_err("short");
        assert_eq!(err.line, 17);
        assert_eq!(
            err.kind,
            ParseErrorKind::ColumnCount {
                expected: "5",
                found: 4
            }
        );
    }

    #[test]
    fn unified_class_without_numeric_part_is_an_error() {
        let err = RawRecord::Unified("wsj_0001.mrg 0 8 join-v vncls NF join.01 None None")
            .parse(4)
            .expect_err("bad class");
        assert_eq!(err.line, 4);
        assert_eq!(
            err.kind,
            ParseErrorKind::InvalidField("vn class `vncls` has no numeric part".to_string())
        );
        let f = fragment(RawRecord::Unified(
            "wsj_0001.mrg 0 8 join-v vncls-22.1-2 NF join.01 None None",
        ));
        assert_eq!(f.vn_class.as_ref().map(|c| c.as_str()), Some("22.1-2"));
    }

    #[test]
    fn non_numeric_positions_are_rejected() {
        let err = RawRecord::OntoNotes("wsj_0001.mrg x 3 give 1").parse(2).expect_err("nan");
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber("x".to_string()));
    }
}
