// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

pub const ID_MAX_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    InvalidNumber(&'static str, String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::InvalidNumber(name, raw) => write!(f, "{name} must be a number, got `{raw}`"),
        }
    }
}

impl std::error::Error for ParseError {}

fn check_token(kind: &'static str, input: &str) -> Result<(), ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty(kind));
    }
    if input.trim() != input {
        return Err(ParseError::Trimmed(kind));
    }
    if input.len() > ID_MAX_LEN {
        return Err(ParseError::TooLong(kind, ID_MAX_LEN));
    }
    Ok(())
}

macro_rules! string_id {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(input: &str) -> Result<Self, ParseError> {
                check_token($kind, input)?;
                Ok(Self(input.to_string()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ClassId, "vn_class");
string_id!(RolesetId, "pb_roleset");
string_id!(FrameName, "fn_frame");
string_id!(GroupId, "on_group");

impl ClassId {
    /// Class with any `-` qualifier removed: `9.1-2` -> `9.1`.
    #[must_use]
    pub fn root(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl RolesetId {
    /// Lemma part of `lemma.sense`.
    #[must_use]
    pub fn lemma(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }
}

/// Reduces a raw VerbNet class label to its numerical identifier.
///
/// Labels that already start with a digit are kept; otherwise the leading
/// non-numeric segment is dropped (`vnclass-9.1-2` -> `9.1-2`,
/// `give-13.1` -> `13.1`). Returns `None` when nothing numeric remains.
#[must_use]
pub fn normalize_class_label(raw: &str) -> Option<ClassId> {
    let raw = raw.trim();
    if raw.starts_with(|c: char| c.is_ascii_digit()) {
        return ClassId::parse(raw).ok();
    }
    let (_, rest) = raw.split_once('-')?;
    ClassId::parse(rest).ok()
}

/// Token position of one verb occurrence.
///
/// Ordering is numeric: document index (first digit run in the file name),
/// then sentence, then token, then the file name itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceId {
    source_file: String,
    sentence: u64,
    token: u64,
}

impl InstanceId {
    pub fn new(source_file: &str, sentence: u64, token: u64) -> Result<Self, ParseError> {
        let basename = source_file.rsplit('/').next().unwrap_or(source_file);
        check_token("source_file", basename)?;
        Ok(Self {
            source_file: basename.to_string(),
            sentence,
            token,
        })
    }

    /// Parses the three leading columns of an annotation line.
    pub fn parse(source_file: &str, sentence: &str, token: &str) -> Result<Self, ParseError> {
        let sentence = sentence
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidNumber("sentence_index", sentence.to_string()))?;
        let token = token
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidNumber("token_index", token.to_string()))?;
        Self::new(source_file, sentence, token)
    }

    #[must_use]
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    #[must_use]
    pub const fn sentence(&self) -> u64 {
        self.sentence
    }

    #[must_use]
    pub const fn token(&self) -> u64 {
        self.token
    }

    /// `wsj_0123.mrg` -> `Some(123)`.
    #[must_use]
    pub fn document_index(&self) -> Option<u64> {
        let digits: String = self
            .source_file
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse::<u64>().ok()
    }

    #[must_use]
    pub fn canonical_string(&self) -> String {
        format!("{} {} {}", self.source_file, self.sentence, self.token)
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.source_file, self.sentence, self.token)
    }
}

impl Ord for InstanceId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.document_index()
            .cmp(&other.document_index())
            .then(self.sentence.cmp(&other.sentence))
            .then(self.token.cmp(&other.token))
            .then_with(|| self.source_file.cmp(&other.source_file))
    }
}

impl PartialOrd for InstanceId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
