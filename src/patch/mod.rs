//! Text patches for string members.
//!
//! Dialog text lives in `BinaryObjectString` records nested directly inside class records. A
//! patch addresses one of them by the index of the top-level class record and the index of the
//! member within it, and replaces the text. Object ids, record order and every other member stay
//! as they are; the string length is recomputed when the document is written.
//!
//! Patches are usually exchanged as text blocks with one entry per coordinate:
//!
//! ```text
//! 5,2=>'::Another:: string to set.'
//! 3,1=>''
//! 2,2=>'Text spanning
//! two lines'
//! ```
//!
//! The text runs from the first quote to the first quote that ends a line. Lines that do not
//! match the entry pattern, such as comments, are ignored.
//!
//! # Examples
//!
//! ```rust
//! use udlg::{parse_patch_block, Document};
//!
//! let data = std::fs::read("tests/samples/dialog.dat")?;
//! let mut document = Document::parse(&data)?;
//!
//! let patches = parse_patch_block(b"5,2=>'Danke.'\n")?;
//! document.apply_patch(&patches)?;
//!
//! let reparsed = Document::parse(&document.to_bytes()?)?;
//! assert_eq!(reparsed.strings().get(5, 2), Some("Danke."));
//! # Ok::<(), udlg::Error>(())
//! ```

use std::{
    collections::{btree_map, BTreeMap},
    sync::LazyLock,
};

use log::{debug, trace};
use regex::Regex;

use crate::{
    binaryformat::{Document, MemberValue, Record},
    Error, Result,
};

/// Entry pattern of a patch block. The text is lazy so that it stops at the first quote that
/// closes a line.
const ENTRY_PATTERN: &str = r"(?msR)(\d+),(\d+)=>(''|'.+?')$";

static ENTRY_REGEX: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(ENTRY_PATTERN));

/// One text replacement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPatch {
    /// Index of the top-level class record
    pub record_index: usize,
    /// Index of the member within the record
    pub member_index: usize,
    /// Replacement text
    pub text: String,
}

/// A set of text patches, ordered by record index and then member index. Each coordinate holds
/// at most one text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchSet {
    entries: BTreeMap<(usize, usize), String>,
}

impl PatchSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text for a coordinate, returning the text it replaces.
    pub fn insert(
        &mut self,
        record_index: usize,
        member_index: usize,
        text: impl Into<String>,
    ) -> Option<String> {
        self.entries
            .insert((record_index, member_index), text.into())
    }

    /// Text stored for a coordinate.
    #[must_use]
    pub fn get(&self, record_index: usize, member_index: usize) -> Option<&str> {
        self.entries
            .get(&(record_index, member_index))
            .map(String::as_str)
    }

    /// Number of patches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set holds no patches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(record_index, member_index, text)` in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &str)> {
        self.entries
            .iter()
            .map(|(&(record, member), text)| (record, member, text.as_str()))
    }

    /// Render the set as a patch block that [`parse_patch_block`] reads back.
    ///
    /// A text containing a quote directly followed by a line break cannot be represented and
    /// would be cut short when read back.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (record, member, value) in self.iter() {
            text.push_str(&format!("{record},{member}=>'{value}'\n"));
        }
        text
    }
}

impl Extend<TextPatch> for PatchSet {
    fn extend<T: IntoIterator<Item = TextPatch>>(&mut self, iter: T) {
        for patch in iter {
            self.insert(patch.record_index, patch.member_index, patch.text);
        }
    }
}

impl FromIterator<TextPatch> for PatchSet {
    fn from_iter<T: IntoIterator<Item = TextPatch>>(iter: T) -> Self {
        let mut set = PatchSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for PatchSet {
    type Item = TextPatch;
    type IntoIter = std::iter::Map<
        btree_map::IntoIter<(usize, usize), String>,
        fn(((usize, usize), String)) -> TextPatch,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .into_iter()
            .map(into_patch as fn(((usize, usize), String)) -> TextPatch)
    }
}

fn into_patch(((record_index, member_index), text): ((usize, usize), String)) -> TextPatch {
    TextPatch {
        record_index,
        member_index,
        text,
    }
}

/// Parse a patch block. Later entries for the same coordinate replace earlier ones.
///
/// # Errors
/// Returns [`Error::Malformed`] if the block is not valid UTF-8 or a coordinate does not fit
/// into `usize`.
pub fn parse_patch_block(data: &[u8]) -> Result<PatchSet> {
    let block = std::str::from_utf8(data)
        .map_err(|error| malformed_error!("Patch block is not valid UTF-8 - {}", error))?;
    let pattern = ENTRY_REGEX
        .as_ref()
        .map_err(|error| malformed_error!("Invalid patch pattern - {}", error))?;

    let mut patches = PatchSet::new();
    for captures in pattern.captures_iter(block) {
        let record_index = parse_index(&captures[1])?;
        let member_index = parse_index(&captures[2])?;
        let quoted = &captures[3];
        let text = &quoted[1..quoted.len() - 1];

        if let Some(previous) = patches.insert(record_index, member_index, text) {
            trace!(
                "Patch {},{} replaces earlier text '{}'",
                record_index,
                member_index,
                previous
            );
        }
    }

    debug!("Parsed {} text patches", patches.len());
    Ok(patches)
}

fn parse_index(digits: &str) -> Result<usize> {
    digits
        .parse()
        .map_err(|_| malformed_error!("Patch coordinate '{}' is out of range", digits))
}

fn target(records: &[Record], record_index: usize, member_index: usize) -> Result<&str> {
    let record = records.get(record_index).ok_or(Error::IndexOutOfRange {
        record_index,
        member_index,
    })?;
    let members = record.members().ok_or_else(|| {
        Error::TypeMismatch(format!(
            "record {} is a {:?}, not a class record",
            record_index,
            record.record_type()
        ))
    })?;

    match members.get(member_index) {
        None => Err(Error::IndexOutOfRange {
            record_index,
            member_index,
        }),
        Some(MemberValue::Record(nested)) => nested.as_str().ok_or_else(|| {
            Error::TypeMismatch(format!(
                "member {},{} holds a {:?}, not a string",
                record_index,
                member_index,
                nested.record_type()
            ))
        }),
        Some(MemberValue::Primitive(value)) => Err(Error::TypeMismatch(format!(
            "member {},{} holds an inline {:?}, not a string",
            record_index,
            member_index,
            value.primitive_type()
        ))),
    }
}

fn target_mut(
    records: &mut [Record],
    record_index: usize,
    member_index: usize,
) -> Option<&mut String> {
    let members = records.get_mut(record_index)?.members_mut()?;
    match members.get_mut(member_index)? {
        MemberValue::Record(nested) => match nested.as_mut() {
            Record::BinaryObjectString(string) => Some(&mut string.value),
            _ => None,
        },
        MemberValue::Primitive(_) => None,
    }
}

impl Document {
    /// Replace the text of the string stored at `member_index` of the class record at
    /// `record_index`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if either index is invalid and
    /// [`Error::TypeMismatch`] if the record is not a class record or the member is not a
    /// string. The document is unchanged on error.
    pub fn apply_text_patch(
        &mut self,
        record_index: usize,
        member_index: usize,
        text: &str,
    ) -> Result<()> {
        target(self.records(), record_index, member_index)?;

        if let Some(value) = target_mut(self.records_mut(), record_index, member_index) {
            text.clone_into(value);
        }
        Ok(())
    }

    /// Apply every patch of the set. All coordinates are checked first, so either the whole set
    /// is applied or the document is left unchanged.
    ///
    /// # Errors
    /// Returns the error of the first invalid coordinate, see [`Document::apply_text_patch`].
    pub fn apply_patch(&mut self, patches: &PatchSet) -> Result<usize> {
        for (record_index, member_index, _) in patches.iter() {
            target(self.records(), record_index, member_index)?;
        }

        let mut applied = 0;
        for (record_index, member_index, text) in patches.iter() {
            if let Some(value) = target_mut(self.records_mut(), record_index, member_index) {
                text.clone_into(value);
                applied += 1;
            }
        }

        debug!("Applied {} text patches", applied);
        Ok(applied)
    }

    /// Every patchable string with its current text. Rendering the result with
    /// [`PatchSet::to_text`] gives a template for translators.
    #[must_use]
    pub fn strings(&self) -> PatchSet {
        let mut strings = PatchSet::new();
        for (record_index, record) in self.records().iter().enumerate() {
            let Some(members) = record.members() else {
                continue;
            };
            for (member_index, member) in members.iter().enumerate() {
                if let Some(text) = member.as_record().and_then(Record::as_str) {
                    strings.insert(record_index, member_index, text);
                }
            }
        }
        strings
    }
}
