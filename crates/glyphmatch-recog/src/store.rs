//! Template store
//!
//! An ordered collection of (letter, rotation, fingerprint) records with
//! two persisted forms:
//!
//! - **Text**: one record per line,
//!   `<letter><separator><rotation>,<at least 1024 bit characters>`
//! - **Binary**: back-to-back 133-byte records,
//!   `[letter: u8][rotation: i32, native endian][fingerprint: 128 bytes]`
//!
//! Malformed text lines and binary records with an unknown rotation are
//! skipped and counted in the returned [`LoadReport`]; only an unopenable
//! source fails the load. A load parses into a fresh store and swaps it
//! in, so a failed load leaves the previous contents untouched.

use crate::error::{RecogError, RecogResult};
use crate::fingerprint::{FINGERPRINT_BITS, FINGERPRINT_BYTES, Fingerprint};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Size of one binary record in bytes
pub const BINARY_RECORD_SIZE: usize = 1 + 4 + FINGERPRINT_BYTES;

/// One of the four canonical capture rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Rotation {
    /// Upright
    #[default]
    Deg0,
    /// Quarter turn clockwise
    Deg90,
    /// Half turn
    Deg180,
    /// Three quarter turns clockwise
    Deg270,
}

impl Rotation {
    /// All rotations in ascending angle order
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Angle in degrees
    pub fn degrees(self) -> i32 {
        self.quads() as i32 * 90
    }

    /// Number of clockwise quarter turns
    pub fn quads(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// Parse a canonical angle; anything else is `None`
    pub fn from_degrees(degrees: i32) -> Option<Rotation> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// A stored reference glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub letter: char,
    pub rotation: Rotation,
    pub fingerprint: Fingerprint,
}

impl Template {
    pub fn new(letter: char, rotation: Rotation, fingerprint: Fingerprint) -> Self {
        Template {
            letter,
            rotation,
            fingerprint,
        }
    }
}

/// How the bit characters of a text record become fingerprint bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBits {
    /// Character `k` sets byte `k` to 0xFF (`'1'`) or 0x00 (anything
    /// else), for the first 128 characters.
    #[default]
    Saturated,
    /// Character `i` sets bit `i`; the inverse of [`TemplateStore::write_text`].
    Packed,
}

/// A skipped line or record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    /// 1-based line number (text) or record index (binary)
    pub line: usize,
    pub reason: String,
}

/// Outcome of a load: how many records were kept and why others were not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub parsed: usize,
    pub skipped: usize,
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    fn skip(&mut self, line: usize, reason: &RecordError) {
        warn!(line, reason = %reason, "skipping malformed template line");
        self.skipped += 1;
        self.issues.push(LoadIssue {
            line,
            reason: reason.to_string(),
        });
    }
}

#[derive(Debug, Error)]
enum RecordError {
    #[error("line too short")]
    TooShort,
    #[error("missing comma")]
    MissingComma,
    #[error("rotation {0:?} is not an integer")]
    BadRotation(String),
    #[error("rotation {0} is not 0, 90, 180 or 270")]
    UnknownRotation(i32),
    #[error("expected {FINGERPRINT_BITS} bit characters, found {0}")]
    ShortBits(usize),
}

/// Template counts per letter and per rotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    pub per_letter: BTreeMap<char, usize>,
    /// Indexed by [`Rotation::quads`]
    pub per_rotation: [usize; 4],
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "templates: {}", self.total)?;
        for (letter, n) in &self.per_letter {
            writeln!(f, "  {}: {}", letter, n)?;
        }
        for r in Rotation::ALL {
            writeln!(f, "  {:>3}: {}", r.degrees(), self.per_rotation[r.quads() as usize])?;
        }
        Ok(())
    }
}

/// Ordered collection of templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateStore {
    templates: Vec<Template>,
}

impl TemplateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in scan order
    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub fn as_slice(&self) -> &[Template] {
        &self.templates
    }

    /// Append a template (training-time population)
    pub fn push(&mut self, template: Template) {
        self.templates.push(template);
    }

    /// Replace the whole contents
    pub fn replace_with(&mut self, templates: Vec<Template>) {
        self.templates = templates;
    }

    pub fn clear(&mut self) {
        self.templates.clear();
    }

    /// Distinct letters, sorted
    pub fn letters(&self) -> Vec<char> {
        self.stats().per_letter.into_keys().collect()
    }

    /// Per-letter and per-rotation counts
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            total: self.templates.len(),
            ..Default::default()
        };
        for t in &self.templates {
            *stats.per_letter.entry(t.letter).or_default() += 1;
            stats.per_rotation[t.rotation.quads() as usize] += 1;
        }
        stats
    }

    /// Replace the contents with templates from a text file.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::TemplateOpen`] if the file cannot be opened.
    pub fn load_text<P: AsRef<Path>>(&mut self, path: P, bits: TextBits) -> RecogResult<LoadReport> {
        let file = open(path.as_ref())?;
        let (store, report) = Self::read_text(BufReader::new(file), bits)?;
        *self = store;
        Ok(report)
    }

    /// Replace the contents with templates from a binary file.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::TemplateOpen`] if the file cannot be opened.
    pub fn load_binary<P: AsRef<Path>>(&mut self, path: P) -> RecogResult<LoadReport> {
        let file = open(path.as_ref())?;
        let (store, report) = Self::read_binary(BufReader::new(file))?;
        *self = store;
        Ok(report)
    }

    /// Load binary for a `.bin` extension, text otherwise
    pub fn load_auto<P: AsRef<Path>>(&mut self, path: P, bits: TextBits) -> RecogResult<LoadReport> {
        let is_bin = path
            .as_ref()
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("bin"));
        if is_bin {
            self.load_binary(path)
        } else {
            self.load_text(path, bits)
        }
    }

    /// Parse the text form from any buffered reader
    pub fn read_text<R: BufRead>(mut reader: R, bits: TextBits) -> RecogResult<(Self, LoadReport)> {
        let mut store = TemplateStore::new();
        let mut report = LoadReport::default();
        let mut raw = Vec::new();
        let mut line_no = 0;

        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            line_no += 1;
            // invalid UTF-8 decodes to U+FFFD, which reads as a 0 bit
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            match parse_text_record(line, bits) {
                Ok(t) => {
                    store.templates.push(t);
                    report.parsed += 1;
                }
                Err(e) => report.skip(line_no, &e),
            }
        }

        debug!(
            parsed = report.parsed,
            skipped = report.skipped,
            "loaded text templates"
        );
        Ok((store, report))
    }

    /// Parse the binary form from any reader
    ///
    /// Reading stops at end of stream or at a partial trailing record,
    /// which is discarded.
    pub fn read_binary<R: Read>(mut reader: R) -> RecogResult<(Self, LoadReport)> {
        let mut store = TemplateStore::new();
        let mut report = LoadReport::default();
        let mut record = [0u8; BINARY_RECORD_SIZE];
        let mut index = 0;

        loop {
            let n = read_full(&mut reader, &mut record)?;
            if n < BINARY_RECORD_SIZE {
                if n > 0 {
                    debug!(bytes = n, "discarding partial trailing template record");
                }
                break;
            }
            index += 1;

            let letter = record[0] as char;
            let mut rot = [0u8; 4];
            rot.copy_from_slice(&record[1..5]);
            let degrees = i32::from_ne_bytes(rot);
            let Some(rotation) = Rotation::from_degrees(degrees) else {
                report.skip(index, &RecordError::UnknownRotation(degrees));
                continue;
            };
            let fingerprint = Fingerprint::from_bytes(&record[5..])?;

            store.templates.push(Template::new(letter, rotation, fingerprint));
            report.parsed += 1;
        }

        debug!(
            parsed = report.parsed,
            skipped = report.skipped,
            "loaded binary templates"
        );
        Ok((store, report))
    }

    /// Write the binary form
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::Unserializable`] for a letter outside
    /// U+0000..=U+00FF, which has no single-byte encoding.
    pub fn write_binary<W: Write>(&self, mut writer: W) -> RecogResult<()> {
        for t in &self.templates {
            let letter = u8::try_from(t.letter as u32).map_err(|_| {
                RecogError::Unserializable(format!("letter {:?} does not fit in a byte", t.letter))
            })?;
            writer.write_all(&[letter])?;
            writer.write_all(&t.rotation.degrees().to_ne_bytes())?;
            writer.write_all(t.fingerprint.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the text form, one `<letter>_<rotation>,<bits>` line per
    /// template with bit `i` as character `i`
    pub fn write_text<W: Write>(&self, mut writer: W) -> RecogResult<()> {
        for t in &self.templates {
            writeln!(
                writer,
                "{}_{},{}",
                t.letter,
                t.rotation,
                t.fingerprint.to_bit_string()
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the binary form to a file
    pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> RecogResult<()> {
        self.write_binary(BufWriter::new(File::create(path)?))
    }

    /// Write the text form to a file
    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> RecogResult<()> {
        self.write_text(BufWriter::new(File::create(path)?))
    }
}

impl FromIterator<Template> for TemplateStore {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        TemplateStore {
            templates: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TemplateStore {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

fn open(path: &Path) -> RecogResult<File> {
    File::open(path).map_err(|source| RecogError::TemplateOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Fill `buf` as far as the stream allows; returns bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn parse_text_record(line: &str, bits: TextBits) -> Result<Template, RecordError> {
    let mut chars = line.chars();
    let letter = chars.next().ok_or(RecordError::TooShort)?;
    // one separator character between letter and rotation
    chars.next().ok_or(RecordError::TooShort)?;
    let rest = chars.as_str();

    let (rot_field, bit_field) = rest.split_once(',').ok_or(RecordError::MissingComma)?;
    let degrees: i32 = rot_field
        .trim()
        .parse()
        .map_err(|_| RecordError::BadRotation(rot_field.to_string()))?;
    let rotation = Rotation::from_degrees(degrees).ok_or(RecordError::UnknownRotation(degrees))?;

    let bit_chars: Vec<bool> = bit_field
        .chars()
        .take(FINGERPRINT_BITS)
        .map(|c| c == '1')
        .collect();
    if bit_chars.len() < FINGERPRINT_BITS {
        return Err(RecordError::ShortBits(bit_chars.len()));
    }

    let fingerprint = match bits {
        TextBits::Saturated => {
            let mut bytes = [0u8; FINGERPRINT_BYTES];
            for (b, &on) in bytes.iter_mut().zip(bit_chars.iter()) {
                *b = if on { 0xFF } else { 0x00 };
            }
            Fingerprint::from_array(bytes)
        }
        TextBits::Packed => {
            let mut bytes = [0u8; FINGERPRINT_BYTES];
            for (i, _) in bit_chars.iter().enumerate().filter(|(_, on)| **on) {
                bytes[i / 8] |= 1 << (i % 8);
            }
            Fingerprint::from_array(bytes)
        }
    };

    Ok(Template::new(letter, rotation, fingerprint))
}
