//! PPT file parser implementation.
//!
//! Parses legacy PowerPoint files using the OLE/CFB container format.
//! The record tree of the `PowerPoint Document` stream is walked for text
//! atoms, which are grouped into slides at slide persist boundaries. Each
//! text atom becomes one text shape; legacy decks expose no images, links
//! or tables.

use std::collections::HashSet;
use std::io::{Read, Seek};

use cfb::CompoundFile;
use docex_core::model::{Shape, Slide, SlideDeck};
use docex_core::{Error, Result};

/// Minimum stream size for a valid PPT file (bytes).
const MIN_STREAM_SIZE: usize = 512;

/// Highest text type defined for `RT_TextHeaderAtom`.
const MAX_SUPPORTED_TEXT_TYPE: u32 = 8;

/// Malformed records tolerated before the stream is rejected.
const MAX_MALFORMED_RECORDS: usize = 10;

const POWERPOINT_STREAM: &str = "/PowerPoint Document";

/// Record type constants for the PPT binary format.
mod record_types {
    pub const RT_DOCUMENT: u16 = 0x03E8;
    pub const RT_MAIN_MASTER: u16 = 0x03F8;
    pub const RT_SLIDE_PERSIST_ATOM: u16 = 0x03F3;
    pub const RT_TEXT_HEADER_ATOM: u16 = 0x0F9F;
    pub const RT_TEXT_CHARS_ATOM: u16 = 0x0FA0;
    pub const RT_TEXT_BYTES_ATOM: u16 = 0x0FA8;
}

/// Facts gathered by a structural scan of the document stream.
#[derive(Debug, Default)]
struct StreamSummary {
    stream_size: usize,
    has_document: bool,
    text_record_count: usize,
    unsupported_text_types: HashSet<u32>,
    malformed_records: usize,
}

/// Text types from `RT_TextHeaderAtom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextType {
    Title,
    Body,
    Notes,
    NotUsed,
    Other,
    CenterBody,
    CenterTitle,
    HalfBody,
    QuarterBody,
}

impl TextType {
    fn from_u32(value: u32) -> Self {
        match value {
            0 => TextType::Title,
            1 => TextType::Body,
            2 => TextType::Notes,
            3 => TextType::NotUsed,
            5 => TextType::CenterBody,
            6 => TextType::CenterTitle,
            7 => TextType::HalfBody,
            8 => TextType::QuarterBody,
            _ => TextType::Other,
        }
    }

    fn is_title(&self) -> bool {
        matches!(self, TextType::Title | TextType::CenterTitle)
    }

    /// Whether text of this type is shown on the slide itself.
    fn is_slide_content(&self) -> bool {
        !matches!(self, TextType::Notes | TextType::NotUsed)
    }
}

/// A text atom found while walking the record tree.
#[derive(Debug)]
struct TextEntry {
    text: String,
    text_type: TextType,
    position: usize,
    slide_hint: usize,
}

/// Walker state carried through nested containers.
#[derive(Debug)]
struct WalkState {
    text_type: TextType,
    slide_persist_count: usize,
}

/// Parser for legacy PPT (OLE/CFB) files.
pub struct PptParser;

impl PptParser {
    /// Create a new PPT parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPT file from a reader into a text-only slide deck.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<SlideDeck> {
        let mut cfb = CompoundFile::open(reader)
            .map_err(|e| Error::Cfb(format!("Failed to open CFB container: {}", e)))?;

        self.validate_cfb_structure(&cfb)?;
        let stream_data = self.read_powerpoint_stream(&mut cfb)?;
        let summary = self.validate_stream(&stream_data)?;

        log::debug!(
            "PPT stream: size={}, text_records={}, malformed={}",
            summary.stream_size,
            summary.text_record_count,
            summary.malformed_records
        );

        let deck = self.organize_into_slides(self.collect_text_entries(&stream_data));
        if deck.slides.is_empty() {
            log::warn!("no slide text found in the PowerPoint Document stream");
        }
        Ok(deck)
    }

    /// Validate the CFB container has the PowerPoint streams.
    fn validate_cfb_structure<R: Read + Seek>(&self, cfb: &CompoundFile<R>) -> Result<()> {
        if !cfb.is_stream(POWERPOINT_STREAM) {
            return Err(Error::Cfb(
                "Missing 'PowerPoint Document' stream; not a PowerPoint 97-2003 file".to_string(),
            ));
        }
        if !cfb.is_stream("/Current User") {
            log::warn!("Missing 'Current User' stream. File may be an older PPT format variant.");
        }
        Ok(())
    }

    /// Check size and record structure of the document stream.
    fn validate_stream(&self, data: &[u8]) -> Result<StreamSummary> {
        if data.len() < MIN_STREAM_SIZE {
            return Err(Error::CorruptedFile(format!(
                "PowerPoint Document stream too small ({} bytes, expected at least {})",
                data.len(),
                MIN_STREAM_SIZE
            )));
        }

        let mut summary = StreamSummary {
            stream_size: data.len(),
            ..Default::default()
        };
        self.scan_records(data, 0, data.len(), &mut summary);

        if !summary.has_document {
            return Err(Error::CorruptedFile(
                "No RT_Document record found; pre-97 format or corrupted stream".to_string(),
            ));
        }
        if summary.malformed_records > MAX_MALFORMED_RECORDS {
            return Err(Error::CorruptedFile(format!(
                "Too many malformed records ({})",
                summary.malformed_records
            )));
        }
        if !summary.unsupported_text_types.is_empty() {
            log::warn!(
                "unknown text types {:?} are read as generic text",
                summary.unsupported_text_types
            );
        }

        Ok(summary)
    }

    fn scan_records(&self, data: &[u8], start: usize, end: usize, summary: &mut StreamSummary) {
        let mut pos = start;

        while let Some(header) = RecordHeader::read(data, pos, end) {
            let Some(content_end) = header.content_end(pos, end) else {
                summary.malformed_records += 1;
                break;
            };
            let content_start = pos + RecordHeader::SIZE;

            match header.rec_type {
                record_types::RT_DOCUMENT => summary.has_document = true,
                record_types::RT_TEXT_HEADER_ATOM if header.rec_len >= 4 => {
                    let text_type = read_u32_le(data, content_start);
                    if text_type > MAX_SUPPORTED_TEXT_TYPE {
                        summary.unsupported_text_types.insert(text_type);
                    }
                }
                record_types::RT_TEXT_CHARS_ATOM | record_types::RT_TEXT_BYTES_ATOM => {
                    summary.text_record_count += 1;
                }
                _ => {}
            }

            if header.is_container() {
                self.scan_records(data, content_start, content_end, summary);
            }
            pos = content_end;
        }
    }

    /// Read the PowerPoint Document stream from the CFB container.
    fn read_powerpoint_stream<R: Read + Seek>(&self, cfb: &mut CompoundFile<R>) -> Result<Vec<u8>> {
        let mut stream = cfb
            .open_stream(POWERPOINT_STREAM)
            .map_err(|e| Error::Cfb(format!("Failed to open PowerPoint Document stream: {}", e)))?;

        let mut data = Vec::new();
        stream
            .read_to_end(&mut data)
            .map_err(|e| Error::Cfb(format!("Failed to read stream: {}", e)))?;

        Ok(data)
    }

    /// Collect slide text atoms with their metadata, skipping master slides.
    fn collect_text_entries(&self, data: &[u8]) -> Vec<TextEntry> {
        let mut entries = Vec::new();
        let mut state = WalkState {
            text_type: TextType::Body,
            slide_persist_count: 0,
        };
        self.walk_records(data, 0, data.len(), &mut entries, &mut state);
        entries
    }

    fn walk_records(
        &self,
        data: &[u8],
        start: usize,
        end: usize,
        entries: &mut Vec<TextEntry>,
        state: &mut WalkState,
    ) {
        let mut pos = start;

        while let Some(header) = RecordHeader::read(data, pos, end) {
            let Some(content_end) = header.content_end(pos, end) else {
                break;
            };
            let content_start = pos + RecordHeader::SIZE;
            let content = &data[content_start..content_end];

            let text = match header.rec_type {
                record_types::RT_MAIN_MASTER => {
                    pos = content_end;
                    continue;
                }
                record_types::RT_SLIDE_PERSIST_ATOM => {
                    state.slide_persist_count += 1;
                    None
                }
                record_types::RT_TEXT_HEADER_ATOM if content.len() >= 4 => {
                    state.text_type = TextType::from_u32(read_u32_le(content, 0));
                    None
                }
                record_types::RT_TEXT_CHARS_ATOM => decode_utf16_text(content),
                record_types::RT_TEXT_BYTES_ATOM => decode_ansi_text(content),
                _ => None,
            };

            if let Some(text) = text.filter(|t| is_slide_text(t, state.text_type)) {
                entries.push(TextEntry {
                    text: normalize_breaks(&text),
                    text_type: state.text_type,
                    position: pos,
                    slide_hint: state.slide_persist_count,
                });
            }

            if header.is_container() {
                self.walk_records(data, content_start, content_end, entries, state);
            }
            pos = content_end;
        }
    }

    /// Group text entries into slides; titles lead each slide.
    fn organize_into_slides(&self, entries: Vec<TextEntry>) -> SlideDeck {
        let mut groups: Vec<Vec<&TextEntry>> = Vec::new();
        for entry in &entries {
            match groups.last_mut() {
                Some(group) if group[0].slide_hint == entry.slide_hint => group.push(entry),
                _ => groups.push(vec![entry]),
            }
        }

        // no persist boundaries: fall back to one slide per title
        if groups.len() == 1 && groups[0].len() > 1 {
            groups = split_by_titles(&entries);
        }

        let slides = groups
            .into_iter()
            .map(|mut group| {
                group.sort_by_key(|e| (!e.text_type.is_title(), e.position));
                let shapes = group
                    .iter()
                    .zip(1u32..)
                    .map(|(entry, id)| Shape::text_box(id, entry.text.clone()))
                    .collect();
                Slide::new(shapes)
            })
            .collect();

        SlideDeck::new(slides)
    }
}

impl Default for PptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// The 8-byte header preceding every record.
#[derive(Debug, Clone, Copy)]
struct RecordHeader {
    rec_ver: u16,
    rec_type: u16,
    rec_len: usize,
}

impl RecordHeader {
    const SIZE: usize = 8;

    /// Header at `pos`, when a full header fits before `end`.
    fn read(data: &[u8], pos: usize, end: usize) -> Option<Self> {
        if pos + Self::SIZE > end.min(data.len()) {
            return None;
        }
        let rec_ver_instance = read_u16_le(data, pos);
        Some(Self {
            rec_ver: rec_ver_instance & 0x0F,
            rec_type: read_u16_le(data, pos + 2),
            rec_len: read_u32_le(data, pos + 4) as usize,
        })
    }

    /// End offset of the record content, `None` if it overruns its parent.
    fn content_end(&self, pos: usize, end: usize) -> Option<usize> {
        let content_end = pos.checked_add(Self::SIZE)?.checked_add(self.rec_len)?;
        (content_end <= end).then_some(content_end)
    }

    fn is_container(&self) -> bool {
        self.rec_ver == 0x0F
    }
}

/// Whether a text atom is slide content rather than notes, master
/// placeholders or bullet glyphs.
fn is_slide_text(text: &str, text_type: TextType) -> bool {
    const PLACEHOLDER_PATTERNS: [&str; 7] = [
        "click to edit",
        "edit master",
        "master title",
        "master text",
        "second level",
        "third level",
        "fourth level",
    ];

    let trimmed = text.trim();
    if trimmed.is_empty() || !text_type.is_slide_content() {
        return false;
    }
    let lower = trimmed.to_lowercase();
    if PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_alphanumeric(),
        _ => true,
    }
}

fn split_by_titles(entries: &[TextEntry]) -> Vec<Vec<&TextEntry>> {
    let mut groups: Vec<Vec<&TextEntry>> = Vec::new();
    for entry in entries {
        match groups.last_mut() {
            Some(group) if !entry.text_type.is_title() => group.push(entry),
            _ => groups.push(vec![entry]),
        }
    }
    groups
}

/// Paragraphs are separated by `\r`, soft breaks by vertical tab.
fn normalize_breaks(text: &str) -> String {
    text.replace(['\r', '\u{0B}'], "\n")
}

/// Decode UTF-16LE text, stopping at a NUL terminator.
fn decode_utf16_text(content: &[u8]) -> Option<String> {
    if content.is_empty() || content.len() % 2 != 0 {
        return None;
    }
    let units = content
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]));
    let text: String = char::decode_utf16(units)
        .take_while(|r| r.as_ref().map(|&c| c != '\0').unwrap_or(false))
        .filter_map(|r| r.ok())
        .collect();

    (!text.is_empty()).then_some(text)
}

/// Decode single-byte text as Windows-1252, stopping at a NUL terminator.
fn decode_ansi_text(content: &[u8]) -> Option<String> {
    let end = content.iter().position(|&b| b == 0).unwrap_or(content.len());
    let text: String = content[..end].iter().map(|&b| windows_1252(b)).collect();

    (!text.trim().is_empty()).then_some(text)
}

fn windows_1252(b: u8) -> char {
    match b {
        0x80 => '€',
        0x82 => '‚',
        0x83 => 'ƒ',
        0x84 => '„',
        0x85 => '…',
        0x86 => '†',
        0x87 => '‡',
        0x88 => 'ˆ',
        0x89 => '‰',
        0x8A => 'Š',
        0x8B => '‹',
        0x8C => 'Œ',
        0x8E => 'Ž',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '•',
        0x96 => '–',
        0x97 => '—',
        0x98 => '˜',
        0x99 => '™',
        0x9A => 'š',
        0x9B => '›',
        0x9C => 'œ',
        0x9E => 'ž',
        0x9F => 'Ÿ',
        0x81 | 0x8D | 0x8F | 0x90 | 0x9D => '?',
        _ => b as char,
    }
}

/// Read a little-endian u16 from a byte slice.
fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Read a little-endian u32 from a byte slice.
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
