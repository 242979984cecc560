//! Per-page text extraction from PDF using lopdf
//!
//! Pages are decoded lazily: [`PdfDocument::pages`] returns an iterator that
//! only walks a page's content stream when it is reached.

use crate::pages::PagesIncluded;
use crate::IndexError;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Encoding, Object, ObjectId, Permissions};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::Path;

/// `TJ` adjustment (thousandths of text space) wide enough to be a word gap
const TJ_WORD_GAP: f32 = -200.0;

/// Raw text of a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,
    /// Extracted text, one line per text line on the page
    pub text: String,
}

/// A loaded, decrypted PDF document
#[derive(Debug)]
pub struct PdfDocument {
    doc: Document,
}

impl PdfDocument {
    /// Load a PDF file, decrypting it with `password` if needed
    pub fn open<P: AsRef<Path>>(path: P, password: Option<&str>) -> Result<Self, IndexError> {
        let loaded = match password {
            Some(password) => Document::load_with_password(path, password),
            None => Document::load(path),
        };
        Self::unlock(loaded)
    }

    /// Load a PDF from a memory buffer, decrypting it with `password` if needed
    pub fn from_bytes(buffer: &[u8], password: Option<&str>) -> Result<Self, IndexError> {
        let loaded = match password {
            Some(password) => Document::load_mem_with_password(buffer, password),
            None => Document::load_mem(buffer),
        };
        Self::unlock(loaded)
    }

    /// Check the outcome of loading a possibly encrypted document
    ///
    /// lopdf decrypts while loading when the empty user password or the given
    /// password authenticates. A document that still carries its encryption
    /// dictionary afterwards could not be decrypted.
    fn unlock(loaded: lopdf::Result<Document>) -> Result<Self, IndexError> {
        let doc = match loaded {
            Ok(doc) => doc,
            Err(lopdf::Error::InvalidPassword) => return Err(IndexError::Encrypted),
            Err(e) => return Err(e.into()),
        };
        if doc.is_encrypted() {
            return Err(IndexError::Encrypted);
        }
        if let Some(state) = &doc.encryption_state {
            if !state.permissions().contains(Permissions::COPYABLE) {
                return Err(IndexError::ExtractionNotAllowed);
            }
        }
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Lazily extract the text of every page accepted by `included`
    pub fn pages<'a>(&'a self, included: &'a PagesIncluded) -> PageTexts<'a> {
        PageTexts {
            doc: &self.doc,
            pages: self.doc.get_pages().into_iter(),
            included,
        }
    }
}

/// Forward-only iterator over page texts, in page order
pub struct PageTexts<'a> {
    doc: &'a Document,
    pages: btree_map::IntoIter<u32, ObjectId>,
    included: &'a PagesIncluded,
}

impl Iterator for PageTexts<'_> {
    type Item = Result<PageText, IndexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let included = self.included;
        let (number, page_id) = self.pages.find(|(number, _)| included.contains(*number))?;
        Some(extract_page_text(self.doc, page_id).map(|text| PageText { number, text }))
    }
}

/// Extract the text of a single page
///
/// Text showing operators contribute their decoded strings. Moving to a new
/// baseline starts a new line; moving along the current baseline separates
/// the surrounding pieces with a space.
fn extract_page_text(doc: &Document, page_id: ObjectId) -> Result<String, IndexError> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let content_data = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_data)?;

    let mut page = PageWriter::new(doc, &fonts);
    for op in &content.operations {
        page.apply(op);
    }
    Ok(page.finish())
}

/// Builds the text of one page from its content stream operations
struct PageWriter<'a> {
    doc: &'a Document,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    /// Encoding of the font selected by the last `Tf`, if it has one
    encoding: Option<Encoding<'a>>,
    text: String,
    in_text_block: bool,
    /// Baseline of the current line, once known from `Tm`
    line_y: Option<f32>,
    /// The text position moved along the line since the last shown piece
    pending_space: bool,
}

impl<'a> PageWriter<'a> {
    fn new(doc: &'a Document, fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        Self {
            doc,
            fonts,
            encoding: None,
            text: String::new(),
            in_text_block: false,
            line_y: None,
            pending_space: false,
        }
    }

    fn apply(&mut self, op: &Operation) {
        let operand = |i: usize| op.operands.get(i);
        match op.operator.as_str() {
            "BT" => {
                self.in_text_block = true;
                self.line_y = None;
            }
            "ET" => {
                self.in_text_block = false;
                self.break_line();
            }
            "Tf" => {
                let font = operand(0).and_then(|name| name.as_name().ok());
                self.select_font(font);
            }
            "Td" | "TD" => {
                let tx = operand(0).and_then(number).unwrap_or(0.0);
                let ty = operand(1).and_then(number).unwrap_or(0.0);
                if ty != 0.0 {
                    self.break_line();
                    self.line_y = self.line_y.map(|y| y + ty);
                } else if tx != 0.0 {
                    self.pending_space = true;
                }
            }
            "Tm" => {
                if let Some(y) = operand(5).and_then(number) {
                    match self.line_y {
                        Some(prev) if (prev - y).abs() > f32::EPSILON => self.break_line(),
                        _ => self.pending_space = true,
                    }
                    self.line_y = Some(y);
                }
            }
            "T*" => self.break_line(),
            _ if !self.in_text_block => {}
            "Tj" => {
                if let Some(obj) = operand(0) {
                    self.show(obj);
                }
            }
            "TJ" => {
                let Some(Ok(items)) = operand(0).map(Object::as_array) else {
                    return;
                };
                for item in items {
                    match number(item) {
                        Some(gap) if gap < TJ_WORD_GAP => self.pending_space = true,
                        Some(_) => {}
                        None => self.show(item),
                    }
                }
            }
            // Move to the next line, then show text; `"` sets spacing first
            "'" | "\"" => {
                self.break_line();
                let shown = if op.operator == "'" { 0 } else { 2 };
                if let Some(obj) = operand(shown) {
                    self.show(obj);
                }
            }
            _ => {}
        }
    }

    fn select_font(&mut self, name: Option<&[u8]>) {
        let (doc, fonts) = (self.doc, self.fonts);
        self.encoding = name
            .and_then(|name| fonts.get(name).copied())
            .and_then(|font| font.get_font_encoding(doc).ok());
    }

    /// Append a shown string, with a space first if the position moved
    fn show(&mut self, obj: &Object) {
        let Some(piece) = self.decode(obj) else {
            return;
        };
        if piece.is_empty() {
            return;
        }
        if self.pending_space
            && !self.text.is_empty()
            && !self.text.ends_with(char::is_whitespace)
            && !piece.starts_with(char::is_whitespace)
        {
            self.text.push(' ');
        }
        self.pending_space = false;
        self.text.push_str(&piece);
    }

    /// Decode a string operand with the current font's encoding
    ///
    /// Without a usable font encoding, the bytes are read as a PDF text
    /// string (UTF-16BE or UTF-8 with a byte order mark, else PDFDocEncoding).
    fn decode(&self, obj: &Object) -> Option<String> {
        let Object::String(bytes, _) = obj else {
            return None;
        };
        self.encoding
            .as_ref()
            .and_then(|encoding| Document::decode_text(encoding, bytes).ok())
            .or_else(|| lopdf::decode_text_string(obj).ok())
    }

    fn break_line(&mut self) {
        self.pending_space = false;
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn finish(self) -> String {
        self.text
    }
}

fn number(obj: &Object) -> Option<f32> {
    obj.as_float().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    fn page_text(operations: Vec<Operation>) -> String {
        let doc = Document::with_version("1.5");
        let fonts = BTreeMap::new();
        let mut page = PageWriter::new(&doc, &fonts);
        for op in &operations {
            page.apply(op);
        }
        page.finish()
    }

    fn show(text: &str) -> Operation {
        Operation::new("Tj", vec![Object::string_literal(text)])
    }

    #[test]
    fn test_line_breaks_do_not_stack() {
        let text = page_text(vec![
            Operation::new("BT", vec![]),
            Operation::new("T*", vec![]),
            show("Hello"),
            Operation::new("T*", vec![]),
            Operation::new("T*", vec![]),
            show("World"),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(text, "Hello\nWorld\n");
    }

    #[test]
    fn test_pieces_on_one_baseline_are_spaced() {
        let text = page_text(vec![
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            show("Hello"),
            Operation::new("Td", vec![40.into(), 0.into()]),
            show("World"),
            show("wide"),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(text, "Hello Worldwide\n");
    }

    #[test]
    fn test_text_matrix_on_same_and_new_baseline() {
        let tm = |x: i64, y: i64| {
            Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), x.into(), y.into()],
            )
        };
        let text = page_text(vec![
            Operation::new("BT", vec![]),
            tm(72, 700),
            show("Penelope"),
            tm(150, 700),
            show("waited"),
            tm(72, 686),
            show("at home"),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(text, "Penelope waited\nat home\n");
    }

    #[test]
    fn test_tj_array_gaps() {
        let text = page_text(vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("Ody"),
                    (-30).into(),
                    Object::string_literal("sseus"),
                    (-250).into(),
                    Object::string_literal("sailed"),
                ])],
            ),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(text, "Odysseus sailed\n");
    }

    #[test]
    fn test_text_outside_text_block_is_ignored() {
        let text = page_text(vec![
            show("stray"),
            Operation::new("'", vec![Object::string_literal("quote")]),
            Operation::new(
                "\"",
                vec![0.into(), 0.into(), Object::string_literal("double")],
            ),
            Operation::new("BT", vec![]),
            show("kept"),
            Operation::new("'", vec![Object::string_literal("next")]),
            Operation::new("ET", vec![]),
        ]);
        assert_eq!(text, "kept\nnext\n");
    }

    #[test]
    fn test_decode_without_font_encoding() {
        let doc = Document::with_version("1.5");
        let fonts = BTreeMap::new();
        let page = PageWriter::new(&doc, &fonts);

        let pdf_doc = Object::String(b"Caf\xe9".to_vec(), StringFormat::Literal);
        assert_eq!(page.decode(&pdf_doc).as_deref(), Some("Café"));

        let utf16 = Object::String(
            vec![0xFE, 0xFF, 0x00, b'Z', 0x00, b'e', 0x00, b'u', 0x00, b's'],
            StringFormat::Hexadecimal,
        );
        assert_eq!(page.decode(&utf16).as_deref(), Some("Zeus"));

        assert_eq!(page.decode(&Object::Integer(1)), None);
    }
}
