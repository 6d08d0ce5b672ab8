//! Plain-text extraction from uploaded reference documents.
//!
//! Supported: `.txt`, `.md`, `.pdf`, `.docx`, `.pptx`, `.csv`, `.xlsx` and
//! `.xls`. Spreadsheets become a summary of their first sheet. The result is
//! NFC-normalized and capped so a large document cannot swamp the prompt.

use crate::package::{unprefixed, Package};
use crate::parser::PptxParser;
use crate::sheet::Table;
use deck_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Cursor;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Longest reference text passed on to the prompt, in characters.
pub const MAX_REFERENCE_CHARS: usize = 10_000;

/// Longest text shown by [`preview`], in characters.
pub const PREVIEW_CHARS: usize = 1_000;

const TRUNCATED_SUFFIX: &str = "\n\n... (content truncated for length)";
const PREVIEW_SUFFIX: &str = "... (content truncated for preview)";

/// Read and extract a reference document from disk.
pub fn read_reference(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    extract_reference_text(&bytes, &filename)
}

/// Extract text from a document's bytes, dispatching on the file extension.
pub fn extract_reference_text(bytes: &[u8], filename: &str) -> Result<String> {
    let extension = Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "txt" | "md" => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| Error::ContentExtraction(format!("{} is not valid UTF-8: {}", filename, e)))?,
        "pptx" => PptxParser::new()
            .parse(Cursor::new(bytes))
            .map_err(|e| Error::ContentExtraction(format!("Error processing PPTX file: {}", e)))?
            .iter()
            .map(|slide| slide.text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"),
        "docx" => docx_text(bytes)?,
        "pdf" => pdf_text(bytes)?,
        "csv" | "xlsx" | "xls" => {
            let table = if extension == "csv" {
                Table::from_csv(bytes)?
            } else {
                Table::from_workbook(bytes, extension == "xls")?
            };
            if table.is_empty() {
                return Err(Error::ContentExtraction(format!(
                    "The uploaded file appears to be empty: {}",
                    filename
                )));
            }
            table.summary(filename)
        }
        other => {
            return Err(Error::ContentExtraction(format!(
                "Unsupported file type: .{}. Please upload a .txt, .md, .pdf, .docx, .pptx, .csv, .xlsx or .xls file.",
                other
            )));
        }
    };

    if text.trim().is_empty() {
        return Err(Error::ContentExtraction(format!(
            "No text could be extracted from {}",
            filename
        )));
    }

    let text: String = text.nfc().collect();
    let count = text.chars().count();
    log::debug!("Extracted {} characters from {}", count, filename);

    Ok(truncate(&text, MAX_REFERENCE_CHARS, TRUNCATED_SUFFIX))
}

/// Shortened text for display.
pub fn preview(text: &str) -> String {
    truncate(text, PREVIEW_CHARS, PREVIEW_SUFFIX)
}

fn truncate(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], suffix),
        None => text.to_string(),
    }
}

/// Text of every page, one block per page. Pages whose text cannot be
/// decoded are skipped.
fn pdf_text(bytes: &[u8]) -> Result<String> {
    let document = lopdf::Document::load_mem(bytes).map_err(|e| {
        Error::ContentExtraction(format!(
            "Error processing PDF file: {}. Make sure it's a valid PDF document.",
            e
        ))
    })?;

    let mut pages = Vec::new();
    for number in document.get_pages().into_keys() {
        match document.extract_text(&[number]) {
            Ok(text) if !text.trim().is_empty() => pages.push(text.trim().to_string()),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping PDF page {}: {}", number, e),
        }
    }

    if pages.is_empty() {
        return Err(Error::ContentExtraction(
            "The PDF appears to contain scanned images rather than text. Cannot extract content."
                .to_string(),
        ));
    }
    Ok(pages.join("\n"))
}

/// Paragraph text of `word/document.xml`, one line per `<w:p>`.
fn docx_text(bytes: &[u8]) -> Result<String> {
    let document = Package::open(Cursor::new(bytes))
        .and_then(|mut package| package.read_part("word/document.xml"))
        .map_err(|e| {
            Error::ContentExtraction(format!(
                "Error processing DOCX file: {}. Make sure it's a valid Word document.",
                e
            ))
        })?;

    let mut reader = Reader::from_str(&document);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match unprefixed(e.name().as_ref()) {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match unprefixed(e.name().as_ref()) {
                b"tab" => current.push('\t'),
                b"br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::End(ref e)) => match unprefixed(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::ContentExtraction(format!(
                    "Error processing DOCX file: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn docx(document_xml: &str) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", FileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_text() {
        let text = extract_reference_text(b"Quarterly report\nRevenue up", "notes.TXT").unwrap();
        assert_eq!(text, "Quarterly report\nRevenue up");
        assert!(extract_reference_text(b"# Title", "readme.md").is_ok());
    }

    #[test]
    fn test_invalid_utf8() {
        let err = extract_reference_text(&[0xff, 0xfe, 0x00], "notes.txt").unwrap_err();
        assert!(matches!(err, Error::ContentExtraction(_)));
    }

    #[test]
    fn test_unsupported_and_empty() {
        let err = extract_reference_text(b"{}", "talk.key").unwrap_err();
        assert!(err.to_string().contains("Unsupported file type: .key"));
        assert!(err.to_string().contains(".csv, .xlsx or .xls"));

        let err = extract_reference_text(b"  \n ", "empty.txt").unwrap_err();
        assert!(matches!(err, Error::ContentExtraction(_)));
    }

    #[test]
    fn test_nfc_normalization() {
        let decomposed = "Cafe\u{301}";
        let text = extract_reference_text(decomposed.as_bytes(), "menu.txt").unwrap();
        assert_eq!(text, "Caf\u{e9}");
    }

    #[test]
    fn test_truncation() {
        let long = "é".repeat(MAX_REFERENCE_CHARS + 5);
        let text = extract_reference_text(long.as_bytes(), "long.txt").unwrap();
        assert!(text.ends_with(TRUNCATED_SUFFIX));
        assert_eq!(
            text.chars().count(),
            MAX_REFERENCE_CHARS + TRUNCATED_SUFFIX.chars().count()
        );

        let exact = "a".repeat(MAX_REFERENCE_CHARS);
        assert_eq!(extract_reference_text(exact.as_bytes(), "a.txt").unwrap(), exact);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(PREVIEW_CHARS + 1);
        let shown = preview(&long);
        assert!(shown.starts_with(&"x".repeat(PREVIEW_CHARS)));
        assert!(shown.ends_with(PREVIEW_SUFFIX));
    }

    #[test]
    fn test_docx_paragraphs() {
        let bytes = docx(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Market </w:t></w:r><w:r><w:t>overview</w:t></w:r></w:p>
<w:p><w:r><w:t>Growth &amp; risks</w:t><w:tab/><w:t>2024</w:t></w:r></w:p>
</w:body></w:document>"#,
        );
        let text = extract_reference_text(&bytes, "brief.docx").unwrap();
        assert_eq!(text, "Market overview\nGrowth & risks\t2024");
    }

    #[test]
    fn test_pptx_slides() {
        use crate::PptxWriter;
        use deck_core::{Outline, Section, SlideAllocator};

        let mut outline = Outline::new("Bees").with_target_slides(5);
        outline.add_section(Section::new("Hives", vec!["Wax".into(), "Honey".into()]));
        let deck = SlideAllocator::new().allocate(&outline);
        let bytes = PptxWriter::default()
            .write(&deck, Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();

        let text = extract_reference_text(&bytes, "old_talk.pptx").unwrap();
        assert!(text.starts_with("Bees\nCreated with AI Presentation Generator\n\nHives"));
        assert!(text.contains("Hives\nWax\n1/2\n\nHives\nHoney\n2/2"));
        assert!(text.ends_with("Thank You"));
    }

    #[test]
    fn test_docx_not_a_zip() {
        let err = extract_reference_text(b"plain bytes", "brief.docx").unwrap_err();
        assert!(matches!(err, Error::ContentExtraction(_)));
    }

    #[test]
    fn test_csv_summary() {
        let text = extract_reference_text(b"Region,Sales\nNorth,120\nSouth,80\n", "sales.csv").unwrap();
        assert!(text.starts_with("File summary: sales.csv\n\nColumns: Region, Sales\nRows: 2\n"));
        assert!(text.contains("North | 120\nSouth | 80"));
        assert!(text.ends_with("Sales: count 2, mean 100.00, min 80, max 120"));

        let err = extract_reference_text(b"Region,Sales\n", "empty.csv").unwrap_err();
        assert!(err.to_string().contains("appears to be empty"));
    }

    #[test]
    fn test_xlsx_first_sheet() {
        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#,
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Hives" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#,
            ),
            (
                "xl/worksheets/sheet1.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>Hive</t></is></c><c r="B1" t="inlineStr"><is><t>Honey</t></is></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>North</t></is></c><c r="B2"><v>12</v></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>South</t></is></c><c r="B3"><v>8</v></c></row>
</sheetData></worksheet>"#,
            ),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.start_file(name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let bytes = zip.finish().unwrap().into_inner();

        let text = extract_reference_text(&bytes, "hives.xlsx").unwrap();
        assert!(text.contains("Columns: Hive, Honey\nRows: 2"));
        assert!(text.contains("North | 12"));
        assert!(text.ends_with("Honey: count 2, mean 10.00, min 8, max 12"));
    }

    #[test]
    fn test_xls_invalid() {
        let err = extract_reference_text(b"not a compound file", "legacy.xls").unwrap_err();
        assert!(matches!(err, Error::ContentExtraction(_)));
        assert!(err.to_string().contains("Error processing spreadsheet"));
    }

    #[test]
    fn test_pdf_pages() {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal("Quarterly revenue")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let text = extract_reference_text(&bytes, "report.pdf").unwrap();
        assert!(text.contains("Quarterly revenue"));
    }

    #[test]
    fn test_pdf_invalid() {
        let err = extract_reference_text(b"%PDF-1.4 truncated", "paper.pdf").unwrap_err();
        assert!(matches!(err, Error::ContentExtraction(_)));
    }

    #[test]
    fn test_read_reference_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Field notes").unwrap();
        assert_eq!(read_reference(&path).unwrap(), "Field notes");
    }
}
