//! Text extraction from document bytes
//!
//! Extractors never fail: anything that cannot be turned into text comes back
//! as the empty string, and it is up to the caller to treat that as a failed
//! extraction rather than an empty document.

use crate::processing::normalizer::normalize;
use anyhow::Context;
use log::warn;
use pulldown_cmark::{html, Parser};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use std::panic;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

pub trait TextExtractor {
    /// Normalized text of the document, empty when nothing could be extracted.
    fn extract(&self, bytes: &[u8]) -> String;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> String {
        // pdf-extract panics on some malformed files instead of returning Err
        match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(Ok(text)) => normalize(&text),
            Ok(Err(e)) => {
                warn!("Failed to extract text from PDF: {}", e);
                String::new()
            }
            Err(_) => {
                warn!("PDF parser aborted on malformed input");
                String::new()
            }
        }
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> String {
        match read_docx_paragraphs(bytes) {
            Ok(paragraphs) => normalize(&paragraphs.join("\n")),
            Err(e) => {
                warn!("Failed to extract text from DOCX: {:#}", e);
                String::new()
            }
        }
    }
}

fn read_docx_paragraphs(bytes: &[u8]) -> anyhow::Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("not a zip archive")?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("missing word/document.xml")?
        .read_to_string(&mut xml)
        .context("unreadable word/document.xml")?;

    paragraphs_from_document_xml(&xml)
}

/// Text of every `w:p` in document order, tables included
fn paragraphs_from_document_xml(xml: &str) -> anyhow::Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event().context("malformed document.xml")? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => in_paragraph = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_paragraph => current.push('\t'),
                b"w:br" | b"w:cr" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    paragraphs.push(std::mem::take(&mut current));
                    in_paragraph = false;
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_text => {
                current.push_str(&t.unescape().context("bad text escape")?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> String {
        normalize(&String::from_utf8_lossy(bytes))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> String {
        let markdown_content = String::from_utf8_lossy(bytes);

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        normalize(&html_to_text(&html_output))
    }
}

fn html_to_text(html: &str) -> String {
    // Block boundaries become whitespace before the tags are dropped
    let text = html
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("</li>", "\n")
        .replace("</h1>", "\n")
        .replace("</h2>", "\n")
        .replace("</h3>", "\n");

    TAG_REGEX
        .replace_all(&text, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;

    /// Minimal DOCX package around the given `w:body` content
    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("[Content_Types].xml", FileOptions::default()).unwrap();
        writer.write_all(br#"<?xml version="1.0"?><Types/>"#).unwrap();
        writer.start_file("word/document.xml", FileOptions::default()).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::docx_with_body;
    use super::*;

    #[test]
    fn test_docx_paragraphs_in_order() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
               <w:p><w:r><w:t xml:space="preserve">Senior </w:t></w:r><w:r><w:t>Engineer</w:t></w:r></w:p>
               <w:p/>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Python &amp; Rust</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );

        let text = DocxExtractor.extract(&bytes);
        assert_eq!(text, "Jane Doe Senior Engineer Python & Rust");
    }

    #[test]
    fn test_docx_tabs_and_breaks_become_whitespace() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>Skills:</w:t><w:tab/><w:t>SQL</w:t><w:br/><w:t>AWS</w:t></w:r></w:p>"#,
        );
        assert_eq!(DocxExtractor.extract(&bytes), "Skills: SQL AWS");
    }

    #[test]
    fn test_invalid_docx_yields_empty() {
        assert_eq!(DocxExtractor.extract(b"definitely not a zip"), "");
        assert_eq!(DocxExtractor.extract(&[]), "");
    }

    #[test]
    fn test_docx_without_document_part_yields_empty() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::FileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert_eq!(DocxExtractor.extract(&bytes), "");
    }

    #[test]
    fn test_pdf_text_in_reading_order() {
        let bytes = include_bytes!("../../tests/fixtures/sample_resume.pdf");
        let text = PdfExtractor.extract(bytes);

        assert!(text.contains("Jane Doe"), "got {:?}", text);
        assert!(text.contains("Python Developer"), "got {:?}", text);
        assert!(text.find("Jane").unwrap() < text.find("Python").unwrap());
        assert_eq!(text, normalize(&text));
    }

    #[test]
    fn test_invalid_pdf_yields_empty() {
        assert_eq!(PdfExtractor.extract(b"%PDF-1.4 truncated garbage"), "");
        assert_eq!(PdfExtractor.extract(b"plain text, not a pdf"), "");
    }

    #[test]
    fn test_plain_text_is_normalized() {
        let text = PlainTextExtractor.extract(b"  Python\n\n\tDeveloper  ");
        assert_eq!(text, "Python Developer");
    }

    #[test]
    fn test_markdown_is_stripped() {
        let markdown = b"# Jane Doe\n\n**Software Engineer**\n\n## Skills\n\n- React\n- Node.js & AWS\n";
        let text = MarkdownExtractor.extract(markdown);

        assert_eq!(text, "Jane Doe Software Engineer Skills React Node.js & AWS");
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
    }
}
