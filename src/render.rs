//! Worksheet -> print-ready document.
//!
//! `PdfRenderer` writes a PDF 1.4 file directly: A4 pages, the three standard
//! Type 1 fonts (Helvetica, Helvetica-Bold, Courier) with WinAnsiEncoding, so
//! no font files are embedded. Question pages come first, then the answer key.

use std::fmt::Write as _;

use chrono::DateTime;

use crate::config::DocumentSettings;
use crate::domain::{WorksheetFormat, WorksheetPayload};
use crate::error::RenderError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 54.0;
const LINE_GAP: f32 = 6.0;

/// Finished document ready to hand to the HTTP layer.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
  pub filename: String,
  pub content_type: &'static str,
  pub bytes: Vec<u8>,
}

pub trait WorksheetRenderer {
  fn render(&self, payload: &WorksheetPayload) -> Result<RenderedDocument, RenderError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Font {
  Regular,
  Bold,
  Mono,
}

impl Font {
  fn resource(self) -> &'static str {
    match self {
      Font::Regular => "F1",
      Font::Bold => "F2",
      Font::Mono => "F3",
    }
  }
}

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
  278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
  556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
  1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
  667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
  333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
  556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Approximate rendered width in points. Bold is measured with the regular
/// metrics, which is close enough for centering.
fn text_width(bytes: &[u8], font: Font, size: f32) -> f32 {
  let units: u32 = bytes
    .iter()
    .map(|b| match font {
      Font::Mono => 600,
      _ if (32..=126).contains(b) => HELVETICA_WIDTHS[(*b - 32) as usize] as u32,
      _ => 556,
    })
    .sum();
  units as f32 * size / 1000.0
}

/// Map text onto WinAnsiEncoding. U+2212 MINUS SIGN has no slot there and is
/// printed as a hyphen; anything else unmappable becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
  text
    .chars()
    .map(|c| match c {
      '−' => b'-',
      '•' => 0x95,
      '—' => 0x97,
      '–' => 0x96,
      c if (c as u32) < 0x7F => c as u8,
      c if (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
      _ => b'?',
    })
    .collect()
}

/// PDF literal string body; non-ASCII bytes become octal escapes so the
/// content stream stays 7-bit.
fn pdf_literal(bytes: &[u8]) -> String {
  let mut out = String::with_capacity(bytes.len() + 8);
  for b in bytes {
    match b {
      b'(' | b')' | b'\\' => {
        out.push('\\');
        out.push(*b as char);
      }
      0x20..=0x7E => out.push(*b as char),
      _ => {
        let _ = write!(out, "\\{:03o}", b);
      }
    }
  }
  out
}

/// Top-down text layout with automatic page breaks.
struct Layout {
  pages: Vec<String>,
  current: String,
  y: f32,
}

impl Layout {
  fn new() -> Self {
    Self { pages: Vec::new(), current: String::new(), y: PAGE_HEIGHT - MARGIN }
  }

  fn new_page(&mut self) {
    let done = std::mem::take(&mut self.current);
    self.pages.push(done);
    self.y = PAGE_HEIGHT - MARGIN;
  }

  fn ensure_room(&mut self, height: f32) {
    if self.y - height < MARGIN && !self.current.is_empty() {
      self.new_page();
    }
  }

  fn down(&mut self, dy: f32) {
    self.y -= dy;
  }

  /// Draw `text` with its baseline one font-size below the cursor.
  fn put(&mut self, font: Font, size: f32, x: f32, text: &str) -> Result<f32, RenderError> {
    let bytes = win_ansi(text);
    let baseline = self.y - size;
    writeln!(
      self.current,
      "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET",
      font.resource(),
      size,
      x,
      baseline,
      pdf_literal(&bytes)
    )?;
    Ok(text_width(&bytes, font, size))
  }

  fn line(&mut self, font: Font, size: f32, text: &str) -> Result<(), RenderError> {
    self.ensure_room(size * 1.2);
    self.put(font, size, MARGIN, text)?;
    self.down(size * 1.2);
    Ok(())
  }

  fn centered(&mut self, font: Font, size: f32, text: &str) -> Result<(), RenderError> {
    self.ensure_room(size * 1.2);
    let width = text_width(&win_ansi(text), font, size);
    let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
    self.put(font, size, x, text)?;
    self.down(size * 1.2);
    Ok(())
  }

  /// Bold label followed by one or more body lines.
  fn labelled(&mut self, label: &str, body: &[&str], body_font: Font, size: f32) -> Result<(), RenderError> {
    let line_height = size * 1.2 + LINE_GAP;
    self.ensure_room(line_height * body.len().max(1) as f32);
    let indent = MARGIN + self.put(Font::Bold, size, MARGIN, label)?;
    for (i, text) in body.iter().enumerate() {
      if i > 0 {
        self.down(line_height);
      }
      self.put(body_font, size, indent, text)?;
    }
    self.down(line_height);
    Ok(())
  }

  fn finish(mut self) -> Vec<String> {
    if !self.current.is_empty() || self.pages.is_empty() {
      self.new_page();
    }
    self.pages
  }
}

fn generated_label(generated_at: &str) -> String {
  match DateTime::parse_from_rfc3339(generated_at) {
    Ok(ts) => ts.format("%Y-%m-%d %H:%M UTC").to_string(),
    Err(_) => generated_at.to_string(),
  }
}

/// Serialize page content streams into a complete PDF file.
fn assemble(pages: &[String], settings: &DocumentSettings) -> Result<Vec<u8>, RenderError> {
  // 1 catalog, 2 pages, 3-5 fonts, 6 info, then (page, content) pairs.
  const FIRST_PAGE_OBJ: usize = 7;
  let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_OBJ + i * 2).collect();

  let mut objects: Vec<String> = Vec::with_capacity(6 + pages.len() * 2);
  objects.push("<< /Type /Catalog /Pages 2 0 R >>".into());
  let kids = page_ids.iter().map(|id| format!("{id} 0 R")).collect::<Vec<_>>().join(" ");
  objects.push(format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()));
  for base in ["Helvetica", "Helvetica-Bold", "Courier"] {
    objects.push(format!(
      "<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>"
    ));
  }
  objects.push(format!(
    "<< /Title ({}) /Author ({}) /Producer (mathsheet-backend) >>",
    pdf_literal(&win_ansi(&settings.title)),
    pdf_literal(&win_ansi(&settings.author))
  ));
  for (i, content) in pages.iter().enumerate() {
    let content_id = page_ids[i] + 1;
    objects.push(format!(
      "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
       /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> /Contents {content_id} 0 R >>"
    ));
    objects.push(format!("<< /Length {} >>\nstream\n{content}endstream", content.len()));
  }

  let mut out = String::new();
  out.push_str("%PDF-1.4\n");
  let mut offsets = Vec::with_capacity(objects.len());
  for (i, body) in objects.iter().enumerate() {
    offsets.push(out.len());
    write!(out, "{} 0 obj\n{}\nendobj\n", i + 1, body)?;
  }
  let xref_at = out.len();
  write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1)?;
  for off in offsets {
    write!(out, "{off:010} 00000 n \n")?;
  }
  write!(
    out,
    "trailer\n<< /Size {} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
    objects.len() + 1
  )?;
  Ok(out.into_bytes())
}

#[derive(Clone, Debug, Default)]
pub struct PdfRenderer {
  settings: DocumentSettings,
}

impl PdfRenderer {
  pub fn new(settings: DocumentSettings) -> Self {
    Self { settings }
  }

  pub fn filename(payload: &WorksheetPayload) -> String {
    format!("worksheet-{}-{}.pdf", payload.config.grade, payload.config.term)
  }

  fn layout(&self, payload: &WorksheetPayload) -> Result<Vec<String>, RenderError> {
    let config = &payload.config;
    let mut page = Layout::new();

    page.centered(Font::Bold, 22.0, &self.settings.title)?;
    page.down(8.0);
    page.centered(
      Font::Regular,
      12.0,
      &format!(
        "Grade {}  •  Term {}  •  Topic: {}",
        config.grade.as_str().to_uppercase(),
        config.term,
        config.topic.as_str()
      ),
    )?;
    page.down(6.0);
    page.centered(Font::Regular, 10.0, &format!("Generated {}", generated_label(&payload.generated_at)))?;
    page.down(20.0);
    page.labelled("Student:", &[" ________________________________"], Font::Regular, 12.0)?;
    page.labelled("Date:", &[" ________________________________"], Font::Regular, 12.0)?;
    page.down(10.0);

    for (index, question) in payload.questions.iter().enumerate() {
      let label = format!("{}. ", index + 1);
      let lines: Vec<&str> = question.prompt.lines().collect();
      let font = if question.format == WorksheetFormat::Vertical { Font::Mono } else { Font::Regular };
      page.labelled(&label, &lines, font, 12.0)?;
      page.down(if question.format == WorksheetFormat::Word { 8.0 } else { 12.0 });
    }

    if self.settings.answer_key {
      page.new_page();
      page.line(Font::Bold, 18.0, "Answer Key")?;
      page.down(12.0);
      for (index, question) in payload.questions.iter().enumerate() {
        page.labelled(&format!("{}.", index + 1), &[&format!(" {}", question.answer)], Font::Regular, 12.0)?;
      }
    }

    Ok(page.finish())
  }
}

impl WorksheetRenderer for PdfRenderer {
  fn render(&self, payload: &WorksheetPayload) -> Result<RenderedDocument, RenderError> {
    if payload.questions.is_empty() {
      return Err(RenderError::Empty);
    }
    let pages = self.layout(payload)?;
    let bytes = assemble(&pages, &self.settings)?;
    Ok(RenderedDocument {
      filename: Self::filename(payload),
      content_type: PDF_CONTENT_TYPE,
      bytes,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::curriculum::default_config;
  use crate::generator::generate_worksheet;

  fn payload(count: u32) -> WorksheetPayload {
    let mut c = default_config();
    c.question_count = count;
    generate_worksheet(&c, Some("render")).unwrap()
  }

  fn text(doc: &RenderedDocument) -> String {
    String::from_utf8(doc.bytes.clone()).unwrap()
  }

  #[test]
  fn produces_pdf_envelope() {
    let doc = PdfRenderer::default().render(&payload(10)).unwrap();
    let s = text(&doc);
    assert!(s.starts_with("%PDF-1.4\n"));
    assert!(s.trim_end().ends_with("%%EOF"));
    assert_eq!(doc.content_type, "application/pdf");
    assert_eq!(doc.filename, "worksheet-3-1.pdf");
  }

  #[test]
  fn startxref_points_at_xref_table() {
    let doc = PdfRenderer::default().render(&payload(10)).unwrap();
    let s = text(&doc);
    let tail = s.rsplit("startxref\n").next().unwrap();
    let offset: usize = tail.lines().next().unwrap().parse().unwrap();
    assert!(s[offset..].starts_with("xref\n"));
  }

  #[test]
  fn answer_key_lists_every_answer() {
    let p = payload(12);
    let s = text(&PdfRenderer::default().render(&p).unwrap());
    assert!(s.contains("(Answer Key)"));
    for q in &p.questions {
      assert!(s.contains(&format!("( {})", q.answer)), "answer {} missing", q.answer);
    }
  }

  #[test]
  fn answer_key_can_be_disabled() {
    let settings = DocumentSettings { answer_key: false, ..DocumentSettings::default() };
    let s = text(&PdfRenderer::new(settings).render(&payload(5)).unwrap());
    assert!(!s.contains("(Answer Key)"));
  }

  #[test]
  fn long_worksheets_paginate() {
    let s = text(&PdfRenderer::default().render(&payload(50)).unwrap());
    let pages = s.matches("/Type /Page ").count();
    assert!(pages >= 3, "expected several pages, got {pages}");
  }

  #[test]
  fn empty_worksheet_is_a_render_error() {
    let mut p = payload(5);
    p.questions.clear();
    assert!(matches!(PdfRenderer::default().render(&p), Err(RenderError::Empty)));
  }

  #[test]
  fn symbols_map_to_win_ansi() {
    assert_eq!(win_ansi("3 − 2"), b"3 - 2".to_vec());
    assert_eq!(win_ansi("×÷"), vec![0xD7, 0xF7]);
    assert_eq!(pdf_literal(&win_ansi("(a) ×")), "\\(a\\) \\327");
  }
}
