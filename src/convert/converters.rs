//! Format conversion pipelines
//!
//! Four supported pairs: image->PDF, PDF->image (first page only),
//! Word->PDF and PDF->Word (plain paragraph text only). These are
//! CPU-bound synchronous functions; handlers run them on the blocking
//! pool.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Rendered pixels per inch when sizing PDF pages around an embedded image
/// (matches printpdf's default image transform)
const EMBED_DPI: f32 = 300.0;

/// Target raster width when rendering a PDF page to an image
const RENDER_TARGET_WIDTH: i32 = 1600;

const MM_PER_INCH: f32 = 25.4;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("could not decode input file: {0}")]
    Decode(String),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("could not encode output file: {0}")]
    Encode(String),

    #[error("conversion engine unavailable: {0}")]
    Engine(String),
}

/// The four supported conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    JpgToPdf,
    PdfToJpg,
    WordToPdf,
    PdfToWord,
}

impl ConversionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionKind::JpgToPdf => "jpg-to-pdf",
            ConversionKind::PdfToJpg => "pdf-to-jpg",
            ConversionKind::WordToPdf => "word-to-pdf",
            ConversionKind::PdfToWord => "pdf-to-word",
        }
    }

    pub fn output_extension(&self) -> &'static str {
        match self {
            ConversionKind::JpgToPdf | ConversionKind::WordToPdf => "pdf",
            ConversionKind::PdfToJpg => "jpg",
            ConversionKind::PdfToWord => "docx",
        }
    }

    pub fn output_content_type(&self) -> &'static str {
        match self {
            ConversionKind::JpgToPdf | ConversionKind::WordToPdf => "application/pdf",
            ConversionKind::PdfToJpg => "image/jpeg",
            ConversionKind::PdfToWord => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Reject uploads whose magic bytes do not match the expected input
    /// format before handing them to a parser.
    pub fn check_input_type(&self, data: &[u8]) -> Result<(), ConvertError> {
        let detected = infer::get(data).map(|t| t.mime_type());
        let ok = match self {
            ConversionKind::JpgToPdf => {
                matches!(detected, Some(m) if m.starts_with("image/"))
            }
            ConversionKind::PdfToJpg | ConversionKind::PdfToWord => {
                matches!(detected, Some("application/pdf"))
            }
            // DOCX is a zip container; infer reports either the specific
            // OOXML type or plain application/zip depending on entry order
            ConversionKind::WordToPdf => matches!(
                detected,
                Some(
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                        | "application/zip"
                )
            ),
        };

        if ok {
            Ok(())
        } else {
            Err(ConvertError::Decode(format!(
                "expected {} input, got {}",
                self.expected_input(),
                detected.unwrap_or("unrecognized data")
            )))
        }
    }

    fn expected_input(&self) -> &'static str {
        match self {
            ConversionKind::JpgToPdf => "an image",
            ConversionKind::PdfToJpg | ConversionKind::PdfToWord => "a PDF",
            ConversionKind::WordToPdf => "a Word document",
        }
    }

    /// Run the conversion on raw input bytes
    pub fn convert(&self, data: &[u8]) -> Result<Vec<u8>, ConvertError> {
        self.check_input_type(data)?;
        match self {
            ConversionKind::JpgToPdf => image_to_pdf(data),
            ConversionKind::PdfToJpg => pdf_to_image(data),
            ConversionKind::WordToPdf => word_to_pdf(data),
            ConversionKind::PdfToWord => pdf_to_word(data),
        }
    }
}

/// image -> single-page PDF sized to the image
fn image_to_pdf(data: &[u8]) -> Result<Vec<u8>, ConvertError> {
    use printpdf::image_crate;
    use printpdf::{Image, ImageTransform};

    let decoded =
        image_crate::load_from_memory(data).map_err(|e| ConvertError::Decode(e.to_string()))?;

    // Alpha channels are not representable in a plain RGB image stream
    let rgb = image_crate::DynamicImage::ImageRgb8(decoded.to_rgb8());

    let (px_w, px_h) = (rgb.width(), rgb.height());
    let page_w = Mm(px_w as f32 * MM_PER_INCH / EMBED_DPI);
    let page_h = Mm(px_h as f32 * MM_PER_INCH / EMBED_DPI);

    let (doc, page, layer) = PdfDocument::new("Converted image", page_w, page_h, "Layer 1");

    let pdf_image = Image::from_dynamic_image(&rgb);
    pdf_image.add_to_layer(doc.get_page(page).get_layer(layer), ImageTransform::default());

    debug!(width = px_w, height = px_h, "Embedded image into PDF page");

    doc.save_to_bytes()
        .map_err(|e| ConvertError::Encode(e.to_string()))
}

/// PDF -> JPEG of the first page only; pages 2..N are dropped
fn pdf_to_image(data: &[u8]) -> Result<Vec<u8>, ConvertError> {
    use pdfium_render::prelude::*;

    let pdfium = Pdfium::new(
        Pdfium::bind_to_system_library().map_err(|e| ConvertError::Engine(e.to_string()))?,
    );

    let document = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| ConvertError::Decode(e.to_string()))?;

    let first_page = document
        .pages()
        .first()
        .map_err(|e| ConvertError::Decode(e.to_string()))?;

    let config = PdfRenderConfig::new().set_target_width(RENDER_TARGET_WIDTH);

    let rendered = first_page
        .render_with_config(&config)
        .map_err(|e| ConvertError::Render(e.to_string()))?
        .as_image()
        .to_rgb8();

    debug!(
        width = rendered.width(),
        height = rendered.height(),
        "Rendered first PDF page"
    );

    let mut out = Cursor::new(Vec::new());
    rendered
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .map_err(|e| ConvertError::Encode(e.to_string()))?;

    Ok(out.into_inner())
}

/// DOCX -> PDF, plain paragraph text only
fn word_to_pdf(data: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let paragraphs = extract_docx_paragraphs(data)?;
    render_text_pdf(&paragraphs)
}

/// Pull the plain text of each paragraph out of a DOCX body.
/// Formatting, images and tables are dropped.
pub fn extract_docx_paragraphs(data: &[u8]) -> Result<Vec<String>, ConvertError> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let docx = docx_rs::read_docx(data).map_err(|e| ConvertError::Decode(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut text = String::new();
            for pc in &paragraph.children {
                if let ParagraphChild::Run(run) = pc {
                    for rc in &run.children {
                        if let RunChild::Text(t) = rc {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            let text = text.trim().to_string();
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs)
}

/// Lay plain text paragraphs onto A4 pages
fn render_text_pdf(paragraphs: &[String]) -> Result<Vec<u8>, ConvertError> {
    const PAGE_W: f32 = 210.0;
    const PAGE_H: f32 = 297.0;
    const MARGIN: f32 = 20.0;
    const LINE_HEIGHT: f32 = 6.0;
    const WRAP_WIDTH: usize = 90;
    const FONT_SIZE: f32 = 11.0;

    let (doc, first_page, first_layer) =
        PdfDocument::new("Converted document", Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ConvertError::Render(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut current_y = PAGE_H - MARGIN;

    for paragraph in paragraphs {
        for line in wrap_text(paragraph, WRAP_WIDTH) {
            if current_y < MARGIN {
                let (page, new_layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
                layer = doc.get_page(page).get_layer(new_layer);
                current_y = PAGE_H - MARGIN;
            }
            layer.use_text(&line, FONT_SIZE, Mm(MARGIN), Mm(current_y), &font);
            current_y -= LINE_HEIGHT;
        }
        // Blank line between paragraphs
        current_y -= LINE_HEIGHT;
    }

    doc.save_to_bytes()
        .map_err(|e| ConvertError::Encode(e.to_string()))
}

/// PDF -> DOCX, text-only extraction; one DOCX paragraph per source paragraph
fn pdf_to_word(data: &[u8]) -> Result<Vec<u8>, ConvertError> {
    use docx_rs::{Docx, Paragraph, Run};

    let text =
        pdf_extract::extract_text_from_mem(data).map_err(|e| ConvertError::Decode(e.to_string()))?;

    let mut docx = Docx::new();
    for paragraph in split_paragraphs(&text) {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(paragraph)));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ConvertError::Encode(e.to_string()))?;

    Ok(buf.into_inner())
}

/// Split extracted text into paragraphs on blank lines
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Greedy word wrap at `width` characters
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
