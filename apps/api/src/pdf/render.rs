use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

use super::layout::{Page, PAGE_HEIGHT, PAGE_WIDTH};
use super::metrics::PdfFont;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("No se pudo codificar el contenido de la página: {0}")]
    Encode(String),

    #[error("No se pudo escribir el PDF: {0}")]
    Save(String),
}

/// WinAnsi bytes for `text`. Latin-1 maps one to one; anything wider
/// becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn add_font(doc: &mut Document, font: PdfFont) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn page_content(page: &Page) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), line.size.into()],
        ));
        operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

/// Serialises laid-out pages into a PDF using the two standard Helvetica
/// fonts, so nothing needs embedding.
pub fn render(pages: &[Page]) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = add_font(&mut doc, PdfFont::Regular);
    let bold_id = add_font(&mut doc, PdfFont::Bold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            PdfFont::Regular.resource_name() => regular_id,
            PdfFont::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let encoded = page_content(page)
            .encode()
            .map_err(|e| PdfError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH as i64),
                Object::Integer(PAGE_HEIGHT as i64),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PdfError::Save(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::layout::PlacedLine;

    fn page(text: &str) -> Page {
        Page {
            lines: vec![PlacedLine {
                font: PdfFont::Bold,
                size: 12.0,
                x: 50.0,
                y: 700.0,
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn test_renders_loadable_document() {
        let bytes = render(&[page("Hola"), page("Mundo")]).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_page_text_is_extractable() {
        let bytes = render(&[page("INFORMACION")]).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let shown: Vec<_> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .collect();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].operands[0].as_str().unwrap(), b"INFORMACION");
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Página"), vec![b'P', 0xE1, b'g', b'i', b'n', b'a']);
        assert_eq!(encode_win_ansi("Ñ€"), vec![0xD1, b'?']);
    }
}
