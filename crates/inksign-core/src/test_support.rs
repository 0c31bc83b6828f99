//! PDF fixtures shared by the unit tests

use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, ObjectId, Stream};

/// How a fixture page stores its `/Contents`
#[derive(Debug, Clone, Copy)]
pub enum ContentsLayout {
    /// Single indirect stream
    Reference,
    /// Inline array holding the text stream and a second graphics stream
    InlineArray,
    /// Reference to an array object holding the text stream
    IndirectArray,
    /// Every page references one array object holding the first page's text
    SharedArray,
    /// No `/Contents` entry at all
    Missing,
}

fn page_text_content(page_number: u32) -> Content {
    Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    format!("Page {}", page_number).into_bytes(),
                    lopdf::StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ],
    }
}

fn add_content_stream(doc: &mut Document, content: &Content) -> ObjectId {
    doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()))
}

/// Build a PDF whose pages each paint a line of text
pub fn create_test_pdf(num_pages: u32) -> Vec<u8> {
    create_test_pdf_with_layout(num_pages, ContentsLayout::Reference)
}

pub fn create_test_pdf_with_layout(num_pages: u32, layout: ContentsLayout) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    let mut shared_array = None;

    for i in 0..num_pages {
        let text_id = add_content_stream(&mut doc, &page_text_content(i + 1));

        let contents = match layout {
            ContentsLayout::Reference => Some(Object::Reference(text_id)),
            ContentsLayout::InlineArray => {
                let rule = Content {
                    operations: vec![
                        Operation::new("m", vec![Object::Integer(72), Object::Integer(690)]),
                        Operation::new("l", vec![Object::Integer(540), Object::Integer(690)]),
                        Operation::new("S", vec![]),
                    ],
                };
                let rule_id = add_content_stream(&mut doc, &rule);
                Some(Object::Array(vec![
                    Object::Reference(text_id),
                    Object::Reference(rule_id),
                ]))
            }
            ContentsLayout::IndirectArray => {
                let array_id = doc.add_object(Object::Array(vec![Object::Reference(text_id)]));
                Some(Object::Reference(array_id))
            }
            ContentsLayout::SharedArray => {
                let array_id = *shared_array.get_or_insert_with(|| {
                    doc.add_object(Object::Array(vec![Object::Reference(text_id)]))
                });
                Some(Object::Reference(array_id))
            }
            ContentsLayout::Missing => None,
        };

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
        ]);
        if let Some(contents) = contents {
            page.set("Contents", contents);
        }
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
