use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_bookmerge::*;

// =============================================================================
// Helpers
// =============================================================================

const TW: f32 = 621.0;
const TH: f32 = 630.0;

fn target() -> TargetGeometry {
    TargetGeometry::from_inches(8.625, 8.75)
}

fn media_box(width: f32, height: f32) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width),
        Object::Real(height),
    ])
}

/// A document whose pages have the given sizes, each with a one-op content
/// stream tagged by its index.
fn create_test_pdf(sizes: &[(f32, f32)]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for (i, &(w, h)) in sizes.iter().enumerate() {
        let content = format!("0 0 {} {} re f", i + 1, i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", media_box(w, h)),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(sizes.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

fn read_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Vec<f32> {
    doc.get_dictionary(page_id)
        .unwrap()
        .get(key)
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect()
}

fn assert_target_boxes(doc: &Document) {
    for page_id in page_ids(doc) {
        let keys: [&[u8]; 5] = [b"MediaBox", b"CropBox", b"TrimBox", b"BleedBox", b"ArtBox"];
        for key in keys {
            let values = read_box(doc, page_id, key);
            assert!((values[2] - values[0] - TW).abs() < 0.01);
            assert!((values[3] - values[1] - TH).abs() < 0.01);
        }
    }
}

fn cm_operands(doc: &Document, page_id: ObjectId) -> Option<Vec<f32>> {
    let bytes = doc.get_page_content(page_id).unwrap();
    let content = Content::decode(&bytes).unwrap();
    content
        .operations
        .iter()
        .find(|op| op.operator == "cm")
        .map(|op| op.operands.iter().map(|o| o.as_float().unwrap()).collect())
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_target_from_inches() {
    let target = target();
    assert_eq!(target.width_pt, TW);
    assert_eq!(target.height_pt, TH);
    assert_eq!(target.tolerance_pt, 1.0);
    assert!(target.matches(621.5, 629.2));
    assert!(!target.matches(623.0, 630.0));
}

#[test]
fn test_front_then_body_order() {
    let front = create_test_pdf(&[(612.0, 792.0), (TW, TH)]);
    let body = create_test_pdf(&[(TW, TH), (TW, TH), (TW, TH)]);

    let outcome = merge_documents(&front, &body, &target()).unwrap();
    let pages = page_ids(&outcome.document);
    assert_eq!(pages.len(), 5);

    // Body pages keep their content order after the front matter
    let tags: Vec<u8> = pages
        .iter()
        .map(|&id| {
            let bytes = outcome.document.get_page_content(id).unwrap();
            let content = Content::decode(&bytes).unwrap();
            let re = content.operations.iter().find(|op| op.operator == "re").unwrap();
            re.operands[2].as_i64().unwrap() as u8
        })
        .collect();
    assert_eq!(tags, vec![1, 2, 1, 2, 3]);
}

#[test]
fn test_matching_pages_are_not_transformed() {
    let front = create_test_pdf(&[(TW, TH), (TW + 0.5, TH - 0.5)]);
    let body = create_test_pdf(&[(TW, TH)]);

    let outcome = merge_documents(&front, &body, &target()).unwrap();
    assert!(outcome.transformed_pages.is_empty());
    for page_id in page_ids(&outcome.document) {
        assert!(cm_operands(&outcome.document, page_id).is_none());
    }
    assert_target_boxes(&outcome.document);
}

#[test]
fn test_double_width_page_scaled_and_centered() {
    let front = create_test_pdf(&[(2.0 * TW, TH)]);
    let body = create_test_pdf(&[(TW, TH)]);

    let outcome = merge_documents(&front, &body, &target()).unwrap();
    assert_eq!(outcome.transformed_pages, vec![1]);

    let first = page_ids(&outcome.document)[0];
    let cm = cm_operands(&outcome.document, first).unwrap();
    assert!((cm[0] - 0.5).abs() < 1e-5);
    assert!((cm[3] - 0.5).abs() < 1e-5);
    assert!(cm[4].abs() < 0.01);
    assert!((cm[5] - TH / 4.0).abs() < 0.01);

    assert_target_boxes(&outcome.document);
}

#[test]
fn test_remerge_is_idempotent() {
    let front = create_test_pdf(&[(612.0, 792.0), (400.0, 300.0)]);
    let body = create_test_pdf(&[(TW, TH)]);
    let first = merge_documents(&front, &body, &target()).unwrap();
    assert_eq!(first.transformed_pages, vec![1, 2]);

    // Round trip through bytes, then normalize the merged result again
    let mut bytes = Vec::new();
    first.document.clone().save_to(&mut bytes).unwrap();
    let reloaded = Document::load_mem(&bytes).unwrap();

    let second = normalize_document(&reloaded, &target()).unwrap();
    assert!(second.transformed_pages.is_empty());
    assert_eq!(page_ids(&second.document).len(), 3);
    assert_target_boxes(&second.document);
}

#[test]
fn test_inherited_media_box_and_resources() {
    let mut front = create_test_pdf(&[(300.0, 300.0)]);
    let page_id = page_ids(&front)[0];
    let pages_id = front
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Parent")
        .unwrap()
        .as_reference()
        .unwrap();

    // Move MediaBox and Resources up to the page tree root
    let page = front.get_dictionary_mut(page_id).unwrap();
    let media = page.remove(b"MediaBox").unwrap();
    let resources = page.remove(b"Resources").unwrap();
    let root = front.get_dictionary_mut(pages_id).unwrap();
    root.set("MediaBox", media);
    root.set("Resources", resources);

    let body = create_test_pdf(&[(TW, TH)]);
    let outcome = merge_documents(&front, &body, &target()).unwrap();
    assert_eq!(outcome.transformed_pages, vec![1]);

    let first = page_ids(&outcome.document)[0];
    let copied = outcome.document.get_dictionary(first).unwrap();
    assert!(copied.get(b"Resources").is_ok());
    assert_target_boxes(&outcome.document);
}

#[test]
fn test_read_media_box_own_and_inherited() {
    let mut doc = create_test_pdf(&[(500.0, 400.0)]);
    let page_id = page_ids(&doc)[0];
    assert_eq!(
        read_media_box(&doc, page_id).unwrap(),
        BoxRect::new(0.0, 0.0, 500.0, 400.0)
    );

    let pages_id = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Parent")
        .unwrap()
        .as_reference()
        .unwrap();
    let media = doc
        .get_dictionary_mut(page_id)
        .unwrap()
        .remove(b"MediaBox")
        .unwrap();
    doc.get_dictionary_mut(pages_id)
        .unwrap()
        .set("MediaBox", media);
    assert_eq!(
        read_media_box(&doc, page_id).unwrap(),
        BoxRect::new(0.0, 0.0, 500.0, 400.0)
    );
}

#[test]
fn test_read_media_box_rejects_empty() {
    let doc = create_test_pdf(&[(0.0, 400.0)]);
    let result = read_media_box(&doc, page_ids(&doc)[0]);
    assert!(matches!(result, Err(MergeError::InvalidPage(_))));
}

#[test]
fn test_indirect_contents_array_is_wrapped() {
    let mut front = create_test_pdf(&[(2.0 * TW, TH)]);
    let page_id = page_ids(&front)[0];

    // Contents -> reference to an array holding two streams
    let first = front
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Contents")
        .unwrap()
        .as_reference()
        .unwrap();
    let second = front.add_object(Stream::new(Dictionary::new(), b"0 0 5 5 re f".to_vec()));
    let array_id = front.add_object(Object::Array(vec![
        Object::Reference(first),
        Object::Reference(second),
    ]));
    front
        .get_dictionary_mut(page_id)
        .unwrap()
        .set("Contents", Object::Reference(array_id));

    let body = create_test_pdf(&[(TW, TH)]);
    let outcome = merge_documents(&front, &body, &target()).unwrap();
    assert_eq!(outcome.transformed_pages, vec![1]);

    let doc = &outcome.document;
    let wrapped = page_ids(doc)[0];
    let contents = doc
        .get_dictionary(wrapped)
        .unwrap()
        .get(b"Contents")
        .unwrap()
        .as_array()
        .unwrap();
    // prefix, both original streams, suffix
    assert_eq!(contents.len(), 4);
    for entry in contents {
        let id = entry.as_reference().unwrap();
        assert!(doc.get_object(id).unwrap().as_stream().is_ok());
    }

    let content = Content::decode(&doc.get_page_content(wrapped).unwrap()).unwrap();
    let ops: Vec<&str> = content
        .operations
        .iter()
        .map(|op| op.operator.as_str())
        .collect();
    assert_eq!(ops.first(), Some(&"q"));
    assert_eq!(ops.iter().filter(|op| **op == "re").count(), 2);
    assert_eq!(ops.last(), Some(&"Q"));
    assert!(cm_operands(doc, wrapped).is_some());
}

#[test]
fn test_no_pages_is_an_error() {
    let empty = create_test_pdf(&[]);
    let result = merge_documents(&empty, &empty, &target());
    assert!(matches!(result, Err(MergeError::NoPages)));
}

#[tokio::test]
async fn test_merge_files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let front_path = dir.path().join("front.pdf");
    let body_path = dir.path().join("body.pdf");
    let dest = dir.path().join("book.pdf");

    save_pdf(create_test_pdf(&[(612.0, 792.0)]), &front_path)
        .await
        .unwrap();
    save_pdf(create_test_pdf(&[(TW, TH), (TW, TH)]), &body_path)
        .await
        .unwrap();

    let report = merge_files(&front_path, &body_path, &dest, &target())
        .await
        .unwrap();
    assert_eq!(report.total_pages, 3);
    assert_eq!(report.transformed_pages, vec![1]);

    let merged = load_pdf(&dest).await.unwrap();
    assert_eq!(merged.get_pages().len(), 3);
    assert_target_boxes(&merged);
}

#[tokio::test]
async fn test_missing_front_matter() {
    let dir = tempfile::tempdir().unwrap();
    let body_path = dir.path().join("body.pdf");
    let dest = dir.path().join("book.pdf");
    save_pdf(create_test_pdf(&[(TW, TH)]), &body_path)
        .await
        .unwrap();

    let missing = dir.path().join("rfh.pdf");
    let result = merge_files(&missing, &body_path, &dest, &target()).await;
    match result {
        Err(MergeError::MissingResource(path)) => assert_eq!(path, missing),
        other => panic!("Expected MissingResource, got {:?}", other),
    }
    assert!(!dest.exists());
}
