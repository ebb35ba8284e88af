//! Copying pages between documents
//!
//! Objects are copied with their references remapped into the output
//! document. The cache maps source object ids to output ids and is filled
//! before recursing, so reference cycles terminate.

use crate::boxes::inherited_attribute;
use crate::constants::INHERITABLE_KEYS;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

pub type CopyCache = HashMap<ObjectId, ObjectId>;

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from `source` into `output`, following references.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut CopyCache,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                Err(_) => {
                    log::debug!("Dangling reference {:?} copied as null", id);
                    Object::Null
                }
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut CopyCache,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

// =============================================================================
// Page Copy
// =============================================================================

/// Copy one page dictionary into `output` with `parent` as its new parent.
///
/// Inherited attributes are written onto the copy so it no longer depends on
/// the source page tree. The caller inserts the returned dictionary under
/// the id it reserved for this page.
pub fn copy_page(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    parent: ObjectId,
    cache: &mut CopyCache,
) -> Result<Dictionary> {
    let mut page = source.get_dictionary(page_id)?.clone();

    for key in INHERITABLE_KEYS {
        if page.get(key).is_err() {
            if let Some(value) = inherited_attribute(source, page_id, key) {
                page.set(key.to_vec(), value.clone());
            }
        }
    }
    page.remove(b"Parent");

    let mut copied = copy_dictionary(output, source, &page, cache)?;
    copied.set("Parent", Object::Reference(parent));
    Ok(copied)
}

/// Reserve an output id for every page of `source`, in page order.
///
/// Seeding the cache means references to pages from annotations or
/// destinations resolve to the copies instead of dragging in the source
/// page tree.
pub fn reserve_pages(
    output: &mut Document,
    source: &Document,
    cache: &mut CopyCache,
) -> Vec<(ObjectId, ObjectId)> {
    source
        .get_pages()
        .into_values()
        .map(|page_id| {
            let new_id = output.new_object_id();
            cache.insert(page_id, new_id);
            (page_id, new_id)
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
