//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Appends the pages of several PDFs, in order, into one output document
///
/// The default implementation is [`LopdfMerger`]. Other backends can report
/// an unavailable tool with [`Error::MissingDependency`].
pub trait Merger {
    /// Write all pages of `inputs`, in listed order, to `output`
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;
}

/// Pure Rust merger backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfMerger;

impl Merger for LopdfMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        merge_pdfs(inputs, output)
    }
}

/// Merge multiple PDF files into a single PDF
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
///
/// Each input's catalog and page tree nodes are dropped and replaced by a
/// single flat page tree. Missing parent directories of `output` are created.
///
/// # Example
///
/// ```no_run
/// use hymn_combiner::pdf::merge_pdfs;
/// use std::path::{Path, PathBuf};
///
/// let inputs = vec![PathBuf::from("pdf/1.pdf"), PathBuf::from("pdf/12_PAGE1.pdf")];
/// merge_pdfs(&inputs, Path::new("output/combined.pdf")).expect("Failed to merge");
/// ```
pub fn merge_pdfs(inputs: &[PathBuf], output: &Path) -> Result<()> {
    if inputs.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    for path in inputs {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in inputs {
        let mut doc = Document::load(path).map_err(|source| Error::UnreadablePdf {
            path: path.clone(),
            source,
        })?;

        // Shift this document's ids past everything collected so far
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(Error::EmptyPdf(path.clone()));
        }

        for &page_id in &pages {
            inherit_page_attributes(&mut doc, page_id)?;
        }

        debug!(path = %path.display(), pages = pages.len(), "loaded input");
        page_ids.extend(pages);

        objects.extend(
            doc.objects
                .into_iter()
                .filter(|(_, object)| !is_node(object, b"Catalog") && !is_node(object, b"Pages")),
        );
    }

    let mut merged = Document::with_version("1.5");
    merged.objects.extend(objects);

    // new_object_id() must hand out ids above every copied object
    merged.max_id = max_id - 1;

    let pages_id = merged.new_object_id();
    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(page_ids.len() as i64));
    pages.set("Kids", Object::Array(kids));

    let catalog_id = merged.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged.objects.insert(pages_id, Object::Dictionary(pages));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(page)) = merged.get_object_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    merged.compress();

    let mut bytes = Vec::new();
    merged.save_to(&mut bytes).map_err(Error::from)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::OutputWrite {
            path: output.to_path_buf(),
            source,
        })?;
    }
    fs::write(output, bytes).map_err(|source| Error::OutputWrite {
        path: output.to_path_buf(),
        source,
    })?;

    debug!(output = %output.display(), pages = page_ids.len(), "merged document written");
    Ok(())
}

/// True if `object` is a dictionary whose `/Type` is `kind`
fn is_node(object: &Object, kind: &[u8]) -> bool {
    object
        .as_dict()
        .ok()
        .and_then(|dict| dict.get(b"Type").ok())
        .and_then(|ty| ty.as_name().ok())
        == Some(kind)
}

/// Copy inherited attributes from the page tree onto the page itself
///
/// The source page tree nodes are discarded during a merge, so anything a
/// page only had through its ancestors has to move onto the page first.
fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();
    {
        let page = doc.get_dictionary(page_id)?;
        let mut wanted: Vec<&[u8]> = INHERITABLE
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

        // Depth cap guards against cyclic Parent chains in damaged files
        let mut depth = 0;
        while let Some(node_id) = parent {
            if wanted.is_empty() || depth > 64 {
                break;
            }
            let Ok(node) = doc.get_dictionary(node_id) else {
                break;
            };

            wanted.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });

            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            depth += 1;
        }
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        page.set(key.to_vec(), value);
    }
    Ok(())
}
