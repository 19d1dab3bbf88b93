//! Document library layer.
//!
//! Wraps [`lopdf::Document`] behind the handful of operations the rest of the
//! crate needs: loading, page enumeration, outline access, named destination
//! lookup, and building new documents from pages of an existing one.
//!
//! Outline nodes are exposed as borrowed views ([`OutlineNode`]) into the loaded
//! object graph; the tree is never copied.

use crate::destination::NavigationTarget;
use crate::error::{Error, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Maximum number of reference hops followed when resolving an object.
const MAX_REFERENCE_HOPS: usize = 32;

/// Page attributes a page may inherit from its ancestors in the page tree.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.7.3.4 - Inheritance of Page Attributes
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// A loaded, read-only source PDF.
pub struct SourceDocument {
    inner: Document,
    pages: Vec<ObjectId>,
    page_indices: HashMap<ObjectId, usize>,
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("version", &self.inner.version)
            .field("page_count", &self.pages.len())
            .finish()
    }
}

impl SourceDocument {
    /// Parse a PDF from memory.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `bytes` is empty
    /// - [`Error::UnreadableDocument`] if the bytes are not a readable PDF
    pub fn load(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::EmptyInput);
        }

        let inner = Document::load_mem(bytes)?;
        let pages: Vec<ObjectId> = inner.get_pages().into_values().collect();
        let page_indices = pages
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();

        log::debug!("Loaded PDF {} with {} pages", inner.version, pages.len());

        Ok(Self {
            inner,
            pages,
            page_indices,
        })
    }

    /// PDF version string from the header, e.g. `"1.7"`.
    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.pages
    }

    /// Object id of the page at a zero-based index.
    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.pages.get(index).copied()
    }

    /// Zero-based index of a page object, or `None` if `id` is not a page.
    pub fn page_index(&self, id: ObjectId) -> Option<usize> {
        self.page_indices.get(&id).copied()
    }

    /// Follow indirect references until a direct object is reached.
    ///
    /// Returns `None` for dangling references and reference chains that do not
    /// terminate.
    pub fn resolve<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        let mut current = object;
        for _ in 0..MAX_REFERENCE_HOPS {
            match current {
                Object::Reference(id) => current = self.inner.get_object(*id).ok()?,
                direct => return Some(direct),
            }
        }
        None
    }

    /// Look up `key` in `dict` and resolve the value.
    pub fn resolve_key<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        dict.get(key).ok().and_then(|value| self.resolve(value))
    }

    fn dictionary(&self, id: ObjectId) -> Option<&Dictionary> {
        self.inner.get_object(id).ok()?.as_dict().ok()
    }

    fn catalog(&self) -> Option<&Dictionary> {
        self.resolve_key(&self.inner.trailer, b"Root")?.as_dict().ok()
    }

    /// Object id of the first top-level outline item.
    ///
    /// `None` when the document has no outline or the outline is empty.
    pub fn outline_root(&self) -> Option<ObjectId> {
        let outlines = self.resolve_key(self.catalog()?, b"Outlines")?.as_dict().ok()?;
        outlines.get(b"First").ok()?.as_reference().ok()
    }

    /// Borrowed view of the outline item stored at `id`.
    ///
    /// Returns `None` if the object is missing or is not a dictionary.
    pub fn node(&self, id: ObjectId) -> Option<OutlineNode<'_>> {
        self.dictionary(id).map(|dict| OutlineNode {
            doc: self,
            id,
            dict,
        })
    }

    /// Look up a named destination.
    ///
    /// Searches the `/Names` → `/Dests` name tree first, then the legacy
    /// catalog `/Dests` dictionary. The returned object is the explicit
    /// destination (normally an array), with any `/D` wrapper removed.
    pub fn named_destination(&self, name: &str) -> Option<&Object> {
        let catalog = self.catalog()?;

        let from_tree = self
            .resolve_key(catalog, b"Names")
            .and_then(|names| names.as_dict().ok())
            .and_then(|names| self.resolve_key(names, b"Dests"))
            .and_then(|dests| dests.as_dict().ok())
            .and_then(|tree| self.lookup_name_tree(tree, name));
        if let Some(dest) = from_tree {
            return self.unwrap_destination(dest);
        }

        let dests = self.resolve_key(catalog, b"Dests")?.as_dict().ok()?;
        let dest = self.resolve_key(dests, name.as_bytes())?;
        self.unwrap_destination(dest)
    }

    /// Strip the `<< /D [...] >>` wrapper some producers put around
    /// explicit destinations.
    fn unwrap_destination<'a>(&'a self, dest: &'a Object) -> Option<&'a Object> {
        match self.resolve(dest)? {
            Object::Dictionary(dict) => self.resolve_key(dict, b"D"),
            other => Some(other),
        }
    }

    fn lookup_name_tree<'a>(&'a self, root: &'a Dictionary, name: &str) -> Option<&'a Object> {
        let mut visited: HashSet<*const Dictionary> = HashSet::new();
        let mut pending: Vec<&Dictionary> = vec![root];

        while let Some(node) = pending.pop() {
            if !visited.insert(node as *const Dictionary) {
                continue;
            }

            if let Some(Object::Array(entries)) = self.resolve_key(node, b"Names") {
                for pair in entries.chunks_exact(2) {
                    let key = match self.resolve(&pair[0]) {
                        Some(Object::String(bytes, _)) => decode_text(bytes),
                        Some(Object::Name(bytes)) => String::from_utf8_lossy(bytes).into_owned(),
                        _ => continue,
                    };
                    if key == name {
                        return Some(&pair[1]);
                    }
                }
            }

            if let Some(Object::Array(kids)) = self.resolve_key(node, b"Kids") {
                // Reverse so kids are searched left to right.
                for kid in kids.iter().rev() {
                    if let Some(Object::Dictionary(kid_dict)) = self.resolve(kid) {
                        pending.push(kid_dict);
                    }
                }
            }
        }

        None
    }

    fn is_page_tree_node(&self, id: ObjectId) -> bool {
        self.dictionary(id)
            .and_then(|dict| dict.get(b"Type").ok())
            .and_then(|kind| kind.as_name().ok())
            .is_some_and(|kind| kind == b"Pages")
    }

    /// Inherited attribute of a page, looked up through its `/Parent` chain.
    fn inherited_attribute(&self, page: &Dictionary, key: &[u8]) -> Option<&Object> {
        let mut visited = HashSet::new();
        let mut parent = page.get(b"Parent").ok()?.as_reference().ok()?;

        while visited.insert(parent) {
            let node = self.dictionary(parent)?;
            if let Ok(value) = node.get(key) {
                return Some(value);
            }
            parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        }

        None
    }
}

/// Borrowed view of one outline item dictionary.
#[derive(Clone, Copy)]
pub struct OutlineNode<'a> {
    doc: &'a SourceDocument,
    id: ObjectId,
    dict: &'a Dictionary,
}

impl<'a> OutlineNode<'a> {
    /// Object id of this outline item.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Decoded `/Title`, or `None` when absent.
    pub fn title(&self) -> Option<String> {
        match self.doc.resolve_key(self.dict, b"Title")? {
            Object::String(bytes, _) => Some(decode_text(bytes)),
            Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// First child item (`/First`).
    pub fn first_child(&self) -> Option<ObjectId> {
        self.dict.get(b"First").ok()?.as_reference().ok()
    }

    /// Next sibling item (`/Next`).
    pub fn next_sibling(&self) -> Option<ObjectId> {
        self.dict.get(b"Next").ok()?.as_reference().ok()
    }

    /// Where this item navigates to.
    pub fn target(&self) -> NavigationTarget {
        NavigationTarget::from_outline_entry(self.doc, self.dict)
    }
}

/// A new PDF assembled from pages of a [`SourceDocument`].
///
/// Pages are deep-copied together with every object they reference. References
/// to source pages outside this document, and to page tree nodes, become
/// `null` so that unrelated pages are never pulled in.
pub struct SubDocument {
    inner: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    id_map: HashMap<ObjectId, ObjectId>,
    pending: VecDeque<(ObjectId, ObjectId)>,
}

impl SubDocument {
    /// Create an empty document with the same PDF version as `source`.
    pub fn new(source: &SourceDocument) -> Self {
        let mut inner = Document::with_version(source.version());
        let pages_id = inner.new_object_id();
        Self {
            inner,
            pages_id,
            kids: Vec::new(),
            id_map: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Register source pages that will be appended, so links between them
    /// survive regardless of append order.
    pub fn reserve_pages(&mut self, pages: &[ObjectId]) {
        for page in pages {
            if !self.id_map.contains_key(page) {
                let new_id = self.inner.new_object_id();
                self.id_map.insert(*page, new_id);
            }
        }
    }

    /// Append a copy of the source page `page_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnreadableDocument`] if `page_id` is not a page
    /// dictionary in `source`.
    pub fn append_page(&mut self, source: &SourceDocument, page_id: ObjectId) -> Result<()> {
        let page = source.inner.get_dictionary(page_id)?;

        let new_id = match self.id_map.get(&page_id) {
            Some(id) => *id,
            None => {
                let id = self.inner.new_object_id();
                self.id_map.insert(page_id, id);
                id
            },
        };

        let mut copy = Dictionary::new();
        for (key, value) in page.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            copy.set(key.clone(), self.copy_object(source, value));
        }
        for key in INHERITABLE_PAGE_KEYS {
            if copy.has(key) {
                continue;
            }
            if let Some(value) = source.inherited_attribute(page, key) {
                let value = self.copy_object(source, value);
                copy.set(key.to_vec(), value);
            }
        }
        copy.set("Parent", Object::Reference(self.pages_id));

        self.inner.objects.insert(new_id, Object::Dictionary(copy));
        self.kids.push(new_id);
        self.copy_pending(source);

        Ok(())
    }

    /// Build the page tree and catalog and serialize the document.
    pub fn to_bytes(mut self) -> lopdf::Result<Vec<u8>> {
        // Reserved pages that were never appended must not dangle.
        let appended: HashSet<ObjectId> = self.kids.iter().copied().collect();
        let missing: Vec<ObjectId> = self
            .id_map
            .values()
            .copied()
            .filter(|id| !appended.contains(id) && !self.inner.objects.contains_key(id))
            .collect();
        for id in missing {
            self.inner.objects.insert(id, Object::Null);
        }

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set(
            "Kids",
            Object::Array(self.kids.iter().map(|id| Object::Reference(*id)).collect()),
        );
        pages.set("Count", Object::Integer(self.kids.len() as i64));
        self.inner
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(self.pages_id));
        let catalog_id = self.inner.add_object(Object::Dictionary(catalog));
        self.inner.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        self.inner.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn copy_object(&mut self, source: &SourceDocument, object: &Object) -> Object {
        match object {
            Object::Reference(id) => match self.map_reference(source, *id) {
                Some(new_id) => Object::Reference(new_id),
                None => Object::Null,
            },
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(source, item))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(source, dict)),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.copy_dictionary(source, &stream.dict);
                Object::Stream(copy)
            },
            direct => direct.clone(),
        }
    }

    fn copy_dictionary(&mut self, source: &SourceDocument, dict: &Dictionary) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.copy_object(source, value));
        }
        copy
    }

    /// New id for a referenced source object, queuing it for copying.
    fn map_reference(&mut self, source: &SourceDocument, id: ObjectId) -> Option<ObjectId> {
        if let Some(new_id) = self.id_map.get(&id) {
            return Some(*new_id);
        }
        if source.page_index(id).is_some() || source.is_page_tree_node(id) {
            return None;
        }
        source.inner.get_object(id).ok()?;

        let new_id = self.inner.new_object_id();
        self.id_map.insert(id, new_id);
        self.pending.push_back((id, new_id));
        Some(new_id)
    }

    fn copy_pending(&mut self, source: &SourceDocument) {
        while let Some((old_id, new_id)) = self.pending.pop_front() {
            let copy = match source.inner.get_object(old_id) {
                Ok(object) => self.copy_object(source, object),
                Err(_) => Object::Null,
            };
            self.inner.objects.insert(new_id, copy);
        }
    }
}

/// Decode a PDF text string.
///
/// Handles UTF-16BE and UTF-8 byte order marks; unmarked strings are read as
/// UTF-8 when valid and as PDFDocEncoding otherwise.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| pdfdoc_decode(b)).collect(),
    }
}

/// Decode a byte using PDFDocEncoding.
///
/// Matches Latin-1 except for 0x18-0x1F, 0x7F-0x9F and 0xA0.
///
/// PDF Spec: ISO 32000-1:2008, Annex D, Table D.2
fn pdfdoc_decode(code: u8) -> char {
    match code {
        0x18 => '\u{02D8}', // BREVE
        0x19 => '\u{02C7}', // CARON
        0x1A => '\u{02C6}', // MODIFIER LETTER CIRCUMFLEX ACCENT
        0x1B => '\u{02D9}', // DOT ABOVE
        0x1C => '\u{02DD}', // DOUBLE ACUTE ACCENT
        0x1D => '\u{02DB}', // OGONEK
        0x1E => '\u{02DA}', // RING ABOVE
        0x1F => '\u{02DC}', // SMALL TILDE
        0x80 => '\u{2022}', // BULLET
        0x81 => '\u{2020}', // DAGGER
        0x82 => '\u{2021}', // DOUBLE DAGGER
        0x83 => '\u{2026}', // HORIZONTAL ELLIPSIS
        0x84 => '\u{2014}', // EM DASH
        0x85 => '\u{2013}', // EN DASH
        0x86 => '\u{0192}', // LATIN SMALL LETTER F WITH HOOK
        0x87 => '\u{2044}', // FRACTION SLASH
        0x88 => '\u{2039}', // SINGLE LEFT-POINTING ANGLE QUOTATION MARK
        0x89 => '\u{203A}', // SINGLE RIGHT-POINTING ANGLE QUOTATION MARK
        0x8A => '\u{2212}', // MINUS SIGN
        0x8B => '\u{2030}', // PER MILLE SIGN
        0x8C => '\u{201E}', // DOUBLE LOW-9 QUOTATION MARK
        0x8D => '\u{201C}', // LEFT DOUBLE QUOTATION MARK
        0x8E => '\u{201D}', // RIGHT DOUBLE QUOTATION MARK
        0x8F => '\u{2018}', // LEFT SINGLE QUOTATION MARK
        0x90 => '\u{2019}', // RIGHT SINGLE QUOTATION MARK
        0x91 => '\u{201A}', // SINGLE LOW-9 QUOTATION MARK
        0x92 => '\u{2122}', // TRADE MARK SIGN
        0x93 => '\u{FB01}', // LATIN SMALL LIGATURE FI
        0x94 => '\u{FB02}', // LATIN SMALL LIGATURE FL
        0x95 => '\u{0141}', // LATIN CAPITAL LETTER L WITH STROKE
        0x96 => '\u{0152}', // LATIN CAPITAL LIGATURE OE
        0x97 => '\u{0160}', // LATIN CAPITAL LETTER S WITH CARON
        0x98 => '\u{0178}', // LATIN CAPITAL LETTER Y WITH DIAERESIS
        0x99 => '\u{017D}', // LATIN CAPITAL LETTER Z WITH CARON
        0x9A => '\u{0131}', // LATIN SMALL LETTER DOTLESS I
        0x9B => '\u{0142}', // LATIN SMALL LETTER L WITH STROKE
        0x9C => '\u{0153}', // LATIN SMALL LIGATURE OE
        0x9D => '\u{0161}', // LATIN SMALL LETTER S WITH CARON
        0x9E => '\u{017E}', // LATIN SMALL LETTER Z WITH CARON
        0xA0 => '\u{20AC}', // EURO SIGN
        // Undefined
        0x7F | 0x9F => '\u{FFFD}',
        _ => code as char,
    }
}
