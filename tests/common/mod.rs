//! In-memory PDF fixtures for the integration tests.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Where an outline item points.
pub enum Target {
    /// Explicit destination to a zero-based page index
    Page(usize),
    /// Named destination looked up in the `/Names` tree
    Named(&'static str),
    /// Explicit destination with a raw page number instead of a page reference
    PageNumber(i64),
    /// GoTo action to a zero-based page index
    GoTo(usize),
    /// `<< /D ... >>` destination dictionary whose /D points back at itself
    SelfWrapped,
    /// Launch action, which never resolves to a page
    Launch,
    /// No destination at all
    Nothing,
}

pub struct Item {
    pub title: &'static str,
    pub target: Target,
    pub children: Vec<Item>,
}

pub fn item(title: &'static str, target: Target, children: Vec<Item>) -> Item {
    Item {
        title,
        target,
        children,
    }
}

pub fn leaf(title: &'static str, page: usize) -> Item {
    item(title, Target::Page(page), vec![])
}

/// Builder for small PDFs with an outline.
pub struct PdfBuilder {
    page_count: usize,
    items: Vec<Item>,
    named: Vec<(&'static str, usize)>,
    cyclic: bool,
}

impl PdfBuilder {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            items: Vec::new(),
            named: Vec::new(),
            cyclic: false,
        }
    }

    pub fn outline(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Register a named destination pointing at a zero-based page index.
    pub fn named(mut self, name: &'static str, page: usize) -> Self {
        self.named.push((name, page));
        self
    }

    /// Link the last top-level item back to the first one.
    pub fn cyclic(mut self) -> Self {
        self.cyclic = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for i in 0..self.page_count {
            let content = doc.add_object(Stream::new(
                Dictionary::new(),
                format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1).into_bytes(),
            ));
            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set("Contents", Object::Reference(content));
            kids.push(doc.add_object(Object::Dictionary(page)));
        }

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set(
            "Kids",
            Object::Array(kids.iter().map(|id| Object::Reference(*id)).collect()),
        );
        pages.set("Count", Object::Integer(self.page_count as i64));
        pages.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));

        if let Some((first, last)) = write_items(&mut doc, &kids, &self.items) {
            if self.cyclic {
                if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(last) {
                    dict.set("Next", Object::Reference(first));
                }
            }
            let mut outlines = Dictionary::new();
            outlines.set("Type", Object::Name(b"Outlines".to_vec()));
            outlines.set("First", Object::Reference(first));
            outlines.set("Last", Object::Reference(last));
            catalog.set("Outlines", Object::Reference(doc.add_object(outlines)));
        }

        if !self.named.is_empty() {
            let mut names = Vec::new();
            for (name, page) in &self.named {
                names.push(Object::String(name.as_bytes().to_vec(), StringFormat::Literal));
                names.push(explicit_destination(kids[*page]));
            }
            let mut tree = Dictionary::new();
            tree.set("Names", Object::Array(names));
            let mut name_dict = Dictionary::new();
            name_dict.set("Dests", Object::Reference(doc.add_object(tree)));
            catalog.set("Names", Object::Dictionary(name_dict));
        }

        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("Failed to save fixture");
        buffer
    }
}

fn explicit_destination(page: ObjectId) -> Object {
    Object::Array(vec![Object::Reference(page), Object::Name(b"Fit".to_vec())])
}

/// Write `items` as linked outline dictionaries and return the first and
/// last ids of the sibling list.
fn write_items(doc: &mut Document, pages: &[ObjectId], items: &[Item]) -> Option<(ObjectId, ObjectId)> {
    let ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();

    for (i, it) in items.iter().enumerate() {
        let mut dict = Dictionary::new();
        dict.set(
            "Title",
            Object::String(it.title.as_bytes().to_vec(), StringFormat::Literal),
        );

        match it.target {
            Target::Page(page) => dict.set("Dest", explicit_destination(pages[page])),
            Target::Named(name) => dict.set(
                "Dest",
                Object::String(name.as_bytes().to_vec(), StringFormat::Literal),
            ),
            Target::PageNumber(number) => dict.set(
                "Dest",
                Object::Array(vec![Object::Integer(number), Object::Name(b"Fit".to_vec())]),
            ),
            Target::SelfWrapped => {
                let wrapper_id = doc.new_object_id();
                let mut wrapper = Dictionary::new();
                wrapper.set("D", Object::Reference(wrapper_id));
                doc.objects.insert(wrapper_id, Object::Dictionary(wrapper));
                dict.set("Dest", Object::Reference(wrapper_id));
            },
            Target::GoTo(page) => {
                let mut action = Dictionary::new();
                action.set("S", Object::Name(b"GoTo".to_vec()));
                action.set("D", explicit_destination(pages[page]));
                dict.set("A", Object::Dictionary(action));
            },
            Target::Launch => {
                let mut action = Dictionary::new();
                action.set("S", Object::Name(b"Launch".to_vec()));
                dict.set("A", Object::Dictionary(action));
            },
            Target::Nothing => {},
        }

        if let Some(next) = ids.get(i + 1) {
            dict.set("Next", Object::Reference(*next));
        }
        if let Some((first, last)) = write_items(doc, pages, &it.children) {
            dict.set("First", Object::Reference(first));
            dict.set("Last", Object::Reference(last));
        }
        doc.objects.insert(ids[i], Object::Dictionary(dict));
    }

    Some((*ids.first()?, *ids.last()?))
}

/// Names of the archive entries, in archive order.
pub fn entry_names(archive: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(archive)).expect("Invalid zip");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("Missing entry").name().to_string())
        .collect()
}

/// Page texts of the chapter stored under `name`.
pub fn chapter_pages(archive: &[u8], name: &str) -> Vec<String> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(archive)).expect("Invalid zip");
    let mut bytes = Vec::new();
    archive
        .by_name(name)
        .expect("Missing archive entry")
        .read_to_end(&mut bytes)
        .expect("Failed to read entry");

    let doc = Document::load_mem(&bytes).expect("Chapter is not a readable PDF");
    doc.get_pages()
        .values()
        .map(|id| {
            let content = doc.get_page_content(*id).expect("Missing page content");
            String::from_utf8_lossy(&content).into_owned()
        })
        .collect()
}
