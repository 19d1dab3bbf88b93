//! Navigation targets of outline items and their resolution to pages.
//!
//! An outline item points somewhere through either a `/Dest` entry or an
//! `/A` action dictionary. Both are modelled as sum types so every shape is
//! matched explicitly:
//!
//! - [`NavigationTarget`] - what the outline item carries
//! - [`Action`] - the action subtypes that matter here (only GoTo navigates)
//! - [`Destination`] - a direct page reference or a named destination
//!
//! PDF Spec: ISO 32000-1:2008, Section 12.3.2 (Destinations) and
//! Section 12.6.4.2 (Go-To Actions).

use crate::document::{decode_text, SourceDocument};
use lopdf::{Dictionary, Object, ObjectId};

/// A destination inside the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Explicit destination `[page /Fit ...]`
    Page {
        /// Reference to a page object
        page_ref: Option<ObjectId>,
        /// Raw zero-based page number (used by producers that write an
        /// integer instead of a page reference)
        page_number: Option<i64>,
    },

    /// Named destination, looked up in the document's name dictionary
    Named(String),

    /// Any other destination shape; never resolves
    Unsupported(&'static str),
}

/// Action attached to an outline item through `/A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// GoTo action with its `/D` destination
    GoTo(Option<Destination>),

    /// Any other action subtype (URI, GoToR, Launch, JavaScript, ...)
    Other(String),
}

/// Where an outline item navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// Neither `/Dest` nor `/A` present
    None,

    /// `/Dest` entry
    Direct(Destination),

    /// `/A` entry
    Action(Action),
}

impl Destination {
    /// Interpret a destination object.
    ///
    /// Indirect references are followed; arrays are explicit destinations,
    /// strings and names are named destinations.
    pub fn from_object(doc: &SourceDocument, object: &Object) -> Self {
        match doc.resolve(object) {
            Some(Object::Array(items)) => Destination::from_array(items),
            Some(Object::String(bytes, _)) => Destination::Named(decode_text(bytes)),
            Some(Object::Name(bytes)) => {
                Destination::Named(String::from_utf8_lossy(bytes).into_owned())
            },
            // Some producers write `<< /D [...] >>` directly as /Dest.
            // The wrapper is unwrapped once; /D must be an explicit destination.
            Some(Object::Dictionary(dict)) => match doc.resolve_key(dict, b"D") {
                Some(Object::Array(items)) => Destination::from_array(items),
                Some(Object::Dictionary(_)) => {
                    Destination::Unsupported("nested destination dictionary")
                },
                _ => Destination::Unsupported("dictionary"),
            },
            Some(_) => Destination::Unsupported("unexpected object"),
            None => Destination::Unsupported("dangling reference"),
        }
    }

    fn from_array(items: &[Object]) -> Self {
        match items.first() {
            Some(Object::Reference(id)) => Destination::Page {
                page_ref: Some(*id),
                page_number: None,
            },
            Some(Object::Integer(number)) => Destination::Page {
                page_ref: None,
                page_number: Some(*number),
            },
            Some(_) => Destination::Unsupported("array without page"),
            None => Destination::Unsupported("empty array"),
        }
    }

    /// Resolve to a one-based page number.
    ///
    /// A page-object reference takes precedence over a raw page number; a
    /// reference to something that is not a page of `doc` does not resolve.
    pub fn resolve(&self, doc: &SourceDocument) -> Option<u32> {
        match self {
            Destination::Page { page_ref, page_number } => {
                resolve_page(doc, *page_ref, *page_number)
            },
            Destination::Named(name) => {
                let target = doc.named_destination(name)?;
                match Destination::from_object(doc, target) {
                    Destination::Page { page_ref, page_number } => {
                        resolve_page(doc, page_ref, page_number)
                    },
                    // Named destinations map to explicit ones; no second lookup.
                    Destination::Named(_) | Destination::Unsupported(_) => None,
                }
            },
            Destination::Unsupported(_) => None,
        }
    }
}

fn resolve_page(
    doc: &SourceDocument,
    page_ref: Option<ObjectId>,
    page_number: Option<i64>,
) -> Option<u32> {
    match (page_ref, page_number) {
        (Some(id), _) => doc
            .page_index(id)
            .and_then(|index| u32::try_from(index + 1).ok()),
        (None, Some(number)) if number >= 0 => number
            .checked_add(1)
            .and_then(|page| u32::try_from(page).ok()),
        (None, _) => None,
    }
}

impl NavigationTarget {
    /// Read the navigation target of an outline item dictionary.
    ///
    /// `/Dest` wins over `/A` when both are present.
    pub fn from_outline_entry(doc: &SourceDocument, entry: &Dictionary) -> Self {
        if let Ok(dest) = entry.get(b"Dest") {
            return NavigationTarget::Direct(Destination::from_object(doc, dest));
        }

        let action = match doc.resolve_key(entry, b"A") {
            Some(Object::Dictionary(action)) => action,
            Some(_) => return NavigationTarget::Action(Action::Other("malformed".to_string())),
            None => return NavigationTarget::None,
        };

        let subtype = action
            .get(b"S")
            .ok()
            .and_then(|s| s.as_name().ok())
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .unwrap_or_default();

        if subtype == "GoTo" {
            let dest = action
                .get(b"D")
                .ok()
                .map(|d| Destination::from_object(doc, d));
            NavigationTarget::Action(Action::GoTo(dest))
        } else {
            NavigationTarget::Action(Action::Other(subtype))
        }
    }

    /// Resolve to a one-based page number, or `None` when unresolved.
    pub fn resolve(&self, doc: &SourceDocument) -> Option<u32> {
        match self {
            NavigationTarget::None => None,
            NavigationTarget::Direct(dest) => dest.resolve(doc),
            NavigationTarget::Action(Action::GoTo(Some(dest))) => dest.resolve(doc),
            NavigationTarget::Action(Action::GoTo(None)) => None,
            NavigationTarget::Action(Action::Other(_)) => None,
        }
    }

    /// Short description used in log messages.
    pub fn describe(&self) -> String {
        match self {
            NavigationTarget::None => "no destination or action".to_string(),
            NavigationTarget::Direct(dest) => format!("destination {}", describe_dest(dest)),
            NavigationTarget::Action(Action::GoTo(Some(dest))) => {
                format!("GoTo action to {}", describe_dest(dest))
            },
            NavigationTarget::Action(Action::GoTo(None)) => {
                "GoTo action without destination".to_string()
            },
            NavigationTarget::Action(Action::Other(kind)) => {
                format!("unsupported action '{}'", kind)
            },
        }
    }
}

fn describe_dest(dest: &Destination) -> String {
    match dest {
        Destination::Page {
            page_ref: Some((num, generation)),
            ..
        } => format!("page object {} {} R", num, generation),
        Destination::Page {
            page_ref: None,
            page_number: Some(n),
        } => format!("page number {}", n),
        Destination::Page { .. } => "page without target".to_string(),
        Destination::Named(name) => format!("named destination '{}'", name),
        Destination::Unsupported(kind) => format!("unsupported {}", kind),
    }
}
