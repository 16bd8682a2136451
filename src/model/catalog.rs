use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::entry::CatalogEntry;

const DEFAULT_NPLURALS: usize = 2;

static NPLURALS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"nplurals\s*=\s*(\d+)").expect("nplurals pattern"));

/// A parsed message catalog, in file order.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,

    /// Comment lines after the last message, kept so a rewrite does not drop them.
    pub trailing_lines: Vec<String>,

    pub encoding: &'static Encoding,
    pub bom: bool,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            entries: Vec::new(),
            trailing_lines: Vec::new(),
            encoding: UTF_8,
            bom: false,
        }
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Catalog {
            entries,
            ..Catalog::default()
        }
    }

    pub fn header(&self) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.is_header())
    }

    /// Plural form count declared by the `Plural-Forms` header field.
    pub fn nplurals(&self) -> usize {
        self.header()
            .and_then(|h| {
                h.msgstr
                    .lines()
                    .find(|l| l.trim_start().starts_with("Plural-Forms:"))
                    .and_then(|l| NPLURALS_RE.captures(l))
                    .and_then(|c| c[1].parse::<usize>().ok())
            })
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_NPLURALS)
    }

    /// Messages that take part in translation: everything except the header
    /// and obsolete entries.
    pub fn messages_mut(&mut self) -> impl Iterator<Item = &mut CatalogEntry> + '_ {
        self.entries
            .iter_mut()
            .filter(|e| !e.obsolete && !e.is_header())
    }

    pub fn is_modified(&self) -> bool {
        self.entries.iter().any(|e| e.is_modified())
    }
}
