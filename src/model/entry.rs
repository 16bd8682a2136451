pub const FUZZY_FLAG: &str = "fuzzy";

/// One message of a gettext catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub translator_comments: Vec<String>,
    pub extracted_comments: Vec<String>,
    pub references: Vec<String>,
    pub flags: Vec<String>,
    pub previous_msgctxt: Option<String>,
    pub previous_msgid: Option<String>,
    pub previous_msgid_plural: Option<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: String,
    pub msgstr_plural: Vec<String>,
    pub obsolete: bool,
    pub line_number: usize,
    /// Source text of the block as read from disk. Cleared once the entry is
    /// modified so the serializer knows to render it again.
    pub raw_block: Option<String>,
}

impl CatalogEntry {
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none() && !self.obsolete
    }

    pub fn is_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|f| f == FUZZY_FLAG)
    }

    /// A `#|` annotation with a non-empty previous msgid marks a stale translation.
    pub fn has_previous(&self) -> bool {
        self.previous_msgid
            .as_deref()
            .map(|p| !p.is_empty())
            .unwrap_or(false)
    }

    pub fn is_untranslated(&self) -> bool {
        if self.is_plural() {
            self.msgstr_plural.is_empty() || self.msgstr_plural.iter().any(|s| s.is_empty())
        } else {
            self.msgstr.is_empty()
        }
    }

    pub fn needs_translation(&self) -> bool {
        if self.obsolete || self.is_header() {
            return false;
        }
        self.has_previous() || self.is_untranslated() || self.is_fuzzy()
    }

    pub fn is_modified(&self) -> bool {
        self.raw_block.is_none()
    }

    pub fn apply_translation(&mut self, translation: String) {
        self.msgstr = translation;
        self.mark_reviewed();
    }

    /// Fills `msgstr[0]` with the singular form and every other slot with the
    /// plural form. `nplurals` comes from the catalog header.
    pub fn apply_plural_translation(&mut self, singular: String, plural: String, nplurals: usize) {
        let slots = nplurals.max(self.msgstr_plural.len()).max(1);
        self.msgstr_plural = (0..slots)
            .map(|i| if i == 0 { singular.clone() } else { plural.clone() })
            .collect();
        self.mark_reviewed();
    }

    fn mark_reviewed(&mut self) {
        self.flags.retain(|f| f != FUZZY_FLAG);
        self.previous_msgctxt = None;
        self.previous_msgid = None;
        self.previous_msgid_plural = None;
        self.raw_block = None;
    }
}
