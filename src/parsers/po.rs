//! Gettext `.po` parser.
//!
//! Every message keeps the exact text of its block (`raw_block`) so that
//! messages the updater never touches are written back unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CatalogError;
use crate::model::catalog::Catalog;
use crate::model::entry::CatalogEntry;

// Groups:
// - obs: `#~` marker of an obsolete message
// - prev: `#|` (or `|` after `#~`) marker of a previous-source line
// - kw / idx: keyword, with the index of `msgstr[N]`
// - val: the quoted string, still escaped
static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<obs>#~)?(?:\s*(?P<prev>#?\|))?\s*(?P<kw>msgctxt|msgid_plural|msgid|msgstr(?:\[(?P<idx>\d+)\])?)\s+"(?P<val>.*)"\s*$"#,
    )
    .expect("keyword pattern")
});

static CONTINUATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?P<obs>#~)?(?:\s*(?P<prev>#?\|))?\s*"(?P<val>.*)"\s*$"#)
        .expect("continuation pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrPlural(usize),
    PreviousMsgctxt,
    PreviousMsgid,
    PreviousMsgidPlural,
}

#[derive(Default)]
struct Pending<'a> {
    entry: CatalogEntry,
    lines: Vec<&'a str>,
    field: Option<Field>,
    has_keyword: bool,
    has_msgid: bool,
    has_msgstr: bool,
    start_line: usize,
}

impl<'a> Pending<'a> {
    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn push_line(&mut self, ln: usize, line: &'a str) {
        if self.lines.is_empty() {
            self.start_line = ln;
        }
        self.lines.push(line);
    }

    fn finish(self) -> Result<CatalogEntry, CatalogError> {
        if !self.has_msgid {
            return Err(CatalogError::parse(self.start_line, "message without msgid"));
        }
        if !self.has_msgstr {
            return Err(CatalogError::parse(self.start_line, "message without msgstr"));
        }

        let mut entry = self.entry;
        entry.line_number = self.start_line;
        entry.raw_block = Some(self.lines.join("\n"));
        Ok(entry)
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        let e = &mut self.entry;
        match field {
            Field::Msgctxt => e.msgctxt.get_or_insert_with(String::new),
            Field::Msgid => &mut e.msgid,
            Field::MsgidPlural => e.msgid_plural.get_or_insert_with(String::new),
            Field::Msgstr => &mut e.msgstr,
            Field::MsgstrPlural(i) => {
                if e.msgstr_plural.len() <= i {
                    e.msgstr_plural.resize(i + 1, String::new());
                }
                &mut e.msgstr_plural[i]
            }
            Field::PreviousMsgctxt => e.previous_msgctxt.get_or_insert_with(String::new),
            Field::PreviousMsgid => e.previous_msgid.get_or_insert_with(String::new),
            Field::PreviousMsgidPlural => e.previous_msgid_plural.get_or_insert_with(String::new),
        }
    }
}

pub fn parse(text: &str) -> Result<Catalog, CatalogError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut entries = Vec::new();
    let mut pending = Pending::default();

    for (i, line) in text.lines().enumerate() {
        let ln = i + 1;
        let line_clean = line.trim_end_matches('\r');
        let logical = line_clean.trim();

        if logical.is_empty() {
            if pending.has_keyword {
                entries.push(std::mem::take(&mut pending).finish()?);
            } else if !pending.is_empty() {
                pending.push_line(ln, line_clean);
            }
            continue;
        }

        let keyword = KEYWORD_RE.captures(line_clean);

        // After msgstr only string continuations and further msgstr[N] lines
        // belong to the current message; anything else opens the next one.
        if pending.has_msgstr {
            let continues = CONTINUATION_RE.is_match(line_clean)
                || keyword
                    .as_ref()
                    .map(|c| c["kw"].starts_with("msgstr"))
                    .unwrap_or(false);
            if !continues {
                entries.push(std::mem::take(&mut pending).finish()?);
            }
        }

        if let Some(caps) = keyword {
            let obsolete = caps.name("obs").is_some();
            let previous = caps.name("prev").is_some();
            let value = unescape(&caps["val"]);

            let field = match (&caps["kw"], previous) {
                ("msgctxt", false) => Field::Msgctxt,
                ("msgid", false) => Field::Msgid,
                ("msgid_plural", false) => Field::MsgidPlural,
                ("msgctxt", true) => Field::PreviousMsgctxt,
                ("msgid", true) => Field::PreviousMsgid,
                ("msgid_plural", true) => Field::PreviousMsgidPlural,
                (_, true) => return Err(CatalogError::parse(ln, "msgstr in previous-source comment")),
                (_, false) => match caps.name("idx") {
                    Some(idx) => {
                        let idx = idx
                            .as_str()
                            .parse::<usize>()
                            .map_err(|e| CatalogError::parse(ln, format!("invalid plural index: {e}")))?;
                        Field::MsgstrPlural(idx)
                    }
                    None => Field::Msgstr,
                },
            };

            match field {
                Field::Msgctxt | Field::Msgid if pending.has_msgid => {
                    return Err(CatalogError::parse(ln, "message without msgstr"));
                }
                Field::Msgstr | Field::MsgstrPlural(_) if !pending.has_msgid => {
                    return Err(CatalogError::parse(ln, "msgstr without msgid"));
                }
                Field::MsgidPlural if !pending.has_msgid => {
                    return Err(CatalogError::parse(ln, "msgid_plural without msgid"));
                }
                _ => {}
            }

            if !pending.has_keyword {
                pending.entry.obsolete = obsolete;
            }

            pending.push_line(ln, line_clean);
            pending.has_keyword = true;
            match field {
                Field::Msgid => pending.has_msgid = true,
                Field::Msgstr | Field::MsgstrPlural(_) => pending.has_msgstr = true,
                _ => {}
            }
            *pending.field_mut(field) = value;
            pending.field = Some(field);
            continue;
        }

        if let Some(caps) = CONTINUATION_RE.captures(line_clean) {
            let field = pending
                .field
                .ok_or_else(|| CatalogError::parse(ln, "string continuation without keyword"))?;
            pending.push_line(ln, line_clean);
            pending.field_mut(field).push_str(&unescape(&caps["val"]));
            continue;
        }

        if logical.starts_with('#') {
            if pending.has_msgid {
                return Err(CatalogError::parse(ln, "comment inside a message"));
            }
            parse_comment(&mut pending.entry, logical).map_err(|r| CatalogError::parse(ln, r))?;
            pending.push_line(ln, line_clean);
            continue;
        }

        return Err(CatalogError::parse(ln, format!("unexpected line: {logical}")));
    }

    let mut trailing_lines = Vec::new();
    if pending.has_keyword {
        entries.push(pending.finish()?);
    } else {
        trailing_lines = pending
            .lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>();
        while trailing_lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
            trailing_lines.pop();
        }
    }

    Ok(Catalog {
        entries,
        trailing_lines,
        ..Catalog::default()
    })
}

fn parse_comment(entry: &mut CatalogEntry, line: &str) -> Result<(), &'static str> {
    if let Some(rest) = line.strip_prefix("#,") {
        entry.flags.extend(
            rest.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
        );
    } else if let Some(rest) = line.strip_prefix("#:") {
        entry.references.push(rest.trim().to_string());
    } else if let Some(rest) = line.strip_prefix("#.") {
        entry.extracted_comments.push(strip_one_space(rest).to_string());
    } else if line.starts_with("#|") {
        return Err("malformed previous-source comment");
    } else if let Some(rest) = line.strip_prefix('#') {
        entry.translator_comments.push(strip_one_space(rest).to_string());
    }
    Ok(())
}

fn strip_one_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}

/// Decodes the C escapes gettext allows in quoted strings.
pub fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('a') => result.push('\u{7}'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('v') => result.push('\u{b}'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}
