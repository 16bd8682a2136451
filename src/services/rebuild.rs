use crate::model::catalog::Catalog;
use crate::model::entry::CatalogEntry;

pub fn rebuild(catalog: &Catalog) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(catalog.entries.len() + 1);

    for e in &catalog.entries {
        // Untouched messages keep their original text 1:1.
        match &e.raw_block {
            Some(raw) => blocks.push(raw.clone()),
            None => blocks.push(render_entry(e)),
        }
    }

    if !catalog.trailing_lines.is_empty() {
        blocks.push(catalog.trailing_lines.join("\n"));
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

pub fn render_entry(e: &CatalogEntry) -> String {
    let mut out: Vec<String> = Vec::new();

    for c in &e.translator_comments {
        if c.is_empty() {
            out.push("#".to_string());
        } else {
            out.push(format!("# {c}"));
        }
    }
    for c in &e.extracted_comments {
        out.push(format!("#. {c}"));
    }
    for r in &e.references {
        out.push(format!("#: {r}"));
    }
    if !e.flags.is_empty() {
        out.push(format!("#, {}", e.flags.join(", ")));
    }

    let prev_prefix = if e.obsolete { "#~| " } else { "#| " };
    if let Some(v) = &e.previous_msgctxt {
        push_field(&mut out, prev_prefix, "msgctxt", v);
    }
    if let Some(v) = &e.previous_msgid {
        push_field(&mut out, prev_prefix, "msgid", v);
    }
    if let Some(v) = &e.previous_msgid_plural {
        push_field(&mut out, prev_prefix, "msgid_plural", v);
    }

    let prefix = if e.obsolete { "#~ " } else { "" };
    if let Some(v) = &e.msgctxt {
        push_field(&mut out, prefix, "msgctxt", v);
    }
    push_field(&mut out, prefix, "msgid", &e.msgid);

    match &e.msgid_plural {
        Some(plural) => {
            push_field(&mut out, prefix, "msgid_plural", plural);
            for (i, s) in e.msgstr_plural.iter().enumerate() {
                push_field(&mut out, prefix, &format!("msgstr[{i}]"), s);
            }
        }
        None => push_field(&mut out, prefix, "msgstr", &e.msgstr),
    }

    out.join("\n")
}

/// Multi-line values follow the gettext layout: an empty first string, then
/// one quoted line per `\n`.
fn push_field(out: &mut Vec<String>, prefix: &str, keyword: &str, value: &str) {
    let multiline = value.trim_end_matches('\n').contains('\n');

    if !multiline {
        out.push(format!("{prefix}{keyword} \"{}\"", escape(value)));
        return;
    }

    out.push(format!("{prefix}{keyword} \"\""));
    for piece in value.split_inclusive('\n') {
        out.push(format!("{prefix}\"{}\"", escape(piece)));
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::po;

    #[test]
    fn untouched_catalog_is_reproduced() {
        let text = "# comment\nmsgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n\nmsgid \"Hello\"\nmsgstr \"Hallo\"\n";
        let catalog = po::parse(text).unwrap();
        assert_eq!(rebuild(&catalog), text);
    }

    #[test]
    fn modified_entry_is_rendered() {
        let text = "#: a.c:1\n#, fuzzy, c-format\n#| msgid \"Hi\"\nmsgid \"Hello\"\nmsgstr \"Alt\"\n";
        let mut catalog = po::parse(text).unwrap();
        catalog.entries[0].apply_translation("Hallo \"du\"".into());

        assert_eq!(
            rebuild(&catalog),
            "#: a.c:1\n#, c-format\nmsgid \"Hello\"\nmsgstr \"Hallo \\\"du\\\"\"\n"
        );
    }

    #[test]
    fn multiline_values_are_split_after_newlines() {
        let e = CatalogEntry {
            msgid: "Line one\nLine two".into(),
            msgstr: "Zeile eins\nZeile zwei\n".into(),
            ..CatalogEntry::default()
        };
        assert_eq!(
            render_entry(&e),
            "msgid \"\"\n\"Line one\\n\"\n\"Line two\"\nmsgstr \"\"\n\"Zeile eins\\n\"\n\"Zeile zwei\\n\""
        );
    }

    #[test]
    fn plural_and_obsolete_prefixes() {
        let e = CatalogEntry {
            msgid: "file".into(),
            msgid_plural: Some("files".into()),
            msgstr_plural: vec!["Datei".into(), "Dateien".into()],
            obsolete: true,
            ..CatalogEntry::default()
        };
        assert_eq!(
            render_entry(&e),
            "#~ msgid \"file\"\n#~ msgid_plural \"files\"\n#~ msgstr[0] \"Datei\"\n#~ msgstr[1] \"Dateien\""
        );
    }

    #[test]
    fn rendered_entry_parses_back() {
        let e = CatalogEntry {
            translator_comments: vec!["note".into()],
            msgctxt: Some("menu".into()),
            msgid: "Tab\there".into(),
            msgstr: "Tab\thier".into(),
            ..CatalogEntry::default()
        };
        let parsed = po::parse(&render_entry(&e)).unwrap();
        let back = &parsed.entries[0];
        assert_eq!(back.msgctxt, e.msgctxt);
        assert_eq!(back.msgid, e.msgid);
        assert_eq!(back.msgstr, e.msgstr);
        assert_eq!(back.translator_comments, e.translator_comments);
    }
}
