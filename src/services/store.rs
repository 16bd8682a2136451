use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::CatalogError;
use crate::model::catalog::Catalog;
use crate::parsers::po;
use crate::services::{encoding, rebuild};

pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
    let bytes = fs::read(path)?;
    let (text, detected) = encoding::decode(&bytes)?;
    debug!(
        path = %path.display(),
        encoding = detected.encoding.name(),
        source = ?detected.source,
        "decoded catalog"
    );

    let mut catalog = po::parse(&text)?;
    catalog.encoding = detected.encoding;
    catalog.bom = detected.bom;
    Ok(catalog)
}

pub fn save(catalog: &Catalog, path: &Path) -> Result<(), CatalogError> {
    let text = rebuild::rebuild(catalog);
    let bytes = encoding::encode(&text, catalog.encoding, catalog.bom)?;
    write_atomic(path, &bytes)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CatalogError> {
    let tmp = tmp_path(path);

    fs::write(&tmp, bytes)?;

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "catalog".to_string(),
    };
    p.set_file_name(format!(".{file_name}.tmp"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_rewrites_in_original_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.po");
        fs::write(
            &path,
            b"msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=ISO-8859-1\\n\"\n\nmsgid \"Greeting\"\nmsgstr \"\"\n",
        )
        .unwrap();

        let mut catalog = load(&path).unwrap();
        catalog.entries[1].apply_translation("Grüße".into());
        save(&catalog, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.ends_with(b"msgstr \"Gr\xFC\xDFe\"\n"));
        assert!(!dir.path().join(".app.po.tmp").exists());
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.po");
        fs::write(&path, "msgstr \"orphan\"\n").unwrap();

        assert!(matches!(load(&path), Err(CatalogError::Parse { line: 1, .. })));
    }

    #[test]
    fn undecodable_catalog_is_rejected_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.po");
        let original: &[u8] = b"msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n\nmsgid \"Coffee\"\nmsgstr \"Caf\xE9\"\n\nmsgid \"Tea\"\nmsgstr \"\"\n";
        fs::write(&path, original).unwrap();

        assert!(matches!(load(&path), Err(CatalogError::Decode { .. })));
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&dir.path().join("nope.po")),
            Err(CatalogError::Io(_))
        ));
    }
}
