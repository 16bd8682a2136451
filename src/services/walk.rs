use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::UpdateError;

pub const MESSAGES_DIR: &str = "LC_MESSAGES";

/// A catalog found under `<root>/<lang>/LC_MESSAGES/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub path: PathBuf,
    pub lang: String,
    pub target_lang: String,
}

/// `pt_BR` → `pt-BR`.
pub fn target_language(lang_dir: &str) -> String {
    lang_dir.replace('_', "-")
}

/// Lazy two-level walk: language directories, then catalogs inside each
/// `LC_MESSAGES`. Order follows the directory listing.
pub struct CatalogFiles {
    extension: String,
    languages: fs::ReadDir,
    current: Option<(String, fs::ReadDir)>,
}

pub fn catalog_files(root: &Path, extension: &str) -> Result<CatalogFiles, UpdateError> {
    if !root.is_dir() {
        return Err(UpdateError::NotADirectory(root.to_path_buf()));
    }

    let languages = fs::read_dir(root).map_err(|source| UpdateError::ReadDir {
        path: root.to_path_buf(),
        source,
    })?;

    Ok(CatalogFiles {
        extension: format!(".{}", extension.trim_start_matches('.')),
        languages,
        current: None,
    })
}

impl CatalogFiles {
    fn next_language(&mut self) -> Option<(String, fs::ReadDir)> {
        for dir_entry in self.languages.by_ref() {
            let dir_entry = match dir_entry {
                Ok(d) => d,
                Err(e) => {
                    warn!("skipping unreadable directory entry: {e}");
                    continue;
                }
            };

            let lang = match dir_entry.file_name().into_string() {
                Ok(l) => l,
                Err(name) => {
                    warn!("skipping non UTF-8 language directory {:?}", name);
                    continue;
                }
            };

            let messages = dir_entry.path().join(MESSAGES_DIR);
            if !messages.is_dir() {
                continue;
            }

            match fs::read_dir(&messages) {
                Ok(files) => return Some((lang, files)),
                Err(e) => warn!("skipping {}: {e}", messages.display()),
            }
        }
        None
    }
}

impl Iterator for CatalogFiles {
    type Item = CatalogFile;

    fn next(&mut self) -> Option<CatalogFile> {
        loop {
            if self.current.is_none() {
                self.current = Some(self.next_language()?);
            }

            let (lang, files) = self.current.as_mut()?;
            for file in files.by_ref() {
                let file = match file {
                    Ok(f) => f,
                    Err(e) => {
                        warn!("skipping unreadable catalog entry in {lang}: {e}");
                        continue;
                    }
                };

                let name = file.file_name();
                let matches = name
                    .to_str()
                    .map(|n| n.ends_with(&self.extension))
                    .unwrap_or(false);
                let path = file.path();
                if matches && path.is_file() {
                    return Some(CatalogFile {
                        path,
                        target_lang: target_language(lang),
                        lang: lang.clone(),
                    });
                }
            }

            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn target_language_uses_hyphen() {
        assert_eq!(target_language("pt_BR"), "pt-BR");
        assert_eq!(target_language("de"), "de");
    }

    #[test]
    fn finds_catalogs_per_language() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("de/LC_MESSAGES/app.po"));
        touch(&root.path().join("de/LC_MESSAGES/app.mo"));
        touch(&root.path().join("pt_BR/LC_MESSAGES/app.po"));
        touch(&root.path().join("pt_BR/LC_MESSAGES/extra.po"));
        touch(&root.path().join("fr/other/app.po"));
        touch(&root.path().join("README.po"));
        fs::create_dir_all(root.path().join("es/LC_MESSAGES/dir.po")).unwrap();

        let mut found: Vec<(String, String)> = catalog_files(root.path(), "po")
            .unwrap()
            .map(|f| {
                let name = f.path.file_name().unwrap().to_string_lossy().to_string();
                (f.target_lang, name)
            })
            .collect();
        found.sort();

        assert_eq!(
            found,
            vec![
                ("de".to_string(), "app.po".to_string()),
                ("pt-BR".to_string(), "app.po".to_string()),
                ("pt-BR".to_string(), "extra.po".to_string()),
            ]
        );
    }

    #[test]
    fn language_file_instead_of_dir_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("de/LC_MESSAGES"));
        assert_eq!(catalog_files(root.path(), ".po").unwrap().count(), 0);
    }

    #[test]
    fn root_must_be_a_directory() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("file");
        touch(&file);

        assert!(matches!(
            catalog_files(&file, "po"),
            Err(UpdateError::NotADirectory(_))
        ));
        assert!(matches!(
            catalog_files(&root.path().join("missing"), "po"),
            Err(UpdateError::NotADirectory(_))
        ));
    }
}
