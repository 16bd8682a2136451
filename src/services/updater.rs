use std::path::Path;

use tracing::{error, info};

use crate::error::{CatalogError, TranslateError, UpdateError};
use crate::model::catalog::Catalog;
use crate::model::entry::CatalogEntry;
use crate::services::report::{EntryFailure, FileReport, RunReport};
use crate::services::store;
use crate::services::translate::Translator;
use crate::services::walk::{self, CatalogFile};

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub extension: String,
    pub dry_run: bool,
    pub fail_fast: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        UpdateOptions {
            extension: "po".to_string(),
            dry_run: false,
            fail_fast: false,
        }
    }
}

/// Walks a locale tree and fills every message that is empty, fuzzy or
/// carries a previous-source annotation.
pub struct CatalogUpdater<T: Translator> {
    translator: T,
    options: UpdateOptions,
}

impl<T: Translator> CatalogUpdater<T> {
    pub fn new(translator: T, options: UpdateOptions) -> Self {
        CatalogUpdater {
            translator,
            options,
        }
    }

    pub fn run(&self, root: &Path) -> Result<RunReport, UpdateError> {
        let mut report = RunReport::default();

        for file in walk::catalog_files(root, &self.options.extension)? {
            match self.update_file(&file) {
                Ok(r) => report.push(r),
                Err(source) if self.options.fail_fast => {
                    return Err(UpdateError::Catalog {
                        path: file.path,
                        source,
                    });
                }
                Err(e) => {
                    error!("Error processing {}: {e}", file.path.display());
                    report.push(FileReport {
                        path: file.path,
                        lang: file.lang,
                        target_lang: file.target_lang,
                        error: Some(e.to_string()),
                        ..FileReport::default()
                    });
                }
            }
        }

        Ok(report)
    }

    pub fn update_file(&self, file: &CatalogFile) -> Result<FileReport, CatalogError> {
        info!(
            "Processing {} ({} -> {}) ...",
            file.path.display(),
            file.lang,
            file.target_lang
        );

        let mut catalog = store::load(&file.path)?;
        let mut report = FileReport {
            path: file.path.clone(),
            lang: file.lang.clone(),
            target_lang: file.target_lang.clone(),
            ..FileReport::default()
        };

        if self.options.dry_run {
            for entry in catalog.messages_mut().filter(|e| e.needs_translation()) {
                info!("Needs translation: '{}' (line {})", entry.msgid, entry.line_number);
                report.pending += 1;
            }
            return Ok(report);
        }

        translate_catalog(&mut catalog, &file.target_lang, &self.translator, &mut report);

        if report.translated > 0 {
            store::save(&catalog, &file.path)?;
            report.saved = true;
            info!("Saved translations to {}", file.path.display());
        }

        Ok(report)
    }
}

/// One in-memory pass over a catalog. A failed message is recorded and left
/// as it was; it never stops the remaining messages.
pub fn translate_catalog<T: Translator + ?Sized>(
    catalog: &mut Catalog,
    target_lang: &str,
    translator: &T,
    report: &mut FileReport,
) {
    let nplurals = catalog.nplurals();

    for entry in catalog.messages_mut() {
        if !entry.needs_translation() {
            continue;
        }

        match translate_entry(entry, target_lang, translator, nplurals) {
            Ok(()) => report.translated += 1,
            Err(e) => {
                error!("Error translating '{}': {e}", entry.msgid);
                report.failed += 1;
                report.failures.push(EntryFailure {
                    msgid: entry.msgid.clone(),
                    line_number: entry.line_number,
                    error: e.to_string(),
                });
            }
        }
    }
}

fn translate_entry<T: Translator + ?Sized>(
    entry: &mut CatalogEntry,
    target_lang: &str,
    translator: &T,
    nplurals: usize,
) -> Result<(), TranslateError> {
    // Always the current msgid, never the previous one.
    let singular = translator.translate(&entry.msgid, target_lang)?;

    match entry.msgid_plural.as_deref() {
        Some(plural_src) => {
            let plural = translator.translate(plural_src, target_lang)?;
            info!("Translated: '{}' -> '{}' / '{}'", entry.msgid, singular, plural);
            entry.apply_plural_translation(singular, plural, nplurals);
        }
        None => {
            info!("Translated: '{}' -> '{}'", entry.msgid, singular);
            entry.apply_translation(singular);
        }
    }

    Ok(())
}
