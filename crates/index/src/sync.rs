//! Reconciliation between the tracked root and the index
//!
//! Each operation runs inside one transaction. The returned report lists
//! what was persisted; on error nothing is persisted and no report exists.

use crate::classify::{Classifier, EntryParser, ParseEntryOpts};
use crate::db::{Database, IndexTx};
use crate::detect::{needs_update, Detection};
use crate::error::{IndexError, Result};
use crate::report::{ChangeReport, Op};
use crate::resolve::PathResolver;
use aerodex_core::path::relative_to;
use aerodex_core::Entry;
use std::path::Path;
use tracing::{debug, info};

pub struct SyncEngine<'a, C: Classifier = EntryParser> {
    db: &'a mut Database,
    classifier: C,
    opts: ParseEntryOpts,
}

impl<'a> SyncEngine<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self::with_classifier(db, EntryParser)
    }
}

impl<'a, C: Classifier> SyncEngine<'a, C> {
    pub fn with_classifier(db: &'a mut Database, classifier: C) -> Self {
        let hash = &db.config().hash;
        let opts = ParseEntryOpts {
            with_hash: hash.enabled,
            mmap_threshold: hash.mmap_threshold,
        };
        Self {
            db,
            classifier,
            opts,
        }
    }

    fn resolver(&self) -> PathResolver {
        let scan = &self.db.config().scan;
        PathResolver::new(self.db.root())
            .max_depth(scan.max_depth)
            .follow_links(scan.follow_links)
    }

    /// Insert new paths and refresh changed ones
    ///
    /// Directories leading to each path are indexed too.
    pub fn add<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<ChangeReport> {
        let targets = self.resolver().resolve(paths, true)?;
        let root = self.db.root().to_path_buf();
        let mut report = ChangeReport::new();

        let tx = self.db.transaction()?;
        for target in &targets {
            let rel = relative_to(&root, target)?;

            match tx.lookup(&rel)? {
                None => {
                    let entry = self.classifier.classify(target, &root, &self.opts)?;
                    tx.insert(&entry)?;
                    report.push(Op::Added, entry.path);
                }
                Some(fp) => {
                    let detection =
                        needs_update(fp.mtime, &fp.hash, target, self.opts.mmap_threshold)?;
                    if detection.changed {
                        let entry =
                            recompute(&self.classifier, self.opts, target, &root, detection)?;
                        update(&tx, &entry)?;
                        report.push(Op::Updated, entry.path);
                    }
                }
            }
        }
        tx.commit()?;

        info!(
            "add: {} added, {} updated ({} paths checked)",
            report.count(Op::Added),
            report.count(Op::Updated),
            targets.len()
        );
        Ok(report)
    }

    /// Delete paths (and everything below directories) from the index
    ///
    /// Paths must still exist on disk; untracked paths are ignored.
    pub fn remove<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<ChangeReport> {
        let targets = self.resolver().resolve(paths, false)?;
        let root = self.db.root().to_path_buf();
        let mut report = ChangeReport::new();

        let tx = self.db.transaction()?;
        for target in &targets {
            let rel = relative_to(&root, target)?;
            if tx.delete(&rel)? >= 1 {
                report.push(Op::Deleted, rel);
            }
        }
        tx.commit()?;

        info!("remove: {} deleted", report.len());
        Ok(report)
    }

    /// Refresh every stored entry against the filesystem
    pub fn sync(&mut self) -> Result<ChangeReport> {
        let root = self.db.root().to_path_buf();
        let mut report = ChangeReport::new();

        let tx = self.db.transaction()?;
        let stored = tx.fingerprints()?;

        for (rel, fp) in &stored {
            let path = root.join(rel);

            match std::fs::symlink_metadata(&path) {
                Ok(_) if path.exists() => {
                    let detection =
                        needs_update(fp.mtime, &fp.hash, &path, self.opts.mmap_threshold)?;
                    if detection.changed {
                        let entry =
                            recompute(&self.classifier, self.opts, &path, &root, detection)?;
                        update(&tx, &entry)?;
                        report.push(Op::Updated, entry.path);
                    }
                }
                Ok(_) => {
                    debug!("{} is a dangling link", path.display());
                    tx.delete(rel)?;
                    report.push(Op::Deleted, rel.as_str());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tx.delete(rel)?;
                    report.push(Op::Deleted, rel.as_str());
                }
                Err(e) => return Err(IndexError::io(&path, e)),
            }
        }
        tx.commit()?;

        info!(
            "sync: {} updated, {} deleted ({} entries checked)",
            report.count(Op::Updated),
            report.count(Op::Deleted),
            stored.len()
        );
        Ok(report)
    }
}

/// Classify a changed path, reusing the hash change detection computed
fn recompute<C: Classifier>(
    classifier: &C,
    opts: ParseEntryOpts,
    path: &Path,
    root: &Path,
    detection: Detection,
) -> Result<Entry> {
    let known_hash = detection.hash.filter(|_| opts.with_hash);
    let opts = ParseEntryOpts {
        with_hash: opts.with_hash && known_hash.is_none(),
        ..opts
    };

    let mut entry = classifier.classify(path, root, &opts)?;
    if let Some(hash) = known_hash {
        entry.hash = hash;
    }
    Ok(entry)
}

fn update(tx: &IndexTx<'_>, entry: &Entry) -> Result<()> {
    debug!("Updating {}", entry.path);
    tx.update(entry)?;
    Ok(())
}
