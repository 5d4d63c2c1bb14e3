//! Artifact Repository
//!
//! Every stored artifact has two copies: the history copy under the producing
//! run's uid and the pointer copy under its tag (`latest` by default).

use chrono::Utc;
use rundb_core::{AttrPath, Document};
use rundb_core::domain::artifact::{Artifact, ArtifactList, LATEST_TAG, fields};
use rundb_core::dto::ANY_TAG;
use rundb_core::dto::artifact::{ArtifactDeletion, ArtifactQuery};

use super::{non_empty, read_file, safe_delete, write_file};
use crate::db::FileRunDb;
use crate::error::{Result, StoreError};
use crate::paths::{Table, artifact_stem, tag_or_latest};
use crate::query::{Mask, Predicates, predicate};

impl FileRunDb {
    /// Store an artifact under `uid` and under `tag`
    ///
    /// `updated` is stamped with the current time when the artifact has none.
    /// The stamp goes through `Document::set_attr`, so a custom serializer
    /// still encodes the stored copy. The two writes are not atomic: if the
    /// second fails the history copy stays on disk.
    pub fn store_artifact(
        &self,
        key: &str,
        artifact: &(impl Document + Clone),
        uid: &str,
        iter: Option<u64>,
        tag: Option<&str>,
        project: Option<&str>,
    ) -> Result<()> {
        let tag = tag_or_latest(tag);
        if tag == ANY_TAG {
            return Err(StoreError::InvalidFilter(format!(
                "cannot store artifact {key} under the wildcard tag"
            )));
        }

        let updated = AttrPath::from(fields::UPDATED);
        let data = if artifact.to_record().contains(&updated) {
            self.dumps(artifact)?
        } else {
            let mut stamped = artifact.clone();
            stamped.set_attr(&updated, Utc::now().to_rfc3339().into());
            self.dumps(&stamped)?
        };

        let ext = self.ext()?;
        let stem = artifact_stem(key, iter);
        let history = self.paths().artifact_file(project, &stem, uid, ext);
        write_file(&history, data.as_bytes())?;
        let pointer = self.paths().artifact_file(project, &stem, tag, ext);
        write_file(&pointer, data.as_bytes())?;

        tracing::debug!("Stored artifact {} (uid: {}, tag: {})", stem, uid, tag);

        Ok(())
    }

    /// Read an artifact through a tag, or a uid for the history copy
    pub fn read_artifact(
        &self,
        key: &str,
        tag: Option<&str>,
        iter: Option<u64>,
        project: Option<&str>,
    ) -> Result<Artifact> {
        let stem = artifact_stem(key, iter);
        let path = self
            .paths()
            .artifact_file(project, &stem, tag_or_latest(tag), self.ext()?);
        let text = read_file(&path)?.ok_or_else(|| StoreError::NotFound(stem.clone()))?;

        Ok(Artifact::from(self.loads(&text)?))
    }

    /// List the artifacts of one tag, or of every tag with `"*"`
    ///
    /// Wildcard results read from the `latest` directory carry
    /// `tree = "latest"`.
    pub fn list_artifacts(&self, query: &ArtifactQuery) -> Result<ArtifactList> {
        let tag = tag_or_latest(query.tag.as_deref());
        let name = non_empty(&query.name);

        let mut predicates = Predicates::new();
        if let Some(name) = name {
            predicates.push(predicate::contains(fields::KEY, name));
        }
        if !query.labels.is_empty() {
            predicates.push(predicate::labels(fields::LABELS, query.labels.clone()));
        }
        if query.since.is_some() || query.until.is_some() {
            predicates.push(predicate::within(fields::UPDATED, query.since, query.until));
        }

        let project = query.project.as_deref();
        let dir = self.paths().filepath(Table::Artifacts, project, "", Some(tag));
        let mask = Mask::for_tag(tag, name);

        tracing::info!(
            "Reading artifacts in {} (name/mask: {:?}, tag: {})",
            self.paths().project(project),
            mask,
            tag
        );

        let latest = self
            .paths()
            .filepath(Table::Artifacts, project, "", Some(LATEST_TAG));
        let mut results = ArtifactList::new(tag);
        for (record, path) in self.scan(dir, mask)?.matching(&predicates) {
            let mut artifact = Artifact::from(record);
            if tag == ANY_TAG && path.starts_with(&latest) {
                artifact.set(&fields::TREE.into(), LATEST_TAG);
            }
            results.items.push(artifact);
        }

        Ok(results)
    }

    /// Delete one tag-keyed (or uid-keyed) artifact file
    pub fn del_artifact(&self, key: &str, tag: Option<&str>, project: Option<&str>) -> Result<()> {
        let path = self
            .paths()
            .artifact_file(project, key, tag_or_latest(tag), self.ext()?);
        safe_delete(&path)
    }

    /// Delete every artifact matching the filter, returning how many were removed
    ///
    /// Unlike listing, the name must equal the artifact key.
    pub fn del_artifacts(&self, filter: &ArtifactDeletion) -> Result<usize> {
        let tag = tag_or_latest(filter.tag.as_deref());
        let name = non_empty(&filter.name);

        let mut predicates = Predicates::new();
        if let Some(name) = name {
            predicates.push(predicate::equals(fields::KEY, name));
        }
        if !filter.labels.is_empty() {
            predicates.push(predicate::labels(fields::LABELS, filter.labels.clone()));
        }

        let dir = self
            .paths()
            .filepath(Table::Artifacts, filter.project.as_deref(), "", Some(tag));
        let targets: Vec<_> = self
            .scan(dir.clone(), Mask::for_tag(tag, name))?
            .matching(&predicates)
            .map(|(_, path)| path)
            .collect();

        for path in &targets {
            safe_delete(path)?;
        }

        tracing::info!("Deleted {} artifact(s) from {}", targets.len(), dir.display());

        Ok(targets.len())
    }
}
