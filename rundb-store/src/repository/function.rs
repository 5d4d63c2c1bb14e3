//! Function Repository
//!
//! Functions live at `functions/<project>/<name>/<tag>.<ext>`. The stored
//! `metadata.tag` is always empty; readers derive it from the file name.

use chrono::Utc;
use rundb_core::Document;
use rundb_core::domain::function::{Function, fields, tag_from_stem};
use rundb_core::dto::ANY_TAG;
use rundb_core::dto::function::FunctionQuery;

use super::{non_empty, read_file, write_file};
use crate::db::FileRunDb;
use crate::error::Result;
use crate::paths::{Table, tag_or_latest};
use crate::query::{Mask, Predicates, predicate};

impl FileRunDb {
    /// Store a function definition under `tag`, resetting `metadata.updated`
    ///
    /// Both stamps go through `Document::set_attr` on a copy, so a custom
    /// serializer still encodes the stored file.
    pub fn store_function(
        &self,
        function: &(impl Document + Clone),
        name: &str,
        project: Option<&str>,
        tag: Option<&str>,
    ) -> Result<()> {
        let mut stamped = function.clone();
        stamped.set_attr(&fields::UPDATED.into(), Utc::now().to_rfc3339().into());
        stamped.set_attr(&fields::TAG.into(), "".into());

        let data = self.dumps(&stamped)?;
        let path = self.paths().function_file(project, name, tag, self.ext()?);
        write_file(&path, data.as_bytes())?;

        tracing::debug!("Stored function {}:{}", name, tag_or_latest(tag));

        Ok(())
    }

    /// Look up a function by name and tag. A missing function is `None`.
    pub fn get_function(
        &self,
        name: &str,
        project: Option<&str>,
        tag: Option<&str>,
    ) -> Result<Option<Function>> {
        let path = self.paths().function_file(project, name, tag, self.ext()?);
        let Some(text) = read_file(&path)? else {
            return Ok(None);
        };

        let mut function = Function::from(self.loads(&text)?);
        function.set(&fields::TAG.into(), tag_from_stem(tag_or_latest(tag)));

        Ok(Some(function))
    }

    /// List functions of a project, or the tags of one function when a name
    /// is given
    pub fn list_functions(&self, query: &FunctionQuery) -> Result<Vec<Function>> {
        let project = query.project.as_deref();
        let name = non_empty(&query.name);
        let tag = non_empty(&query.tag).filter(|t| *t != ANY_TAG);

        let mut predicates = Predicates::new();
        if !query.labels.is_empty() {
            predicates.push(predicate::labels(fields::LABELS, query.labels.clone()));
        }

        let table = self.paths().table_dir(Table::Functions, project);
        let (dir, mask) = match name {
            Some(name) => (table.join(name), Mask::Children),
            None => (table, Mask::Recursive),
        };

        tracing::info!(
            "Reading functions in {} (name: {}, tag: {})",
            self.paths().project(project),
            name.unwrap_or("*"),
            tag.unwrap_or("*")
        );

        let mut results = Vec::new();
        for (record, path) in self.scan(dir, mask)?.matching(&predicates) {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            if tag.is_some_and(|tag| tag != stem) {
                continue;
            }

            let mut function = Function::from(record);
            function.set(&fields::TAG.into(), tag_from_stem(stem));
            results.push(function);
        }

        Ok(results)
    }
}
