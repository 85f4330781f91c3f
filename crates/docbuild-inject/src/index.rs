//! Fallback index page creation.

use std::fs;
use std::path::Path;

use crate::error::InjectError;
use crate::traits::IndexCreator;

/// Uses an existing `index` or `README` page, or writes a placeholder index.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackIndex;

impl IndexCreator for FallbackIndex {
    fn create_index(&self, docs_dir: &Path, extension: &str) -> Result<String, InjectError> {
        let index_path = docs_dir.join(format!("index.{extension}"));
        if index_path.exists() {
            return Ok("index".to_string());
        }

        if docs_dir.join(format!("README.{extension}")).exists() {
            return Ok("README".to_string());
        }

        let text = placeholder_index(extension);
        fs::create_dir_all(docs_dir).map_err(|e| InjectError::write(docs_dir, e))?;
        fs::write(&index_path, text).map_err(|e| InjectError::write(&index_path, e))?;
        tracing::info!("Created placeholder index at {}", index_path.display());

        Ok("index".to_string())
    }
}

fn placeholder_index(extension: &str) -> String {
    format!(
        r#"
Welcome to Read the Docs
------------------------

This is an autogenerated index file.

Please create an ``index.{extension}`` or ``README.{extension}`` file with your own content
under the root (or ``/docs``) directory in your repository.

If you want to use another markdown file, please make sure to set it in the ``mkdocs.yml`` file.

"#
    )
}
