use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::api::{SendinblueClient, TemplateApi};
use crate::config::ApiConfig;
use crate::error::ExitError;
use crate::filename::{EXTENSION, parse_template_id};

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Directory containing `<id>. <name>.html` files
    #[arg(default_value = ".")]
    pub directory: PathBuf,
}

impl UploadArgs {
    pub fn execute(&self) -> Result<()> {
        let config = ApiConfig::from_env()?;
        let client = SendinblueClient::new(config);
        upload(&client, &self.directory)?;
        Ok(())
    }
}

/// One local file and the template it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: u64,
    pub path: PathBuf,
}

/// Template id to file mapping for a directory, in file name order.
#[derive(Debug, Default)]
pub struct TemplateIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<u64, usize>,
}

impl TemplateIndex {
    /// Scan `directory` for `*.html` files (hidden files excluded).
    ///
    /// Fails on the first file that does not follow the naming format, or
    /// when two files resolve to the same template id.
    pub fn scan(directory: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(directory)
            .with_context(|| format!("reading directory {}", directory.display()))?
        {
            let path = entry?.path();
            let is_hidden = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'));
            if !is_hidden && path.extension() == Some(OsStr::new(EXTENSION)) && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut index = Self::default();
        for path in paths {
            index.insert(parse_template_id(&path)?, path)?;
        }
        Ok(index)
    }

    fn insert(&mut self, id: u64, path: PathBuf) -> Result<(), ExitError> {
        if let Some(&pos) = self.positions.get(&id) {
            return Err(ExitError::DuplicateTemplate {
                first: self.entries[pos].path.clone(),
                second: path,
                id,
            });
        }
        self.positions.insert(id, self.entries.len());
        self.entries.push(IndexEntry { id, path });
        Ok(())
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Push every indexed file's content to its template, one request at a time.
///
/// The whole index is built before the first request. The first failed
/// update stops the run; earlier updates are not rolled back. Returns the
/// number of templates updated.
pub fn upload(api: &impl TemplateApi, directory: &Path) -> Result<usize> {
    let index = TemplateIndex::scan(directory)?;
    tracing::info!(count = index.len(), directory = %directory.display(), "index built");

    for entry in index.entries() {
        let html_content = fs::read_to_string(&entry.path)
            .with_context(|| format!("reading {}", entry.path.display()))?;

        print!("Updating template {}... ", entry.id);
        let _ = std::io::stdout().flush();

        api.update_html_content(entry.id, &html_content)?;

        println!("done!");
        tracing::info!(id = entry.id, path = %entry.path.display(), "template updated");
    }

    Ok(index.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::download::download;
    use crate::commands::fake::{FakeApi, template};

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn index_is_sorted_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "010. Ten.html", "");
        write(dir.path(), "002. Two.html", "");
        write(dir.path(), "9. Nine.html", "");

        let index = TemplateIndex::scan(dir.path()).unwrap();
        let ids: Vec<u64> = index.entries().iter().map(|e| e.id).collect();

        assert_eq!(ids, vec![2, 10, 9]);
        assert_eq!(index.entries()[2].path, dir.path().join("9. Nine.html"));
    }

    #[test]
    fn index_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "001. A.html", "");
        write(dir.path(), "notes.txt", "");
        write(dir.path(), "002. B.HTML", "");
        write(dir.path(), ".003. Hidden.html", "");
        fs::create_dir(dir.path().join("004. Dir.html")).unwrap();

        let index = TemplateIndex::scan(dir.path()).unwrap();

        assert_eq!(
            index.entries(),
            &[IndexEntry {
                id: 1,
                path: dir.path().join("001. A.html"),
            }]
        );
    }

    #[test]
    fn duplicate_id_fails_before_any_update() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "001. A.html", "a");
        write(dir.path(), "001. B.html", "b");
        let api = FakeApi::default();

        let err = upload(&api, dir.path()).unwrap_err();

        match err.downcast_ref::<ExitError>() {
            Some(ExitError::DuplicateTemplate { first, second, id }) => {
                assert_eq!(*id, 1);
                assert_eq!(first, &dir.path().join("001. A.html"));
                assert_eq!(second, &dir.path().join("001. B.html"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(api.updates.borrow().is_empty());
    }

    #[test]
    fn padded_and_unpadded_ids_collide() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "007. A.html", "");
        write(dir.path(), "7. B.html", "");

        let err = TemplateIndex::scan(dir.path()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ExitError>(),
            Some(ExitError::DuplicateTemplate { id: 7, .. })
        ));
    }

    #[test]
    fn malformed_name_fails_without_updates() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "001. A.html", "a");
        write(dir.path(), "no-separator-here.html", "x");
        let api = FakeApi::default();

        let err = upload(&api, dir.path()).unwrap_err();

        match err.downcast_ref::<ExitError>() {
            Some(ExitError::NamingFormat { path }) => {
                assert_eq!(path, &dir.path().join("no-separator-here.html"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(api.updates.borrow().is_empty());
    }

    #[test]
    fn updates_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "002. Two.html", "<p>2</p>");
        write(dir.path(), "001. One.html", "<p>1</p>");
        let api = FakeApi::default();

        let count = upload(&api, dir.path()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            *api.updates.borrow(),
            vec![(1, "<p>1</p>".to_string()), (2, "<p>2</p>".to_string())]
        );
    }

    #[test]
    fn failed_update_stops_remaining() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "001. One.html", "1");
        write(dir.path(), "002. Two.html", "2");
        write(dir.path(), "003. Three.html", "3");
        let api = FakeApi {
            reject_id: Some(2),
            ..FakeApi::default()
        };

        let err = upload(&api, dir.path()).unwrap_err();

        assert!(err.to_string().contains("template 2 rejected"));
        assert_eq!(*api.updates.borrow(), vec![(1, "1".to_string())]);
    }

    #[test]
    fn empty_directory_uploads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let api = FakeApi::default();
        assert_eq!(upload(&api, dir.path()).unwrap(), 0);
    }

    #[test]
    fn download_then_upload_sends_original_content() {
        let dir = tempfile::tempdir().unwrap();
        let html = "<html>\r\n  <body>Héllo “world” – ünïcode</body>\n</html>\n";
        let templates = vec![
            template(5, "Newsletter / May", html),
            template(31, "Reset password", "<p>reset</p>"),
        ];
        let api = FakeApi::with_templates(templates);

        download(&api, dir.path()).unwrap();
        upload(&api, dir.path()).unwrap();

        assert_eq!(
            *api.updates.borrow(),
            vec![(5, html.to_string()), (31, "<p>reset</p>".to_string())]
        );
    }
}
