use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::api::{SendinblueClient, TemplateApi};
use crate::config::ApiConfig;
use crate::filename::template_filename;

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Directory to write templates into (created if missing)
    #[arg(default_value = ".")]
    pub directory: PathBuf,
}

impl DownloadArgs {
    pub fn execute(&self) -> Result<()> {
        let config = ApiConfig::from_env()?;
        let client = SendinblueClient::new(config);
        download(&client, &self.directory)?;
        Ok(())
    }
}

/// Write every template on the first page to `<dir>/<id>. <name>.html`,
/// overwriting existing files. Returns the written paths in API order.
pub fn download(api: &impl TemplateApi, directory: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(directory)
        .with_context(|| format!("creating directory {}", directory.display()))?;

    let templates = api.list_templates()?;
    let mut written = Vec::with_capacity(templates.len());

    for template in templates {
        let path = directory.join(template_filename(template.id, &template.name));
        println!("Saving {}", path.display());

        fs::write(&path, template.html_content.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(id = template.id, path = %path.display(), "template saved");
        written.push(path);
    }

    Ok(written)
}
