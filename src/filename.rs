//! Local file naming: `<id, 3 digits>. <name>.html`, both parts made
//! filesystem-safe.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExitError;

/// Separates the encoded id from the encoded name.
pub const SEPARATOR: &str = ". ";
pub const EXTENSION: &str = "html";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-– ]").expect("compile-time constant regex"));

/// Replace every character outside word chars, `-`, `–` and space with `_`.
pub fn to_safe_path(s: &str) -> String {
    UNSAFE_CHARS.replace_all(s, "_").into_owned()
}

/// File name for a template, e.g. `007. Sample template title.html`.
pub fn template_filename(id: u64, name: &str) -> String {
    let id = to_safe_path(&format!("{id:03}"));
    let name = to_safe_path(name);
    format!("{id}{SEPARATOR}{name}.{EXTENSION}")
}

/// Extract the template id from a local file's name.
///
/// Splits on the first separator; the id segment may carry leading zeros.
pub fn parse_template_id(path: &Path) -> Result<u64, ExitError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    let Some((id_segment, _name)) = file_name.split_once(SEPARATOR) else {
        return Err(ExitError::NamingFormat {
            path: path.to_path_buf(),
        });
    };

    id_segment
        .parse::<u64>()
        .map_err(|_| ExitError::InvalidTemplateId {
            path: path.to_path_buf(),
            segment: id_segment.to_string(),
        })
}
