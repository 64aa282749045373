//! Substituting parameter values back into a document.

use crate::params::ParamTable;
use std::path::{Path, PathBuf};

/// Shown in the header for parameters without a value.
pub const EMPTY_VALUE_MARKER: &str = "-- NOTHING --";

/// Render `text` with every token replaced by its parameter's value.
///
/// The output starts with a comment header naming the source document, the
/// parameter file (when known) and each token's substituted value, followed
/// by a blank line and the replaced text. All occurrences of a token are
/// replaced.
pub fn render_document(
    text: &str,
    table: &ParamTable,
    source: &Path,
    params_file: Option<&Path>,
) -> String {
    let mut header = format!("// REPLACED: {}\n", source.display());
    if let Some(params_file) = params_file {
        header.push_str(&format!("// PARAMS: {}\n", params_file.display()));
    }

    let mut replaced = text.to_string();
    for (token, param) in table.iter() {
        let value = param.substitution_value();
        let shown = if value.is_empty() {
            EMPTY_VALUE_MARKER
        } else {
            value.as_str()
        };
        header.push_str(&format!("// {}: {}\n", token, shown));
        replaced = replaced.replace(token, &value);
    }

    format!("{}\n{}", header, replaced)
}

/// Default output path for a replaced document: `<dir>/<stem>.local<.ext>`.
pub fn local_output_path(document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match document.extension() {
        Some(ext) => format!("{}.local.{}", stem, ext.to_string_lossy()),
        None => format!("{}.local", stem),
    };
    document.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Param;

    #[test]
    fn test_render_document() {
        let mut table = ParamTable::new();
        table.insert("@@Name@@", Param::new("Name", "world", "string"));
        table.insert("@@Count@@", Param::new("Count", "3", "int"));
        table.insert("@@Unset@@", Param::named("Unset"));

        let out = render_document(
            "hello @@Name@@ x@@Count@@ @@Name@@ @@Unset@@",
            &table,
            Path::new("/w/run.sql"),
            Some(Path::new("/w/run.sql.json")),
        );

        assert_eq!(
            out,
            "// REPLACED: /w/run.sql\n\
             // PARAMS: /w/run.sql.json\n\
             // @@Name@@: \"world\"\n\
             // @@Count@@: 3\n\
             // @@Unset@@: -- NOTHING --\n\
             \n\
             hello \"world\" x3 \"world\" "
        );
    }

    #[test]
    fn test_render_without_params_file() {
        let out = render_document("plain", &ParamTable::new(), Path::new("a.txt"), None);
        assert_eq!(out, "// REPLACED: a.txt\n\nplain");
    }

    #[test]
    fn test_local_output_path() {
        assert_eq!(
            local_output_path(Path::new("/w/run.usql")),
            PathBuf::from("/w/run.local.usql")
        );
        assert_eq!(
            local_output_path(Path::new("/w/Makefile")),
            PathBuf::from("/w/Makefile.local")
        );
    }
}
