/*!
 * Generated Gradio program
 *
 * The artifact is a four-line Python program that loads every input
 * endpoint and mixes them into one parallel interface.
 */

use std::io::Write;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{BuildError, Result};

/// Render the program that runs `names` side by side
pub fn render_artifact(names: &[String], title: &str, description: &str) -> String {
    let list = names
        .iter()
        .map(|name| python_string(name, '\''))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "import gradio as gr\n\
         name_list = [{}]\n\
         interfaces = [gr.Interface.load(name) for name in name_list]\n\
         gr.mix.Parallel(*interfaces, title={}, description={}).launch()",
        list,
        python_string(title, '"'),
        python_string(description, '"'),
    )
}

/// Quote `value` as a Python string literal
fn python_string(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            // Cc code points (U+0000..=U+001F, U+007F..=U+009F) all fit in \xNN
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Write the artifact to a temporary file removed when the handle drops
pub fn write_artifact(contents: &str) -> Result<NamedTempFile> {
    let write = || -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("space-builder-")
            .suffix(".py")
            .tempfile()?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        Ok(file)
    };

    let file = write().map_err(|e| {
        warn!(error = %e, "Failed to write artifact");
        BuildError::TempFile(e)
    })?;
    debug!(path = %file.path().display(), bytes = contents.len(), "Artifact written");
    Ok(file)
}
