//! Output writing: page bytes, asset copies, the root redirect, and `clean`.
//!
//! Writes are not transactional. A failed build can leave a partial output
//! tree behind; [`clean`] is the reset.

use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::io;
use std::path::Path;

/// Write bytes, creating parent directories as needed.
pub fn write_file(destination: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(destination, bytes)
}

/// Byte-for-byte copy, creating parent directories as needed.
pub fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, destination)?;
    Ok(())
}

/// Minimal page that immediately forwards the browser to `url`.
pub fn redirect_page(url: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta http-equiv="Refresh" content={ "0; url='" (url) "'" };
                title { "Redirecting" }
            }
            body {
                p { "Redirecting to " a href=(url) { (url) } "." }
            }
        }
    }
}

/// Write `<output>/index.html` as a redirect to `url`.
pub fn write_redirect(output: &Path, url: &str) -> io::Result<()> {
    write_file(&output.join("index.html"), redirect_page(url).into_string().as_bytes())
}

/// Remove the output directory recursively. Missing directories are fine.
pub fn clean(output: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(output) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
