//! Indented tree rendering of a subtree.

use crate::backend::Backend;
use crate::error::VfsError;
use crate::remote::RemotePath;

/// Render `path` and everything below it, one entry per line.
///
/// Each line is `<pad>- <name>`; children indent by `"  |"`. Directories
/// are listed in backend order, so the output mirrors the store.
pub fn render_tree<B: Backend + ?Sized>(path: &RemotePath<B>) -> Result<String, VfsError> {
    let mut out = String::new();
    line(&mut out, "", path.name());
    if path.is_dir()? {
        render_children(path, "  |", &mut out)?;
    }
    Ok(out)
}

fn render_children<B: Backend + ?Sized>(
    dir: &RemotePath<B>,
    pad: &str,
    out: &mut String,
) -> Result<(), VfsError> {
    for entry in dir.scandir()? {
        line(out, pad, entry.name());
        if entry.is_dir() {
            render_children(&entry.path, &format!("{pad}  |"), out)?;
        }
    }
    Ok(())
}

fn line(out: &mut String, pad: &str, name: &str) {
    out.push_str(pad);
    out.push_str("- ");
    out.push_str(name);
    out.push('\n');
}
