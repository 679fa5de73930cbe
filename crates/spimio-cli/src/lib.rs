//! spimio CLI: browse a dandiset from the DANDI API or an asset manifest.

pub mod config;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spimio_dandi::{
    DandiApiClient, DandiPath, DandiPathExt, Dandiset, ManifestArchive, Transport,
};
use spimio_vfs::render_tree;

#[derive(Debug, Parser)]
#[command(name = "spimio", version, about = "Browse a DANDI dandiset like a filesystem")]
pub struct Cli {
    /// Config file (default: <config dir>/spimio/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Asset manifest (JSON) to browse; overrides the config file
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Dandiset to browse through the DANDI API, e.g. 000026
    #[arg(long, global = true, conflicts_with = "manifest")]
    pub dandiset: Option<String>,

    /// Dandiset version (default: latest published, else draft)
    #[arg(long, global = true, requires = "dandiset")]
    pub dandiset_version: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the children of a directory
    Ls {
        #[arg(default_value = "")]
        path: String,
    },
    /// Print a directory and everything below it
    Tree {
        #[arg(default_value = "")]
        path: String,
    },
    /// Paths matching a relative pattern
    Glob {
        pattern: String,
        /// Directory to match from
        #[arg(long, default_value = "")]
        from: String,
    },
    /// Paths matching a pattern anywhere below a directory
    Rglob {
        pattern: String,
        #[arg(long, default_value = "")]
        from: String,
    },
    /// Kind, URI and download details of a path
    Stat { path: String },
    /// dandi:// URI of a path
    Uri { path: String },
    /// Download URL of a file
    Url { path: String },
    /// Blob-store URL a file's download URL redirects to
    S3 { path: String },
}

/// Open the dandiset described by a manifest file.
pub fn open_manifest(path: &std::path::Path) -> Result<Arc<Dandiset>> {
    let archive = ManifestArchive::load(path)?;
    tracing::info!(
        manifest = %path.display(),
        dandiset = %archive.manifest().dandiset_id,
        "opened manifest"
    );
    Ok(Arc::new(Dandiset::new(archive)))
}

/// Open a dandiset through the DANDI API at `api_url`.
pub fn open_remote(
    id: &str,
    version: Option<&str>,
    api_url: &str,
    transport: Arc<dyn Transport>,
) -> Result<Arc<Dandiset>> {
    let client = DandiApiClient::with_api_url(api_url, transport);
    let dandiset = Dandiset::open(&client, id, version)
        .with_context(|| format!("failed to open dandiset {id} at {api_url}"))?;
    tracing::info!(
        dandiset = dandiset.identifier(),
        version = dandiset.version_id().unwrap_or("draft"),
        "opened remote dandiset"
    );
    Ok(dandiset)
}

/// Run one command against `dandiset`, writing results to `out`.
///
/// `transport` is only used by commands that follow download redirects.
pub fn execute(
    command: &Command,
    dandiset: &Arc<Dandiset>,
    transport: &dyn Transport,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Ls { path } => {
            let dir = dandiset.path(path);
            for entry in dir.scandir()? {
                let marker = if entry.is_dir() { "/" } else { "" };
                writeln!(out, "{}{marker}", entry.name())?;
            }
        }
        Command::Tree { path } => {
            write!(out, "{}", render_tree(&dandiset.path(path))?)?;
        }
        Command::Glob { pattern, from } => {
            print_paths(out, &dandiset.path(from).glob(pattern)?)?;
        }
        Command::Rglob { pattern, from } => {
            print_paths(out, &dandiset.path(from).rglob(pattern)?)?;
        }
        Command::Stat { path } => stat(&dandiset.path(path), out)?,
        Command::Uri { path } => {
            writeln!(out, "{}", dandiset.path(path).as_uri()?)?;
        }
        Command::Url { path } => {
            let url = dandiset
                .path(path)
                .download_url()
                .with_context(|| format!("no download URL for {path}"))?;
            writeln!(out, "{url}")?;
        }
        Command::S3 { path } => {
            let url = dandiset
                .path(path)
                .s3_url(transport)
                .with_context(|| format!("cannot resolve blob URL for {path}"))?;
            writeln!(out, "{url}")?;
        }
    }
    Ok(())
}

fn print_paths(out: &mut impl Write, paths: &[DandiPath]) -> Result<()> {
    for path in paths {
        writeln!(out, "{path}")?;
    }
    Ok(())
}

fn stat(path: &DandiPath, out: &mut impl Write) -> Result<()> {
    writeln!(out, "path: {path}")?;
    writeln!(out, "uri: {}", path.as_uri()?)?;
    if path.is_file()? {
        let asset = path.as_asset()?;
        writeln!(out, "kind: file")?;
        if let Some(size) = asset.size {
            writeln!(out, "size: {size}")?;
        }
        writeln!(out, "download_url: {}", asset.download_url)?;
    } else if path.is_dir()? {
        writeln!(out, "kind: directory")?;
        writeln!(out, "children: {}", path.scandir()?.len())?;
    } else {
        writeln!(out, "kind: missing")?;
    }
    Ok(())
}
