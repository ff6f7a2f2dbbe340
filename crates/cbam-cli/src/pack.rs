//! # Submission Pack CLI
//!
//! ```bash
//! cbam pack build --importer imp_1 --application app_1 \
//!     --summary summary.json --doc report.pdf --doc lines.csv --out pack.zip
//! cbam pack verify pack.zip --expect 3a7bd3e2...
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use cbam_core::{ContentDigest, Timestamp};
use cbam_pack::{
    build_submission_pack, verify_submission_pack, PackDocument, SubmissionPackInput,
    SummaryValue,
};

use crate::{read_json, EXIT_REJECTED};

/// Pack subcommand arguments.
#[derive(Args, Debug)]
pub struct PackArgs {
    #[command(subcommand)]
    pub command: PackCommand,
}

/// Available pack subcommands.
#[derive(Subcommand, Debug)]
pub enum PackCommand {
    /// Assemble a submission pack archive.
    Build {
        /// Importer id recorded in the manifest.
        #[arg(long)]
        importer: String,

        /// Authorisation application id recorded in the manifest.
        #[arg(long)]
        application: String,

        /// Generation time (RFC 3339, UTC, `Z` suffix). Defaults to now.
        #[arg(long)]
        generated_at: Option<String>,

        /// JSON object of summary values.
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Document to include. Repeatable; order is preserved.
        #[arg(long = "doc")]
        documents: Vec<PathBuf>,

        /// Archive output path.
        #[arg(long)]
        out: PathBuf,
    },

    /// Check an archive against its manifest.
    Verify {
        /// Archive to verify.
        archive: PathBuf,

        /// Expected SHA-256 of the whole archive.
        #[arg(long)]
        expect: Option<String>,
    },
}

/// Execute the pack subcommand.
pub fn run_pack(args: &PackArgs) -> Result<u8> {
    match &args.command {
        PackCommand::Build {
            importer,
            application,
            generated_at,
            summary,
            documents,
            out,
        } => run_build(
            importer,
            application,
            generated_at.as_deref(),
            summary.as_deref(),
            documents,
            out,
        ),
        PackCommand::Verify { archive, expect } => run_verify(archive, expect.as_deref()),
    }
}

fn run_build(
    importer: &str,
    application: &str,
    generated_at: Option<&str>,
    summary: Option<&Path>,
    documents: &[PathBuf],
    out: &Path,
) -> Result<u8> {
    let generated_at = match generated_at {
        Some(raw) => Timestamp::parse(raw).context("invalid --generated-at")?,
        None => Timestamp::now(),
    };
    let summary: BTreeMap<String, SummaryValue> = match summary {
        Some(path) => read_json(path)?,
        None => BTreeMap::new(),
    };
    let documents = documents
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>>>()?;

    let output = build_submission_pack(&SubmissionPackInput {
        importer_id: importer.to_string(),
        auth_application_id: application.to_string(),
        generated_at,
        summary,
        documents,
    })?;

    std::fs::write(out, &output.archive)
        .with_context(|| format!("failed to write archive: {}", out.display()))?;

    println!("  archive:          {}", out.display());
    println!("  manifest sha256:  {}", output.manifest_sha256);
    println!("  package sha256:   {}", output.package_sha256);
    Ok(0)
}

fn run_verify(archive: &Path, expect: Option<&str>) -> Result<u8> {
    let expected = expect
        .map(ContentDigest::from_hex)
        .transpose()
        .context("invalid --expect digest")?;
    let bytes = std::fs::read(archive)
        .with_context(|| format!("failed to read archive: {}", archive.display()))?;
    let report = verify_submission_pack(&bytes, expected.as_ref())
        .with_context(|| format!("unreadable submission pack: {}", archive.display()))?;

    println!("  importer:         {}", report.manifest.importer_id);
    println!("  application:      {}", report.manifest.auth_application_id);
    println!("  documents:        {}", report.manifest.documents.len());
    println!("  manifest sha256:  {}", report.manifest_sha256);
    println!("  package sha256:   {}", report.package_sha256);

    if report.is_intact() {
        println!("  status:           OK");
        Ok(0)
    } else {
        println!("  status:           FAILED");
        for issue in &report.issues {
            println!("    - {issue}");
        }
        Ok(EXIT_REJECTED)
    }
}

fn load_document(path: &Path) -> Result<PackDocument> {
    let content =
        std::fs::read(path).with_context(|| format!("failed to read document: {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("document path has no file name: {}", path.display()))?;
    Ok(PackDocument {
        content_type: content_type_for(path).to_string(),
        filename,
        content,
        sha256: None,
    })
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}
