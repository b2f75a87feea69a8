//! `partial-edit <file> <task>`: asks the patch synthesizer to rewrite
//! `<file>` per `<task>`, applies the result through the core engine, and
//! writes `<file>.old` / `<file>.patch` side files alongside the update.

use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use contextpatch::FileMap;
use contextpatch::synthesize::ChatPatchSynthesizer;
use contextpatch::synthesize::PatchSynthesizer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "partial-edit", about = "Edit a file by describing the change in words")]
struct Args {
    file: PathBuf,

    #[arg(trailing_var_arg = true, required = true)]
    task: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let task = args.task.join(" ");
    if task.trim().is_empty() {
        bail!("a task description is required");
    }

    let file_path = args.file.to_string_lossy().into_owned();
    tracing::info!(file = %file_path, "reading file");
    let original =
        std::fs::read_to_string(&args.file).with_context(|| format!("failed to read {file_path}"))?;

    tracing::info!("requesting patch from synthesizer");
    let synthesizer = ChatPatchSynthesizer::from_env()?;
    let patch_text = synthesizer.synthesize(&task, &file_path, &original).await?;

    let mut files = FileMap::new();
    files.insert(file_path.clone(), original);

    tracing::info!("applying patch");
    apply_and_write(&args.file, &file_path, &files, &patch_text)
}

/// Applies `patch_text` to `files` (which must contain `file_path`'s current
/// contents) and performs the side-effecting half of `partial-edit`: rename
/// `file` to `file.old`, write the post-patch content to `file`, and write
/// `patch_text` to `file.patch`. Split out from `run` so the rename/write
/// sequence is testable without a live patch synthesizer.
fn apply_and_write(file: &Path, file_path: &str, files: &FileMap, patch_text: &str) -> Result<()> {
    let (patch, fuzz) = contextpatch::text_to_patch(patch_text, files)?;
    if fuzz > 0 {
        tracing::warn!(fuzz, "patch applied with non-zero fuzz");
    }
    let commit = contextpatch::patch_to_commit(&patch, files)?;
    let updated = contextpatch::apply_commit(&commit);

    let new_content = updated
        .get(file_path)
        .with_context(|| format!("synthesized patch did not touch {file_path}"))?;

    let old_path = sibling_with_suffix(file, ".old");
    let patch_path = sibling_with_suffix(file, ".patch");

    std::fs::rename(file, &old_path)
        .with_context(|| format!("failed to rename {file_path} to {}", old_path.display()))?;
    std::fs::write(file, new_content)
        .with_context(|| format!("failed to write updated {file_path}"))?;
    std::fs::write(&patch_path, patch_text)
        .with_context(|| format!("failed to write {}", patch_path.display()))?;

    Ok(())
}

/// Appends `suffix` to the full file name (`foo.ts` + `.old` → `foo.ts.old`),
/// not a replacement of the extension.
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
