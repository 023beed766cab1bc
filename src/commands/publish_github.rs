use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::commands::artifacts::{self, Artifact};
use crate::commands::CommandContext;
use crate::error::Result;
use crate::ui;

/// Bundle the release directory per os/arch and publish a GitHub release
/// with the bundles attached.
pub fn run(ctx: &mut CommandContext) -> Result<()> {
    ctx.eval_versions()?;

    let release_dir = PathBuf::from("./release");
    let found = artifacts::collect_artifacts(&release_dir)?;

    let mut bundles: BTreeMap<String, Vec<Artifact>> = BTreeMap::new();
    for artifact in found {
        bundles.entry(artifact.bundle()).or_default().push(artifact);
    }

    let version = ctx.publish_version()?.to_string();
    let prefix = bundle_prefix(ctx);

    let mut release_files = Vec::new();
    for (bundle, artifacts_in_bundle) in &bundles {
        let file = if bundle.contains("windows") {
            let file = release_dir.join(format!("{}-{}-{}.zip", prefix, bundle, version));
            ui::status(&format!("Creating release archive {}", file.display()));
            artifacts::zip_artifacts(&file, artifacts_in_bundle)?;
            file
        } else {
            let file = release_dir.join(format!("{}-{}-{}.tar.gz", prefix, bundle, version));
            ui::status(&format!("Creating release archive {}", file.display()));
            artifacts::tar_gz_flat(
                &file,
                &artifacts_in_bundle
                    .iter()
                    .map(|a| a.source_path.clone())
                    .collect::<Vec<_>>(),
            )?;
            file
        };
        release_files.push(file);
    }

    let mut release_args = vec![
        "release".to_string(),
        "create".to_string(),
        version,
        "-F".to_string(),
        "CHANGELOG.md".to_string(),
    ];
    for file in &release_files {
        ui::status(&format!("Publishing {}", file.display()));
        release_args.push(file.display().to_string());
    }

    if ctx.opts.dry_run {
        ui::status("dry run: skipping gh release creation");
        return Ok(());
    }

    let args: Vec<&str> = release_args.iter().map(|s| s.as_str()).collect();
    ctx.runner
        .run("Create GH Release and publish release artifacts", "gh", &args)?;
    Ok(())
}

/// Bundle prefix: configured name, or the repository directory name.
fn bundle_prefix(ctx: &CommandContext) -> String {
    if !ctx.config.package.name.is_empty() {
        return ctx.config.package.name.clone();
    }
    env::current_dir()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .unwrap_or("release")
        .to_string()
}
