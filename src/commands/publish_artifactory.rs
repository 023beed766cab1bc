use std::env;
use std::path::PathBuf;

use crate::commands::artifacts::{self, Artifact};
use crate::commands::CommandContext;
use crate::error::{ReleaseError, Result};
use crate::ui;

/// Publish per-artifact archives to the binary repository: the staging
/// repo from main, a branch-scoped snapshot path otherwise.
pub fn run(ctx: &mut CommandContext) -> Result<()> {
    let api_key = env::var("JFROG_API_KEY")
        .map_err(|_| ReleaseError::config("JFROG_API_KEY not specified"))?;

    let artifactory = ctx.config.artifactory.clone();
    if artifactory.url.is_empty() || artifactory.repo_prefix.is_empty() {
        return Err(ReleaseError::config(
            "artifactory url and repo_prefix must be configured in releaseci.toml",
        ));
    }

    ctx.eval_versions()?;

    let release_dir = PathBuf::from("./release");
    let found = artifacts::collect_artifacts(&release_dir)?;

    let mut archived = Vec::new();
    for artifact in found {
        let archive = artifact
            .source_path
            .with_file_name(format!("{}.tar.gz", artifact.name));
        ui::status(&format!(
            "packaging releasable: {} -> {}",
            artifact.source_path.display(),
            archive.display()
        ));
        artifacts::tar_gz_flat(&archive, &[artifact.source_path.clone()])?;
        archived.push((artifact, archive));
    }

    let all_artifacts: Vec<Artifact> = archived.iter().map(|(a, _)| a.clone()).collect();
    let combined = release_dir.join(format!("{}-all.tar.gz", artifactory.repo_prefix));
    artifacts::tar_gz_artifacts(&combined, &all_artifacts)?;

    let branch = ctx.current_branch()?;
    let on_main = branch == "main" || branch == "master";

    // When rolling minor/major numbers the current version will be unset,
    // so use the next version instead. This only happens when publishing
    // from a PR build.
    let mut version = ctx.publish_version()?.to_string();
    if !on_main {
        version = format!("{}-{}", version, ctx.build_number());
    }

    let build_name = if artifactory.build_name.is_empty() {
        artifactory.repo_prefix.clone()
    } else {
        artifactory.build_name.clone()
    };

    for (artifact, archive) in &archived {
        let archive_name = format!("{}.tar.gz", artifact.name);
        let dest = if on_main {
            format!(
                "{}-staging/{}/{}/{}/{}/{}",
                artifactory.repo_prefix, artifact.name, artifact.arch, artifact.os, version,
                archive_name
            )
        } else {
            format!(
                "{}-snapshot/{}/{}/{}/{}/{}/{}",
                artifactory.repo_prefix, branch, artifact.name, artifact.arch, artifact.os,
                version, archive_name
            )
        };
        let props = format!(
            "version={};name={};arch={};os={};branch={}",
            version, artifact.name, artifact.arch, artifact.os, branch
        );
        ctx.runner.run(
            &format!("Publish artifact for {}", artifact.name),
            "jfrog",
            &[
                "rt",
                "u",
                &archive.display().to_string(),
                &dest,
                "--apikey",
                &api_key,
                "--url",
                &artifactory.url,
                "--props",
                &props,
                &format!("--build-name={}", build_name),
                &format!("--build-number={}", version),
            ],
        )?;
    }

    if on_main {
        let dest = format!(
            "{}-staging/{}-all/{}/{}-all.{}.tar.gz",
            artifactory.repo_prefix, artifactory.repo_prefix, version, artifactory.repo_prefix,
            version
        );
        let props = format!("version={};branch={}", version, branch);
        ctx.runner.run(
            "Publish combined artifact archive",
            "jfrog",
            &[
                "rt",
                "u",
                &combined.display().to_string(),
                &dest,
                "--apikey",
                &api_key,
                "--url",
                &artifactory.url,
                "--props",
                &props,
                &format!("--build-name={}", build_name),
                &format!("--build-number={}", version),
            ],
        )?;
    }

    Ok(())
}
