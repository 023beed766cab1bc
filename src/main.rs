use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use release_ci::commands::{
    self, configure, notes, package, publish_artifactory, publish_github, release_notes, tag,
    trigger, update_deps, version_info, CommandContext,
};
use release_ci::config::{self, RunOptions};
use release_ci::lang::Language;
use release_ci::ui;

#[derive(Parser)]
#[command(
    name = "release-ci",
    about = "CI release tooling: tagging, version derivation, release notes and publishing"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Disable informational output"
    )]
    quiet: Option<bool>,

    #[arg(short = 'd', long, global = true, help = "Do a dry run")]
    dry_run: bool,

    #[arg(
        short = 'l',
        long,
        global = true,
        default_value = "go",
        help = "Enable language specific settings. Valid values: [go]"
    )]
    language: String,

    #[arg(short = 'b', long, global = true, help = "Set base version")]
    base_version: Option<String>,

    #[arg(
        short = 'f',
        long,
        global = true,
        default_value = commands::DEFAULT_VERSION_FILE,
        help = "Set base version file location"
    )]
    base_version_file: String,

    #[arg(short = 'c', long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tag HEAD with the next version and push the tag
    Tag {
        #[arg(long, help = "Only tag if the current branch matches")]
        only_for_branch: Option<String>,
    },
    /// Print the version being built. Run before the tag is made
    GetVersion,
    /// Print the most recent released version
    GetCurrentVersion,
    /// Print the git branch being built
    GetBranch,
    /// Print release notes for the version being built
    BuildReleaseNotes {
        #[arg(short, long, help = "Show all commits, not just closed issues")]
        all_commits: bool,
        #[arg(short = 'u', long, help = "Show upstream libraries even if unchanged")]
        show_unchanged: bool,
    },
    /// Extract one release section from a changelog file
    GetReleaseNotes {
        changelog: String,
        version: Option<String>,
        outfile: Option<String>,
    },
    /// Update a go dependency to a different version
    UpdateDependency { dependency: Option<String> },
    /// Merge a dependency update to main and push
    CompleteUpdateDependency,
    /// Configure the git identity for CI
    ConfigureGit,
    /// Package files into a tar.gz for release
    Package {
        destination: String,
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Bundle artifacts and create a GitHub release
    PublishToGithub,
    /// Publish artifacts to artifactory
    PublishToArtifactory,
    /// Trigger a dependency-update build in another repository
    TriggerBuild {
        target_repo: String,
        target_branch: String,
        #[arg(long, help = "Github token used to trigger the build")]
        token: Option<String>,
    },
    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Release-note output must stay clean, so that command defaults to
    // quiet unless the flag was given explicitly
    let quiet = cli.quiet.unwrap_or(matches!(
        &cli.command,
        Command::BuildReleaseNotes { .. }
    ));

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.verbose { "debug" } else { "warn" },
    ))
    .init();

    if let Err(err) = run(cli, quiet) {
        ui::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(cli: Cli, quiet: bool) -> Result<()> {
    if let Command::Version = cli.command {
        println!("release-ci {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if let Command::GetReleaseNotes {
        changelog,
        version,
        outfile,
    } = &cli.command
    {
        release_notes::run(changelog, version.as_deref(), outfile.as_deref())?;
        return Ok(());
    }
    if let Command::Package { destination, files } = &cli.command {
        package::run(destination, files)?;
        return Ok(());
    }

    let opts = RunOptions {
        verbose: cli.verbose,
        quiet,
        dry_run: cli.dry_run,
        language: Language::parse(&cli.language)?,
    };
    let config = config::load_config(cli.config.as_deref())?;
    let mut ctx = CommandContext::new(
        config,
        opts,
        cli.base_version.as_deref(),
        &cli.base_version_file,
    )?;

    match &cli.command {
        Command::Tag { only_for_branch } => tag::run(&mut ctx, only_for_branch.as_deref())?,
        Command::GetVersion => version_info::get_version(&mut ctx)?,
        Command::GetCurrentVersion => version_info::get_current_version(&mut ctx)?,
        Command::GetBranch => version_info::get_branch(&ctx)?,
        Command::BuildReleaseNotes {
            all_commits,
            show_unchanged,
        } => notes::run(&mut ctx, *all_commits, *show_unchanged)?,
        Command::UpdateDependency { dependency } => {
            update_deps::update(&ctx, dependency.as_deref())?
        }
        Command::CompleteUpdateDependency => update_deps::complete(&ctx)?,
        Command::ConfigureGit => configure::run(&ctx)?,
        Command::PublishToGithub => publish_github::run(&mut ctx)?,
        Command::PublishToArtifactory => publish_artifactory::run(&mut ctx)?,
        Command::TriggerBuild {
            target_repo,
            target_branch,
            token,
        } => trigger::run(&mut ctx, target_repo, target_branch, token.as_deref())?,
        Command::Version | Command::GetReleaseNotes { .. } | Command::Package { .. } => {
            unreachable!("handled above")
        }
    }
    Ok(())
}
