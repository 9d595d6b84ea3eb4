//! Disk-image packaging command implementation.
use color_eyre::eyre::OptionExt;
use log::*;
use std::path::{Path, PathBuf};

use crate::{
    artifact::{STALE_IMAGE_PATTERN, dmg_file_name},
    config::Config,
    error::PigcelReleaseError,
    reference::GitRef,
    result::Result,
    runner::{CommandRunner, Invocation, ensure_success},
};

/// Inputs of a single `package` run.
#[derive(Debug, Clone)]
pub struct PackageRequest {
    /// Raw CI reference, e.g. `refs/tags/v1.2.3`.
    pub git_ref: String,
    /// Directory holding the prepared application bundle.
    pub source_dir: PathBuf,
    /// Directory the disk image is written to; stale images are removed
    /// from here as well.
    pub output_dir: PathBuf,
    pub dry_run: bool,
}

/// Execute package command: clean up stale images, release the volume
/// slot, and author a new disk image. Returns the path of the new image.
pub async fn execute(
    runner: &dyn CommandRunner,
    config: &Config,
    req: &PackageRequest,
) -> Result<PathBuf> {
    let git_ref = GitRef::parse(&req.git_ref);
    let version = git_ref.version()?;

    info!("packaging pigcel version: {version}");

    if !req.source_dir.is_dir() {
        return Err(PigcelReleaseError::invalid_config(format!(
            "source directory does not exist: {}",
            req.source_dir.display()
        ))
        .into());
    }

    let output = req.output_dir.join(dmg_file_name(version));

    if req.dry_run {
        warn!(
            "dry_run: would remove {} in {}, unmount {} and create {}",
            STALE_IMAGE_PATTERN,
            req.output_dir.display(),
            config.dmg.mount_point().display(),
            output.display()
        );
        return Ok(output);
    }

    remove_stale_images(&req.output_dir).await?;

    unmount_volume(runner, config).await?;

    let delay = config.settle_delay();
    debug!("waiting {:?} for the volume to settle", delay);
    tokio::time::sleep(delay).await;

    create_image(runner, config, &req.source_dir, &output).await?;

    info!("created disk image: {}", output.display());

    Ok(output)
}

/// Delete disk images left in `dir` by earlier builds. Files that cannot be
/// removed are reported and skipped.
pub async fn remove_stale_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir_str = dir
        .to_str()
        .ok_or_eyre("output directory contains non-UTF8 characters")?;
    let pattern = Path::new(&glob::Pattern::escape(dir_str))
        .join(STALE_IMAGE_PATTERN)
        .display()
        .to_string();

    let mut removed = vec![];

    for entry in glob::glob(&pattern).map_err(PigcelReleaseError::from)? {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!("skipping unreadable path: {err}");
                continue;
            }
        };

        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);

        if !is_file {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("removed stale disk image: {}", path.display());
                removed.push(path);
            }
            Err(err) => {
                warn!("failed to remove {}: {err}", path.display());
            }
        }
    }

    if removed.is_empty() {
        debug!("no stale disk images found in {}", dir.display());
    }

    Ok(removed)
}

/// Force-unmount a previously attached volume with the same name. A volume
/// that is not mounted is not an error.
pub async fn unmount_volume(
    runner: &dyn CommandRunner,
    config: &Config,
) -> Result<()> {
    let mount_point = config.dmg.mount_point();
    let mount_point = mount_point
        .to_str()
        .ok_or_eyre("mount point contains non-UTF8 characters")?;

    let invocation = Invocation::new(&config.volume_tool)
        .args(["detach", mount_point, "-force"]);

    match runner.run(&invocation).await {
        Ok(output) if output.success() => {
            info!("unmounted stale volume: {mount_point}");
        }
        Ok(output) => {
            debug!(
                "{} was not unmounted (status {}): {}",
                mount_point,
                output.exit_code(),
                output.stderr.trim()
            );
        }
        Err(err) => {
            warn!("unable to run {}: {err}", config.volume_tool);
        }
    }

    Ok(())
}

/// Arguments passed to the disk-image authoring tool.
pub fn create_image_invocation(
    config: &Config,
    source_dir: &Path,
    output: &Path,
) -> Result<Invocation> {
    let layout = &config.dmg;

    let background = layout
        .background
        .to_str()
        .ok_or_eyre("background path contains non-UTF8 characters")?;
    let source_dir = source_dir
        .to_str()
        .ok_or_eyre("source directory contains non-UTF8 characters")?;
    let output = output
        .to_str()
        .ok_or_eyre("output path contains non-UTF8 characters")?;

    let invocation = Invocation::new(&config.dmg_tool)
        .args(["--volname", layout.volume_name.as_str()])
        .args(["--background", background])
        .arg("--window-pos")
        .args([
            layout.window_pos.0.to_string(),
            layout.window_pos.1.to_string(),
        ])
        .arg("--window-size")
        .args([
            layout.window_size.0.to_string(),
            layout.window_size.1.to_string(),
        ])
        .args(["--icon-size".to_string(), layout.icon_size.to_string()])
        .args(["--icon", layout.app_name.as_str()])
        .args([layout.icon_pos.0.to_string(), layout.icon_pos.1.to_string()])
        .arg("--app-drop-link")
        .args([
            layout.app_drop_link.0.to_string(),
            layout.app_drop_link.1.to_string(),
        ])
        .args([output, source_dir]);

    Ok(invocation)
}

async fn create_image(
    runner: &dyn CommandRunner,
    config: &Config,
    source_dir: &Path,
    output: &Path,
) -> Result<()> {
    let invocation = create_image_invocation(config, source_dir, output)?;
    let result = runner.run(&invocation).await?;
    ensure_success(&config.dmg_tool, result)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, MockCommandRunner};
    use mockall::Sequence;
    use std::{
        fs,
        sync::{Arc, Mutex},
        time::Duration,
    };
    use tokio::time::Instant;

    fn exited(code: i32) -> CommandOutput {
        CommandOutput {
            code: Some(code),
            ..CommandOutput::default()
        }
    }

    fn test_config() -> Config {
        Config {
            settle_delay_secs: 0,
            ..Config::default()
        }
    }

    fn request(git_ref: &str, root: &Path) -> PackageRequest {
        let source_dir = root.join("dist");
        fs::create_dir_all(&source_dir).unwrap();

        PackageRequest {
            git_ref: git_ref.into(),
            source_dir,
            output_dir: root.to_path_buf(),
            dry_run: false,
        }
    }

    #[test]
    fn builds_create_dmg_arguments() {
        let invocation = create_image_invocation(
            &Config::default(),
            Path::new("dist"),
            Path::new("pigcel-v1.2.3-macOS-amd64.dmg"),
        )
        .unwrap();

        assert_eq!(invocation.program, "create-dmg");
        assert_eq!(
            invocation.args,
            [
                "--volname",
                "pigcel",
                "--background",
                "images/dmg_background.png",
                "--window-pos",
                "200",
                "120",
                "--window-size",
                "800",
                "400",
                "--icon-size",
                "100",
                "--icon",
                "pigcel.app",
                "200",
                "190",
                "--app-drop-link",
                "600",
                "185",
                "pigcel-v1.2.3-macOS-amd64.dmg",
                "dist",
            ]
        );
    }

    #[tokio::test]
    async fn removes_only_disk_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pigcel-old-macOS-amd64.dmg"), "x").unwrap();
        fs::write(dir.path().join("other.dmg"), "x").unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), "x").unwrap();

        fs::create_dir(dir.path().join("nested.dmg")).unwrap();

        let removed = remove_stale_images(dir.path()).await.unwrap();

        assert_eq!(removed.len(), 2);
        assert!(dir.path().join("nested.dmg").is_dir());
        assert!(dir.path().join("CHANGELOG.md").exists());
        assert!(!dir.path().join("other.dmg").exists());
    }

    #[tokio::test]
    async fn no_stale_images_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let removed = remove_stale_images(dir.path()).await.unwrap();
        assert!(removed.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn unmount_failure_is_ignored() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|inv| {
                inv.program == "hdiutil"
                    && inv.args == ["detach", "/Volumes/pigcel", "-force"]
            })
            .times(1)
            .returning(|_| {
                Ok(CommandOutput {
                    code: Some(1),
                    stderr: "no such file or directory".into(),
                    ..CommandOutput::default()
                })
            });

        unmount_volume(&runner, &test_config()).await.unwrap();
    }

    #[tokio::test]
    async fn unmount_tool_missing_is_ignored() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_| Err(color_eyre::eyre::eyre!("hdiutil not found")));

        unmount_volume(&runner, &test_config()).await.unwrap();
    }

    #[tokio::test]
    async fn packages_tag_build() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("pigcel-v0.9.0-macOS-amd64.dmg");
        fs::write(&stale, "old").unwrap();

        let req = request("refs/tags/v1.2.3", dir.path());
        let expected = dir.path().join("pigcel-v1.2.3-macOS-amd64.dmg");
        let expected_arg = expected.to_str().unwrap().to_string();

        let mut seq = Sequence::new();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|inv| inv.program == "hdiutil")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(exited(0)));
        runner
            .expect_run()
            .withf(move |inv| {
                inv.program == "create-dmg"
                    && inv.args.iter().any(|a| *a == expected_arg)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(exited(0)));

        let output = execute(&runner, &test_config(), &req).await.unwrap();

        assert_eq!(output, expected);
        assert!(!stale.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_volume_to_settle_before_creating_image() {
        let dir = tempfile::tempdir().unwrap();
        let req = request("refs/tags/v1.2.3", dir.path());
        let config = Config {
            settle_delay_secs: 3,
            ..Config::default()
        };

        let calls: Arc<Mutex<Vec<(String, Instant)>>> = Arc::default();
        let recorded = Arc::clone(&calls);

        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(2).returning(move |inv| {
            recorded
                .lock()
                .unwrap()
                .push((inv.program.clone(), Instant::now()));
            Ok(exited(0))
        });

        execute(&runner, &config, &req).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].0, "hdiutil");
        assert_eq!(calls[1].0, "create-dmg");
        assert!(calls[1].1 - calls[0].1 >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn packages_branch_build() {
        let dir = tempfile::tempdir().unwrap();
        let req = request("refs/heads/main", dir.path());

        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(2).returning(|_| Ok(exited(0)));

        let output = execute(&runner, &test_config(), &req).await.unwrap();

        assert_eq!(output, dir.path().join("pigcel-main-macOS-amd64.dmg"));
    }

    #[tokio::test]
    async fn invalid_reference_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("pigcel-v0.9.0-macOS-amd64.dmg");
        fs::write(&stale, "old").unwrap();

        let req = request("refs/pull/7/merge", dir.path());

        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let err = execute(&runner, &test_config(), &req).await.unwrap_err();

        assert_eq!(crate::error::exit_code_for(&err), 1);
        assert!(matches!(
            err.downcast_ref::<PigcelReleaseError>(),
            Some(PigcelReleaseError::InvalidReference(_))
        ));
        assert!(stale.exists());
    }

    #[tokio::test]
    async fn propagates_create_dmg_status() {
        let dir = tempfile::tempdir().unwrap();
        let req = request("refs/tags/v1.2.3", dir.path());

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|inv| inv.program == "hdiutil")
            .returning(|_| Ok(exited(0)));
        runner
            .expect_run()
            .withf(|inv| inv.program == "create-dmg")
            .returning(|_| Ok(exited(64)));

        let err = execute(&runner, &test_config(), &req).await.unwrap_err();

        assert_eq!(crate::error::exit_code_for(&err), 64);
    }

    #[tokio::test]
    async fn dry_run_leaves_everything_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("pigcel-v0.9.0-macOS-amd64.dmg");
        fs::write(&stale, "old").unwrap();

        let mut req = request("refs/tags/v1.2.3", dir.path());
        req.dry_run = true;

        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let output = execute(&runner, &test_config(), &req).await.unwrap();

        assert_eq!(output, dir.path().join("pigcel-v1.2.3-macOS-amd64.dmg"));
        assert!(stale.exists());
    }

    #[tokio::test]
    async fn missing_source_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let req = PackageRequest {
            git_ref: "refs/tags/v1.2.3".into(),
            source_dir: dir.path().join("missing"),
            output_dir: dir.path().to_path_buf(),
            dry_run: false,
        };

        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let result = execute(&runner, &test_config(), &req).await;
        assert!(result.is_err());
    }
}
