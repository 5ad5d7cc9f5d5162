//! Merger integration tests: real directory trees in temp dirs, fake engine.
//!
//! Run with: `cargo test`

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use daymerge::config::ScanConfig;
use daymerge::day::DayKey;
use daymerge::engine::ConcatEngine;
use daymerge::error::{MergeError, Result};
use daymerge::merger::DayMerger;
use daymerge::walker;

const TODAY: &str = "20210512";

/// Records every invocation and writes a placeholder output file.
#[derive(Default)]
struct FakeEngine {
    calls: RefCell<Vec<(String, PathBuf)>>,
    fail_days: Vec<String>,
}

impl FakeEngine {
    fn failing(days: &[&str]) -> Self {
        Self { fail_days: days.iter().map(|d| d.to_string()).collect(), ..Default::default() }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// File names listed in the n-th play-list, in order.
    fn listed_names(&self, n: usize) -> Vec<String> {
        self.calls.borrow()[n]
            .0
            .lines()
            .map(|l| {
                let path = l.strip_prefix("file ").expect("directive prefix");
                Path::new(path).file_name().unwrap().to_string_lossy().into_owned()
            })
            .collect()
    }
}

impl ConcatEngine for FakeEngine {
    fn concat(&self, playlist: &Path, target: &Path) -> Result<()> {
        let content = std::fs::read_to_string(playlist)?;
        self.calls.borrow_mut().push((content, target.to_path_buf()));
        let day = target.file_stem().unwrap().to_string_lossy().into_owned();
        if self.fail_days.contains(&day) {
            std::fs::write(target, b"partial")?;
            return Err(MergeError::MergeInvocation { day, reason: "exit status: 1".into() });
        }
        std::fs::write(target, b"merged")?;
        Ok(())
    }
}

fn tmp_dir() -> TempDir {
    tempfile::tempdir().expect("create tempdir")
}

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).expect("create parent");
    std::fs::write(path, b"clip").expect("write clip");
}

fn merger(engine: FakeEngine) -> DayMerger<FakeEngine> {
    DayMerger::new(engine, ScanConfig::default(), DayKey::from_label(TODAY))
}

#[test]
fn test_hours_merged_into_day_files() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/00M00S_1.mp4"));
    touch(&cam.join("2021051002/00M00S_2.mp4"));
    touch(&cam.join("2021051101/00M00S_3.mp4"));

    let m = merger(FakeEngine::default());
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(m.engine().call_count(), 2);
    assert_eq!(report.merged.len(), 2);
    assert!(report.is_clean());
    assert!(output.path().join("cam1/20210510.mp4").exists());
    assert!(output.path().join("cam1/20210511.mp4").exists());
    assert_eq!(m.engine().listed_names(0), vec!["00M00S_1.mp4", "00M00S_2.mp4"]);
    assert_eq!(report.merged[0].clips, 2);
}

#[test]
fn test_current_day_never_merged() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051101/a_1.mp4"));
    touch(&cam.join(format!("{TODAY}09/a_1.mp4")));

    let m = merger(FakeEngine::default());
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(report.merged.len(), 1);
    assert_eq!(report.merged[0].day.as_str(), "20210511");
    assert!(cam.join(format!("{TODAY}09/a_1.mp4")).exists());
    assert!(!output.path().join(format!("cam1/{TODAY}.mp4")).exists());
}

#[test]
fn test_clips_ordered_numerically() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    for name in ["a_1.mp4", "a_10.mp4", "a_2.mp4"] {
        touch(&cam.join("2021051001").join(name));
    }

    let m = merger(FakeEngine::default());
    m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(m.engine().listed_names(0), vec!["a_1.mp4", "a_2.mp4", "a_10.mp4"]);
}

#[test]
fn test_playlist_lines_are_absolute_forward_slash() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));

    let m = merger(FakeEngine::default());
    m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    let calls = m.engine().calls.borrow();
    let line = calls[0].0.lines().next().expect("one line");
    let path = line.strip_prefix("file ").expect("directive");
    assert!(!path.contains('\\'));
    assert!(Path::new(path).is_absolute() || path.chars().nth(1) == Some(':'));
}

#[test]
fn test_nested_day_directory_recurses_with_day_label() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("20210510/2021051001/a_1.mp4"));
    touch(&cam.join("20210510/2021051002/a_2.mp4"));

    let m = merger(FakeEngine::default());
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(m.engine().call_count(), 1);
    assert_eq!(report.merged.len(), 1);
    let expected = output.path().join("cam1/20210510/20210510.mp4");
    assert_eq!(report.merged[0].output, expected);
    assert!(expected.exists());
    assert!(!cam.join("20210510/2021051001").exists());
    assert!(!cam.join("20210510/2021051002").exists());
}

#[test]
fn test_empty_day_directory_skipped() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    std::fs::create_dir_all(cam.join("2021051001")).unwrap();

    let m = merger(FakeEngine::default());
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(m.engine().call_count(), 0);
    assert_eq!(report.skipped, 1);
    assert!(report.merged.is_empty());
    assert!(cam.join("2021051001").exists());
}

#[test]
fn test_loose_clips_bucketed_under_camera_name() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("x_2.mp4"));
    touch(&cam.join("x_1.mp4"));

    let m = merger(FakeEngine::default());
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(report.merged.len(), 1);
    assert_eq!(report.merged[0].day.as_str(), "cam1");
    assert_eq!(report.merged[0].clips, 2);
    assert_eq!(m.engine().listed_names(0), vec!["x_1.mp4", "x_2.mp4"]);
    assert!(output.path().join("cam1/cam1.mp4").exists());
    assert!(!cam.exists());
}

#[test]
fn test_cleanup_limited_to_merged_day() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));
    touch(&cam.join("2021051002/a_2.mp4"));
    touch(&cam.join("2021051101/a_1.mp4"));

    let m = merger(FakeEngine::failing(&["20210511"]));
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert!(!cam.join("2021051001").exists());
    assert!(!cam.join("2021051002").exists());
    assert!(cam.join("2021051101/a_1.mp4").exists());
    assert!(!output.path().join("cam1/20210510_video_list.txt").exists());
    assert!(!output.path().join("cam1/20210511_video_list.txt").exists());
    assert_eq!(report.merged.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].day.as_str(), "20210511");
}

#[test]
fn test_failed_merge_keeps_sources_and_drops_partial_output() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));

    let m = merger(FakeEngine::failing(&["20210510"]));
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert!(!report.is_clean());
    assert!(cam.join("2021051001/a_1.mp4").exists());
    assert!(!output.path().join("cam1/20210510.mp4").exists());
    assert!(!output.path().join("cam1/20210510_video_list.txt").exists());
}

#[test]
fn test_rerun_after_merge_is_noop() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));

    let m = merger(FakeEngine::default());
    m.merge_dirs(&cam, output.path(), "cam1", "").expect("first run");
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("second run");

    assert_eq!(m.engine().call_count(), 1);
    assert!(report.merged.is_empty());
    assert!(report.is_clean());
}

#[test]
fn test_dry_run_changes_nothing() {
    let input = tmp_dir();
    let output = tmp_dir();
    let out_root = output.path().join("merged");
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));
    touch(&cam.join("20210511/2021051101/a_1.mp4"));

    let m = merger(FakeEngine::default()).dry_run(true);
    let report = m.merge_dirs(&cam, &out_root, "cam1", "").expect("plan");

    assert_eq!(m.engine().call_count(), 0);
    assert_eq!(report.planned.len(), 2);
    assert!(report.merged.is_empty());
    assert!(!out_root.exists());
    assert!(cam.join("2021051001/a_1.mp4").exists());
    assert_eq!(report.planned[1].output, out_root.join("cam1/20210511/20210511.mp4"));
}

#[test]
fn test_keep_sources() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));

    let scan = ScanConfig { keep_sources: true, ..ScanConfig::default() };
    let m = DayMerger::new(FakeEngine::default(), scan, DayKey::from_label(TODAY));
    m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert!(output.path().join("cam1/20210510.mp4").exists());
    assert!(cam.join("2021051001/a_1.mp4").exists());
    assert!(!output.path().join("cam1/20210510_video_list.txt").exists());
}

#[test]
fn test_metadata_artifacts_ignored() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join(".DS_Store"));
    touch(&cam.join("@eaDir/thumb/x_1.mp4"));
    touch(&cam.join("2021051001/a_1.mp4"));

    let m = merger(FakeEngine::default());
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(report.merged.len(), 1);
    assert_eq!(report.merged[0].day.as_str(), "20210510");
    assert!(cam.join("@eaDir/thumb/x_1.mp4").exists());
}

#[test]
fn test_unnumbered_clip_fails_day() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));
    touch(&cam.join("2021051001/snapshot.mp4"));

    let m = merger(FakeEngine::default());
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(m.engine().call_count(), 0);
    assert_eq!(report.failed.len(), 1);
    assert!(cam.join("2021051001/a_1.mp4").exists());
}

#[test]
fn test_file_input_rejected_without_side_effects() {
    let input = tmp_dir();
    let output = tmp_dir();
    let file = input.path().join("cam1");
    touch(&file);
    let out_root = output.path().join("never");

    let m = merger(FakeEngine::default());
    let err = m.merge_dirs(&file, &out_root, "cam1", "").unwrap_err();

    assert!(matches!(err, MergeError::InvalidInput { .. }));
    assert!(!out_root.exists());
}

#[test]
fn test_walker_processes_every_camera() {
    let input = tmp_dir();
    let output = tmp_dir();
    touch(&input.path().join("cam1/2021051001/a_1.mp4"));
    touch(&input.path().join("cam2/2021051101/b_1.mp4"));
    touch(&input.path().join("notes.txt"));
    touch(&input.path().join(".DS_Store"));

    let m = merger(FakeEngine::default());
    let report = walker::merge_cameras(&m, input.path(), output.path()).expect("walk");

    assert_eq!(report.merged.len(), 2);
    assert!(output.path().join("cam1/20210510.mp4").exists());
    assert!(output.path().join("cam2/20210511.mp4").exists());
    assert!(input.path().join("notes.txt").exists());
}

#[test]
fn test_walker_rejects_missing_root() {
    let input = tmp_dir();
    let output = tmp_dir();

    let m = merger(FakeEngine::default());
    let err = walker::merge_cameras(&m, &input.path().join("missing"), output.path()).unwrap_err();

    assert!(matches!(err, MergeError::InvalidInput { .. }));
}

#[test]
fn test_loose_non_video_file_does_not_loop() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join(format!("{TODAY}09/a_1.mp4")));
    touch(&cam.join("notes.txt"));

    let m = merger(FakeEngine::default());
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(m.engine().call_count(), 0);
    assert!(report.merged.is_empty());
    assert_eq!(report.skipped, 1);
    assert!(cam.join(format!("{TODAY}09/a_1.mp4")).exists());
    assert!(cam.join("notes.txt").exists());
}

#[test]
fn test_loose_non_video_file_does_not_loop_in_dry_run() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));
    touch(&cam.join("Thumbs.db"));

    let m = merger(FakeEngine::default()).dry_run(true);
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("plan");

    assert_eq!(report.planned.len(), 1);
    assert_eq!(report.planned[0].day.as_str(), "20210510");
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_failed_merge_keeps_previous_output() {
    let input = tmp_dir();
    let output = tmp_dir();
    let cam = input.path().join("cam1");
    touch(&cam.join("2021051001/a_1.mp4"));
    let previous = output.path().join("cam1/20210510.mp4");
    touch(&previous);

    let m = merger(FakeEngine::failing(&["20210510"]));
    let report = m.merge_dirs(&cam, output.path(), "cam1", "").expect("merge");

    assert_eq!(report.failed.len(), 1);
    assert!(previous.exists());
    assert!(cam.join("2021051001/a_1.mp4").exists());
    assert!(!output.path().join("cam1/20210510_video_list.txt").exists());
}
