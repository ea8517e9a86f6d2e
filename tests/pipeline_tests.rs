use std::fs;
use std::path::Path;
use vk_dispatch_gen::{
    regenerate, ArtifactKind, Config, Entry, Extension, GenError, Item, Mode, Outcome, Pipeline,
    Region, Tables,
};

fn skeleton(prologue: &str) -> String {
    let mut text = format!("{}\n", prologue);
    for region in Region::ALL {
        let sentinels = region.sentinels();
        text.push_str(&format!("{}\n{}\n", sentinels.begin, sentinels.end));
    }
    text.push_str("// end of hand-written code\n");
    text
}

fn write_artifacts(root: &Path) {
    let config = Config::with_root(root);
    for kind in ArtifactKind::ALL {
        let path = config.artifact_path(kind);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, skeleton(&format!("// {}", kind.as_str()))).unwrap();
    }
}

fn small_tables() -> Tables {
    Tables {
        instance: vec![Entry::new("vkDestroyInstance").into()],
        device: vec![
            Entry::new("vkQueueSubmit").into(),
            Item::Separator,
            Entry::new("vkQueuePresentKHR")
                .with_requires(["VK_KHR_swapchain"])
                .into(),
        ],
        extensions: vec![Extension::new("VK_KHR_swapchain")],
    }
}

#[test]
fn test_write_then_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let pipeline = Pipeline::new(Config::with_root(dir.path()), small_tables()).unwrap();

    let first = pipeline.run(Mode::Write);
    assert!(first.iter().all(|r| matches!(r.result, Ok(Outcome::Written))));

    let header = fs::read_to_string(pipeline.config().artifact_path(ArtifactKind::Header)).unwrap();
    assert!(header.starts_with("// header\n"));
    assert!(header.contains("\tPFN_vkQueuePresentKHR vkQueuePresentKHR;\n"));
    assert!(header.ends_with("// end of hand-written code\n"));

    let source = fs::read_to_string(pipeline.config().artifact_path(ArtifactKind::Source)).unwrap();
    assert!(source.contains("\tvk->vkQueuePresentKHR = GET_DEV_PROC(vk, vkQueuePresentKHR);\n"));
    assert!(source.contains("\t\tif (strcmp(ext, VK_KHR_SWAPCHAIN_EXTENSION_NAME) == 0) {\n"));

    let second = pipeline.run(Mode::Write);
    assert!(second.iter().all(|r| matches!(r.result, Ok(Outcome::Unchanged))));
    assert_eq!(
        fs::read_to_string(pipeline.config().artifact_path(ArtifactKind::Header)).unwrap(),
        header
    );
}

#[test]
fn test_check_mode_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let config = Config::with_root(dir.path());
    let before = fs::read_to_string(config.artifact_path(ArtifactKind::Header)).unwrap();

    let pipeline = Pipeline::new(config, small_tables()).unwrap();
    let results = pipeline.run(Mode::Check);
    assert!(results.iter().all(|r| matches!(r.result, Ok(Outcome::Stale))));

    let after = fs::read_to_string(pipeline.config().artifact_path(ArtifactKind::Header)).unwrap();
    assert_eq!(before, after);

    pipeline.run(Mode::Write);
    let results = pipeline.run(Mode::Check);
    assert!(results.iter().all(|r| matches!(r.result, Ok(Outcome::Unchanged))));
}

#[test]
fn test_missing_sentinel_isolated_to_one_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let config = Config::with_root(dir.path());

    let header_path = config.artifact_path(ArtifactKind::Header);
    let begin = Region::Extensions.sentinels().begin;
    let broken = fs::read_to_string(&header_path)
        .unwrap()
        .replace(&format!("{}\n", begin), "");
    fs::write(&header_path, &broken).unwrap();

    let pipeline = Pipeline::new(config, small_tables()).unwrap();
    let results = pipeline.run(Mode::Write);

    assert_eq!(results[0].kind, ArtifactKind::Header);
    match &results[0].result {
        Err(GenError::SentinelNotFound { sentinel, artifact }) => {
            assert_eq!(sentinel, begin);
            assert_eq!(artifact, &header_path);
        }
        other => panic!("expected missing sentinel, got {:?}", other),
    }
    // No partial write: earlier regions were spliced in memory only
    assert_eq!(fs::read_to_string(&header_path).unwrap(), broken);

    assert_eq!(results[1].kind, ArtifactKind::Source);
    assert!(matches!(results[1].result, Ok(Outcome::Written)));
}

#[test]
fn test_missing_artifact_reports_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(Config::with_root(dir.path()), small_tables()).unwrap();

    let results = pipeline.run(Mode::Write);
    assert!(results
        .iter()
        .all(|r| matches!(r.result, Err(GenError::Read { .. }))));
}

#[test]
fn test_regenerate_builtin_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let results = regenerate(Config::with_root(dir.path()), Mode::Write).unwrap();
    assert!(results.iter().all(|r| matches!(r.result, Ok(Outcome::Written))));

    let source = fs::read_to_string(Config::with_root(dir.path()).artifact_path(ArtifactKind::Source)).unwrap();
    assert!(source.contains("#if !defined(VK_USE_PLATFORM_WIN32_KHR)\n"));
    assert!(source.contains("#if defined(VK_USE_PLATFORM_WAYLAND_KHR) && defined(VK_EXT_acquire_drm_display)\n"));
    assert!(source.contains("\tvk->vkSignalSemaphore"));
    assert!(source.contains("= GET_DEV_PROC(vk, vkSignalSemaphoreKHR);\n"));
    assert!(source.contains("VK_EXT_ROBUSTNESS_2_EXTENSION_NAME"));
    assert!(source.contains("\tvk->has_GOOGLE_display_timing = false;\n"));

    let again = regenerate(Config::with_root(dir.path()), Mode::Write).unwrap();
    assert!(again.iter().all(|r| matches!(r.result, Ok(Outcome::Unchanged))));
}

#[test]
fn test_builtin_source_alignment() {
    let pipeline = Pipeline::standard().unwrap();
    let tables = Tables::builtin();

    let prefix = "\tvk->";
    for (region, items) in [(Region::Instance, &tables.instance), (Region::Device, &tables.device)] {
        let width = items
            .iter()
            .filter_map(Item::entry)
            .map(|e| e.alias().len())
            .max()
            .unwrap();
        let (_, body) = pipeline
            .regions(ArtifactKind::Source)
            .into_iter()
            .find(|(r, _)| *r == region)
            .unwrap();

        let statements: Vec<&String> = body.iter().filter(|l| l.starts_with(prefix)).collect();
        assert_eq!(statements.len(), items.iter().filter_map(Item::entry).count());
        for (line, entry) in statements.iter().zip(items.iter().filter_map(Item::entry)) {
            assert!(line[prefix.len()..].starts_with(entry.alias()), "{}", line);
            assert_eq!(line.find('='), Some(prefix.len() + width + 1), "{}", line);
        }
    }
}

#[test]
fn test_builtin_guards_balanced() {
    let pipeline = Pipeline::standard().unwrap();
    for kind in ArtifactKind::ALL {
        for (region, body) in pipeline.regions(kind) {
            let mut depth = 0usize;
            for line in &body {
                if line.starts_with("#if ") {
                    assert_eq!(depth, 0, "nested #if in {:?}", region);
                    depth += 1;
                } else if line.starts_with("#endif") {
                    depth -= 1;
                }
            }
            assert_eq!(depth, 0, "unclosed #if in {:?}", region);
        }
    }
}
