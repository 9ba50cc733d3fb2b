//! Conversion through the umbrella crate API

use neuromorph::prelude::*;
use neuromorph::io::DefaultLoader;
use neuromorph::serialization::{SomaRadius, NO_PARENT_SENTINEL, SOMA_BINARY_TYPE_CODE};
use std::fs;
use tempfile::tempdir;

const BRANCHING_SWC: &str = "\
1 1 0 0 0 5 -1
2 1 0 1 0 5 1
3 2 0 0 1 1.0 1
4 2 0 0 2 0.9 3
5 2 1 0 3 0.8 4
6 2 -1 0 3 0.7 4
7 3 0 -1 0 1.2 1
8 3 0 -2 0 1.1 7
";

#[test]
fn test_branching_cell_converts_consistently() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("branching.swc");
    fs::write(&input, BRANCHING_SWC).unwrap();

    let report = convert_file(&input, &ConversionOptions::default(), &DefaultLoader).unwrap();
    assert_eq!(report.section_count, 4);
    assert_eq!(report.point_count, 8);

    let document =
        Document::from_json_str(&fs::read_to_string(&report.json_path).unwrap()).unwrap();
    let ids: Vec<u32> = document.sections.iter().map(|s| s.id.value()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(document.sections[0].parent, None);
    assert_eq!(document.sections[0].children, vec![SectionId(2), SectionId(3)]);
    assert_eq!(document.sections[1].parent, Some(SectionId(1)));
    assert_eq!(document.sections[3].typename, "basal_dendrite");
    assert_eq!(document.sections[3].typevalue, 2);

    let records = decode_binary(&fs::read(report.binary_path.unwrap()).unwrap()).unwrap();
    assert_eq!(records.len(), 9);
    assert_eq!(records[0].fields[6], NO_PARENT_SENTINEL);
    assert_eq!(records[2].parent(), Some(1.0));
    assert_eq!(records[7].type_code(), 2.0);

    let soma = records.last().unwrap();
    assert_eq!(soma.id(), 0.0);
    assert_eq!(soma.type_code(), SOMA_BINARY_TYPE_CODE);
    assert_eq!(soma.position(), [0.0, 0.5, 0.0]);
    assert_eq!(soma.radius(), 5.0);
}

#[test]
fn test_recentered_cell_with_mean_soma_radius() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("branching.swc");
    fs::write(&input, BRANCHING_SWC).unwrap();

    let options = ConversionOptions {
        recenter: true,
        walker: WalkerOptions {
            soma_radius: SomaRadius::MeanDistance,
            ..WalkerOptions::default()
        },
        ..ConversionOptions::default()
    };

    let report = convert_file(&input, &options, &DefaultLoader).unwrap();
    let records = decode_binary(&fs::read(report.binary_path.unwrap()).unwrap()).unwrap();

    let soma = records.last().unwrap();
    assert_eq!(soma.position(), [0.0, 0.0, 0.0]);
    assert_eq!(soma.radius(), 0.5);
    assert_eq!(records[0].position(), [0.0, -0.5, 1.0]);
}

#[test]
fn test_config_drives_batch_policy() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("neuromorph.toml");
    fs::write(
        &config_path,
        "[conversion]\nwrite_binary = false\n\n[batch]\non_error = \"abort\"\n",
    )
    .unwrap();
    let config = load_config(Some(&config_path), None).unwrap();
    assert_eq!(config.batch.on_error, FailurePolicy::Abort);

    let broken = dir.path().join("broken.swc");
    fs::write(&broken, "1 2 0 0 0 1 -1\n").unwrap();
    let good = dir.path().join("good.swc");
    fs::write(&good, BRANCHING_SWC).unwrap();

    let options = ConversionOptions::from_config(&config);
    let summary = convert_batch(
        &[broken, good.clone()],
        &options,
        &DefaultLoader,
        config.batch.on_error,
    );
    assert!(summary.aborted);
    assert!(summary.converted.is_empty());
    assert!(!dir.path().join("good.json").exists());
}
