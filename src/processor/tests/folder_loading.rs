//! Folder loading tests

use crate::config::LoaderConfig;
use crate::constants::columns;
use crate::parser::tests::fixtures::Re1Fixture;
use crate::processor::StudyLoader;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_study(base: &Path, folder: &str, file: &str, fixture: &Re1Fixture) {
    let dir = base.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), fixture.render()).unwrap();
}

#[tokio::test]
async fn test_load_subfolder_studies() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = Re1Fixture::default().with_grid(&[0.0, 90.0], &[0.4, 0.8, 1.2]);
    for name in ["run10", "run2", "run1"] {
        write_study(temp_dir.path(), name, "case.re1", &fixture);
    }

    let loader = StudyLoader::new(LoaderConfig::default().with_workers(2));
    let (studies, warnings) = loader.load_folder(temp_dir.path()).await.unwrap();

    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert_eq!(studies.len(), 3);

    let study = &studies["run2"];
    assert!(!study.is_synthetic());
    assert_eq!(study.headings, vec![0.0, 90.0]);
    assert_eq!(study.table.height(), 2 * 3 * 6);
    assert_eq!(study.table.get_column_names()[0].as_str(), columns::STUDY);
}

#[tokio::test]
async fn test_result_independent_of_worker_count() {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..6 {
        let fixture = Re1Fixture::default().with_grid(&[i as f64 * 10.0], &[0.5]);
        write_study(temp_dir.path(), &format!("case{}", i), "a.re1", &fixture);
    }

    let serial = StudyLoader::new(LoaderConfig::default().with_workers(1))
        .load_folder(temp_dir.path())
        .await
        .unwrap()
        .0;
    let parallel = StudyLoader::new(LoaderConfig::default().with_workers(4))
        .load_folder(temp_dir.path())
        .await
        .unwrap()
        .0;

    let serial_keys: Vec<&String> = serial.keys().collect();
    let parallel_keys: Vec<&String> = parallel.keys().collect();
    assert_eq!(serial_keys, parallel_keys);
    for (name, study) in &serial {
        assert!(study.table.equals_missing(&parallel[name].table));
    }
}

#[tokio::test]
async fn test_top_level_files_and_stats() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("hull_a.re1"), Re1Fixture::default().render()).unwrap();
    fs::write(temp_dir.path().join("hull_b.RE1"), Re1Fixture::default().render()).unwrap();

    let loader = StudyLoader::new(LoaderConfig::default().with_progress());
    let (studies, _, stats) = loader.load_folder_with_stats(temp_dir.path()).await.unwrap();

    assert_eq!(studies.keys().collect::<Vec<_>>(), vec!["hull_a", "hull_b"]);
    assert_eq!(stats.files_found, 2);
    assert_eq!(stats.files_loaded, 2);
    assert_eq!(stats.files_substituted, 0);
}

#[tokio::test]
async fn test_multi_speed_file_notes_chosen_speed() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = Re1Fixture {
        speeds: vec![0.0, 5.0],
        ..Re1Fixture::default()
    };
    write_study(temp_dir.path(), "fast", "ship.re1", &fixture);

    let loader = StudyLoader::new(LoaderConfig::default().with_speed_index(1));
    let (studies, warnings) = loader.load_folder(temp_dir.path()).await.unwrap();

    assert_eq!(studies.len(), 1);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("2 speeds present"));
    assert!(warnings[0].contains("9.72 kn"));
}
