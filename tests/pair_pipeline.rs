//! End-to-end tests: CSV pair on disk → discretized files and properties.

use std::fs;
use std::path::Path;

use bioplex_discretize::output::HeaderStyle;
use bioplex_discretize::{run_batch, run_pair, BatchConfig, DiscretizeError, Method, PairConfig};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn mean_pair_writes_both_outputs() {
    let dir = tempdir().unwrap();
    let treated = write(dir.path(), "Sora.csv", "Time,Erk,Akt\n0,1,10\n5,2,20\n0,99,99\n");
    let untreated = write(dir.path(), "DMSO.csv", "Time,Erk,Akt\n0,3,30\n5,4,40\n");

    let outcome = run_pair(&PairConfig::new(&treated, &untreated, Method::Mean)).unwrap();

    assert_eq!(outcome.thresholds.values, vec![2.5, 25.0]);
    assert_eq!(outcome.treated.binary.to_vec(), vec![vec![0, 0], vec![0, 0]]);
    assert_eq!(outcome.untreated.binary.to_vec(), vec![vec![1, 1], vec![1, 1]]);

    let treated_text = fs::read_to_string(dir.path().join("DisSora.csv")).unwrap();
    assert_eq!(treated_text, "# Erk\tAkt\n0\t0\t0\n5\t0\t0\n");
    let untreated_text = fs::read_to_string(dir.path().join("DisDMSO.csv")).unwrap();
    assert_eq!(untreated_text, "# Erk,Akt\n0\t1\t1\n5\t1\t1\n");
}

#[test]
fn each_condition_keeps_its_own_time_index() {
    let dir = tempdir().unwrap();
    let treated = write(dir.path(), "A.csv", "Time,X\n0,1\n10,2\n20,3\n");
    let untreated = write(dir.path(), "B.csv", "Time,X\n0,4\n15,5\n");

    let mut config = PairConfig::new(&treated, &untreated, Method::Median);
    config.header_style = HeaderStyle::Tab;
    let outcome = run_pair(&config).unwrap();

    assert_eq!(outcome.treated.time_index, vec!["0", "10", "20"]);
    assert_eq!(outcome.untreated.time_index, vec!["0", "15"]);
    let text = fs::read_to_string(&outcome.untreated.output).unwrap();
    assert_eq!(text, "# X\n0\t1\n15\t1\n");
}

#[test]
fn species_selection_and_properties() {
    let dir = tempdir().unwrap();
    let treated = write(
        dir.path(),
        "Bp1851Sora.csv",
        "Time,Akt,Erk,mTor\n0,5,1,7\n5,1,5,7\n30,1,1,7\n",
    );
    let untreated = write(
        dir.path(),
        "Bp1851DMSO.csv",
        "Time,Akt,Erk,mTor\n0,5,5,7\n5,5,5,7\n30,1,1,7\n",
    );
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let props = dir.path().join("properties.json");

    let mut config = PairConfig::new(&treated, &untreated, Method::Mean);
    config.species = Some(vec!["Erk".into(), "Akt".into()]);
    config.output_dir = Some(out.clone());
    config.drug = Some("Sora".into());
    config.properties = Some(props.clone());
    let outcome = run_pair(&config).unwrap();

    // Erk pool [1,5,1,5,5,1] and Akt pool [5,1,1,5,5,1] both average 3
    assert_eq!(outcome.features, vec!["Erk", "Akt"]);
    assert_eq!(outcome.thresholds.values, vec![3.0, 3.0]);
    assert_eq!(
        outcome.treated.binary.to_vec(),
        vec![vec![0, 1], vec![1, 0], vec![0, 0]]
    );
    assert!(out.join("DisBp1851Sora.csv").exists());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&props).unwrap()).unwrap();
    assert_eq!(json[0]["name"], "Bp1851Sora");
    assert_eq!(json[0]["initial_states"], "Erk=0&Akt=1");
    assert_eq!(json[0]["formula"], "EF(Erk=1&Akt=0&EF(Erk=0&Akt=0))");
    assert_eq!(json[0]["fix"]["Sora"], 1);
    assert_eq!(json[1]["name"], "Bp1851DMSO");
    assert_eq!(json[1]["fix"]["Sora"], 0);
}

#[test]
fn missing_input_is_not_found() {
    let dir = tempdir().unwrap();
    let untreated = write(dir.path(), "B.csv", "Time,X\n0,4\n");
    let config = PairConfig::new(dir.path().join("nope.csv"), &untreated, Method::Mean);
    assert!(matches!(run_pair(&config), Err(DiscretizeError::NotFound { .. })));
}

#[test]
fn feature_count_mismatch_writes_nothing() {
    let dir = tempdir().unwrap();
    let treated = write(dir.path(), "A.csv", "Time,X,Y,Z\n0,1,2,3\n");
    let untreated = write(dir.path(), "B.csv", "Time,X,Y,Z,W\n0,1,2,3,4\n");

    let err = run_pair(&PairConfig::new(&treated, &untreated, Method::Mean)).unwrap_err();
    assert!(matches!(err, DiscretizeError::ShapeMismatch { left: 3, right: 4 }));
    assert!(!dir.path().join("DisA.csv").exists());
    assert!(!dir.path().join("DisB.csv").exists());
}

#[test]
fn bad_cell_aborts_the_pair() {
    let dir = tempdir().unwrap();
    let treated = write(dir.path(), "A.csv", "Time,X\n0,1\n5,n/a\n");
    let untreated = write(dir.path(), "B.csv", "Time,X\n0,4\n");
    let err = run_pair(&PairConfig::new(&treated, &untreated, Method::Mean)).unwrap_err();
    assert!(matches!(err, DiscretizeError::Parse { .. }));
}

#[test]
fn batch_runs_pairs_independently() {
    let dir = tempdir().unwrap();
    write(dir.path(), "A.csv", "Time,X\n0,1\n5,3\n");
    write(dir.path(), "B.csv", "Time,X\n0,2\n5,4\n");
    write(dir.path(), "C.csv", "Time,X,Y\n0,1,1\n");
    write(dir.path(), "D.csv", "Time,X\n0,1\n");
    let config_path = write(
        dir.path(),
        "batch.json",
        r#"{"pairs":[
            {"treated":"A.csv","untreated":"B.csv","method":"mean"},
            {"treated":"D.csv","untreated":"C.csv"}
        ]}"#,
    );

    let batch = BatchConfig::load(&config_path).unwrap();
    let results = run_batch(&batch).unwrap();

    assert_eq!(results.len(), 2);
    let first = results[0].as_ref().unwrap();
    assert_eq!(first.thresholds.values, vec![2.5]);
    assert!(dir.path().join("DisA.csv").exists());
    assert!(matches!(
        results[1],
        Err(DiscretizeError::ShapeMismatch { left: 1, right: 2 })
    ));
}

#[test]
fn same_file_name_in_two_directories_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("rep1")).unwrap();
    fs::create_dir(dir.path().join("rep2")).unwrap();
    let treated = write(&dir.path().join("rep1"), "Bp.csv", "Time,X\n0,1\n5,2\n");
    let untreated = write(&dir.path().join("rep2"), "Bp.csv", "Time,X\n0,3\n5,4\n");

    // Next to each input the outputs stay apart.
    let outcome = run_pair(&PairConfig::new(&treated, &untreated, Method::Mean)).unwrap();
    assert_ne!(outcome.treated.output, outcome.untreated.output);
    assert_eq!(
        fs::read_to_string(&outcome.treated.output).unwrap(),
        "# X\n0\t0\n5\t0\n"
    );

    // A shared output directory would put both at out/DisBp.csv.
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let mut config = PairConfig::new(&treated, &untreated, Method::Mean);
    config.output_dir = Some(out.clone());
    let err = run_pair(&config).unwrap_err();
    assert!(matches!(err, DiscretizeError::Config(_)));
    assert!(!out.join("DisBp.csv").exists());
}

#[test]
fn empty_prefix_cannot_overwrite_inputs() {
    let dir = tempdir().unwrap();
    let treated = write(dir.path(), "A.csv", "Time,X\n0,1\n");
    let untreated = write(dir.path(), "B.csv", "Time,X\n0,2\n");

    let mut config = PairConfig::new(&treated, &untreated, Method::Mean);
    config.prefix.clear();
    config.output_dir = Some(dir.path().join("."));
    assert!(matches!(run_pair(&config), Err(DiscretizeError::Config(_))));
    assert_eq!(fs::read_to_string(&treated).unwrap(), "Time,X\n0,1\n");
}

#[test]
fn batch_sharing_a_treated_table_is_rejected() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Sora.csv", "Time,X\n0,1\n5,3\n");
    write(dir.path(), "DMSO.csv", "Time,X\n0,2\n5,4\n");
    write(dir.path(), "DMSO2.csv", "Time,X\n0,0\n5,9\n");
    let config_path = write(
        dir.path(),
        "batch.json",
        r#"{"pairs":[
            {"treated":"Sora.csv","untreated":"DMSO.csv"},
            {"treated":"Sora.csv","untreated":"DMSO2.csv"}
        ]}"#,
    );

    let err = BatchConfig::load(&config_path).unwrap_err();
    assert!(err.to_string().contains("both write"));

    // Giving the second pair its own output directory resolves the clash.
    let mut batch: BatchConfig = serde_json::from_str(
        r#"{"pairs":[
            {"treated":"Sora.csv","untreated":"DMSO.csv"},
            {"treated":"Sora.csv","untreated":"DMSO2.csv"}
        ]}"#,
    )
    .unwrap();
    for pair in &mut batch.pairs {
        pair.treated = dir.path().join(&pair.treated);
        pair.untreated = dir.path().join(&pair.untreated);
    }
    assert!(run_batch(&batch).is_err());

    let second_out = dir.path().join("second");
    fs::create_dir(&second_out).unwrap();
    batch.pairs[1].output_dir = Some(second_out.clone());
    let results = run_batch(&batch).unwrap();
    let first = results[0].as_ref().unwrap();
    let second = results[1].as_ref().unwrap();
    assert_ne!(first.treated.output, second.treated.output);
    assert_eq!(
        fs::read_to_string(&first.treated.output).unwrap(),
        "# X\n0\t0\n5\t1\n"
    );
    assert_eq!(
        fs::read_to_string(second_out.join("DisSora.csv")).unwrap(),
        "# X\n0\t0\n5\t0\n"
    );
}
