use std::fs;

use relbuild_lib::manifest::OutputKind;
use relbuild_lib::pipeline::{BuildError, build};
use relbuild_lib::step::StepId;

use super::common::{FakeRunner, TestWorkspace};

#[test]
fn empty_outputs_produce_only_provenance() {
  let ws = TestWorkspace::new();
  let runner = FakeRunner::default();

  build(&ws.manifest(&[]), runner.clone()).unwrap();

  assert_eq!(ws.out_files(), vec!["LICENSES", "manifest.yaml", "sources.tar.gz"]);
  assert_eq!(runner.programs(), vec!["tar", "go", "license-lint"]);
}

#[test]
fn image_only_skips_other_builders() {
  let ws = TestWorkspace::new();
  let runner = FakeRunner::default();

  let report = build(&ws.manifest(&[OutputKind::Image]), runner.clone()).unwrap();

  assert_eq!(&report.executed[..2], &[StepId::Image, StepId::Sanitizer]);
  assert_eq!(runner.programs(), vec!["make", "tar", "go", "license-lint"]);
  assert_eq!(
    report.skipped,
    vec![StepId::PackageRepo, StepId::OsPackage, StepId::Archive]
  );
}

#[test]
fn image_and_archive_sequence() {
  let ws = TestWorkspace::new();
  let runner = FakeRunner::default();

  let report = build(&ws.manifest(&[OutputKind::Archive, OutputKind::Image]), runner.clone()).unwrap();

  assert_eq!(
    report.executed,
    vec![
      StepId::Image,
      StepId::Sanitizer,
      StepId::Archive,
      StepId::SourceBundler,
      StepId::ManifestWriter,
      StepId::LicenseReporter,
    ]
  );
}

#[test]
fn sanitizer_failure_stops_packaging_and_provenance() {
  let ws = TestWorkspace::new();
  ws.write_file("sources/istio/manifests/charts/base/Chart.yaml", "- not a mapping\n");
  let runner = FakeRunner::default();

  let err = build(&ws.manifest(&OutputKind::ALL), runner.clone()).unwrap_err();

  assert_eq!(err.step(), Some(StepId::Sanitizer));
  assert!(err.to_string().starts_with("failed to sanitize charts:"));
  // only the image builder ran
  assert_eq!(runner.programs(), vec!["make"]);
  assert!(ws.out_files().is_empty());
}

#[test]
fn fetch_failure_keeps_earlier_provenance() {
  let ws = TestWorkspace::new();
  let runner = FakeRunner::failing_on("go");

  let err = build(&ws.manifest(&[]), runner).unwrap_err();

  assert_eq!(err.step(), Some(StepId::LicenseReporter));
  assert!(!ws.out().join("LICENSES").exists());
  assert!(ws.out().join("manifest.yaml").exists());
  assert!(ws.out().join("sources.tar.gz").exists());
}

#[test]
fn builder_failure_leaves_partial_output() {
  let ws = TestWorkspace::new();
  ws.write_file("out/istio-1.22.0.tar.gz", "from a previous step");
  let runner = FakeRunner::failing_on("make");

  let err = build(&ws.manifest(&[OutputKind::Image]), runner).unwrap_err();

  match err {
    BuildError::Step { step, source } => {
      assert_eq!(step, StepId::Image);
      assert!(source.to_string().contains("make image"));
    }
    other => panic!("unexpected error: {other}"),
  }
  assert_eq!(ws.out_files(), vec!["istio-1.22.0.tar.gz"]);
}

#[test]
fn missing_builder_is_reported_against_its_step() {
  let ws = TestWorkspace::new();
  let mut manifest = ws.manifest(&[OutputKind::OsPackage]);
  manifest.builders.remove(&OutputKind::OsPackage);

  let err = build(&manifest, FakeRunner::default()).unwrap_err();

  assert_eq!(err.to_string(), "failed to build OS package: no builder configured for os-package");
}

#[test]
fn repeated_runs_write_identical_manifest() {
  let ws = TestWorkspace::new();
  let manifest = ws.manifest(&[OutputKind::PackageRepo, OutputKind::Image]);
  let path = ws.out().join("manifest.yaml");

  build(&manifest, FakeRunner::default()).unwrap();
  let first = fs::read(&path).unwrap();
  build(&manifest, FakeRunner::default()).unwrap();
  let second = fs::read(&path).unwrap();

  assert_eq!(first, second);
}

#[test]
fn charts_are_sanitized_before_packaging() {
  let ws = TestWorkspace::new();
  let chart = ws.write_file("sources/istio/manifests/charts/base/Chart.yaml", "name: base\nversion: 0.0.0\n");

  build(&ws.manifest(&[]), FakeRunner::default()).unwrap();

  let doc: serde_yaml::Value = serde_yaml::from_str(&fs::read_to_string(&chart).unwrap()).unwrap();
  assert_eq!(doc["version"].as_str(), Some("1.22.0"));
}
