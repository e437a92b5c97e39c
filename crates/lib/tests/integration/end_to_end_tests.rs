//! Runs the standard pipeline against real processes.

#![cfg(unix)]

use std::fs;

use relbuild_lib::exec::SystemRunner;
use relbuild_lib::manifest::OutputKind;
use relbuild_lib::pipeline::build;

use super::common::TestWorkspace;

#[test]
fn image_build_sees_unsanitized_charts() {
  let ws = TestWorkspace::new();
  ws.write_file("sources/istio/charts/base/Chart.yaml", "name: base\nversion: 0.0.0\n");

  let mut manifest = ws.manifest(&[OutputKind::Image]).with_builder(
    OutputKind::Image,
    [
      "/bin/sh",
      "-c",
      "cp sources/istio/charts/base/Chart.yaml \"$OUT_DIR/chart-at-image-build.yaml\"",
    ],
  );
  manifest.license.fetch = vec!["/bin/sh".to_string(), "-c".to_string(), "true".to_string()];
  manifest.license.scan = "echo".to_string();

  build(&manifest, SystemRunner::new()).unwrap();

  let seen = fs::read_to_string(ws.out().join("chart-at-image-build.yaml")).unwrap();
  assert!(seen.contains("0.0.0"));
  assert_eq!(
    fs::read_to_string(ws.out().join("LICENSES")).unwrap(),
    "--config common/config/license-lint.yml --report\n"
  );
  assert!(fs::metadata(ws.out().join("sources.tar.gz")).unwrap().len() > 0);
  assert!(ws.out().join("manifest.yaml").exists());
}
