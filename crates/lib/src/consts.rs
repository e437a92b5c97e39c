//! Fixed names shared across the pipeline.

/// Compressed archive of the staged source tree, written under the output directory.
pub const SOURCES_ARCHIVE: &str = "sources.tar.gz";

/// Snapshot of the effective manifest.
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Captured output of the license-scan tool.
pub const LICENSES_FILE: &str = "LICENSES";

/// Subdirectory of the working tree holding resolved sources.
pub const SOURCES_DIR: &str = "sources";

/// Subdirectory of the working tree receiving artifacts and provenance files.
pub const OUT_DIR: &str = "out";

/// Chart metadata file rewritten by the sanitizer.
pub const CHART_FILE: &str = "Chart.yaml";

/// Chart values file rewritten by the sanitizer.
pub const CHART_VALUES_FILE: &str = "values.yaml";

pub const DEFAULT_LICENSE_REPO: &str = "istio";
pub const DEFAULT_LICENSE_CONFIG: &str = "common/config/license-lint.yml";
pub const DEFAULT_LICENSE_TOOL: &str = "license-lint";
