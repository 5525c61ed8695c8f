use std::collections::BTreeSet;

use projinit_core::ProjectType;

/// Weighted evidence for one project type. A trailing `/` means "exists as a directory".
pub type MarkerSet = &'static [(&'static str, f64)];

const PYTHON_CLI: MarkerSet = &[
    ("pyproject.toml", 0.3),
    ("setup.py", 0.2),
    ("src/", 0.2),
    ("tests/", 0.1),
    ("__main__.py", 0.2),
];

const PYTHON_LIB: MarkerSet = &[("pyproject.toml", 0.3), ("setup.py", 0.2), ("src/", 0.3), ("tests/", 0.2)];

const NODE_FRONTEND: MarkerSet = &[
    ("package.json", 0.4),
    ("src/", 0.2),
    ("tsconfig.json", 0.2),
    ("vite.config.ts", 0.1),
    ("vite.config.js", 0.1),
];

const INFRASTRUCTURE: MarkerSet = &[
    ("main.tf", 0.4),
    ("terraform/", 0.3),
    ("ansible/", 0.2),
    ("playbook.yml", 0.1),
    ("inventory/", 0.1),
];

const DOCUMENTATION: MarkerSet = &[("mkdocs.yml", 0.5), ("docs/", 0.3), ("mkdocs.yaml", 0.5)];

const LAB: MarkerSet = &[("labs/", 0.5), ("exercises/", 0.3), ("solutions/", 0.3)];

pub fn marker_set(project_type: ProjectType) -> MarkerSet {
    match project_type {
        ProjectType::PythonCli => PYTHON_CLI,
        ProjectType::PythonLib => PYTHON_LIB,
        ProjectType::NodeFrontend => NODE_FRONTEND,
        ProjectType::Infrastructure => INFRASTRUCTURE,
        ProjectType::Documentation => DOCUMENTATION,
        ProjectType::Lab => LAB,
        ProjectType::Unknown => &[],
    }
}

/// Manifests whose contents are scanned for [`CONTENT_MARKERS`].
pub const MANIFESTS: [&str; 2] = ["pyproject.toml", "package.json"];

/// Substrings that separate otherwise similar types, with the type they vote for.
pub const CONTENT_MARKERS: &[(&str, ProjectType, f64)] = &[
    ("[project.scripts]", ProjectType::PythonCli, 0.3),
    ("click", ProjectType::PythonCli, 0.1),
    ("argparse", ProjectType::PythonCli, 0.1),
    ("typer", ProjectType::PythonCli, 0.1),
    ("react", ProjectType::NodeFrontend, 0.2),
    ("vue", ProjectType::NodeFrontend, 0.2),
    ("vite", ProjectType::NodeFrontend, 0.1),
];

pub fn all_markers() -> BTreeSet<String> {
    ProjectType::ALL
        .iter()
        .flat_map(|pt| marker_set(*pt).iter().map(|(m, _)| m.to_string()))
        .collect()
}
