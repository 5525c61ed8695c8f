use std::path::Path;

use projinit_core::{DetectionResult, ProjectType};

use crate::markers::{all_markers, marker_set, CONTENT_MARKERS, MANIFESTS};

fn marker_present(root: &Path, marker: &str) -> bool {
    match marker.strip_suffix('/') {
        Some(dir) => root.join(dir).is_dir(),
        None => root.join(marker).exists(),
    }
}

fn push_unique(found: &mut Vec<String>, marker: String) {
    if !found.contains(&marker) {
        found.push(marker);
    }
}

/// Score `root` against every marker set and pick the best type.
///
/// Ties go to the type listed first in [`ProjectType::ALL`]. Nothing is written; at most
/// the two manifests are read, and read errors just skip content scoring for that file.
pub fn detect(root: &Path) -> DetectionResult {
    let markers_checked = all_markers();
    let mut markers_found = Vec::new();

    if !root.is_dir() {
        tracing::debug!(path = %root.display(), "not a directory; project type unknown");
        return DetectionResult { project_type: ProjectType::Unknown, confidence: 0.0, markers_found, markers_checked };
    }

    let mut scores: Vec<(ProjectType, f64)> = ProjectType::ALL.iter().map(|pt| (*pt, 0.0)).collect();

    for (pt, score) in scores.iter_mut() {
        for (marker, weight) in marker_set(*pt) {
            if marker_present(root, marker) {
                *score += weight;
                push_unique(&mut markers_found, marker.to_string());
            }
        }
    }

    for manifest in MANIFESTS {
        let path = root.join(manifest);
        if !path.is_file() {
            continue;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(manifest, error = %e, "manifest unreadable; skipping content markers");
                continue;
            }
        };
        for (pattern, pt, weight) in CONTENT_MARKERS {
            if content.contains(pattern) {
                if let Some((_, score)) = scores.iter_mut().find(|(t, _)| t == pt) {
                    *score += weight;
                }
                push_unique(&mut markers_found, format!("{manifest}:{pattern}"));
            }
        }
    }

    let mut best: Option<(ProjectType, f64)> = None;
    for (pt, score) in &scores {
        if *score > 0.0 && best.map_or(true, |(_, s)| *score > s) {
            best = Some((*pt, *score));
        }
    }

    let (project_type, confidence) = match best {
        Some((pt, score)) => (pt, score.min(1.0)),
        None => (ProjectType::Unknown, 0.0),
    };
    tracing::debug!(%project_type, confidence, ?markers_found, "detection finished");
    DetectionResult { project_type, confidence, markers_found, markers_checked }
}
