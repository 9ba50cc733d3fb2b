// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Coordinate transforms applied before extraction

use neuromorph_structures::Morphology;

/// Mean position of the soma points, if the morphology has a non-empty soma
pub fn soma_center(morphology: &Morphology) -> Option<[f32; 3]> {
    let soma = morphology.soma_section()?;
    if soma.points().is_empty() {
        return None;
    }
    let mut sum = [0f64; 3];
    for point in soma.points() {
        sum[0] += point.x as f64;
        sum[1] += point.y as f64;
        sum[2] += point.z as f64;
    }
    let count = soma.points().len() as f64;
    Some([
        (sum[0] / count) as f32,
        (sum[1] / count) as f32,
        (sum[2] / count) as f32,
    ])
}

/// Translates the morphology so the soma center is the origin.
///
/// A morphology without a usable soma is returned unchanged; the walker reports it.
pub fn recenter(morphology: &Morphology) -> Morphology {
    match soma_center(morphology) {
        Some(center) => morphology.translated([-center[0], -center[1], -center[2]]),
        None => morphology.clone(),
    }
}
