//! Metadata equivalence: time, Info, Params and block topology.
//!
//! Categories are checked in a fixed order and the pass stops at the first
//! failing one, except topology where every variable is evaluated. Topology
//! needs the block correspondence, so it runs as a second pass once the
//! attribute categories agree.

use crate::diff::correspondence::BlockCorrespondence;
use crate::diff::exceeds;
use crate::diff::model::{
    DiffStatus, MetadataCategory, MetadataComparison, MetadataDetail, MetadataFinding,
};
use crate::model::config::DiffConfig;
use crate::model::dataset::Dataset;
use crate::model::value::AttrValue;
use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet};

/// Compare time, Info and Params of two datasets.
///
/// Returns `Equivalent` with one `NoDiffs` finding per category when
/// everything matches. On failure the status is the failing category's
/// code and the last finding carries the detail.
pub fn compare_attributes(a: &Dataset, b: &Dataset, config: &DiffConfig) -> MetadataComparison {
    let tol = config.tolerance;
    let mut findings = Vec::new();

    // Time
    let delta = a.time - b.time;
    if exceeds(delta.abs(), tol) {
        findings.push(finding(MetadataCategory::Time, "Time", MetadataDetail::TimeDelta(delta)));
        return done(DiffStatus::TimeMismatch, findings);
    }
    findings.push(finding(MetadataCategory::Time, "Time", MetadataDetail::NoDiffs));

    // Info
    let a_info = a.comparable_info();
    let b_info = b.comparable_info();
    if let Some(detail) = key_difference(a_info.keys().copied(), b_info.keys().copied()) {
        findings.push(finding(MetadataCategory::InfoKeys, "Info", detail));
        return done(DiffStatus::InfoKeysMismatch, findings);
    }
    let info_diffs: Vec<String> = a_info
        .iter()
        .filter(|(k, v)| b_info.get(*k).map_or(true, |w| !v.same_value(w)))
        .map(|(k, _)| k.to_string())
        .collect();
    if !info_diffs.is_empty() {
        findings.push(finding(
            MetadataCategory::InfoValues,
            "Info",
            MetadataDetail::Values(info_diffs),
        ));
        return done(DiffStatus::InfoValuesMismatch, findings);
    }
    findings.push(finding(MetadataCategory::InfoValues, "Info", MetadataDetail::NoDiffs));

    // Params
    if let Some(detail) = key_difference(
        a.params.keys().map(String::as_str),
        b.params.keys().map(String::as_str),
    ) {
        findings.push(finding(MetadataCategory::ParamsKeys, "Params", detail));
        return done(DiffStatus::ParamsKeysMismatch, findings);
    }
    let mut non_float = Vec::new();
    let mut float_deltas = Vec::new();
    for (key, va) in &a.params {
        let Some(vb) = b.params.get(key) else {
            continue;
        };
        match compare_param(va, vb, tol) {
            ParamCheck::Equal => {}
            ParamCheck::FloatDelta(d) => float_deltas.push((key.clone(), d)),
            ParamCheck::Unequal => non_float.push(key.clone()),
        }
    }
    if !non_float.is_empty() || !float_deltas.is_empty() {
        findings.push(finding(
            MetadataCategory::ParamsValues,
            "Params",
            MetadataDetail::Params {
                non_float,
                float_deltas,
            },
        ));
        return done(DiffStatus::ParamsValuesMismatch, findings);
    }
    findings.push(finding(MetadataCategory::ParamsValues, "Params", MetadataDetail::NoDiffs));

    done(DiffStatus::Equivalent, findings)
}

/// Append the topology findings to an attribute comparison that passed.
///
/// Every topology variable is evaluated; the status becomes
/// `TopologyMismatch` when any of them differs. A comparison that already
/// failed is left untouched.
pub fn compare_topology(
    comparison: &mut MetadataComparison,
    a: &Dataset,
    b: &Dataset,
    correspondence: &BlockCorrespondence,
    config: &DiffConfig,
) {
    if !comparison.status.is_equivalent() {
        return;
    }
    let before = comparison.findings.len();
    topology_findings(a, b, correspondence, config.tolerance, &mut comparison.findings);
    if comparison.findings[before..].iter().any(MetadataFinding::differs) {
        comparison.status = DiffStatus::TopologyMismatch;
    }
}

fn done(status: DiffStatus, findings: Vec<MetadataFinding>) -> MetadataComparison {
    MetadataComparison { status, findings }
}

fn finding(category: MetadataCategory, name: &str, detail: MetadataDetail) -> MetadataFinding {
    MetadataFinding {
        category,
        name: name.to_string(),
        detail,
    }
}

fn key_difference<'a>(
    a: impl Iterator<Item = &'a str>,
    b: impl Iterator<Item = &'a str>,
) -> Option<MetadataDetail> {
    let a: BTreeSet<&str> = a.collect();
    let b: BTreeSet<&str> = b.collect();
    if a == b {
        return None;
    }
    Some(MetadataDetail::Keys {
        only_in_a: a.difference(&b).map(|k| k.to_string()).collect(),
        only_in_b: b.difference(&a).map(|k| k.to_string()).collect(),
    })
}

enum ParamCheck {
    Equal,
    FloatDelta(f64),
    Unequal,
}

/// Floating params are compared within `tol`; everything else exactly.
///
/// A float on either side is enough to use the tolerance, provided the other
/// side is numeric too. The reported delta is `a - b` for scalars and the
/// largest absolute element difference for arrays.
fn compare_param(a: &AttrValue, b: &AttrValue, tol: f64) -> ParamCheck {
    if a.is_floating() || b.is_floating() {
        if let (Some(xs), Some(ys)) = (a.as_f64s(), b.as_f64s()) {
            if xs.len() != ys.len() {
                return ParamCheck::Unequal;
            }
            let scalar = matches!(a, AttrValue::Float(_) | AttrValue::Int(_));
            let worst = xs
                .iter()
                .zip(&ys)
                .map(|(x, y)| x - y)
                .fold(0.0_f64, |acc, d| {
                    if d.is_nan() || d.abs() > acc.abs() {
                        d
                    } else {
                        acc
                    }
                });
            if !exceeds(worst.abs(), tol) {
                return ParamCheck::Equal;
            }
            return ParamCheck::FloatDelta(if scalar { worst } else { worst.abs() });
        }
    }
    if a.same_value(b) {
        ParamCheck::Equal
    } else {
        ParamCheck::Unequal
    }
}

fn topology_findings(
    a: &Dataset,
    b: &Dataset,
    correspondence: &BlockCorrespondence,
    tol: f64,
    findings: &mut Vec<MetadataFinding>,
) {
    for (group, a_map, b_map) in [
        ("Locations", &a.topology.locations, &b.topology.locations),
        (
            "VolumeLocations",
            &a.topology.volume_locations,
            &b.topology.volume_locations,
        ),
    ] {
        compare_float_group(group, a_map, b_map, correspondence, tol, findings);
    }

    match (&a.topology.logical_locations, &b.topology.logical_locations) {
        (None, None) => {}
        (Some(la), Some(lb)) => {
            let lb = correspondence.reorder(lb);
            findings.push(exact_finding("LogicalLocations", *la == lb));
        }
        _ => findings.push(exact_finding("LogicalLocations", false)),
    }

    match (&a.topology.levels, &b.topology.levels) {
        (None, None) => {}
        (Some(la), Some(lb)) => {
            let lb = correspondence.reorder(lb);
            findings.push(exact_finding("Levels", *la == lb));
        }
        _ => findings.push(exact_finding("Levels", false)),
    }
}

fn compare_float_group(
    group: &str,
    a_map: &BTreeMap<String, Array2<f64>>,
    b_map: &BTreeMap<String, Array2<f64>>,
    correspondence: &BlockCorrespondence,
    tol: f64,
    findings: &mut Vec<MetadataFinding>,
) {
    let keys: BTreeSet<&String> = a_map.keys().chain(b_map.keys()).collect();
    for key in keys {
        let name = format!("{}/{}", group, key);
        let detail = match (a_map.get(key), b_map.get(key)) {
            (Some(va), Some(vb)) if va.dim() == vb.dim() => {
                let vb = correspondence.reorder(vb);
                let norm = (va - &vb).mapv(|d| d * d).sum().sqrt();
                if exceeds(norm, tol) {
                    MetadataDetail::Topology { error: Some(norm) }
                } else {
                    MetadataDetail::NoDiffs
                }
            }
            _ => MetadataDetail::Topology { error: None },
        };
        findings.push(MetadataFinding {
            category: MetadataCategory::Topology,
            name,
            detail,
        });
    }
}

fn exact_finding(name: &str, equal: bool) -> MetadataFinding {
    finding(
        MetadataCategory::Topology,
        name,
        if equal {
            MetadataDetail::NoDiffs
        } else {
            MetadataDetail::Topology { error: None }
        },
    )
}
