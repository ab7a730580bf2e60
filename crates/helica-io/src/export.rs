//! Export of helical axis sets.
//!
//! A set is written as four tables named after it: `<name>_n.txt` and
//! `<name>_r0.txt` with three columns, `<name>_l.txt` and `<name>_phi.txt`
//! with one. Only valid samples are written.

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use helica_fha::{HelicalAxisSample, HelicalAxisSet};
use serde::{Deserialize, Serialize};

use crate::error::IoError;
use crate::table::write_table;

/// Inclusive bounds on the rates of exported samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBounds {
    /// Lower bound of `phi`.
    pub phi_min: f64,
    /// Upper bound of `phi`.
    pub phi_max: f64,
    /// Lower bound of `l`.
    pub l_min: f64,
    /// Upper bound of `l`.
    pub l_max: f64,
}

impl RateBounds {
    /// Whether `sample` lies within the bounds.
    pub fn contains(&self, sample: &HelicalAxisSample) -> bool {
        (self.phi_min..=self.phi_max).contains(&sample.phi)
            && (self.l_min..=self.l_max).contains(&sample.l)
    }
}

/// Which samples of a set get exported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportFilter {
    /// Sample index range, usually the visible time window.
    pub index_range: Option<Range<usize>>,
    /// Rate bounds.
    pub bounds: Option<RateBounds>,
}

impl ExportFilter {
    /// The samples of `samples` that pass the filter, in order.
    pub fn apply<'a>(&self, samples: &'a [HelicalAxisSample]) -> Vec<&'a HelicalAxisSample> {
        let window = match &self.index_range {
            Some(range) => {
                let end = range.end.min(samples.len());
                let start = range.start.min(end);
                &samples[start..end]
            }
            None => samples,
        };

        window
            .iter()
            .filter(|s| s.is_valid())
            .filter(|s| self.bounds.map_or(true, |b| b.contains(s)))
            .collect()
    }
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// The written tables.
    pub files: Vec<PathBuf>,
    /// Rows per table.
    pub rows: usize,
}

/// Paths of the four tables of the set `name` in `folder`: n, r0, l, phi.
pub fn export_file_paths(folder: impl AsRef<Path>, name: &str) -> [PathBuf; 4] {
    let folder = folder.as_ref();
    ["n", "r0", "l", "phi"].map(|table| folder.join(format!("{name}_{table}.txt")))
}

/// Write the filtered samples of `set` into `folder`, creating it if needed.
pub fn export_axis_set(
    set: &HelicalAxisSet,
    folder: impl AsRef<Path>,
    filter: &ExportFilter,
) -> Result<ExportSummary, IoError> {
    let folder = folder.as_ref();
    std::fs::create_dir_all(folder)?;

    let samples = filter.apply(set.samples());
    let n = samples.iter().map(|s| s.n.to_array()).collect::<Vec<_>>();
    let r0 = samples.iter().map(|s| s.r0.to_array()).collect::<Vec<_>>();
    let l = samples.iter().map(|s| [s.l]).collect::<Vec<_>>();
    let phi = samples.iter().map(|s| [s.phi]).collect::<Vec<_>>();

    let [n_path, r0_path, l_path, phi_path] = export_file_paths(folder, &set.name);
    write_table(&n_path, None, n.iter().map(|r| r.as_slice()))?;
    write_table(&r0_path, None, r0.iter().map(|r| r.as_slice()))?;
    write_table(&l_path, None, l.iter().map(|r| r.as_slice()))?;
    write_table(&phi_path, None, phi.iter().map(|r| r.as_slice()))?;

    log::info!(
        "exported {} of {} samples of {} to {}",
        samples.len(),
        set.len(),
        set.name,
        folder.display()
    );

    Ok(ExportSummary {
        files: vec![n_path, r0_path, l_path, phi_path],
        rows: samples.len(),
    })
}

/// Export every visible set of `sets`.
pub fn export_visible<'a, I>(
    sets: I,
    folder: impl AsRef<Path>,
    filter: &ExportFilter,
) -> Result<Vec<ExportSummary>, IoError>
where
    I: IntoIterator<Item = &'a HelicalAxisSet>,
{
    let folder = folder.as_ref();
    sets.into_iter()
        .filter(|set| set.visible)
        .map(|set| export_axis_set(set, folder, filter))
        .collect()
}
