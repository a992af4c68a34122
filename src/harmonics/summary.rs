//! Cross-station tables comparing harmonic analyses of model (OFS) and observed (CO-OPS)
//! series.

use crate::harmonics::error::HarmonicsError;
use crate::harmonics::report::{ConstituentFit, HarmonicReport};
use log::{info, warn};
use polars::prelude::*;
use std::collections::BTreeMap;

pub const COL_STATION: &str = "station";

/// Harmonic reports for the stations analysed on both the model and the observed side.
#[derive(Debug, Clone)]
pub struct HarmonicSummary {
    stations: BTreeMap<String, (HarmonicReport, HarmonicReport)>,
}

impl HarmonicSummary {
    /// Pairs reports by station id. Stations with only one side are left out.
    pub fn new(
        mut model: BTreeMap<String, HarmonicReport>,
        observed: BTreeMap<String, HarmonicReport>,
    ) -> Self {
        let mut stations = BTreeMap::new();
        for (station, observed_report) in observed {
            match model.remove(&station) {
                Some(model_report) => {
                    stations.insert(station, (model_report, observed_report));
                }
                None => warn!("Station {} has no model harmonic report, skipping", station),
            }
        }
        for station in model.keys() {
            warn!("Station {} has no observed harmonic report, skipping", station);
        }
        info!("{} stations with paired harmonic reports", stations.len());
        Self { stations }
    }

    /// Station ids in ascending order.
    pub fn stations(&self) -> impl Iterator<Item = &str> + '_ {
        self.stations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, station: &str) -> Option<(&HarmonicReport, &HarmonicReport)> {
        self.stations.get(station).map(|(m, o)| (m, o))
    }

    /// Recovered variance per station: columns `station`, `ofs`, `coops` (percent).
    pub fn percent_frame(&self) -> Result<DataFrame, HarmonicsError> {
        let stations: Vec<&str> = self.stations().collect();
        let ofs: Vec<Option<f64>> = self.stations.values().map(|(m, _)| m.percent).collect();
        let coops: Vec<Option<f64>> = self.stations.values().map(|(_, o)| o.percent).collect();
        Ok(DataFrame::new(vec![
            Column::new(COL_STATION.into(), stations),
            Column::new("ofs".into(), ofs),
            Column::new("coops".into(), coops),
        ])?)
    }

    /// Amplitudes and phases of one constituent across all stations.
    ///
    /// Columns: `station`, `{ofs,coops}_amps`, `{ofs,coops}_amp_errs`, `{ofs,coops}_phases`,
    /// `{ofs,coops}_phase_errs` and `amp_ratio` (model over observed amplitude). Stations whose
    /// report lacks the constituent get nulls.
    pub fn constituent_frame(&self, constituent: &str) -> Result<DataFrame, HarmonicsError> {
        let fits: Vec<(Option<&ConstituentFit>, Option<&ConstituentFit>)> = self
            .stations
            .values()
            .map(|(m, o)| (m.get(constituent), o.get(constituent)))
            .collect();
        let model = |f: fn(&ConstituentFit) -> f64| -> Vec<Option<f64>> {
            fits.iter().map(|(m, _)| m.map(f)).collect()
        };
        let observed = |f: fn(&ConstituentFit) -> f64| -> Vec<Option<f64>> {
            fits.iter().map(|(_, o)| o.map(f)).collect()
        };
        let ratio: Vec<Option<f64>> = fits
            .iter()
            .map(|(m, o)| match (m, o) {
                (Some(m), Some(o)) if o.amplitude != 0.0 => Some(m.amplitude / o.amplitude),
                _ => None,
            })
            .collect();

        let stations: Vec<&str> = self.stations().collect();
        Ok(DataFrame::new(vec![
            Column::new(COL_STATION.into(), stations),
            Column::new("ofs_amps".into(), model(|c| c.amplitude)),
            Column::new("ofs_amp_errs".into(), model(|c| c.amplitude_error)),
            Column::new("coops_amps".into(), observed(|c| c.amplitude)),
            Column::new("coops_amp_errs".into(), observed(|c| c.amplitude_error)),
            Column::new("ofs_phases".into(), model(|c| c.phase)),
            Column::new("ofs_phase_errs".into(), model(|c| c.phase_error)),
            Column::new("coops_phases".into(), observed(|c| c.phase)),
            Column::new("coops_phase_errs".into(), observed(|c| c.phase_error)),
            Column::new("amp_ratio".into(), ratio),
        ])?)
    }

    /// One [`HarmonicSummary::constituent_frame`] per requested constituent, keyed by name.
    pub fn constituent_frames<S: AsRef<str>>(
        &self,
        constituents: &[S],
    ) -> Result<BTreeMap<String, DataFrame>, HarmonicsError> {
        constituents
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Ok((name.to_string(), self.constituent_frame(name)?))
            })
            .collect()
    }
}
