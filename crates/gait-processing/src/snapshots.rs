//! Channel values at gait events

use crate::cycles::CategorizedCycles;
use crate::intervals::CategoryId;
use gait_core::{ChannelKind, LegSide, TrialRecording};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All channels of one leg sampled at a single index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSnapshot {
    pub index: usize,
    pub time: f64,
    pub gyro: f64,
    pub acc: f64,
    pub emg_bf: f64,
    pub emg_st: f64,
}

impl SampleSnapshot {
    /// Sample every channel of `side` at `index`; `None` past the end of the trial
    pub fn at(trial: &TrialRecording, side: LegSide, index: usize) -> Option<Self> {
        let leg = trial.leg(side);
        Some(Self {
            index,
            time: *trial.time().get(index)?,
            gyro: *leg.channel(ChannelKind::Gyro).get(index)?,
            acc: *leg.channel(ChannelKind::Acc).get(index)?,
            emg_bf: *leg.channel(ChannelKind::EmgBf).get(index)?,
            emg_st: *leg.channel(ChannelKind::EmgSt).get(index)?,
        })
    }
}

/// Snapshot at every detected valley, in order (peak number = position + 1)
pub fn peak_snapshots(
    trial: &TrialRecording,
    side: LegSide,
    peaks: &[usize],
) -> Vec<SampleSnapshot> {
    peaks.iter().filter_map(|&p| SampleSnapshot::at(trial, side, p)).collect()
}

/// Snapshot at every selected valley, grouped by category
pub fn interval_snapshots(
    trial: &TrialRecording,
    side: LegSide,
    selected: &CategorizedCycles,
) -> BTreeMap<CategoryId, Vec<SampleSnapshot>> {
    selected
        .iter()
        .map(|(&category, peaks)| (category, peak_snapshots(trial, side, peaks)))
        .collect()
}
