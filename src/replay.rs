use std::fs;
use std::path::Path;

use itertools::Itertools;
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::adc::AdcSource;
use crate::config::SensorConfig;
use crate::converter::{Concentration, GasConcentrationConverter, Report};
use crate::error::ConversionError;
use crate::gas::{Channel, Units};
use crate::math::widen;
use crate::Result;

/// One logged read of all three lanes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "nh3")]
    pub ammonia: u16,
    #[serde(rename = "co")]
    pub carbon_monoxide: u16,
    #[serde(rename = "no2")]
    pub nitrogen_dioxide: u16,
}

/// Serves logged samples in place of a live converter.
///
/// Every read returns the sample for the current frame; [`RecordedAdc::advance`] moves on to the
/// next one. Reads past the final frame return `0`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordedAdc {
    frames: Vec<Frame>,
    cursor: usize,
}

impl RecordedAdc {
    pub const fn new(frames: Vec<Frame>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Load frames from a CSV file with an `nh3,co,no2` header
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable, or a row does not hold three
    /// samples in range for `u16`.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err("requested recording not found".into());
        }

        let file = fs::read(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(&file[..]);

        let mut frames = vec![];
        for result in rdr.deserialize() {
            let frame: Frame = result?;
            frames.push(frame);
        }
        log::info!("read {} frames from {}", frames.len(), path.display());

        Ok(Self::new(frames))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frames.get(self.cursor)
    }

    /// Move to the next frame, returning `false` once the recording is exhausted
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.frames.len() {
            self.cursor += 1;
        }
        self.cursor < self.frames.len()
    }
}

impl AdcSource for RecordedAdc {
    fn read(&mut self, channel: Channel) -> u16 {
        let Some(frame) = self.current() else {
            log::warn!("{channel} read past the end of the recording");
            return 0;
        };
        match channel {
            Channel::Ammonia => frame.ammonia,
            Channel::CarbonMonoxide => frame.carbon_monoxide,
            Channel::NitrogenDioxide => frame.nitrogen_dioxide,
        }
    }
}

/// Convert every frame of a recording.
///
/// Each frame yields one [`Report`], computed from a single read of the three lanes.
///
/// # Errors
/// Returns an error if the recording cannot be loaded.
pub fn convert_recording<E: Float>(
    path: &Path,
    config: &SensorConfig,
    units: Units,
) -> Result<Vec<Report<E>>> {
    let adc = RecordedAdc::from_file(path)?;
    let num_frames = adc.len();
    let mut converter: GasConcentrationConverter<RecordedAdc, E> =
        GasConcentrationConverter::new(adc, *config);

    let reports = (0..num_frames)
        .map(|_| {
            let report = converter.read_all(units);
            converter.adc_mut().advance();
            report
        })
        .collect_vec();

    let failures = reports
        .iter()
        .flat_map(Report::iter)
        .filter(|(_, outcome)| outcome.is_err())
        .count();
    log::info!("converted {num_frames} frames, {failures} readings rejected");

    Ok(reports)
}

#[derive(Serialize)]
struct Row {
    frame: usize,
    gas: &'static str,
    value: Option<f64>,
    unit: Option<&'static str>,
    status: &'static str,
}

fn status<E>(outcome: &std::result::Result<Concentration<E>, ConversionError>) -> &'static str {
    match outcome {
        Ok(_) => "ok",
        Err(ConversionError::OutOfRange { .. }) => "out_of_range",
        Err(ConversionError::Invalid { .. }) => "invalid",
        Err(ConversionError::DivideByZero { .. }) => "divide_by_zero",
        Err(ConversionError::UnknownIdentifier { .. }) => "unknown_identifier",
        Err(ConversionError::SampleOutOfRange { .. }) => "sample_out_of_range",
    }
}

/// Write reports as CSV with a `frame,gas,value,unit,status` header, one row per gas per frame.
///
/// Rejected readings leave `value` and `unit` empty.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_reports<E: Float>(path: &Path, reports: &[Report<E>]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for (frame, report) in reports.iter().enumerate() {
        for (gas, outcome) in report.iter() {
            let row = Row {
                frame,
                gas: gas.formula(),
                value: outcome.as_ref().ok().map(|c| widen(c.value)),
                unit: outcome.as_ref().ok().map(|c| c.unit.symbol()),
                status: status(outcome),
            };
            wtr.serialize(&row)?;
        }
    }
    wtr.flush()?;
    Ok(())
}
