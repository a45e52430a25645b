//! Uniformly sampled ephemeris tables.
//!
//! Text format, one block per body:
//!
//! ```text
//! # comment
//! BODY <name> START <jd> STEP <days> COUNT <n>
//! <lon_deg> <lat_deg> <distance_au>
//! ... n rows ...
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use natal_frames::normalize_deg;
use tracing::{debug, info};

use crate::analytic::AnalyticModel;
use crate::body::CelestialBody;
use crate::error::EphemerisError;
use crate::interpolate::{lagrange, lagrange_derivative, unwrap_degrees, window_start};
use crate::BodyPosition;

/// One tabulated position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub distance: f64,
}

/// Uniformly spaced samples for a single body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySeries {
    body: CelestialBody,
    start_jd: f64,
    step_days: f64,
    samples: Vec<Sample>,
}

impl BodySeries {
    pub fn new(
        body: CelestialBody,
        start_jd: f64,
        step_days: f64,
        samples: Vec<Sample>,
    ) -> Result<Self, EphemerisError> {
        if !start_jd.is_finite() {
            return Err(EphemerisError::InvalidConfig("series start must be finite"));
        }
        if !(step_days.is_finite() && step_days > 0.0) {
            return Err(EphemerisError::InvalidConfig("series step must be positive"));
        }
        if samples.len() < 2 {
            return Err(EphemerisError::InvalidConfig(
                "series needs at least two samples",
            ));
        }
        Ok(Self {
            body,
            start_jd,
            step_days,
            samples,
        })
    }

    pub fn body(&self) -> CelestialBody {
        self.body
    }

    pub fn start_jd(&self) -> f64 {
        self.start_jd
    }

    pub fn step_days(&self) -> f64 {
        self.step_days
    }

    /// JD of the last sample.
    pub fn end_jd(&self) -> f64 {
        self.start_jd + self.step_days * (self.samples.len() - 1) as f64
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Interpolate position and speeds at `jd` with an `order`-point
    /// Lagrange polynomial.
    ///
    /// Times outside `[start_jd, end_jd]` are rejected, never extrapolated.
    pub fn evaluate(&self, jd: f64, order: usize) -> Result<BodyPosition, EphemerisError> {
        let (start, end) = (self.start_jd, self.end_jd());
        if !(start..=end).contains(&jd) {
            return Err(EphemerisError::OutOfRange {
                body: self.body,
                jd,
                start,
                end,
            });
        }

        let len = self.samples.len();
        let n = order.clamp(2, len);
        let index = (((jd - start) / self.step_days).floor() as usize).min(len - 2);
        let first = window_start(index, n, len);
        let window = &self.samples[first..first + n];

        let mut lons: Vec<f64> = window.iter().map(|s| s.lon_deg).collect();
        unwrap_degrees(&mut lons);
        let lats: Vec<f64> = window.iter().map(|s| s.lat_deg).collect();
        let dists: Vec<f64> = window.iter().map(|s| s.distance).collect();

        let u = (jd - (start + first as f64 * self.step_days)) / self.step_days;
        let h = self.step_days;
        Ok(BodyPosition {
            body: self.body,
            longitude: normalize_deg(lagrange(&lons, u)),
            latitude: lagrange(&lats, u),
            distance: lagrange(&dists, u),
            speed_longitude: lagrange_derivative(&lons, u) / h,
            speed_latitude: lagrange_derivative(&lats, u) / h,
            speed_distance: lagrange_derivative(&dists, u) / h,
        })
    }
}

/// A set of body series, at most one per body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EphemerisTable {
    series: BTreeMap<CelestialBody, BodySeries>,
}

impl EphemerisTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series, replacing any earlier one for the same body.
    pub fn insert(&mut self, series: BodySeries) {
        self.series.insert(series.body, series);
    }

    pub fn get(&self, body: CelestialBody) -> Option<&BodySeries> {
        self.series.get(&body)
    }

    pub fn bodies(&self) -> impl Iterator<Item = CelestialBody> + '_ {
        self.series.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Sample the analytic model for each body from `start_jd` at
    /// `step_days` until `end_jd` is covered.
    pub fn tabulate(
        model: &AnalyticModel,
        bodies: &[CelestialBody],
        start_jd: f64,
        end_jd: f64,
        step_days: f64,
    ) -> Result<Self, EphemerisError> {
        if !(start_jd.is_finite() && end_jd.is_finite() && end_jd > start_jd) {
            return Err(EphemerisError::InvalidConfig("tabulation range is empty"));
        }
        if !(step_days.is_finite() && step_days > 0.0) {
            return Err(EphemerisError::InvalidConfig("step_days must be positive"));
        }
        let count = ((end_jd - start_jd) / step_days - 1e-9).ceil() as usize + 1;

        let mut table = Self::new();
        for &body in bodies.iter().filter(|b| model.supports(**b)) {
            let samples = (0..count)
                .map(|k| {
                    let c = model.coords(body, start_jd + k as f64 * step_days)?;
                    Ok(Sample {
                        lon_deg: c.lon_deg,
                        lat_deg: c.lat_deg,
                        distance: c.distance,
                    })
                })
                .collect::<Result<Vec<_>, EphemerisError>>()?;
            table.insert(BodySeries::new(body, start_jd, step_days, samples)?);
        }
        info!(
            bodies = table.series.len(),
            samples_per_body = count,
            start_jd,
            step_days,
            "tabulated analytic ephemeris"
        );
        Ok(table)
    }

    /// Parse the text table format.
    pub fn parse(text: &str) -> Result<Self, EphemerisError> {
        let mut table = Self::new();
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.split('#').next().unwrap_or("").trim()))
            .filter(|(_, l)| !l.is_empty());

        while let Some((line_no, header)) = lines.next() {
            let (body, start, step, count) = parse_header(line_no, header)?;
            let mut samples = Vec::new();
            for _ in 0..count {
                let (row_no, row) = lines.next().ok_or_else(|| {
                    EphemerisError::parse(line_no, format!("{body}: expected {count} rows"))
                })?;
                samples.push(parse_row(row_no, row)?);
            }
            let series = BodySeries::new(body, start, step, samples)
                .map_err(|e| EphemerisError::parse(line_no, e.to_string()))?;
            table.insert(series);
        }
        debug!(bodies = table.series.len(), "parsed ephemeris table");
        Ok(table)
    }

    /// Load a table file from disk.
    pub fn load(path: &Path) -> Result<Self, EphemerisError> {
        let text = std::fs::read_to_string(path).map_err(|e| EphemerisError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let table = Self::parse(&text)?;
        info!(path = %path.display(), bodies = table.series.len(), "loaded ephemeris table");
        Ok(table)
    }

    /// Serialize in the text table format.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "# natal ephemeris table: lon_deg lat_deg distance_au")?;
        for series in self.series.values() {
            writeln!(
                out,
                "BODY {} START {} STEP {} COUNT {}",
                series.body,
                series.start_jd,
                series.step_days,
                series.samples.len()
            )?;
            for s in &series.samples {
                writeln!(out, "{:.9} {:.9} {:.12}", s.lon_deg, s.lat_deg, s.distance)?;
            }
        }
        Ok(())
    }

    /// Write the table to a file.
    pub fn save(&self, path: &Path) -> Result<(), EphemerisError> {
        let io_err = |e: std::io::Error| EphemerisError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let file = std::fs::File::create(path).map_err(io_err)?;
        let mut out = std::io::BufWriter::new(file);
        self.write_to(&mut out).map_err(io_err)?;
        out.flush().map_err(io_err)
    }
}

fn parse_header(
    line_no: usize,
    header: &str,
) -> Result<(CelestialBody, f64, f64, usize), EphemerisError> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    let [kw_body, name, kw_start, start, kw_step, step, kw_count, count] = fields[..] else {
        return Err(EphemerisError::parse(line_no, "malformed BODY header"));
    };
    if (kw_body, kw_start, kw_step, kw_count) != ("BODY", "START", "STEP", "COUNT") {
        return Err(EphemerisError::parse(line_no, "malformed BODY header"));
    }
    let body = name
        .parse::<CelestialBody>()
        .map_err(|e| EphemerisError::parse(line_no, e.to_string()))?;
    let number = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| EphemerisError::parse(line_no, format!("not a number: {s}")))
    };
    let count = count
        .parse::<usize>()
        .map_err(|_| EphemerisError::parse(line_no, format!("bad COUNT: {count}")))?;
    Ok((body, number(start)?, number(step)?, count))
}

fn parse_row(line_no: usize, row: &str) -> Result<Sample, EphemerisError> {
    let values = row
        .split_whitespace()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| EphemerisError::parse(line_no, format!("not a number: {v}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values[..] {
        [lon_deg, lat_deg, distance] => Ok(Sample {
            lon_deg,
            lat_deg,
            distance,
        }),
        _ => Err(EphemerisError::parse(line_no, "expected 3 columns")),
    }
}
