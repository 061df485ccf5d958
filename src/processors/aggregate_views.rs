use std::collections::HashMap;

use crate::error::{PipelineError, Result};
use crate::models::pollutant::{PollutantValues, POLLUTANT_COUNT};
use crate::models::{AreaYearCigarettes, AreaYearMean, DailyRecord, MergedRecord, MonthlyMean, YearlyMean};

#[derive(Default, Clone)]
struct MeanAccumulator {
    sums: [f64; POLLUTANT_COUNT],
    counts: [usize; POLLUTANT_COUNT],
}

impl MeanAccumulator {
    fn add(&mut self, values: &PollutantValues) {
        for (i, value) in values.iter().enumerate() {
            if let Some(v) = value {
                self.sums[i] += v;
                self.counts[i] += 1;
            }
        }
    }

    fn means(&self) -> PollutantValues {
        let mut means: PollutantValues = Default::default();
        for i in 0..POLLUTANT_COUNT {
            if self.counts[i] > 0 {
                means[i] = Some(self.sums[i] / self.counts[i] as f64);
            }
        }
        means
    }
}

/// Mean cigarette equivalent per (area type, year). Rows with no area
/// never enter a group; groups whose mean is missing or exactly zero
/// are excluded (zero means "insufficient data" in this view).
pub fn cigarette_view(records: &[MergedRecord]) -> Vec<AreaYearCigarettes> {
    let mut groups: HashMap<(String, i32), (f64, usize)> = HashMap::new();

    for record in records {
        let Some(area) = &record.area_type else {
            continue;
        };
        if let Some(cigarettes) = record.cigarettes {
            let entry = groups.entry((area.clone(), record.year)).or_insert((0.0, 0));
            entry.0 += cigarettes;
            entry.1 += 1;
        }
    }

    let mut view: Vec<AreaYearCigarettes> = groups
        .into_iter()
        .filter_map(|((area_type, year), (sum, count))| {
            if count == 0 {
                return None;
            }
            let mean = sum / count as f64;
            if mean == 0.0 {
                return None;
            }
            Some(AreaYearCigarettes {
                area_type,
                year,
                cigarettes: mean,
            })
        })
        .collect();

    view.sort_by(|a, b| a.area_type.cmp(&b.area_type).then(a.year.cmp(&b.year)));
    view
}

/// Per-pollutant mean per (year, month). The forecaster trains on
/// this view.
pub fn monthly_means(records: &[DailyRecord]) -> Vec<MonthlyMean> {
    let mut groups: HashMap<(i32, u32), MeanAccumulator> = HashMap::new();

    for record in records {
        groups
            .entry((record.year, record.month))
            .or_default()
            .add(&record.values);
    }

    let mut view: Vec<MonthlyMean> = groups
        .into_iter()
        .map(|((year, month), acc)| MonthlyMean {
            year,
            month,
            values: acc.means(),
        })
        .collect();

    view.sort_by_key(|m| (m.year, m.month));
    view
}

/// Per-pollutant mean per year, plus each value as a percentage of
/// the baseline year (100 = baseline level). The baseline year being
/// absent from the data is a configuration error, not a silent NaN.
pub fn yearly_means(records: &[DailyRecord], baseline_year: i32) -> Result<Vec<YearlyMean>> {
    let mut groups: HashMap<i32, MeanAccumulator> = HashMap::new();

    for record in records {
        groups.entry(record.year).or_default().add(&record.values);
    }

    let baseline = groups
        .get(&baseline_year)
        .map(MeanAccumulator::means)
        .ok_or(PipelineError::MissingBaseline {
            year: baseline_year,
        })?;

    let mut view: Vec<YearlyMean> = groups
        .into_iter()
        .map(|(year, acc)| {
            let values = acc.means();
            let mut percentages: PollutantValues = Default::default();
            for i in 0..POLLUTANT_COUNT {
                percentages[i] = match (values[i], baseline[i]) {
                    (Some(value), Some(base)) if base != 0.0 => Some(value / base * 100.0),
                    _ => None,
                };
            }
            YearlyMean {
                year,
                values,
                percentages,
            }
        })
        .collect();

    view.sort_by_key(|y| y.year);
    Ok(view)
}

/// Per-pollutant mean per (area type, year), for area comparisons.
pub fn area_year_means(records: &[MergedRecord]) -> Vec<AreaYearMean> {
    let mut groups: HashMap<(String, i32), MeanAccumulator> = HashMap::new();

    for record in records {
        let Some(area) = &record.area_type else {
            continue;
        };
        groups
            .entry((area.clone(), record.year))
            .or_default()
            .add(&record.values);
    }

    let mut view: Vec<AreaYearMean> = groups
        .into_iter()
        .map(|((area_type, year), acc)| AreaYearMean {
            area_type,
            year,
            values: acc.means(),
        })
        .collect();

    view.sort_by(|a, b| a.area_type.cmp(&b.area_type).then(a.year.cmp(&b.year)));
    view
}
