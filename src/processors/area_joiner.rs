use crate::models::{AreaMap, DailyRecord, MergedRecord};
use crate::utils::text::normalize_station_name;

/// Attaches the area classification to every daily record via the
/// normalized-name left join. Both sides of the join key go through
/// the same normalization; a raw name differing only in accents or
/// case still matches.
pub struct AreaJoiner;

impl AreaJoiner {
    pub fn new() -> Self {
        Self
    }

    /// Left join: the output has exactly one row per input row, with
    /// a null area where no metadata matched.
    pub fn join(&self, daily: &[DailyRecord], areas: &AreaMap) -> Vec<MergedRecord> {
        let mut unmatched = 0usize;

        let merged: Vec<MergedRecord> = daily
            .iter()
            .map(|record| {
                let key = normalize_station_name(&record.station_name);
                let area = areas.get(&key).cloned();
                if area.is_none() {
                    unmatched += 1;
                }
                MergedRecord::from_daily(record, area)
            })
            .collect();

        if unmatched > 0 {
            tracing::warn!(
                unmatched,
                total = merged.len(),
                "daily records without an area classification"
            );
        }

        merged
    }
}

impl Default for AreaJoiner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PollutantValues;
    use chrono::NaiveDate;

    fn daily(name: &str) -> DailyRecord {
        let values: PollutantValues = Default::default();
        DailyRecord {
            station_name: name.to_string(),
            latitude: Some(40.42),
            longitude: Some(-3.71),
            date: NaiveDate::from_ymd_opt(2015, 1, 7).unwrap(),
            year: 2015,
            month: 1,
            values,
            cigarettes: None,
        }
    }

    fn area_map() -> AreaMap {
        let mut areas = AreaMap::new();
        areas.insert("plaza de espana".to_string(), "UT".to_string());
        areas
    }

    #[test]
    fn test_join_matches_through_normalization() {
        let records = vec![daily("Plaza de España ")];
        let merged = AreaJoiner::new().join(&records, &area_map());

        assert_eq!(merged[0].area_type.as_deref(), Some("UT"));
    }

    #[test]
    fn test_left_join_preserves_row_count() {
        let records = vec![
            daily("Plaza de España"),
            daily("Estación Fantasma"),
            daily("Vallecas"),
        ];
        let merged = AreaJoiner::new().join(&records, &area_map());

        assert_eq!(merged.len(), records.len());
        assert_eq!(merged[0].area_type.as_deref(), Some("UT"));
        assert_eq!(merged[1].area_type, None);
        assert_eq!(merged[2].area_type, None);
    }
}
