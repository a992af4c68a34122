use crate::frames::error::FrameError;
use chrono::NaiveDateTime;
use polars::prelude::*;

pub const COL_OFS: &str = "ofs";
pub const COL_COOPS: &str = "coops";
pub const COL_DIFFERENCE: &str = "difference";

pub trait TideFrameFilterExt {
    /// Keeps rows whose `time_column` lies within `[start, end]` (inclusive).
    ///
    /// # Returns
    /// A new `LazyFrame` with the filter applied. A missing or non-temporal column only
    /// surfaces as an error when the frame is collected.
    fn filter_time_range(
        self,
        time_column: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> LazyFrame;
}

impl TideFrameFilterExt for LazyFrame {
    fn filter_time_range(
        self,
        time_column: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> LazyFrame {
        self.filter(
            col(time_column)
                .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                .gt_eq(lit(start))
                .and(
                    col(time_column)
                        .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                        .lt_eq(lit(end)),
                ),
        )
    }
}

fn require_column(df: &DataFrame, column: &str) -> Result<(), FrameError> {
    df.column(column).map_err(|e| FrameError::MissingColumn {
        column: column.to_string(),
        source: e,
    })?;
    Ok(())
}

/// Puts the model and observed series of one station side by side.
///
/// Both frames must carry `time_column` and a column named after the station. Only instants
/// present in both are kept. The result has the columns `time_column`, `ofs`, `coops` and
/// `difference` (`ofs - coops`), sorted by time.
pub fn comparison_frame(
    model: &DataFrame,
    observed: &DataFrame,
    station_id: &str,
    time_column: &str,
) -> Result<DataFrame, FrameError> {
    for df in [model, observed] {
        require_column(df, time_column)?;
        require_column(df, station_id)?;
    }

    let ofs = model
        .clone()
        .lazy()
        .select([col(time_column), col(station_id).alias(COL_OFS)]);
    let coops = observed
        .clone()
        .lazy()
        .select([col(time_column), col(station_id).alias(COL_COOPS)]);

    let joined = ofs
        .join(
            coops,
            [col(time_column)],
            [col(time_column)],
            JoinArgs::new(JoinType::Inner),
        )
        .with_column((col(COL_OFS) - col(COL_COOPS)).alias(COL_DIFFERENCE))
        .sort([time_column], SortMultipleOptions::default())
        .collect()?;
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 7, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn model() -> DataFrame {
        df!(
            "datetime" => [at(0, 0), at(0, 6), at(0, 12), at(0, 18)],
            "8575512" => [0.30, 0.35, 0.40, 0.45],
            "8638610" => [0.9, 0.8, 0.7, 0.6],
        )
        .unwrap()
    }

    fn observed() -> DataFrame {
        df!(
            "datetime" => [at(0, 18), at(0, 6), at(0, 12), at(0, 24)],
            "8575512" => [0.40, 0.30, 0.42, 0.5],
        )
        .unwrap()
    }

    #[test]
    fn joins_on_shared_instants() {
        let df = comparison_frame(&model(), &observed(), "8575512", "datetime").unwrap();

        let names: Vec<&str> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["datetime", COL_OFS, COL_COOPS, COL_DIFFERENCE]);
        assert_eq!(df.height(), 3);

        let ofs: Vec<Option<f64>> = df
            .column(COL_OFS)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ofs, vec![Some(0.35), Some(0.40), Some(0.45)]);

        let diff: Vec<f64> = df
            .column(COL_DIFFERENCE)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        let expected = [0.05, -0.02, 0.05];
        for (d, e) in diff.iter().zip(expected) {
            assert!((d - e).abs() < 1e-12, "{d} vs {e}");
        }
    }

    #[test]
    fn station_must_exist_on_both_sides() {
        let err = comparison_frame(&model(), &observed(), "8638610", "datetime").unwrap_err();
        assert!(matches!(err, FrameError::MissingColumn { column, .. } if column == "8638610"));
    }

    #[test]
    fn filters_inclusive_time_window() {
        let df = model()
            .lazy()
            .filter_time_range("datetime", at(0, 6), at(0, 12))
            .collect()
            .unwrap();
        assert_eq!(df.height(), 2);
        let levels = df.column("8575512").unwrap().f64().unwrap();
        assert_eq!(levels.get(0), Some(0.35));
        assert_eq!(levels.get(1), Some(0.40));
    }
}
