//! Built-in sample dataset shown when the viewer starts.

use super::dataset::{Dataset, DatasetError};
use chrono::NaiveDate;

pub const SAMPLE_INDEX: &str = "date";

/// Ten daily observations starting 2022-01-01 with two value columns.
pub fn sample_dataset() -> Result<Dataset, DatasetError> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).ok_or(DatasetError::InvalidDate)?;
    let dates: Vec<NaiveDate> = start.iter_days().take(10).collect();

    Dataset::from_dates(
        SAMPLE_INDEX,
        &dates,
        vec![
            (
                "colonne_1".to_string(),
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            ),
            (
                "colonne_2".to_string(),
                vec![5.0, 4.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            ),
        ],
    )
}
