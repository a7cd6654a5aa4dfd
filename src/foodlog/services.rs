use time::Date;

use crate::error::Error;
use crate::foodlog::dto::FoodLogRecord;
use crate::foodlog::query::date_key;
use crate::http::{decode, ApiTransport};

/// Fetch all food logs for one local calendar day, scoped to the user.
/// A `null` body is treated as an empty day.
pub async fn fetch_day_logs(
    api: &dyn ApiTransport,
    user_id: &str,
    date: Date,
) -> Result<Vec<FoodLogRecord>, Error> {
    let key = date_key(date);
    let value = api
        .get("/foodlogs/date", &[("date", &key), ("userId", user_id)])
        .await?;
    let records: Option<Vec<FoodLogRecord>> = decode(value, "food log")?;
    Ok(records.unwrap_or_default())
}
