use crate::{
    configuration::SECONDS_PER_DAY,
    products::expected::{Classification, ExpiryState},
};
use chrono::{DateTime, Utc};


/// Classify certificate expiration relative to given moment.
///
/// Days remaining are the signed second difference divided by a day,
/// truncated toward zero: 12 hours left is 0 days (Expired), 12 hours past
/// expiry is 0 days as well.
pub fn classify(expiration: &DateTime<Utc>, now: &DateTime<Utc>) -> Classification {
    let days_remaining = (*expiration - *now).num_seconds() / SECONDS_PER_DAY;
    Classification {
        state: ExpiryState::from_days(days_remaining),
        days_remaining,
    }
}
