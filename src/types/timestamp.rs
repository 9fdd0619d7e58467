// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// A UTC instant with millisecond precision. Serialized as milliseconds since
/// the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_millis(ms: i64) -> Fallible<Self> {
        DateTime::from_timestamp_millis(ms)
            .map(Self)
            .ok_or_else(|| ErrorReport::new(format!("timestamp out of range: {ms}")))
    }

    pub fn as_millis(self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The instant `days` whole days after this one, saturating at the latest
    /// representable instant.
    pub fn plus_days(self, days: u32) -> Self {
        match self.0.checked_add_signed(Duration::days(i64::from(days))) {
            Some(ts) => Self(ts),
            None => Self(DateTime::<Utc>::MAX_UTC),
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let str = self.0.to_rfc3339();
        Ok(ToSqlOutput::from(str))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.as_millis())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Older records were written by a JavaScript client, which may emit
        // whole-number floats.
        let ms = f64::deserialize(deserializer)?;
        Timestamp::from_millis(ms as i64).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_days() -> Fallible<()> {
        let ts = Timestamp::from_millis(1_000)?;
        assert_eq!(ts.plus_days(1).as_millis(), 1_000 + 86_400_000);
        assert_eq!(ts.plus_days(0), ts);
        Ok(())
    }

    #[test]
    fn test_plus_days_saturates() -> Fallible<()> {
        let ts = Timestamp::from_millis(1_000)?;
        let far = ts.plus_days(u32::MAX);
        assert_eq!(far, Timestamp::new(DateTime::<Utc>::MAX_UTC));
        assert_eq!(far.plus_days(1), far);
        Ok(())
    }

    #[test]
    fn test_serde_millis() -> Fallible<()> {
        let ts = Timestamp::from_millis(1_700_000_000_123)?;
        let json = serde_json::to_string(&ts)?;
        assert_eq!(json, "1700000000123");
        let back: Timestamp = serde_json::from_str("1700000000123.0")?;
        assert_eq!(back, ts);
        Ok(())
    }
}
