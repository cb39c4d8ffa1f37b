use std::str::FromStr;

use log::debug;
use serde::Serialize;

use super::{StatResult, StatsError, compute_stats};
use crate::expression::NumericConstant;

/// Numbers entered into the statistics calculator, in the order they were
/// entered.
///
/// The last computed [`StatResult`] is kept until the data changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSet {
    values: Vec<f64>,
    #[serde(skip)]
    result: Option<StatResult>,
}

fn parse_token(token: &str) -> Result<f64, StatsError> {
    NumericConstant::from_str(token)
        .map(f64::from)
        .map_err(|source| StatsError::NotANumber {
            token: token.trim().to_string(),
            source,
        })
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The statistics from the last [`calculate`](Self::calculate), unless
    /// the data changed since.
    pub fn result(&self) -> Option<&StatResult> {
        self.result.as_ref()
    }

    /// Parses and appends a single number.
    pub fn add_one(&mut self, text: &str) -> Result<f64, StatsError> {
        let value = parse_token(text)?;
        self.values.push(value);
        self.result = None;
        Ok(value)
    }

    /// Appends every number in `text`, separated by commas and/or
    /// whitespace.
    ///
    /// Nothing is added unless every token parses.
    ///
    /// ```rust
    /// use loancalc::stats::DataSet;
    ///
    /// let mut data = DataSet::new();
    /// assert_eq!(data.add_many("1, 2 3,,4").unwrap(), 4);
    /// assert!(data.add_many("5, five, 6").is_err());
    /// assert_eq!(data.values(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn add_many(&mut self, text: &str) -> Result<usize, StatsError> {
        let parsed = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(parse_token)
            .collect::<Result<Vec<f64>, StatsError>>()?;

        if parsed.is_empty() {
            return Err(StatsError::NoValues);
        }

        debug!("Adding {} values to a data set of {}", parsed.len(), self.len());
        self.values.extend_from_slice(&parsed);
        self.result = None;
        Ok(parsed.len())
    }

    /// Removes the value at `index` (in entry order) and returns it.
    pub fn remove(&mut self, index: usize) -> Result<f64, StatsError> {
        if index >= self.values.len() {
            return Err(StatsError::IndexOutOfRange {
                index,
                len: self.values.len(),
            });
        }
        self.result = None;
        Ok(self.values.remove(index))
    }

    /// Removes every value and any computed result.
    pub fn clear(&mut self) {
        self.values.clear();
        self.result = None;
    }

    /// Recomputes the statistics of the current values.
    pub fn calculate(&mut self) -> Result<&StatResult, StatsError> {
        let result = compute_stats(&self.values)?;
        Ok(self.result.insert(result))
    }
}

impl FromIterator<f64> for DataSet {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
            result: None,
        }
    }
}
