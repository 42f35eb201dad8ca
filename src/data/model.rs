use std::collections::BTreeMap;
use std::fmt;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Column contract
// ---------------------------------------------------------------------------

/// Elapsed test time in seconds.
pub const TEST_TIME: &str = "Test_Time";
/// Charge/discharge cycle number.
pub const CYCLE_INDEX: &str = "Cycle_Index";

// ---------------------------------------------------------------------------
// RawChannel – per-sample signals plotted against time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RawChannel {
    #[default]
    Current,
    Voltage,
    Temperature,
    DvDt,
}

impl RawChannel {
    pub const ALL: [RawChannel; 4] = [
        RawChannel::Current,
        RawChannel::Voltage,
        RawChannel::Temperature,
        RawChannel::DvDt,
    ];

    /// Column name in the data files.
    pub fn column(self) -> &'static str {
        match self {
            RawChannel::Current => "Current",
            RawChannel::Voltage => "Voltage",
            RawChannel::Temperature => "Temperature",
            RawChannel::DvDt => "dV/dt",
        }
    }

    /// Y axis label for the raw chart.
    pub fn axis_label(self) -> &'static str {
        match self {
            RawChannel::Current => "Current (A)",
            RawChannel::Voltage => "Voltage (V)",
            RawChannel::Temperature => "Temperature (C)",
            RawChannel::DvDt => "dV/dt (V/s)",
        }
    }
}

impl fmt::Display for RawChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// CumulativeChannel – running totals plotted against cycle number
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CumulativeChannel {
    #[default]
    ChargeCapacity,
    DischargeCapacity,
    ChargeEnergy,
    DischargeEnergy,
}

impl CumulativeChannel {
    pub const ALL: [CumulativeChannel; 4] = [
        CumulativeChannel::ChargeCapacity,
        CumulativeChannel::DischargeCapacity,
        CumulativeChannel::ChargeEnergy,
        CumulativeChannel::DischargeEnergy,
    ];

    pub fn column(self) -> &'static str {
        match self {
            CumulativeChannel::ChargeCapacity => "Charge_Capacity",
            CumulativeChannel::DischargeCapacity => "Discharge_Capacity",
            CumulativeChannel::ChargeEnergy => "Charge_Energy",
            CumulativeChannel::DischargeEnergy => "Discharge_Energy",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            CumulativeChannel::ChargeCapacity | CumulativeChannel::DischargeCapacity => "Ah",
            CumulativeChannel::ChargeEnergy | CumulativeChannel::DischargeEnergy => "Wh",
        }
    }

    /// Y axis label for the cycle chart, e.g. `Charge_Capacity (Ah)`.
    pub fn axis_label(self) -> String {
        format!("{} ({})", self.column(), self.unit())
    }
}

impl fmt::Display for CumulativeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// CyclerTable – one loaded data file, column-oriented
// ---------------------------------------------------------------------------

/// Numeric columns of a single data file. Every column has `len` values;
/// empty cells are stored as NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CyclerTable {
    /// File name used in error messages.
    pub name: String,
    columns: BTreeMap<String, Vec<f64>>,
    len: usize,
}

impl CyclerTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: BTreeMap::new(),
            len: 0,
        }
    }

    /// Add a column. All columns of a table must have the same length.
    pub fn insert_column(&mut self, column: impl Into<String>, values: Vec<f64>) {
        if self.columns.is_empty() {
            self.len = values.len();
        }
        debug_assert_eq!(self.len, values.len(), "column length mismatch");
        self.columns.insert(column.into(), values);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Look up a column by name.
    pub fn column(&self, column: &str) -> Result<&[f64], DataError> {
        self.columns
            .get(column)
            .map(Vec::as_slice)
            .ok_or_else(|| DataError::MissingColumn {
                file: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Largest cycle index in the file, `None` when the column holds no values.
    pub fn max_cycle(&self) -> Result<Option<i64>, DataError> {
        Ok(self
            .column(CYCLE_INDEX)?
            .iter()
            .filter(|v| !v.is_nan())
            .map(|&v| v as i64)
            .max())
    }

    /// One record per cycle, in ascending cycle order, holding the last
    /// non-NaN value of `column` within that cycle (NaN if the cycle has
    /// none). Rows with a NaN cycle index belong to no cycle.
    ///
    /// Cycle indices are truncated toward zero, so `1.5` counts as cycle 1.
    pub fn cycle_records(&self, column: &str) -> Result<Vec<CycleRecord>, DataError> {
        let cycles = self.column(CYCLE_INDEX)?;
        let values = self.column(column)?;

        let mut last_value: BTreeMap<i64, f64> = BTreeMap::new();
        for (&cycle, &value) in cycles.iter().zip(values) {
            if cycle.is_nan() {
                continue;
            }
            let slot = last_value.entry(cycle as i64).or_insert(f64::NAN);
            if !value.is_nan() {
                *slot = value;
            }
        }
        Ok(last_value
            .into_iter()
            .map(|(cycle_index, value)| CycleRecord { cycle_index, value })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// CycleRecord – summary row of one cycle
// ---------------------------------------------------------------------------

/// Summary of one cycle: the last value observed for a cumulative channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleRecord {
    pub cycle_index: i64,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cycles: Vec<f64>) -> CyclerTable {
        let mut t = CyclerTable::new("cell.csv");
        t.insert_column(CYCLE_INDEX, cycles);
        t
    }

    #[test]
    fn cumulative_axis_labels_carry_units() {
        assert_eq!(
            CumulativeChannel::ChargeCapacity.axis_label(),
            "Charge_Capacity (Ah)"
        );
        assert_eq!(
            CumulativeChannel::DischargeEnergy.axis_label(),
            "Discharge_Energy (Wh)"
        );
        assert_eq!(RawChannel::Temperature.axis_label(), "Temperature (C)");
        assert_eq!(RawChannel::DvDt.column(), "dV/dt");
    }

    #[test]
    fn cycle_records_keep_last_value_per_cycle_in_ascending_order() {
        let mut t = table(vec![2.0, 1.0, 1.0, 2.0, f64::NAN, 3.0]);
        t.insert_column("Charge_Capacity", vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let records = t.cycle_records("Charge_Capacity").unwrap();
        assert_eq!(
            records,
            vec![
                CycleRecord { cycle_index: 1, value: 0.3 },
                CycleRecord { cycle_index: 2, value: 0.4 },
                CycleRecord { cycle_index: 3, value: 0.6 },
            ]
        );
    }

    #[test]
    fn cycle_records_skip_missing_values_within_a_cycle() {
        let mut t = table(vec![1.0, 1.0, 2.0, 2.0, 3.0]);
        t.insert_column("Charge_Capacity", vec![0.1, f64::NAN, f64::NAN, f64::NAN, 0.4]);
        let records = t.cycle_records("Charge_Capacity").unwrap();

        assert_eq!(records[0], CycleRecord { cycle_index: 1, value: 0.1 });
        assert_eq!(records[1].cycle_index, 2);
        assert!(records[1].value.is_nan());
        assert_eq!(records[2], CycleRecord { cycle_index: 3, value: 0.4 });
    }

    #[test]
    fn fractional_cycle_indices_truncate_toward_zero() {
        let mut t = table(vec![1.0, 1.5, 2.0]);
        t.insert_column("Charge_Capacity", vec![0.1, 0.2, 0.3]);
        let records = t.cycle_records("Charge_Capacity").unwrap();
        assert_eq!(
            records,
            vec![
                CycleRecord { cycle_index: 1, value: 0.2 },
                CycleRecord { cycle_index: 2, value: 0.3 },
            ]
        );
        assert_eq!(table(vec![1.0, 2.9]).max_cycle().unwrap(), Some(2));
    }

    #[test]
    fn max_cycle_ignores_nan_and_handles_empty() {
        assert_eq!(table(vec![1.0, f64::NAN, 7.0, 3.0]).max_cycle().unwrap(), Some(7));
        assert_eq!(table(vec![f64::NAN]).max_cycle().unwrap(), None);
        assert_eq!(table(Vec::new()).max_cycle().unwrap(), None);
    }

    #[test]
    fn missing_column_names_file_and_column() {
        let t = CyclerTable::new("a.csv");
        let err = t.column("Voltage").unwrap_err();
        assert_eq!(
            err,
            DataError::MissingColumn {
                file: "a.csv".into(),
                column: "Voltage".into()
            }
        );
    }
}
