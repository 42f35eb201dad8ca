use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Seconds between samples.
const STEP_S: f64 = 600.0;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One synthetic constant-current cycling test, column-oriented.
#[derive(Default)]
struct CellTest {
    test_time: Vec<f64>,
    cycle_index: Vec<i64>,
    current: Vec<f64>,
    voltage: Vec<f64>,
    temperature: Vec<f64>,
    dv_dt: Vec<f64>,
    charge_capacity: Vec<f64>,
    discharge_capacity: Vec<f64>,
    charge_energy: Vec<f64>,
    discharge_energy: Vec<f64>,
}

impl CellTest {
    fn len(&self) -> usize {
        self.test_time.len()
    }
}

/// Simulate `cycles` full cycles plus a partial one (the in-progress cycle
/// the dashboard drops). Capacity fades by `fade` per cycle.
fn simulate(cycles: i64, capacity_ah: f64, fade: f64, rng: &mut SimpleRng) -> CellTest {
    let current_a = capacity_ah / 2.0;
    let dq = current_a * STEP_S / 3600.0;
    let mut test = CellTest::default();
    let mut t = 0.0;

    for cycle in 1..=cycles + 1 {
        let capacity = capacity_ah * (1.0 - fade).powi(cycle as i32 - 1);
        let steps = (capacity / dq).ceil() as usize;
        let (mut q_ch, mut q_dis, mut e_ch, mut e_dis) = (0.0, 0.0, 0.0, 0.0);
        let mut v_prev = 3.0;
        // The last cycle stops halfway through charge.
        let phases: &[f64] = if cycle > cycles { &[1.0] } else { &[1.0, -1.0] };
        let step_limit = if cycle > cycles { steps / 2 } else { steps };

        for &sign in phases {
            for k in 0..step_limit {
                let soc = k as f64 / steps as f64;
                let v = if sign > 0.0 { 3.0 + 1.2 * soc } else { 4.2 - 1.2 * soc }
                    + rng.gauss(0.0, 0.002);
                let i = sign * current_a + rng.gauss(0.0, 0.001);
                if sign > 0.0 {
                    q_ch += dq;
                    e_ch += dq * v;
                } else {
                    q_dis += dq;
                    e_dis += dq * v;
                }

                test.test_time.push(t);
                test.cycle_index.push(cycle);
                test.current.push(i);
                test.voltage.push(v);
                test.temperature.push(25.0 + 3.0 * soc + rng.gauss(0.0, 0.1));
                test.dv_dt.push((v - v_prev) / STEP_S);
                test.charge_capacity.push(q_ch);
                test.discharge_capacity.push(q_dis);
                test.charge_energy.push(e_ch);
                test.discharge_energy.push(e_dis);

                v_prev = v;
                t += STEP_S;
            }
        }
    }
    test
}

fn write_csv(path: &Path, test: &CellTest) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record([
        "Test_Time",
        "Cycle_Index",
        "Current",
        "Voltage",
        "Temperature",
        "dV/dt",
        "Charge_Capacity",
        "Discharge_Capacity",
        "Charge_Energy",
        "Discharge_Energy",
    ])?;
    for r in 0..test.len() {
        writer.write_record([
            format!("{:.1}", test.test_time[r]),
            test.cycle_index[r].to_string(),
            format!("{:.5}", test.current[r]),
            format!("{:.5}", test.voltage[r]),
            format!("{:.3}", test.temperature[r]),
            format!("{:.3e}", test.dv_dt[r]),
            format!("{:.6}", test.charge_capacity[r]),
            format!("{:.6}", test.discharge_capacity[r]),
            format!("{:.6}", test.charge_energy[r]),
            format!("{:.6}", test.discharge_energy[r]),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, test: &CellTest) -> Result<()> {
    let f64_col = |name: &str| Field::new(name, DataType::Float64, false);
    let schema = Arc::new(Schema::new(vec![
        f64_col("Test_Time"),
        Field::new("Cycle_Index", DataType::Int64, false),
        f64_col("Current"),
        f64_col("Voltage"),
        f64_col("Temperature"),
        f64_col("dV/dt"),
        f64_col("Charge_Capacity"),
        f64_col("Discharge_Capacity"),
        f64_col("Charge_Energy"),
        f64_col("Discharge_Energy"),
    ]));

    let floats = |v: &Vec<f64>| Arc::new(Float64Array::from(v.clone())) as ArrayRef;
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            floats(&test.test_time),
            Arc::new(Int64Array::from(test.cycle_index.clone())),
            floats(&test.current),
            floats(&test.voltage),
            floats(&test.temperature),
            floats(&test.dv_dt),
            floats(&test.charge_capacity),
            floats(&test.discharge_capacity),
            floats(&test.charge_energy),
            floats(&test.discharge_energy),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let cells = [
        ("cell_A.csv", 2.5, 0.004),
        ("cell_B.csv", 2.4, 0.006),
        ("cell_C.csv", 2.6, 0.003),
        ("cell_D.parquet", 2.5, 0.008),
    ];

    for (name, capacity, fade) in cells {
        let test = simulate(30, capacity, fade, &mut rng);
        let path = Path::new(name);
        if name.ends_with(".parquet") {
            write_parquet(path, &test)?;
        } else {
            write_csv(path, &test)?;
        }
        println!("Wrote {} samples to {name}", test.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn csv_output_has_header_and_one_record_per_sample() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cell.csv");
        let test = simulate(2, 2.5, 0.01, &mut SimpleRng::new(7));
        write_csv(&path, &test).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 10);
        assert_eq!(&headers[1], "Cycle_Index");
        assert_eq!(&headers[5], "dV/dt");

        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), test.len());
        assert_eq!(&records[0][1], "1");
        assert_eq!(records.last().unwrap()[1].parse::<i64>().unwrap(), 3);
    }
}
