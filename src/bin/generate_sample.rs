//! Write a synthetic Eurostat-style extract for demos:
//! `<dir>/eu_life_expectancy_raw.tsv` (wide) and
//! `<dir>/eu_life_expectancy_raw.parquet` (long records).

use std::fmt::Write as _;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Builder, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use life_expectancy::data::model::COMPOSITE_KEY_LABEL;
use parquet::arrow::ArrowWriter;

const YEARS: std::ops::RangeInclusive<i64> = 2010..=2021;
const REGIONS: [(&str, f64); 6] = [
    ("PT", 81.1),
    ("ES", 83.3),
    ("FR", 82.3),
    ("DE", 80.9),
    ("SE", 82.8),
    ("EU27_2020", 80.4),
];
const SEXES: [(&str, f64); 3] = [("F", 2.9), ("M", -2.9), ("T", 0.0)];
const AGES: [(&str, f64); 3] = [("Y_LT1", 0.0), ("Y10", -9.7), ("Y65", -61.2)];

/// Small deterministic generator (SplitMix64) so samples are reproducible.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

struct Series {
    sex: &'static str,
    age: &'static str,
    region: &'static str,
    /// One entry per year; `None` is a missing observation.
    values: Vec<Option<(f64, &'static str)>>,
}

fn generate(rng: &mut SplitMix) -> Vec<Series> {
    let mut series = Vec::new();
    for &(region, base) in &REGIONS {
        for &(sex, sex_offset) in &SEXES {
            for &(age, age_offset) in &AGES {
                let values = YEARS
                    .map(|year| {
                        if rng.unit() < 0.08 {
                            return None;
                        }
                        let trend = (year - 2010) as f64 * 0.15;
                        let value = base + sex_offset + age_offset + trend + rng.unit() - 0.5;
                        let flag = match rng.unit() {
                            r if r < 0.10 => "e",
                            r if r < 0.15 => "p",
                            r if r < 0.18 => "b",
                            _ => "",
                        };
                        Some(((value * 10.0).round() / 10.0, flag))
                    })
                    .collect();
                series.push(Series {
                    sex,
                    age,
                    region,
                    values,
                });
            }
        }
    }
    series
}

fn wide_tsv(series: &[Series]) -> String {
    // Eurostat lists the most recent year first.
    let years: Vec<i64> = YEARS.rev().collect();
    let mut out = String::from(COMPOSITE_KEY_LABEL);
    for year in &years {
        let _ = write!(out, "\t{year} ");
    }
    out.push('\n');

    for s in series {
        let _ = write!(out, "YR,{},{},{}", s.sex, s.age, s.region);
        for year in &years {
            let idx = (year - YEARS.start()) as usize;
            match s.values[idx] {
                Some((value, flag)) => {
                    let _ = write!(out, "\t{value:.1} {flag}");
                }
                None => out.push_str("\t: "),
            }
        }
        out.push('\n');
    }
    out
}

fn long_batch(series: &[Series]) -> Result<RecordBatch> {
    let mut unit = Vec::new();
    let mut sex = Vec::new();
    let mut age = Vec::new();
    let mut region = Vec::new();
    let mut year = Vec::new();
    let mut value = Float64Builder::new();

    for s in series {
        for (y, v) in YEARS.zip(&s.values) {
            unit.push("YR");
            sex.push(s.sex);
            age.push(s.age);
            region.push(s.region);
            year.push(y);
            value.append_option(v.map(|(x, _)| x));
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("unit", DataType::Utf8, false),
        Field::new("sex", DataType::Utf8, false),
        Field::new("age", DataType::Utf8, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("value", DataType::Float64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(unit)),
        Arc::new(StringArray::from(sex)),
        Arc::new(StringArray::from(age)),
        Arc::new(StringArray::from(region)),
        Arc::new(Int64Array::from(year)),
        Arc::new(value.finish()),
    ];
    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SplitMix(42);
    let series = generate(&mut rng);

    let tsv_path = dir.join("eu_life_expectancy_raw.tsv");
    std::fs::write(&tsv_path, wide_tsv(&series))
        .with_context(|| format!("writing {}", tsv_path.display()))?;

    let batch = long_batch(&series)?;
    let parquet_path = dir.join("eu_life_expectancy_raw.parquet");
    let file = File::create(&parquet_path)
        .with_context(|| format!("creating {}", parquet_path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} series x {} years to {} and {}",
        series.len(),
        YEARS.count(),
        tsv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
