use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

struct Sale {
    date: NaiveDate,
    city: &'static str,
    product: &'static str,
    quantity: i64,
    unit_price: f64,
}

const CITIES: [&str; 8] = [
    "São Paulo",
    "Rio de Janeiro",
    "Belo Horizonte",
    "Curitiba",
    "Porto Alegre",
    "Salvador",
    "Recife",
    "Fortaleza",
];

/// Product name and list price.
const PRODUCTS: [(&str, f64); 6] = [
    ("Caneca", 29.90),
    ("Copo", 14.50),
    ("Garrafa", 49.00),
    ("Prato", 22.75),
    ("Talher", 9.90),
    ("Jarra", 64.00),
];

fn main() {
    let mut rng = SimpleRng::new(42);
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");

    let mut sales = Vec::new();
    for day in 0..90 {
        let date = first_day + Duration::days(day);
        let orders = 3 + rng.below(6);
        for _ in 0..orders {
            let &(product, list_price) = rng.pick(&PRODUCTS);
            // Up to ±10% around the list price, rounded to cents.
            let unit_price = (list_price * (0.9 + 0.2 * rng.next_f64()) * 100.0).round() / 100.0;
            sales.push(Sale {
                date,
                city: *rng.pick(&CITIES),
                product,
                quantity: 1 + rng.below(8) as i64,
                unit_price,
            });
        }
    }

    // ---- CSV, with a few malformed rows for the cleaner to deal with ----
    let csv_path = "vendas.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record(["data", "cidade", "produto", "quantidade", "preco_unit"])
        .expect("Failed to write header");
    for sale in &sales {
        writer
            .write_record([
                sale.date.format("%Y-%m-%d").to_string(),
                sale.city.to_string(),
                sale.product.to_string(),
                sale.quantity.to_string(),
                format!("{:.2}", sale.unit_price),
            ])
            .expect("Failed to write row");
    }
    let malformed = [
        ["2024-02-30", "Recife", "Copo", "2", "14.50"],
        ["2024-03-01", "Curitiba", "Prato", "três", "22.75"],
        ["2024-03-02", " Salvador ", "Jarra", "1", "sessenta"],
        ["", "Fortaleza", "Caneca", "1", "29.90"],
    ];
    for row in &malformed {
        writer.write_record(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet with typed columns ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("data", DataType::Date32, false),
        Field::new("cidade", DataType::Utf8, false),
        Field::new("produto", DataType::Utf8, false),
        Field::new("quantidade", DataType::Int64, false),
        Field::new("preco_unit", DataType::Float64, false),
    ]));

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(
                sales
                    .iter()
                    .map(|s| (s.date - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                sales.iter().map(|s| s.city).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                sales.iter().map(|s| s.product).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                sales.iter().map(|s| s.quantity).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                sales.iter().map(|s| s.unit_price).collect::<Vec<_>>(),
            )),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "vendas.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} sales (+{} malformed rows) to {csv_path} and {} to {parquet_path}",
        sales.len(),
        malformed.len(),
        sales.len()
    );
}
