use flate2::Compression;
use flate2::write::GzEncoder;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=search-data/classes_5.js");

    let out_dir = env::var("OUT_DIR").unwrap();
    let input_path = "search-data/classes_5.js";
    let output_path = Path::new(&out_dir).join("classes_5.js.gz");

    let table = fs::read(input_path).expect("Failed to read search-data/classes_5.js");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&table)
        .expect("Failed to compress search table");
    let compressed = encoder.finish().expect("Failed to finish compression");

    fs::write(&output_path, &compressed).expect("Failed to write compressed search table");

    let ratio = (compressed.len() as f64 / table.len() as f64) * 100.0;
    println!(
        "cargo:warning=Embedded search table: {} -> {} bytes ({:.1}%)",
        table.len(),
        compressed.len(),
        ratio
    );
}
