use super::types::SearchIndex;
use flate2::read::GzDecoder;
use lazy_static::lazy_static;
use std::io::Read;

// Embed the compressed sample table at compile time
static COMPRESSED_SAMPLE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/classes_5.js.gz"));

lazy_static! {
    /// Sample table, decompressed and parsed on first access
    pub static ref SAMPLE: SearchIndex = load_sample();
}

/// Decompressed source text of the embedded sample
pub fn sample_source() -> String {
    let mut decoder = GzDecoder::new(COMPRESSED_SAMPLE);
    let mut source = String::new();
    decoder
        .read_to_string(&mut source)
        .expect("Failed to decompress embedded search table");
    source
}

fn load_sample() -> SearchIndex {
    let start = std::time::Instant::now();

    let source = sample_source();
    let decompress_time = start.elapsed();

    let index = SearchIndex::parse(&source).expect("Failed to parse embedded search table");

    tracing::debug!(
        entries = index.len(),
        decompress = ?decompress_time,
        total = ?start.elapsed(),
        "embedded search table loaded"
    );

    index
}

/// Get a reference to the embedded sample table
pub fn sample_index() -> &'static SearchIndex {
    &SAMPLE
}
