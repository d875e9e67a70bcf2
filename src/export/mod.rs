pub mod excel;
pub mod import;

pub use excel::generate_excel;
pub use import::import_excel;

use std::path::{Path, PathBuf};

/// 出力先が未指定のときは入力と同じ場所に拡張子を変えて置く
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet");
    // "nba.sheet.json" → "nba.sheet.xlsx"
    input.with_file_name(format!("{}.{}", stem, extension))
}
