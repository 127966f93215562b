use std::error::Error;
use std::path::PathBuf;

use rplot::data_loader::load_array;
use rplot::field::{finite_range, max_abs, Extent};
use rplot::ticks::{axis_ticks, colorbar_precision, tick_spacing, FALLBACK_PRECISION};

fn main() -> Result<(), Box<dyn Error>> {
    let file_path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("usage: inspect_array <FILE.npy|FILE.json>");
            std::process::exit(2);
        }
    };

    println!("Inspecting array file: {}", file_path.display());
    let data = load_array(&file_path)?;
    let (rows, cols) = data.dim();

    println!("\n=== ARRAY INFORMATION ===");
    println!("  shape = {} x {}", rows, cols);
    let finite = data.iter().filter(|v| v.is_finite()).count();
    println!("  finite values = {} of {}", finite, data.len());
    match finite_range(data.view()) {
        Some((min, max)) => println!("  range = [{}, {}]", min, max),
        None => println!("  range = (no finite values)"),
    }

    println!("\n=== DISPLAY RULES ===");
    let large = max_abs(data.view());
    match large.and_then(colorbar_precision) {
        Some(decimals) => println!(
            "  max |value| = {} -> colorbar labels with {} decimals",
            large.unwrap_or_default(),
            decimals
        ),
        None => println!(
            "  no positive magnitude -> colorbar labels with {} decimals",
            FALLBACK_PRECISION
        ),
    }

    // default extent is one unit per cell
    let extent = Extent::from_shape(rows, cols);
    for (axis, lo, hi) in [("x", extent.xmin, extent.xmax), ("y", extent.ymin, extent.ymax)] {
        let ticks = axis_ticks(lo, hi);
        match tick_spacing(hi - lo) {
            Some(spacing) => println!(
                "  {} axis [{}, {}]: minor {} / major {} ({} major ticks)",
                axis,
                lo,
                hi,
                spacing.minor,
                spacing.major,
                ticks.major.len()
            ),
            None => println!(
                "  {} axis [{}, {}]: outside the spacing table, major ticks at {:?}",
                axis, lo, hi, ticks.major
            ),
        }
    }

    Ok(())
}
