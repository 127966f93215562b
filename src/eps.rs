//! Encapsulated PostScript output.
//!
//! The figure is composed on an RGB bitmap and embedded as a single
//! `colorimage` whose bounding box is the figure size in points.

use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Hex digits per line of image data
const HEX_LINE_WIDTH: usize = 64;

/// Figure size in PostScript points for an image of `pixels` at `dpi`
pub fn points(pixels: u32, dpi: u32) -> f64 {
    pixels as f64 * 72.0 / dpi.max(1) as f64
}

/// Write `img` as a DSC-conforming EPS file scaled to `dpi`.
pub fn write_eps(path: &Path, img: &RgbImage, dpi: u32) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_eps_to(&mut out, img, dpi, &file_title(path))?;
    out.flush()?;
    Ok(())
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_eps_to<W: Write>(out: &mut W, img: &RgbImage, dpi: u32, title: &str) -> Result<()> {
    let (width, height) = img.dimensions();
    let (w_pt, h_pt) = (points(width, dpi), points(height, dpi));

    writeln!(out, "%!PS-Adobe-3.0 EPSF-3.0")?;
    writeln!(out, "%%Title: {}", title)?;
    writeln!(out, "%%Creator: rplot {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        out,
        "%%BoundingBox: 0 0 {} {}",
        w_pt.ceil() as u64,
        h_pt.ceil() as u64
    )?;
    writeln!(out, "%%HiResBoundingBox: 0 0 {:.4} {:.4}", w_pt, h_pt)?;
    writeln!(out, "%%LanguageLevel: 2")?;
    writeln!(out, "%%Pages: 1")?;
    writeln!(out, "%%EndComments")?;
    writeln!(out, "%%Page: 1 1")?;
    writeln!(out, "gsave")?;
    writeln!(out, "{:.4} {:.4} scale", w_pt, h_pt)?;
    // rows are stored top to bottom
    writeln!(
        out,
        "{w} {h} 8 [{w} 0 0 -{h} 0 {h}] currentfile /ASCIIHexDecode filter false 3 colorimage",
        w = width,
        h = height
    )?;

    let mut line = String::with_capacity(HEX_LINE_WIDTH + 1);
    for byte in img.as_raw() {
        line.push_str(&format!("{:02x}", byte));
        if line.len() >= HEX_LINE_WIDTH {
            writeln!(out, "{}", line)?;
            line.clear();
        }
    }
    line.push('>');
    writeln!(out, "{}", line)?;

    writeln!(out, "grestore")?;
    writeln!(out, "showpage")?;
    writeln!(out, "%%Trailer")?;
    writeln!(out, "%%EOF")?;
    Ok(())
}
