use std::io::{self, Write};

/// Writes an RGB buffer as a plain-text (P3) PPM image.
pub fn write_ppm<W: Write>(out: &mut W, width: u32, height: u32, pixels: &[u8]) -> io::Result<()> {
    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{width}x{height} image needs {expected} bytes, got {}", pixels.len()),
        ));
    }

    writeln!(out, "P3")?;
    writeln!(out, "{width} {height}")?;
    writeln!(out, "255")?;
    for rgb in pixels.chunks_exact(3) {
        writeln!(out, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }
    out.flush()
}
