//! Headless capture: PNG screenshots and frame recording.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::nes::Nes;

/// Save the current framebuffer as a PNG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot(nes: &Nes, path: &Path) -> Result<(), Box<dyn Error>> {
    let (width, height) = nes.resolution();

    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(nes.framebuffer())?;
    Ok(())
}

/// Record `num_frames` frames of emulation as numbered PNGs under
/// `dir/frames/`.
///
/// # Errors
///
/// Returns an error if emulation faults or a frame cannot be saved.
pub fn record(nes: &mut Nes, dir: &Path, num_frames: u32) -> Result<(), Box<dyn Error>> {
    let frames_dir = dir.join("frames");
    fs::create_dir_all(&frames_dir)?;

    for i in 1..=num_frames {
        nes.run_frame()?;
        let filename = frames_dir.join(format!("{i:06}.png"));
        save_screenshot(nes, &filename)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_nes() -> Nes {
        let mut data = vec![0u8; 16 + 32768 + 8192];
        data[0..4].copy_from_slice(b"NES\x1a");
        data[4] = 2;
        data[5] = 1;
        for byte in &mut data[16..16 + 32768] {
            *byte = 0xEA;
        }
        data[16 + 0x7FFC] = 0x00;
        data[16 + 0x7FFD] = 0x80;
        Nes::new(&data).unwrap()
    }

    #[test]
    fn screenshot_writes_a_png() {
        let mut nes = make_nes();
        nes.run_frame().unwrap();

        let dir = std::env::temp_dir().join(format!("ferrite-capture-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.png");

        save_screenshot(&nes, &path).unwrap();
        let written = fs::read(&path).unwrap();
        // PNG signature.
        assert_eq!(&written[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
