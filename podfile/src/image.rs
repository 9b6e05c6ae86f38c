use std::io::{self, Write};
use image::RgbaImage;
use crate::{error::{PodError, Result}, palette::Palette};

/// Raw image sizes that can be identified from byte length alone.
const SUPPORTED_SIZES: [(u32, u32); 5] = [
	(64, 64),
	(128, 128),
	(320, 200),
	(256, 256),
	(640, 480)
];

/// Anything made of 8-bit palette indices laid out row-major.
pub trait IndexedPixels {
	fn width(&self) -> u32;
	fn height(&self) -> u32;
	fn indices(&self) -> &[u8];

	fn pixel(&self, x: u32, y: u32) -> Result<u8> {
		if x >= self.width() || y >= self.height() {
			return Err(PodError::OutOfRange(format!("pixel ({x}, {y}) outside {}x{}", self.width(), self.height())));
		}
		Ok(self.indices()[(y * self.width() + x) as usize])
	}

	/// RGBA bytes, four per pixel, alpha always 0xFF.
	fn get_pixel_bytes(&self, palette: &Palette) -> Vec<u8> {
		palette.expand(self.indices())
	}

	fn to_rgba_image(&self, palette: &Palette) -> Result<RgbaImage> {
		RgbaImage::from_raw(self.width(), self.height(), self.get_pixel_bytes(palette))
			.ok_or_else(|| PodError::invalid(format!("{} indices do not fill {}x{}", self.indices().len(), self.width(), self.height())))
	}

	/// Writes an 8-bit indexed PNG carrying `palette` as its PLTE chunk.
	fn write_png<W: Write>(&self, palette: &Palette, out: W) -> Result<()> {
		let mut encoder = png::Encoder::new(out, self.width(), self.height());
		encoder.set_color(png::ColorType::Indexed);
		encoder.set_depth(png::BitDepth::Eight);
		encoder.set_palette(palette.as_bytes());
		let mut writer = encoder.write_header().map_err(io::Error::other)?;
		writer.write_image_data(self.indices()).map_err(io::Error::other)?;
		writer.finish().map_err(io::Error::other)?;
		Ok(())
	}
}

/// A headerless indexed image; its dimensions follow from its length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
	width: u32,
	height: u32,
	pixels: Box<[u8]>
}

impl Image {
	pub fn from_bytes(buf: &[u8]) -> Result<Self> {
		let (width, height) = SUPPORTED_SIZES.iter()
			.copied()
			.find(|(w, h)| (w * h) as usize == buf.len())
			.ok_or_else(|| PodError::OutOfRange(format!("no raw image size matches {} bytes", buf.len())))?;
		Ok(Self {width, height, pixels: buf.into()})
	}
}

impl IndexedPixels for Image {
	fn width(&self) -> u32 {
		self.width
	}

	fn height(&self) -> u32 {
		self.height
	}

	fn indices(&self) -> &[u8] {
		&self.pixels
	}
}
