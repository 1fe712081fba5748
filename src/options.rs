use image::{
	Limits,
	codecs::png::{CompressionType, FilterType},
};


pub const DEFAULT_JPEG_QUALITY: u8 = 75;
pub const DEFAULT_GIF_SPEED: i32 = 10;


/// Codec defaults and decode limits for a conversion.
///
/// The CLI always runs with `ConvertOptions::default()`; library callers may tune these.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
	/// JPEG quality, 1-100.
	pub jpeg_quality: u8,
	pub png_compression: CompressionType,
	pub png_filter: FilterType,
	/// NeuQuant sampling speed for GIF palette quantization, 1 (best) to 30 (fastest).
	pub gif_speed: i32,
	/// Bounds applied while decoding the input.
	pub limits: Limits,
	/// Delete the output file when encoding fails part way through.
	pub remove_partial_output: bool,
}


impl Default for ConvertOptions {
	fn default() -> Self {
		Self {
			jpeg_quality: DEFAULT_JPEG_QUALITY,
			png_compression: CompressionType::Default,
			png_filter: FilterType::Adaptive,
			gif_speed: DEFAULT_GIF_SPEED,
			limits: Limits::default(),
			remove_partial_output: true,
		}
	}
}


impl ConvertOptions {
	pub(crate) fn jpeg_quality(&self) -> u8 {
		self.jpeg_quality.clamp(1, 100)
	}

	pub(crate) fn gif_speed(&self) -> i32 {
		self.gif_speed.clamp(1, 30)
	}
}
