use std::io::{BufRead, Seek};

use image::{
	ColorType, ExtendedColorType, ImageDecoder, ImageError, ImageFormat, ImageResult, Limits,
	error::{DecodingError, LimitError, LimitErrorKind, ParameterError, ParameterErrorKind, UnsupportedError, UnsupportedErrorKind},
};

use crate::error::DecodeError;


/// PNG decoder that hands 16-bit samples through untouched so a PNG to PNG conversion stays lossless.
pub struct PngDecoder<R: BufRead + Seek> {
	color_type: ColorType,
	reader: png::Reader<R>,
}


impl<R: BufRead + Seek> PngDecoder<R> {
	pub fn with_limits(r: R, mut limits: Limits) -> Result<PngDecoder<R>, DecodeError> {
		limits.check_support(&image::LimitSupport::default())?;

		let max_bytes = usize::try_from(limits.max_alloc.unwrap_or(u64::MAX)).unwrap_or(usize::MAX);
		let mut decoder = png::Decoder::new_with_limits(r, png::Limits { bytes: max_bytes });

		let info = decoder.read_header_info()?;
		limits.check_dimensions(info.width, info.height)?;

		// EXPAND widens palettes and sub-byte depths to 8 bpc but leaves 16 bpc alone.
		decoder.set_transformations(png::Transformations::EXPAND);
		let reader = decoder.read_info()?;
		let color_type = match reader.output_color_type() {
			(png::ColorType::Grayscale, png::BitDepth::Eight) => ColorType::L8,
			(png::ColorType::Grayscale, png::BitDepth::Sixteen) => ColorType::L16,
			(png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => ColorType::La8,
			(png::ColorType::GrayscaleAlpha, png::BitDepth::Sixteen) => ColorType::La16,
			(png::ColorType::Rgb, png::BitDepth::Eight) => ColorType::Rgb8,
			(png::ColorType::Rgb, png::BitDepth::Sixteen) => ColorType::Rgb16,
			(png::ColorType::Rgba, png::BitDepth::Eight) => ColorType::Rgba8,
			(png::ColorType::Rgba, png::BitDepth::Sixteen) => ColorType::Rgba16,
			(_, bits) => return Err(unsupported_color(ExtendedColorType::Unknown(bits as u8))),
		};

		// The output buffer is allocated by the caller, outside png's own limits.
		let (width, height) = reader.info().size();
		limits.reserve(u64::from(width) * u64::from(height) * u64::from(color_type.bytes_per_pixel()))?;

		Ok(PngDecoder { color_type, reader })
	}

	/// Animated PNGs decode to their first frame only.
	pub fn is_animated(&self) -> bool {
		self.reader.info().is_animated()
	}
}


impl<R: BufRead + Seek> ImageDecoder for PngDecoder<R> {
	fn dimensions(&self) -> (u32, u32) {
		self.reader.info().size()
	}

	fn color_type(&self) -> ColorType {
		self.color_type
	}

	fn icc_profile(&mut self) -> ImageResult<Option<Vec<u8>>> {
		Ok(self.reader.info().icc_profile.as_ref().map(|x| x.to_vec()))
	}

	fn read_image(mut self, buf: &mut [u8]) -> ImageResult<()> {
		use byteorder_lite::{BigEndian, ByteOrder, NativeEndian};

		assert_eq!(u64::try_from(buf.len()), Ok(self.total_bytes()));
		self.reader.next_frame(buf).map_err(error_from_png)?;

		// PNG samples are big endian; `read_image` promises native endianness for 16 bpc.
		if self.color_type.bytes_per_pixel() / self.color_type.channel_count() == 2 {
			buf.chunks_exact_mut(2).for_each(|c| {
				let v = BigEndian::read_u16(c);
				NativeEndian::write_u16(c, v);
			});
		}
		Ok(())
	}

	fn read_image_boxed(self: Box<Self>, buf: &mut [u8]) -> ImageResult<()> {
		(*self).read_image(buf)
	}

	fn set_limits(&mut self, limits: Limits) -> ImageResult<()> {
		limits.check_support(&image::LimitSupport::default())?;
		let (width, height) = self.dimensions();
		limits.check_dimensions(width, height)
	}
}


fn unsupported_color(ect: ExtendedColorType) -> DecodeError {
	DecodeError::Unsupported(UnsupportedError::from_format_and_kind(
		ImageFormat::Png.into(),
		UnsupportedErrorKind::Color(ect),
	))
}


fn error_from_png(err: png::DecodingError) -> ImageError {
	match err {
		png::DecodingError::IoError(err) => ImageError::IoError(err),
		err @ png::DecodingError::Format(_) => ImageError::Decoding(DecodingError::new(ImageFormat::Png.into(), err)),
		err @ png::DecodingError::Parameter(_) => ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::Generic(err.to_string()))),
		png::DecodingError::LimitsExceeded => ImageError::Limits(LimitError::from_kind(LimitErrorKind::InsufficientMemory)),
	}
}


#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use image::{DynamicImage, ImageBuffer, ImageEncoder, Rgb, codecs::png::PngEncoder};

	use super::*;

	fn encode_png(width: u32, height: u32, data: &[u8], color: ExtendedColorType) -> Vec<u8> {
		let mut out = Vec::new();
		PngEncoder::new(&mut out).write_image(data, width, height, color).unwrap();
		out
	}

	#[test]
	fn keeps_sixteen_bit_samples() {
		let img: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::from_fn(3, 2, |x, y| Rgb([x as u16 * 20_000, y as u16 * 30_000 + 1, 0x1234]));
		let source = DynamicImage::ImageRgb16(img.clone());
		let bytes = encode_png(3, 2, source.as_bytes(), ExtendedColorType::Rgb16);

		let decoder = PngDecoder::with_limits(Cursor::new(bytes), Limits::default()).unwrap();
		assert_eq!(decoder.color_type(), ColorType::Rgb16);
		assert!(!decoder.is_animated());

		let decoded = DynamicImage::from_decoder(decoder).unwrap();
		assert_eq!(decoded.to_rgb16(), img);
	}

	#[test]
	fn rejects_images_over_the_dimension_limit() {
		let bytes = encode_png(8, 8, &[0u8; 64], ExtendedColorType::L8);
		let mut limits = Limits::default();
		limits.max_image_width = Some(4);

		let err = PngDecoder::with_limits(Cursor::new(bytes), limits).err().unwrap();
		assert!(matches!(err, DecodeError::Limits(_)));
	}

	#[test]
	fn rejects_images_over_the_allocation_limit() {
		let img: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::new(16, 16);
		let bytes = encode_png(16, 16, DynamicImage::ImageRgb16(img).as_bytes(), ExtendedColorType::Rgb16);
		let mut limits = Limits::default();
		limits.max_alloc = Some(1024);

		let err = PngDecoder::with_limits(Cursor::new(bytes), limits).err().unwrap();
		assert!(matches!(err, DecodeError::Limits(_)));
	}

	#[test]
	fn truncated_stream_fails() {
		let mut bytes = encode_png(4, 4, &[7u8; 16], ExtendedColorType::L8);
		bytes.truncate(20);
		assert!(PngDecoder::with_limits(Cursor::new(bytes), Limits::default()).is_err());
	}
}
