use std::{
	borrow::Cow,
	io::{Seek, Write},
};

use image::{
	ColorType, DynamicImage,
	codecs::{bmp::BmpEncoder, jpeg::JpegEncoder, png::PngEncoder, tiff::TiffEncoder},
};

use crate::{error::EncodeError, format::OutputFormat, options::ConvertOptions};


/// Encode `img` as `format` into `writer`.
///
/// The image is first brought into a color model the target codec accepts (see [`compatible_image`]).
pub fn write_image<W: Write + Seek>(img: &DynamicImage, format: OutputFormat, options: &ConvertOptions, writer: &mut W) -> Result<(), EncodeError> {
	let img = compatible_image(img, format);
	log::debug!("encoding {}x{} {:?} as {}", img.width(), img.height(), img.color(), format);

	match format {
		OutputFormat::Jpeg => img.write_with_encoder(JpegEncoder::new_with_quality(writer, options.jpeg_quality()))?,
		OutputFormat::Png => img.write_with_encoder(PngEncoder::new_with_quality(writer, options.png_compression, options.png_filter))?,
		OutputFormat::Gif => write_gif(img, options, writer)?,
		OutputFormat::Bmp => img.write_with_encoder(BmpEncoder::new(writer))?,
		OutputFormat::Tiff => img.write_with_encoder(TiffEncoder::new(writer))?,
	}

	Ok(())
}


/// Converts `img` to the closest color model `format` can store, borrowing when no conversion is needed.
pub fn compatible_image(img: &DynamicImage, format: OutputFormat) -> Cow<'_, DynamicImage> {
	let color = img.color();
	let converted = match format {
		OutputFormat::Jpeg => match color {
			ColorType::L8 | ColorType::Rgb8 => None,
			c if !c.has_color() && !c.has_alpha() => Some(DynamicImage::ImageLuma8(img.to_luma8())),
			_ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
		},
		OutputFormat::Png => match color {
			ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => None,
			ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => None,
			c if c.has_alpha() => Some(DynamicImage::ImageRgba16(img.to_rgba16())),
			_ => Some(DynamicImage::ImageRgb16(img.to_rgb16())),
		},
		OutputFormat::Gif => match color {
			ColorType::Rgba8 => None,
			_ => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
		},
		OutputFormat::Bmp => match color {
			ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => None,
			ColorType::L16 => Some(DynamicImage::ImageLuma8(img.to_luma8())),
			ColorType::La16 => Some(DynamicImage::ImageLumaA8(img.to_luma_alpha8())),
			c if c.has_alpha() => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
			_ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
		},
		OutputFormat::Tiff => match color {
			ColorType::L8 | ColorType::L16 | ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgba8 | ColorType::Rgba16 => None,
			ColorType::La8 => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
			c if c.has_alpha() => Some(DynamicImage::ImageRgba16(img.to_rgba16())),
			_ => Some(DynamicImage::ImageRgb16(img.to_rgb16())),
		},
	};

	match converted {
		Some(img) => Cow::Owned(img),
		None => Cow::Borrowed(img),
	}
}


fn write_gif<W: Write>(img: Cow<'_, DynamicImage>, options: &ConvertOptions, writer: &mut W) -> Result<(), EncodeError> {
	let too_big = || EncodeError::Dimensions {
		format: "GIF",
		width: img.width(),
		height: img.height(),
	};
	let width = u16::try_from(img.width()).map_err(|_| too_big())?;
	let height = u16::try_from(img.height()).map_err(|_| too_big())?;

	let mut pixels = match img.into_owned() {
		DynamicImage::ImageRgba8(buf) => buf.into_raw(),
		other => other.to_rgba8().into_raw(),
	};
	let frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, options.gif_speed());

	let mut encoder = gif::Encoder::new(writer, width, height, &[])?;
	encoder.write_frame(&frame)?;
	encoder.into_inner()?;
	Ok(())
}
