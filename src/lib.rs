mod encoder;
mod error;
mod format;
mod options;
mod png_decoder;

use std::{
	fs::File,
	io::{BufRead, BufReader, BufWriter, Read, Seek, Write},
	path::Path,
};

use image::{DynamicImage, ImageFormat, ImageReader, Limits, guess_format};

pub use crate::{
	encoder::{compatible_image, write_image},
	error::{ConvertError, DecodeError, EncodeError},
	format::{OutputFormat, format_name},
	options::ConvertOptions,
};
use crate::png_decoder::PngDecoder;


/// Longest signature `guess_format` looks at.
const SIGNATURE_LEN: u64 = 16;


/// Summary of a finished conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
	pub source_format: ImageFormat,
	pub target_format: OutputFormat,
	pub width: u32,
	pub height: u32,
}


/// Sniff the format from the leading bytes of `reader` and decode it.
pub fn load_image_from_reader<R: BufRead + Seek>(mut reader: R, limits: Limits) -> Result<(ImageFormat, DynamicImage), DecodeError> {
	// Guess format
	let mut buf = Vec::with_capacity(SIGNATURE_LEN as usize);
	reader.by_ref().take(SIGNATURE_LEN).read_to_end(&mut buf)?;
	reader.rewind()?;
	let Ok(format) = guess_format(&buf) else {
		return Err(DecodeError::UnrecognizedFormat);
	};

	let img = match format {
		ImageFormat::Png => {
			let decoder = PngDecoder::with_limits(reader, limits)?;
			if decoder.is_animated() {
				log::warn!("animated PNG input, only the first frame is converted");
			}
			DynamicImage::from_decoder(decoder)?
		},
		_ => {
			let mut image_reader = ImageReader::with_format(reader, format);
			image_reader.limits(limits);
			image_reader.decode()?
		},
	};

	log::debug!("decoded {:?} image: {}x{} {:?}", format, img.width(), img.height(), img.color());
	Ok((format, img))
}


/// Open `path` and decode it, telling an unreadable file apart from undecodable contents.
pub fn load_image<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<(ImageFormat, DynamicImage), ConvertError> {
	let path = path.as_ref();
	let file = File::open(path).map_err(|source| ConvertError::OpenInput {
		path: path.to_path_buf(),
		source,
	})?;
	let reader = BufReader::new(file);

	Ok(load_image_from_reader(reader, options.limits.clone())?)
}


/// Create or truncate `path` and encode `img` into it as `format`.
///
/// When encoding fails and `options.remove_partial_output` is set the half-written file is deleted.
pub fn save_image<P: AsRef<Path>>(img: &DynamicImage, path: P, format: OutputFormat, options: &ConvertOptions) -> Result<(), ConvertError> {
	let path = path.as_ref();
	if !format.matches_extension(path) {
		log::warn!("writing {} data to {}, whose extension does not match", format, path.display());
	}

	let file = File::create(path).map_err(|source| ConvertError::CreateOutput {
		path: path.to_path_buf(),
		source,
	})?;

	let result = encode_to_file(img, file, format, options);
	if result.is_err() && options.remove_partial_output {
		remove_partial(path);
	}

	Ok(result?)
}


fn encode_to_file(img: &DynamicImage, file: File, format: OutputFormat, options: &ConvertOptions) -> Result<(), EncodeError> {
	let mut writer = BufWriter::new(file);
	write_image(img, format, options, &mut writer)?;
	writer.flush()?;
	Ok(())
}


fn remove_partial(path: &Path) {
	match std::fs::remove_file(path) {
		Ok(()) => log::warn!("removed partially written output {}", path.display()),
		Err(err) => log::warn!("failed to remove partially written output {}: {}", path.display(), err),
	}
}


/// Decode `input`, then write it to `output` in the format named by `format_token`.
///
/// The token is resolved after decoding but before `output` is created, so an unknown token never touches the output path.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q, format_token: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
	let (source_format, img) = load_image(input, options)?;
	let target_format: OutputFormat = format_token.parse()?;
	save_image(&img, output, target_format, options)?;

	Ok(Conversion {
		source_format,
		target_format,
		width: img.width(),
		height: img.height(),
	})
}
