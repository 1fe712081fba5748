use std::path::PathBuf;

use image::error::{DecodingError, LimitError, LimitErrorKind, ParameterError, UnsupportedError};


/// Failure while sniffing or decoding the input image.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
	#[error("unrecognized image format")]
	UnrecognizedFormat,
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	#[error("PNG decoding error: {0}")]
	Png(png::DecodingError),
	#[error("decoding error: {0}")]
	Decoding(DecodingError),
	#[error("parameter error: {0}")]
	Parameter(ParameterError),
	#[error("limits error: {0}")]
	Limits(LimitError),
	#[error("unsupported error: {0}")]
	Unsupported(UnsupportedError),
	#[error("{0}")]
	Other(image::ImageError),
}

impl From<png::DecodingError> for DecodeError {
	fn from(err: png::DecodingError) -> Self {
		match err {
			png::DecodingError::IoError(io_err) => DecodeError::Io(io_err),
			png::DecodingError::LimitsExceeded => DecodeError::Limits(LimitError::from_kind(LimitErrorKind::InsufficientMemory)),
			_ => DecodeError::Png(err),
		}
	}
}

impl From<image::ImageError> for DecodeError {
	fn from(err: image::ImageError) -> Self {
		match err {
			image::ImageError::IoError(io_err) => DecodeError::Io(io_err),
			image::ImageError::Decoding(err) => DecodeError::Decoding(err),
			image::ImageError::Parameter(err) => DecodeError::Parameter(err),
			image::ImageError::Limits(err) => DecodeError::Limits(err),
			image::ImageError::Unsupported(err) => DecodeError::Unsupported(err),
			err @ image::ImageError::Encoding(_) => DecodeError::Other(err),
		}
	}
}


/// Failure while encoding the pixel buffer into the target format.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	#[error("{0}")]
	Image(#[from] image::ImageError),
	#[error("GIF encoding error: {0}")]
	Gif(#[from] gif::EncodingError),
	#[error("{format} cannot store a {width}x{height} image")]
	Dimensions { format: &'static str, width: u32, height: u32 },
}


/// Outcome of a failed conversion, one variant per pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
	#[error("Error opening input file {}: {source}", path.display())]
	OpenInput {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Error decoding image: {0}")]
	Decode(#[from] DecodeError),
	#[error("Unsupported output format: {0}")]
	UnsupportedFormat(String),
	#[error("Error creating output file {}: {source}", path.display())]
	CreateOutput {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Error encoding image: {0}")]
	Encode(#[from] EncodeError),
}

impl ConvertError {
	/// Process exit code for this failure class. Usage errors (2) belong to the argument parser.
	pub fn exit_code(&self) -> u8 {
		match self {
			ConvertError::OpenInput { .. } => 3,
			ConvertError::Decode(_) => 4,
			ConvertError::UnsupportedFormat(_) => 5,
			ConvertError::CreateOutput { .. } => 6,
			ConvertError::Encode(_) => 7,
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn image_io_errors_become_io() {
		let err = image::ImageError::IoError(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
		assert!(matches!(DecodeError::from(err), DecodeError::Io(_)));
	}

	#[test]
	fn limit_errors_keep_their_class() {
		let err = image::ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError));
		assert!(matches!(DecodeError::from(err), DecodeError::Limits(_)));
	}

	#[test]
	fn png_limit_errors_become_limits() {
		assert!(matches!(DecodeError::from(png::DecodingError::LimitsExceeded), DecodeError::Limits(_)));
	}

	#[test]
	fn exit_codes_are_distinct_per_stage() {
		let errors = [
			ConvertError::OpenInput {
				path: PathBuf::from("in.png"),
				source: std::io::Error::from(std::io::ErrorKind::NotFound),
			},
			ConvertError::Decode(DecodeError::UnrecognizedFormat),
			ConvertError::UnsupportedFormat("webp".into()),
			ConvertError::CreateOutput {
				path: PathBuf::from("out.png"),
				source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
			},
			ConvertError::Encode(EncodeError::Dimensions { format: "GIF", width: 70_000, height: 1 }),
		];
		let mut codes: Vec<u8> = errors.iter().map(ConvertError::exit_code).collect();
		codes.dedup();
		assert_eq!(codes, vec![3, 4, 5, 6, 7]);
	}

	#[test]
	fn messages_name_the_stage() {
		let err = ConvertError::UnsupportedFormat("webp".into());
		assert_eq!(err.to_string(), "Unsupported output format: webp");

		let err = ConvertError::Decode(DecodeError::UnrecognizedFormat);
		assert_eq!(err.to_string(), "Error decoding image: unrecognized image format");
	}
}
