use std::{fmt, path::Path, str::FromStr};

use image::ImageFormat;

use crate::error::ConvertError;


/// Output encodings the converter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
	Jpeg,
	Png,
	Gif,
	Bmp,
	Tiff,
}


impl OutputFormat {
	pub const ALL: [OutputFormat; 5] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Gif, OutputFormat::Bmp, OutputFormat::Tiff];

	pub fn name(self) -> &'static str {
		match self {
			OutputFormat::Jpeg => "jpeg",
			OutputFormat::Png => "png",
			OutputFormat::Gif => "gif",
			OutputFormat::Bmp => "bmp",
			OutputFormat::Tiff => "tiff",
		}
	}

	pub fn image_format(self) -> ImageFormat {
		match self {
			OutputFormat::Jpeg => ImageFormat::Jpeg,
			OutputFormat::Png => ImageFormat::Png,
			OutputFormat::Gif => ImageFormat::Gif,
			OutputFormat::Bmp => ImageFormat::Bmp,
			OutputFormat::Tiff => ImageFormat::Tiff,
		}
	}

	/// File extensions conventionally used for this format, lowercase.
	pub fn extensions(self) -> &'static [&'static str] {
		match self {
			OutputFormat::Jpeg => &["jpg", "jpeg"],
			OutputFormat::Png => &["png"],
			OutputFormat::Gif => &["gif"],
			OutputFormat::Bmp => &["bmp"],
			OutputFormat::Tiff => &["tiff", "tif"],
		}
	}

	/// Whether `path` carries an extension matching this format. Paths without an extension never match.
	pub fn matches_extension(self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| self.extensions().iter().any(|known| ext.eq_ignore_ascii_case(known)))
	}
}


impl FromStr for OutputFormat {
	type Err = ConvertError;

	fn from_str(token: &str) -> Result<Self, Self::Err> {
		let token = token.to_lowercase();
		match token.as_str() {
			"jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
			"png" => Ok(OutputFormat::Png),
			"gif" => Ok(OutputFormat::Gif),
			"bmp" => Ok(OutputFormat::Bmp),
			"tiff" => Ok(OutputFormat::Tiff),
			_ => Err(ConvertError::UnsupportedFormat(token)),
		}
	}
}


impl fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}


/// Lowercase human-readable name of a detected input format, e.g. `jpeg` or `webp`.
pub fn format_name(format: ImageFormat) -> String {
	format!("{format:?}").to_lowercase()
}
