use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use imgconv::{ConvertError, ConvertOptions, OutputFormat, format_name};


/// Convert an image to JPEG, PNG, GIF, BMP or TIFF. The input format is detected from the file contents.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
	/// Image to read
	input: PathBuf,

	/// Where to write the converted image
	output: PathBuf,

	/// Target format: jpeg, jpg, png, gif, bmp or tiff (case-insensitive)
	format: String,
}


fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	// Wrong argument counts print usage and exit with status 2; help and version exit with 0.
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) => {
			print!("{}", e.render());
			return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
		},
	};

	match run(&cli, &ConvertOptions::default()) {
		Ok(()) => {
			println!("Image conversion successful!");
			ExitCode::SUCCESS
		},
		Err(e) => {
			println!("{e}");
			ExitCode::from(e.exit_code())
		},
	}
}


fn run(cli: &Cli, options: &ConvertOptions) -> Result<(), ConvertError> {
	let (source_format, img) = imgconv::load_image(&cli.input, options)?;
	println!("Input image format: {}", format_name(source_format));

	let target_format: OutputFormat = cli.format.parse()?;
	imgconv::save_image(&img, &cli.output, target_format, options)
}
