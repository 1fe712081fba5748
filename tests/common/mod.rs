use std::{
	path::{Path, PathBuf},
	sync::atomic::{AtomicUsize, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};


static COUNTER: AtomicUsize = AtomicUsize::new(0);


/// Fresh directory under the system temp dir, unique per call.
pub fn unique_temp_dir(label: &str) -> PathBuf {
	let nanos = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock error").as_nanos();
	let n = COUNTER.fetch_add(1, Ordering::Relaxed);
	let dir = std::env::temp_dir().join(format!("imgconv-{label}-{}-{nanos}-{n}", std::process::id()));
	std::fs::create_dir_all(&dir).expect("create temp dir");
	dir
}


/// 100x50 RGB gradient.
pub fn sample_image() -> DynamicImage {
	DynamicImage::ImageRgb8(RgbImage::from_fn(100, 50, |x, y| Rgb([(x * 2) as u8, (y * 5) as u8, ((x + y) % 256) as u8])))
}


pub fn write_sample(dir: &Path, name: &str, format: ImageFormat) -> PathBuf {
	let path = dir.join(name);
	sample_image().save_with_format(&path, format).expect("write sample image");
	path
}
