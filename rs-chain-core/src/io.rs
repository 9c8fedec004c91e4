use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::io;

/// Reads a whole text file into memory.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Builds the path of a file living next to `input_path`, with `prefix`
/// prepended to its file name.
///
/// Example:
/// `data/policy.bin` + `"readable_"` → `data/readable_policy.bin`
pub(crate) fn build_prefixed_path<P: AsRef<Path>>(
	input_path: P,
	prefix: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_name = input_path
		.file_name()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(format!("{}{}", prefix, file_name.to_string_lossy()));

	Ok(output)
}
