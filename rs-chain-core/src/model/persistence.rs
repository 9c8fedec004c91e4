//! Binary persistence of transition tables.
//!
//! A model blob is the 4-byte tag `MKCH` followed by the `postcard`
//! encoding of the table. Loading validates the tag, requires the payload
//! to decode completely, and re-checks every table invariant, so a
//! truncated or foreign file never yields a partially populated table.

use std::fmt::Display;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ChainError, Result};
use crate::io::build_prefixed_path;
use super::transition_table::TransitionTable;

/// Leading bytes of every model blob.
pub const FORMAT_TAG: &[u8; 4] = b"MKCH";

/// File-name prefix of the readable dump written next to a model file.
pub const READABLE_PREFIX: &str = "readable_";

/// Serializes `table` into a model blob.
///
/// # Errors
/// Returns `Encode` if `postcard` fails to serialize a token.
pub fn save<T: Serialize>(table: &TransitionTable<T>) -> Result<Vec<u8>> {
	let mut bytes = FORMAT_TAG.to_vec();
	let payload = postcard::to_stdvec(table).map_err(ChainError::Encode)?;
	bytes.extend_from_slice(&payload);
	Ok(bytes)
}

/// Reconstructs a table from a blob produced by [`save`].
///
/// # Errors
/// - `UnknownFormat` if the blob does not start with [`FORMAT_TAG`]
/// - `CorruptModel` if decoding fails, bytes are left over, or the decoded
///   table breaks an invariant
pub fn load<T>(bytes: &[u8]) -> Result<TransitionTable<T>>
where
	T: DeserializeOwned + Clone + Eq + Hash,
{
	let payload = bytes.strip_prefix(FORMAT_TAG.as_slice()).ok_or(ChainError::UnknownFormat)?;

	let (mut table, rest): (TransitionTable<T>, &[u8]) =
		postcard::take_from_bytes(payload).map_err(|e| ChainError::CorruptModel(e.to_string()))?;
	if !rest.is_empty() {
		return Err(ChainError::CorruptModel(format!("{} trailing bytes", rest.len())));
	}

	table.rebuild_index().map_err(ChainError::CorruptModel)?;
	Ok(table)
}

/// Writes the readable dump of `table` (its `Display` form).
///
/// One line per token in table order:
/// `<token> : <group> (<count>) <group> (<count>) `
pub fn write_readable<T, W>(table: &TransitionTable<T>, writer: &mut W) -> std::io::Result<()>
where
	T: Display + Clone + Eq + Hash,
	W: Write,
{
	write!(writer, "{}", table)
}

/// Saves `table` to `path`, and its readable dump to `readable_<file name>`
/// in the same directory when `readable` is set.
///
/// # Errors
/// Returns `Io` on file failures and `Encode` on serialization failures.
pub fn save_file<T, P>(table: &TransitionTable<T>, path: P, readable: bool) -> Result<()>
where
	T: Serialize + Display + Clone + Eq + Hash,
	P: AsRef<Path>,
{
	let path = path.as_ref();
	std::fs::write(path, save(table)?)?;
	info!("Saved {} states to {}", table.len(), path.display());

	if !readable {
		return Ok(());
	}

	let readable_path = build_prefixed_path(path, READABLE_PREFIX)?;
	let mut writer = BufWriter::new(File::create(&readable_path)?);
	write_readable(table, &mut writer)?;
	writer.flush()?;
	info!("Wrote readable dump to {}", readable_path.display());
	Ok(())
}

/// Loads a table saved with [`save_file`].
///
/// # Errors
/// Returns `Io` if the file cannot be read, otherwise the errors of [`load`].
pub fn load_file<T, P>(path: P) -> Result<TransitionTable<T>>
where
	T: DeserializeOwned + Clone + Eq + Hash,
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let bytes = std::fs::read(path)?;
	let table = load(&bytes)?;
	info!("Loaded {} states from {}", table.len(), path.display());
	Ok(table)
}
