//! Listing sources the in-memory host hands out.

use std::cell::Cell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use crate::core::ListingSource;

/// An in-memory listing resource. Reads bump the shared counter so tests and
/// hosts can assert that cached drains touch no sources.
pub struct MemListing {
	location: Box<str>,
	text: Box<str>,
	reads: Rc<Cell<usize>>,
}

impl MemListing {
	pub fn new(location: impl Into<Box<str>>, text: impl Into<Box<str>>, reads: Rc<Cell<usize>>) -> Self {
		Self { location: location.into(), text: text.into(), reads }
	}
}

impl ListingSource for MemListing {
	fn location(&self) -> &str {
		&self.location
	}

	fn read(&self) -> io::Result<String> {
		self.reads.set(self.reads.get() + 1);
		Ok(self.text.to_string())
	}
}

/// A listing resource backed by a file on disk.
pub struct FsListing {
	location: Box<str>,
	path: PathBuf,
	reads: Rc<Cell<usize>>,
}

impl FsListing {
	pub fn new(path: impl Into<PathBuf>, reads: Rc<Cell<usize>>) -> Self {
		let path = path.into();
		Self { location: path.display().to_string().into(), path, reads }
	}
}

impl ListingSource for FsListing {
	fn location(&self) -> &str {
		&self.location
	}

	fn read(&self) -> io::Result<String> {
		self.reads.set(self.reads.get() + 1);
		std::fs::read_to_string(&self.path)
	}
}
