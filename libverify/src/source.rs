use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufRead, BufReader, Cursor},
    path::{Path, PathBuf},
};

/// Anything that can hand out a fresh buffered reader. Dropping the reader releases the handle.
pub trait GridSource: Sync {
    type Reader: BufRead + Send;

    fn open(&self) -> io::Result<Self::Reader>;

    /// Human readable identifier, used in logs and error messages.
    fn name(&self) -> Cow<'_, str>;
}

impl GridSource for Path {
    type Reader = BufReader<File>;

    fn open(&self) -> io::Result<Self::Reader> {
        File::open(self).map(BufReader::new)
    }

    fn name(&self) -> Cow<'_, str> {
        self.to_string_lossy()
    }
}

impl GridSource for PathBuf {
    type Reader = BufReader<File>;

    fn open(&self) -> io::Result<Self::Reader> {
        self.as_path().open()
    }

    fn name(&self) -> Cow<'_, str> {
        self.as_path().name()
    }
}

impl<T> GridSource for &T
where
    T: GridSource + ?Sized,
{
    type Reader = T::Reader;

    fn open(&self) -> io::Result<Self::Reader> {
        (**self).open()
    }

    fn name(&self) -> Cow<'_, str> {
        (**self).name()
    }
}

/// A source backed by text held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    pub name: String,
    pub text: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl GridSource for MemorySource {
    type Reader = Cursor<Vec<u8>>;

    fn open(&self) -> io::Result<Self::Reader> {
        Ok(Cursor::new(self.text.clone().into_bytes()))
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}
