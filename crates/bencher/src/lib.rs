/// A request fixture together with the way it is handed to the code under test.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    feed: Feed,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, feed: Feed, file: TestFile) -> Self {
        Self { name, feed, file }
    }

    /// The whole fixture in one call.
    pub fn whole(name: &'static str, file: TestFile) -> Self {
        Self::new(name, Feed::Whole, file)
    }

    /// The fixture in pieces of `size` bytes.
    pub fn chunks(name: &'static str, size: usize, file: TestFile) -> Self {
        Self::new(name, Feed::Chunks(size), file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn file_name(&self) -> &'static str {
        self.file().file_name
    }

    pub fn parts(&self) -> impl Iterator<Item = &'static [u8]> {
        let content = self.file.content().as_bytes();
        let size = match self.feed {
            Feed::Whole => content.len().max(1),
            Feed::Chunks(size) => size.max(1),
        };
        content.chunks(size)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feed {
    Whole,
    Chunks(usize),
}
