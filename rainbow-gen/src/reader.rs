use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Split};

use crate::error::Error;
use crate::keyspace::Keyspace;

/// One line of the wordlist after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A trimmed, non-empty candidate.
    Word(String),
    /// Empty or whitespace-only.
    Blank,
    /// Not valid UTF-8.
    Undecodable,
}

/// A newline-delimited wordlist, read line by line.
pub struct Wordlist {
    path: PathBuf,
    lines: Split<BufReader<File>>,
}

impl Wordlist {
    pub async fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .await
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        Ok(Self { path: path.to_path_buf(), lines: BufReader::new(file).split(b'\n') })
    }

    /// Returns the next line, or `None` at end of file.
    pub async fn next_line(&mut self) -> Result<Option<Line>, Error> {
        let segment = self
            .lines
            .next_segment()
            .await
            .map_err(|source| Error::Read { path: self.path.clone(), source })?;
        Ok(segment.map(|bytes| classify(&bytes)))
    }
}

/// Where candidate words come from.
pub enum Source {
    Wordlist(Wordlist),
    /// Generated candidates, passed through untrimmed.
    Keyspace(Keyspace),
}

impl Source {
    pub async fn next_line(&mut self) -> Result<Option<Line>, Error> {
        match self {
            Source::Wordlist(wordlist) => wordlist.next_line().await,
            Source::Keyspace(keyspace) => Ok(keyspace.next().map(Line::Word)),
        }
    }
}

/// Trims the line (including a trailing `\r`) and sorts it into a [`Line`].
pub fn classify(bytes: &[u8]) -> Line {
    match std::str::from_utf8(bytes) {
        Ok(text) => match text.trim() {
            "" => Line::Blank,
            word => Line::Word(word.to_string()),
        },
        Err(_) => Line::Undecodable,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(b"password"), Line::Word("password".into()));
        assert_eq!(classify(b"  hunter2 \r"), Line::Word("hunter2".into()));
        assert_eq!(classify(b"two words"), Line::Word("two words".into()));
        assert_eq!(classify(b""), Line::Blank);
        assert_eq!(classify(b" \t\r"), Line::Blank);
        assert_eq!(classify(b"caf\xe9"), Line::Undecodable);
    }

    #[tokio::test]
    async fn test_reads_all_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"foo\r\n\n bar \nbad\xff\nlast").unwrap();
        file.flush().unwrap();

        let mut wordlist = Wordlist::open(file.path()).await.unwrap();
        let mut lines = Vec::new();
        while let Some(line) = wordlist.next_line().await.unwrap() {
            lines.push(line);
        }
        assert_eq!(
            lines,
            vec![
                Line::Word("foo".into()),
                Line::Blank,
                Line::Word("bar".into()),
                Line::Undecodable,
                Line::Word("last".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_keyspace_source() {
        let mut source = Source::Keyspace(Keyspace::new(" a", 1, false).unwrap());
        assert_eq!(source.next_line().await.unwrap(), Some(Line::Word(" ".into())));
        assert_eq!(source.next_line().await.unwrap(), Some(Line::Word("a".into())));
        assert_eq!(source.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = Wordlist::open(Path::new("/nonexistent/words.txt")).await;
        assert!(matches!(result, Err(Error::Read { .. })));
    }
}
