// LOC cache record format.
// One whitespace-separated line per repository, preceded by an opaque comment block.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::{Result, StatsError};

/// Lines reserved at the top of a cache file for free-form comments.
pub const COMMENT_BLOCK_LINES: usize = 7;

/// Number of fields in a record line.
const RECORD_FIELDS: usize = 5;

/// Hex SHA-256 digest of an identity string (repository `owner/name` or login).
pub fn digest(identity: &str) -> String {
    hex::encode(Sha256::digest(identity.as_bytes()))
}

/// Cached LOC contribution of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Digest of the repository's `owner/name`.
    pub repo_hash: String,
    /// Default-branch commit count when the record was computed.
    pub fingerprint: u64,
    pub my_commits: u64,
    pub additions: u64,
    pub deletions: u64,
}

impl CacheRecord {
    /// Zero-valued record bound to a repository digest.
    pub fn placeholder(repo_hash: impl Into<String>) -> Self {
        Self {
            repo_hash: repo_hash.into(),
            fingerprint: 0,
            my_commits: 0,
            additions: 0,
            deletions: 0,
        }
    }

    /// Zero-valued record whose digest matches no repository.
    pub fn corrupt() -> Self {
        Self::placeholder("0".repeat(64))
    }

    /// Parse a record line. `line_no` is 1-based and only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let corrupt = |reason: String| StatsError::CacheCorruption {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != RECORD_FIELDS {
            return Err(corrupt(format!(
                "expected {} fields, found {}",
                RECORD_FIELDS,
                fields.len()
            )));
        }
        if !fields[0].chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(corrupt(format!("invalid digest {:?}", fields[0])));
        }

        let number = |idx: usize| -> Result<u64> {
            fields[idx]
                .parse()
                .map_err(|_| corrupt(format!("invalid number {:?}", fields[idx])))
        };

        Ok(Self {
            repo_hash: fields[0].to_string(),
            fingerprint: number(1)?,
            my_commits: number(2)?,
            additions: number(3)?,
            deletions: number(4)?,
        })
    }
}

impl fmt::Display for CacheRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.repo_hash, self.fingerprint, self.my_commits, self.additions, self.deletions
        )
    }
}

/// Ordered record set plus the comment block preserved across rewrites.
///
/// Equality ignores the original line text kept for rendering.
#[derive(Debug, Clone, Default)]
pub struct CacheFile {
    pub comments: Vec<String>,
    pub records: Vec<CacheRecord>,
    /// Record lines as read, by position, without their `\n`.
    source_lines: Vec<String>,
}

impl PartialEq for CacheFile {
    fn eq(&self, other: &Self) -> bool {
        self.comments == other.comments && self.records == other.records
    }
}

impl Eq for CacheFile {}

impl CacheFile {
    /// Empty cache carrying a freshly generated comment block.
    pub fn new() -> Self {
        Self {
            comments: default_comment_block(COMMENT_BLOCK_LINES),
            ..Self::default()
        }
    }

    /// Parse file contents. Corrupt lines become zero-valued records; their
    /// errors are returned alongside so the caller can report them.
    pub fn parse(text: &str, comment_lines: usize) -> (Self, Vec<StatsError>) {
        let mut file = Self::default();
        let mut problems = Vec::new();

        let lines = text
            .split_inclusive('\n')
            .map(|line| line.strip_suffix('\n').unwrap_or(line));
        for (idx, line) in lines.enumerate() {
            if idx < comment_lines {
                file.comments.push(line.to_string());
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            file.source_lines.push(line.to_string());
            match CacheRecord::parse(line, idx + 1) {
                Ok(record) => file.records.push(record),
                Err(err) => {
                    problems.push(err);
                    file.records.push(CacheRecord::corrupt());
                }
            }
        }
        // Records always start after the full block.
        while file.comments.len() < comment_lines {
            file.comments.push("#".to_string());
        }

        (file, problems)
    }

    /// Serialize to the on-disk text form.
    ///
    /// Comment lines and any record line whose values did not change are
    /// written back exactly as read (including `\r`). Blank lines between
    /// records are dropped and every line ends with `\n`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.comments {
            out.push_str(line);
            out.push('\n');
        }
        for (idx, record) in self.records.iter().enumerate() {
            match self.source_lines.get(idx) {
                Some(line) if CacheRecord::parse(line, idx + 1).is_ok_and(|r| r == *record) => {
                    out.push_str(line);
                }
                _ => out.push_str(&record.to_string()),
            }
            out.push('\n');
        }
        out
    }
}

/// Comment block written into new cache files.
pub fn default_comment_block(lines: usize) -> Vec<String> {
    let text = [
        "# readme-stats lines-of-code cache. Edit freely above the records.",
        "# Records follow this block in repository enumeration order:",
        "# <sha256(owner/name)> <commit count> <my commits> <additions> <deletions>",
    ];
    (0..lines)
        .map(|i| text.get(i).copied().unwrap_or("#").to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_sha256_hex() {
        assert_eq!(
            digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parse_record() {
        let record = CacheRecord::parse("ab12 5 3 10 2", 8).unwrap();
        assert_eq!(record.repo_hash, "ab12");
        assert_eq!(record.fingerprint, 5);
        assert_eq!(record.my_commits, 3);
        assert_eq!(record.additions, 10);
        assert_eq!(record.deletions, 2);
        assert_eq!(record.to_string(), "ab12 5 3 10 2");
    }

    #[test]
    fn test_parse_record_rejects_bad_lines() {
        let err = CacheRecord::parse("ab12 5 3 10", 9).unwrap_err();
        assert!(matches!(err, StatsError::CacheCorruption { line: 9, .. }));

        let err = CacheRecord::parse("ab12 5 x 10 2", 9).unwrap_err();
        assert!(matches!(err, StatsError::CacheCorruption { .. }));

        let err = CacheRecord::parse("zz12 5 3 10 2", 9).unwrap_err();
        assert!(matches!(err, StatsError::CacheCorruption { .. }));
    }

    #[test]
    fn test_file_round_trip_is_byte_identical() {
        let mut text = String::new();
        for i in 0..COMMENT_BLOCK_LINES {
            text.push_str(&format!("comment {}\n", i));
        }
        text.push_str(&format!("{} 5 5 10 2\n", digest("A/r1")));
        text.push_str(&format!("{} 3 3 4 1\n", digest("A/r2")));

        let (file, problems) = CacheFile::parse(&text, COMMENT_BLOCK_LINES);
        assert!(problems.is_empty());
        assert_eq!(file.comments.len(), COMMENT_BLOCK_LINES);
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.render(), text);
    }

    #[test]
    fn test_non_canonical_lines_round_trip() {
        let text = format!(
            "comment one\r\ncomment two\r\n{}  0005 5\t10 2\r\n{} 3 3 4 1\n",
            digest("A/r1"),
            digest("A/r2")
        );
        let (file, problems) = CacheFile::parse(&text, 2);
        assert!(problems.is_empty());
        assert_eq!(file.comments, vec!["comment one\r", "comment two\r"]);
        assert_eq!(file.records[0].fingerprint, 5);
        assert_eq!(file.render(), text);
    }

    #[test]
    fn test_changed_record_is_rewritten_canonically() {
        let text = format!("c\n{}  0005 5 10 2\n", digest("A/r1"));
        let (mut file, _) = CacheFile::parse(&text, 1);
        file.records[0].additions = 11;
        assert_eq!(file.render(), format!("c\n{} 5 5 11 2\n", digest("A/r1")));
    }

    #[test]
    fn test_corrupt_line_recovers_as_zero_record() {
        let text = "c\nabc 1 2 3 4\ngarbage\n";
        let (file, problems) = CacheFile::parse(text, 1);
        assert_eq!(problems.len(), 1);
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.records[1], CacheRecord::corrupt());
        assert_eq!(file.records[1].fingerprint, 0);
    }

    #[test]
    fn test_short_file_pads_comment_block() {
        let (file, problems) = CacheFile::parse("only\n", 3);
        assert!(problems.is_empty());
        assert_eq!(file.comments, vec!["only", "#", "#"]);
    }

    #[test]
    fn test_new_file_has_comment_block() {
        let file = CacheFile::new();
        assert_eq!(file.comments.len(), COMMENT_BLOCK_LINES);
        assert!(file.records.is_empty());
        let (reparsed, _) = CacheFile::parse(&file.render(), COMMENT_BLOCK_LINES);
        assert_eq!(reparsed, file);
    }
}
