//! File system storage for comments and votes
//!
//! Layout under the base directory:
//!
//! ```text
//! comments/<comment-id>.json
//! votes/<comment-id>/<blake3(author)>.json
//! ```
//!
//! Comments are written to a dot-prefixed temp file and renamed into place.
//! Votes are written to a dot-prefixed temp file and hard-linked to their
//! final name. Linking fails if the name exists, so the file system itself
//! rejects a second vote by the same author on the same comment, and a vote
//! file is never visible before it is complete.

use discuss_core::comment::Comment;
use discuss_core::error::{DiscussError, Result};
use discuss_core::store::CommentStore;
use discuss_core::types::{AuthorId, CommentId, ResourceRef};
use discuss_core::vote::Vote;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Version written into every comment file
pub const STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CommentFile {
    schema_version: u32,
    comment: Comment,
}

/// File system based comment storage
pub struct FileSystemStore {
    base_dir: PathBuf,
    comments_dir: PathBuf,
    votes_dir: PathBuf,
}

impl FileSystemStore {
    /// Open (and create if needed) a store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let store = Self {
            comments_dir: base_dir.join("comments"),
            votes_dir: base_dir.join("votes"),
            base_dir,
        };
        store.ensure_dirs()?;
        Ok(store)
    }

    /// Open the store in the platform data directory
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// Platform data directory, falling back to `~/.discuss`
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("org", "discuss", "discuss")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".discuss")
            })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.comments_dir, &self.votes_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    DiscussError::Io(e).with_context(format!("Failed to create {}", dir.display()))
                })?;
                debug!("Created storage directory: {:?}", dir);
            }
        }
        Ok(())
    }

    fn comment_path(&self, id: &CommentId) -> PathBuf {
        self.comments_dir.join(format!("{}.json", id))
    }

    fn temp_path(&self, id: &CommentId) -> PathBuf {
        self.comments_dir.join(format!(".{}.json.tmp", id))
    }

    fn vote_dir(&self, comment: &CommentId) -> PathBuf {
        self.votes_dir.join(comment.to_string())
    }

    /// Author ids are free-form, so vote files are keyed by their hash
    fn vote_path(&self, comment: &CommentId, author: &AuthorId) -> PathBuf {
        let key = blake3::hash(author.as_str().as_bytes()).to_hex();
        self.vote_dir(comment).join(format!("{}.json", key))
    }

    fn vote_temp_path(&self, vote: &Vote) -> PathBuf {
        self.vote_dir(&vote.comment).join(format!(".{}.json.tmp", vote.id))
    }

    /// Publish a fully written vote file under its final name
    fn link_vote(&self, temp: &Path, path: &Path, vote: &Vote) -> Result<()> {
        match fs::hard_link(temp, path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if read_json::<Vote>(path).is_ok() {
                    return Err(duplicate_vote(vote));
                }
                warn!("Replacing unreadable vote file {:?}", path);
                self.discard_unreadable_vote(path, vote)?;
                fs::hard_link(temp, path).map_err(|e| match e.kind() {
                    ErrorKind::AlreadyExists => duplicate_vote(vote),
                    _ => DiscussError::Io(e),
                })
            }
            Err(e) => Err(DiscussError::Io(e)),
        }
    }

    /// Move an unreadable vote file aside. A concurrent writer may have
    /// replaced it first; a readable vote found aside is put back.
    fn discard_unreadable_vote(&self, path: &Path, vote: &Vote) -> Result<()> {
        let aside = self.vote_dir(&vote.comment).join(format!(".{}.json.bad", vote.id));
        match fs::rename(path, &aside) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(DiscussError::Io(e)),
        }

        let restored = read_json::<Vote>(&aside).is_ok();
        if restored {
            let _ = fs::hard_link(&aside, path);
        }
        let _ = fs::remove_file(&aside);
        if restored {
            return Err(duplicate_vote(vote));
        }
        Ok(())
    }

    fn read_comment_file(&self, path: &Path) -> Result<Comment> {
        let file: CommentFile = read_json(path)?;
        if file.schema_version > STORE_SCHEMA_VERSION {
            return Err(DiscussError::Storage(format!(
                "{} has schema version {}, newest supported is {}",
                path.display(),
                file.schema_version,
                STORE_SCHEMA_VERSION
            )));
        }
        Ok(file.comment)
    }

    /// Every readable comment; unreadable files are logged and skipped
    fn scan_comments(&self) -> Result<Vec<Comment>> {
        let mut comments = Vec::new();
        for path in json_files(&self.comments_dir)? {
            match self.read_comment_file(&path) {
                Ok(comment) => comments.push(comment),
                Err(e) => warn!("Failed to read comment file {:?}: {}", path, e),
            }
        }
        Ok(comments)
    }
}

impl CommentStore for FileSystemStore {
    fn insert_comment(&self, comment: &Comment) -> Result<()> {
        let final_path = self.comment_path(&comment.id);
        if final_path.exists() {
            return Err(DiscussError::Storage(format!(
                "Comment with ID {} already exists",
                comment.id
            )));
        }

        let temp_path = self.temp_path(&comment.id);
        let file = CommentFile {
            schema_version: STORE_SCHEMA_VERSION,
            comment: comment.clone(),
        };
        write_json(&temp_path, &file)?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            DiscussError::Io(e).with_context("Failed to move comment file into place")
        })?;

        debug!("Saved comment {} to {:?}", comment.id, final_path);
        Ok(())
    }

    fn get_comment(&self, id: &CommentId) -> Result<Comment> {
        let path = self.comment_path(id);
        if !path.exists() {
            return Err(DiscussError::CommentNotFound(id.to_string()));
        }
        self.read_comment_file(&path)
    }

    fn children_of(&self, id: &CommentId) -> Result<Vec<Comment>> {
        Ok(self
            .scan_comments()?
            .into_iter()
            .filter(|c| c.parent_id() == Some(id))
            .collect())
    }

    fn comments_under_roots(&self, roots: &[ResourceRef]) -> Result<Vec<Comment>> {
        Ok(self
            .scan_comments()?
            .into_iter()
            .filter(|c| roots.contains(&c.root_commentable))
            .collect())
    }

    fn insert_vote(&self, vote: &Vote) -> Result<()> {
        let dir = self.vote_dir(&vote.comment);
        fs::create_dir_all(&dir)?;

        let path = self.vote_path(&vote.comment, &vote.author);
        let temp_path = self.vote_temp_path(vote);
        let linked =
            write_json(&temp_path, vote).and_then(|()| self.link_vote(&temp_path, &path, vote));
        let _ = fs::remove_file(&temp_path);
        linked?;

        debug!("Saved vote {} to {:?}", vote.id, path);
        Ok(())
    }

    fn votes_for(&self, comment: &CommentId) -> Result<Vec<Vote>> {
        let dir = self.vote_dir(comment);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut votes = Vec::new();
        for path in json_files(&dir)? {
            match read_json::<Vote>(&path) {
                Ok(vote) => votes.push(vote),
                Err(e) => warn!("Failed to read vote file {:?}: {}", path, e),
            }
        }
        Ok(votes)
    }

    fn find_vote(&self, comment: &CommentId, author: &AuthorId) -> Result<Option<Vote>> {
        let path = self.vote_path(comment, author);
        if !path.exists() {
            return Ok(None);
        }
        match read_json(&path) {
            Ok(vote) => Ok(Some(vote)),
            Err(e) => {
                warn!("Failed to read vote file {:?}: {}", path, e);
                Ok(None)
            }
        }
    }

    fn comment_exists(&self, id: &CommentId) -> bool {
        self.comment_path(id).exists()
    }
}

/// Visible `.json` files of a directory, skipping temp and other files
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        DiscussError::Io(e).with_context(format!("Failed to read {}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        let is_json = path.extension().is_some_and(|e| e == "json");
        let is_hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if is_json && !is_hidden {
            files.push(path);
        }
    }
    Ok(files)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn duplicate_vote(vote: &Vote) -> DiscussError {
    DiscussError::DuplicateVote {
        comment: vote.comment.to_string(),
        author: vote.author.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discuss_core::comment::{Alignment, Placement};
    use discuss_core::vote::{VoteLedger, VoteWeight};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_store() -> (FileSystemStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    fn proposal() -> ResourceRef {
        ResourceRef::new("proposal", "1")
    }

    fn root_comment(author: &str) -> Comment {
        Comment::new(
            "Top level",
            AuthorId::from_string(author),
            Placement::under_resource(proposal()),
            Alignment::InFavor,
        )
    }

    #[test]
    fn test_store_creation() {
        let (store, temp) = create_test_store();
        assert_eq!(store.base_dir(), temp.path());
        assert!(temp.path().join("comments").is_dir());
        assert!(temp.path().join("votes").is_dir());
    }

    #[test]
    fn test_insert_and_get_comment() {
        let (store, _temp) = create_test_store();
        let comment = root_comment("alice");

        store.insert_comment(&comment).unwrap();
        assert!(store.comment_exists(&comment.id));
        assert_eq!(store.get_comment(&comment.id).unwrap(), comment);
    }

    #[test]
    fn test_get_missing_comment() {
        let (store, _temp) = create_test_store();
        let result = store.get_comment(&CommentId::new());
        assert!(matches!(result, Err(DiscussError::CommentNotFound(_))));
    }

    #[test]
    fn test_duplicate_comment_id_rejected() {
        let (store, _temp) = create_test_store();
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();
        assert!(matches!(
            store.insert_comment(&comment),
            Err(DiscussError::Storage(_))
        ));
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let (store, _temp) = create_test_store();
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();

        assert!(!store.temp_path(&comment.id).exists());
        let content = fs::read_to_string(store.comment_path(&comment.id)).unwrap();
        assert!(content.contains("schema_version"));
        assert!(content.contains(&comment.id.to_string()));
    }

    #[test]
    fn test_children_and_roots() {
        let (store, _temp) = create_test_store();
        let root = root_comment("alice");
        let reply = Comment::new(
            "Reply",
            AuthorId::from_string("bob"),
            Placement::under_comment(&root),
            Alignment::Neutral,
        );
        let elsewhere = Comment::new(
            "Other thread",
            AuthorId::from_string("carol"),
            Placement::under_resource(ResourceRef::new("proposal", "2")),
            Alignment::Neutral,
        );
        for c in [&root, &reply, &elsewhere] {
            store.insert_comment(c).unwrap();
        }

        let children = store.children_of(&root.id).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, reply.id);
        assert_eq!(children[0].depth, 1);

        let under = store.comments_under_roots(&[proposal()]).unwrap();
        assert_eq!(under.len(), 2);
        assert!(under.iter().all(|c| c.root_commentable == proposal()));
    }

    #[test]
    fn test_duplicate_vote_rejected() {
        let (store, _temp) = create_test_store();
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();

        let bob = AuthorId::from_string("bob");
        store
            .insert_vote(&Vote::new(comment.id.clone(), bob.clone(), VoteWeight::Up))
            .unwrap();
        let second = store.insert_vote(&Vote::new(comment.id.clone(), bob.clone(), VoteWeight::Down));
        assert!(second.unwrap_err().is_duplicate_vote());

        let votes = store.votes_for(&comment.id).unwrap();
        assert_eq!(votes.len(), 1);
        assert!(votes[0].is_up());
        assert!(store.find_vote(&comment.id, &bob).unwrap().is_some());
        assert!(store
            .find_vote(&comment.id, &AuthorId::from_string("carol"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_concurrent_votes_single_winner() {
        let (store, _temp) = create_test_store();
        let store = Arc::new(store);
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = comment.id.clone();
                std::thread::spawn(move || {
                    store
                        .insert_vote(&Vote::new(id, AuthorId::from_string("bob"), VoteWeight::Up))
                        .is_ok()
                })
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.votes_for(&comment.id).unwrap().len(), 1);
    }

    #[test]
    fn test_vote_write_leaves_no_temp_file() {
        let (store, _temp) = create_test_store();
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();

        let vote = Vote::new(comment.id.clone(), AuthorId::from_string("bob"), VoteWeight::Up);
        store.insert_vote(&vote).unwrap();

        let names: Vec<_> = fs::read_dir(store.vote_dir(&comment.id))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(!names[0].starts_with('.'));
        assert!(!store.vote_temp_path(&vote).exists());
    }

    #[test]
    fn test_stale_temp_file_does_not_block_vote() {
        let (store, _temp) = create_test_store();
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();

        let dir = store.vote_dir(&comment.id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(".interrupted.json.tmp"), "{\"weig").unwrap();

        store
            .insert_vote(&Vote::new(comment.id.clone(), AuthorId::from_string("bob"), VoteWeight::Up))
            .unwrap();
        assert_eq!(store.votes_for(&comment.id).unwrap().len(), 1);
    }

    #[test]
    fn test_unreadable_vote_file_counts_as_absent() {
        let (store, _temp) = create_test_store();
        let store = Arc::new(store);
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();

        let bob = AuthorId::from_string("bob");
        fs::create_dir_all(store.vote_dir(&comment.id)).unwrap();
        for content in ["", "{\"id\": "] {
            fs::write(store.vote_path(&comment.id, &bob), content).unwrap();
            assert!(store.find_vote(&comment.id, &bob).unwrap().is_none());
            assert!(store.votes_for(&comment.id).unwrap().is_empty());
        }

        let ledger = VoteLedger::new(store.clone());
        assert!(!ledger.has_up_voted(&comment.id, &bob).unwrap());
        ledger.cast_vote(&comment.id, bob.clone(), 1).unwrap();
        assert!(ledger.has_up_voted(&comment.id, &bob).unwrap());
        assert_eq!(ledger.up_vote_count(&comment.id).unwrap(), 1);

        let again = ledger.cast_vote(&comment.id, bob.clone(), -1);
        assert!(again.unwrap_err().is_duplicate_vote());
        let names: Vec<_> = fs::read_dir(store.vote_dir(&comment.id))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_votes_for_unvoted_comment() {
        let (store, _temp) = create_test_store();
        assert!(store.votes_for(&CommentId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_ignores_temp_and_non_json_files() {
        let (store, temp) = create_test_store();
        fs::write(temp.path().join("comments").join(".temp.json.tmp"), "{}").unwrap();
        fs::write(temp.path().join("comments").join("readme.txt"), "test").unwrap();
        assert!(store.comments_under_roots(&[proposal()]).unwrap().is_empty());
    }

    #[test]
    fn test_skips_corrupt_comment_files() {
        let (store, temp) = create_test_store();
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();
        fs::write(temp.path().join("comments").join("broken.json"), "not json").unwrap();

        let under = store.comments_under_roots(&[proposal()]).unwrap();
        assert_eq!(under.len(), 1);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let (store, _temp) = create_test_store();
        let comment = root_comment("alice");
        store.insert_comment(&comment).unwrap();

        let path = store.comment_path(&comment.id);
        let content = fs::read_to_string(&path)
            .unwrap()
            .replace("\"schema_version\": 1", "\"schema_version\": 99");
        fs::write(&path, content).unwrap();

        assert!(matches!(
            store.get_comment(&comment.id),
            Err(DiscussError::Storage(_))
        ));
    }
}
