//! JSONL storage for posts
//!
//! Posts are stored in `.loopsmith/posts.jsonl` with one JSON object per line.
//! Uses file locking for concurrent access safety. When an id appears on more
//! than one line, the last line wins.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::{Post, PostId, PostQuery};
use crate::engine::{apply_query, PostSource};

use super::config::SITE_DIR;

/// Store for post data in JSONL format
#[derive(Debug, Clone)]
pub struct PostStore {
    path: PathBuf,
}

impl PostStore {
    /// Creates a new post store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a site
    pub fn for_site(site_root: &Path) -> Self {
        Self::new(site_root.join(SITE_DIR).join("posts.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all posts, ordered by id
    pub fn read_all(&self) -> Result<Vec<Post>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open post store: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on post store")?;

        let reader = BufReader::new(&file);
        let mut posts = BTreeMap::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let post: Post = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse post at line {}", line_num + 1))?;

            posts.insert(post.id, post);
        }

        Ok(posts.into_values().collect())
    }

    /// Appends a single post without rewriting the file
    pub fn append(&self, post: &Post) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open post store: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on post store")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(post).context("Failed to serialize post")?;
        writeln!(writer, "{}", line).context("Failed to write post")?;

        writer.flush().context("Failed to flush post store")?;

        Ok(())
    }

    /// Next unused id (ids start at 1)
    pub fn next_id(&self) -> Result<PostId> {
        let max = self.read_all()?.iter().map(|post| post.id).max();
        Ok(max.map_or(1, |id| id + 1))
    }
}

impl PostSource for PostStore {
    fn query(&self, query: &PostQuery) -> Result<Vec<Post>> {
        Ok(apply_query(self.read_all()?, query))
    }

    fn get(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.read_all()?.into_iter().find(|post| post.id == id))
    }

    fn sticky_ids(&self) -> Result<Vec<PostId>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|post| post.sticky)
            .map(|post| post.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> PostStore {
        PostStore::new(dir.path().join("posts.jsonl"))
    }

    fn make_post(id: PostId) -> Post {
        Post::new(id, format!("Post {}", id))
            .with_date(Utc.with_ymd_and_hms(2024, 1, id as u32, 8, 0, 0).unwrap())
    }

    #[test]
    fn read_empty_store() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).read_all().unwrap().is_empty());
        assert_eq!(store(&dir).next_id().unwrap(), 1);
    }

    #[test]
    fn read_orders_by_id() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append(&make_post(2)).unwrap();
        store.append(&make_post(1)).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "Post 1");
        assert_eq!(loaded[1].title, "Post 2");
    }

    #[test]
    fn append_and_next_id() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append(&make_post(1)).unwrap();
        store.append(&make_post(5)).unwrap();

        assert_eq!(store.read_all().unwrap().len(), 2);
        assert_eq!(store.next_id().unwrap(), 6);
    }

    #[test]
    fn later_lines_win() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append(&make_post(1)).unwrap();
        store.append(&make_post(1).sticky()).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].sticky);
        assert_eq!(store.sticky_ids().unwrap(), vec![1]);
    }

    #[test]
    fn skips_blank_lines_and_reports_bad_ones() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.append(&make_post(1)).unwrap();

        let mut content = fs::read_to_string(store.path()).unwrap();
        content.push_str("\n\n");
        fs::write(store.path(), &content).unwrap();
        assert_eq!(store.read_all().unwrap().len(), 1);

        content.push_str("{not json\n");
        fs::write(store.path(), &content).unwrap();
        let err = store.read_all().unwrap_err();
        assert!(format!("{:#}", err).contains("line 4"));
    }

    #[test]
    fn serves_as_post_source() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        for post in [make_post(1), make_post(2).sticky(), make_post(3)] {
            store.append(&post).unwrap();
        }

        let newest_first = store
            .query(&PostQuery {
                ignore_sticky_posts: true,
                ..Default::default()
            })
            .unwrap();
        let ids: Vec<_> = newest_first.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        assert_eq!(store.sticky_ids().unwrap(), vec![2]);
        assert_eq!(store.get(3).unwrap().map(|p| p.id), Some(3));
        assert!(store.get(9).unwrap().is_none());
    }
}
