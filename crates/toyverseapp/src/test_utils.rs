use crate::api::ToyverseApi;
use crate::auth::LocalAuth;
use crate::storage::FsStorage;
use crate::store::fs::FileStore;
use std::path::PathBuf;
use tempfile::TempDir;

pub const OWNER_EMAIL: &str = "owner@toyverse.local";
pub const OWNER_PASSWORD: &str = "secret";

/// A file-backed catalog in a temporary directory, signed in as the owner.
pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub api: ToyverseApi<FileStore, FsStorage, LocalAuth>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let mut api = ToyverseApi::new(
            FileStore::open(root.join("toys.json")),
            FsStorage::new(root.join("images")),
            LocalAuth::new().with_account(OWNER_EMAIL, OWNER_PASSWORD),
        );
        api.sign_in(OWNER_EMAIL, OWNER_PASSWORD)
            .expect("failed to sign in");
        Self {
            _temp_dir: temp_dir,
            api,
            root,
        }
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join("toys.json")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }
}
