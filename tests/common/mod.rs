//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use library_mcp::application::service::LibraryService;
use library_mcp::domain::model::book::{AddBookRequest, Book};
use library_mcp::domain::model::catalog::Catalog;
use library_mcp::domain::repository::CatalogRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error: writes disabled")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。
/// 状態はRcで共有するため、Serviceに渡した後もテスト側から中身を覗ける。
#[derive(Clone, Default)]
pub struct InMemoryRepo {
    stored: Rc<RefCell<Option<String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降のsaveを失敗させる（書き込み不能メディアの模擬）。
    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }

    /// 最後に保存されたCatalog
    pub fn stored(&self) -> Option<Catalog> {
        self.stored
            .borrow()
            .as_ref()
            .map(|json| serde_json::from_str(json).unwrap())
    }
}

impl CatalogRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        Ok(self.stored().unwrap_or_default())
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(InMemoryError);
        }
        let json = serde_json::to_string(catalog).unwrap();
        *self.stored.borrow_mut() = Some(json);
        Ok(())
    }
}

// =============================================================================
// TestLibrary — テスト用蔵書作成ヘルパー
// =============================================================================

pub fn request(title: &str, author: &str, year: i64, genre: &str, read: bool) -> AddBookRequest {
    AddBookRequest {
        title: title.into(),
        author: author.into(),
        year,
        genre: genre.into(),
        read,
    }
}

pub struct TestLibrary;

impl TestLibrary {
    /// 標準的なテスト用蔵書（4冊、既読1冊）:
    /// ```text
    /// 1. Dune            — Frank Herbert (1965, Sci-Fi)  read
    /// 2. Neuromancer     — William Gibson (1984, Cyberpunk)
    /// 3. Dune Messiah    — Frank Herbert (1969, Sci-Fi)
    /// 4. Pride and Prejudice — Jane Austen (1813, Classic)
    /// ```
    pub fn standard() -> Catalog {
        Catalog::from(vec![
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
            Book::new("Neuromancer", "William Gibson", 1984, "Cyberpunk", false),
            Book::new("Dune Messiah", "Frank Herbert", 1969, "Sci-Fi", false),
            Book::new("Pride and Prejudice", "Jane Austen", 1813, "Classic", false),
        ])
    }

    /// InMemoryRepoにCatalogを保存してLibraryServiceを返す。
    pub fn service_with(catalog: &Catalog) -> (LibraryService<InMemoryRepo>, InMemoryRepo) {
        let repo = InMemoryRepo::new();
        repo.save(catalog).unwrap();
        let svc = LibraryService::open(repo.clone()).unwrap();
        (svc, repo)
    }

    pub fn empty_service() -> (LibraryService<InMemoryRepo>, InMemoryRepo) {
        Self::service_with(&Catalog::new())
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}

pub fn titles(catalog: &Catalog) -> Vec<String> {
    catalog.titles().into_iter().map(String::from).collect()
}
