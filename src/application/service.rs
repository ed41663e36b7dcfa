use crate::domain::model::book::{AddBookRequest, Book};
use crate::domain::model::catalog::{Catalog, SearchField, Statistics};
use crate::domain::repository::CatalogRepository;

use super::error::AppError;

/// 削除操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// 蔵書が空のため何もしなかった（警告扱い）
    EmptyLibrary,
    /// 削除した冊数（0もあり得る）
    Removed(usize),
}

impl RemoveOutcome {
    pub fn count(&self) -> usize {
        match self {
            RemoveOutcome::EmptyLibrary => 0,
            RemoveOutcome::Removed(n) => *n,
        }
    }
}

/// Catalogに対するユースケース。
///
/// 起動時に一度だけloadし、以降はメモリ上のCatalogを正とする。
/// 変更系は複製に適用 → save → 成功時のみ反映、の順で行うため、
/// 保存に失敗してもメモリとファイルはずれない。
pub struct LibraryService<R: CatalogRepository> {
    repo: R,
    catalog: Catalog,
}

impl<R: CatalogRepository> LibraryService<R> {
    /// 保存済みCatalogを読み込んでServiceを作る。
    pub fn open(repo: R) -> Result<Self, AppError> {
        let catalog = repo.load().map_err(|e| AppError::Storage(Box::new(e)))?;
        tracing::info!(books = catalog.len(), "library opened");
        Ok(Self { repo, catalog })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 本を末尾に追加して永続化する。
    pub fn add_book(&mut self, req: AddBookRequest) -> Result<Book, AppError> {
        let mut staged = self.catalog.clone();
        let book = staged.add(req)?.clone();
        self.commit(staged)?;
        tracing::info!(title = book.title(), author = book.author(), "book added");
        Ok(book)
    }

    /// タイトル完全一致の本を全て削除して永続化する。
    pub fn remove_book(&mut self, title: &str) -> Result<RemoveOutcome, AppError> {
        if self.catalog.is_empty() {
            tracing::debug!("remove requested on empty library");
            return Ok(RemoveOutcome::EmptyLibrary);
        }
        let mut staged = self.catalog.clone();
        let removed = staged.remove_by_title(title);
        self.commit(staged)?;
        tracing::info!(title, removed, "books removed");
        Ok(RemoveOutcome::Removed(removed))
    }

    pub fn search(&self, term: &str, field: SearchField) -> Vec<&Book> {
        self.catalog.search(term, field)
    }

    pub fn list_all(&self) -> Vec<(usize, &Book)> {
        self.catalog.list_all()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.catalog.titles()
    }

    pub fn statistics(&self) -> Statistics {
        self.catalog.statistics()
    }

    // --- private ---

    fn commit(&mut self, staged: Catalog) -> Result<(), AppError> {
        self.repo
            .save(&staged)
            .map_err(|e| AppError::Storage(Box::new(e)))?;
        self.catalog = staged;
        Ok(())
    }
}
