use serde::{Deserialize, Serialize};

use super::book::{AddBookRequest, Book};
use crate::domain::error::DomainError;

/// 検索対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => book.title(),
            SearchField::Author => book.author(),
        }
    }
}

/// 蔵書統計
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub read_count: usize,
    /// 0.0〜100.0。蔵書0冊なら0.0
    pub percentage_read: f64,
}

impl Statistics {
    /// 0.0〜1.0 の読了率（プログレスバー用）
    pub fn progress(&self) -> f64 {
        self.percentage_read / 100.0
    }
}

/// Catalog — 集約ルート。挿入順を保持する本の列。
///
/// ファイル上はBookの配列そのものとして表現される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 末尾に追加し、追加したBookを返す。
    pub fn add(&mut self, req: AddBookRequest) -> Result<&Book, DomainError> {
        let book = Book::from_request(req)?;
        self.books.push(book);
        Ok(&self.books[self.books.len() - 1])
    }

    /// タイトルが完全一致（大文字小文字を区別）する本を全て削除し、削除数を返す。
    pub fn remove_by_title(&mut self, title: &str) -> usize {
        let before = self.books.len();
        self.books.retain(|book| book.title() != title);
        before - self.books.len()
    }

    /// 大文字小文字を無視した部分一致。結果はCatalog順。
    pub fn search(&self, term: &str, field: SearchField) -> Vec<&Book> {
        let query = term.to_lowercase();
        self.books
            .iter()
            .filter(|book| field.value_of(book).to_lowercase().contains(&query))
            .collect()
    }

    /// (1始まりの位置, Book) の一覧
    pub fn list_all(&self) -> Vec<(usize, &Book)> {
        self.books
            .iter()
            .enumerate()
            .map(|(i, book)| (i + 1, book))
            .collect()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(|book| book.title()).collect()
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.books.len();
        let read_count = self.books.iter().filter(|book| book.is_read()).count();
        let percentage_read = if total == 0 {
            0.0
        } else {
            read_count as f64 / total as f64 * 100.0
        };
        Statistics {
            total,
            read_count,
            percentage_read,
        }
    }
}

impl From<Vec<Book>> for Catalog {
    fn from(books: Vec<Book>) -> Self {
        Self { books }
    }
}
