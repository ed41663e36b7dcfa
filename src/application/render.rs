use crate::domain::model::book::Book;
use crate::domain::model::catalog::{SearchField, Statistics};

/// 蔵書が空のときの警告文
pub const EMPTY_LIBRARY: &str = "Your library is empty.";
/// 検索結果が0件のときの警告文
pub const NO_MATCHES: &str = "No matching books found.";

/// プログレスバーのセル数
const PROGRESS_CELLS: usize = 20;

/// Catalogの各ビューをMarkdown文字列に変換する。
pub struct LibraryView;

impl LibraryView {
    /// 検索結果などで使う1冊分のカード。
    pub fn render_card(book: &Book) -> String {
        format!(
            "**{}** by {} ({})\nGenre: {} | Status: {}\n",
            book.title(),
            book.author(),
            book.year(),
            book.genre(),
            book.status_label()
        )
    }

    /// 追加直後の確認表示。
    pub fn render_added(book: &Book) -> String {
        format!("Book added successfully!\n\n{}", Self::render_card(book))
    }

    /// 番号付きの蔵書一覧。
    pub fn render_library(listing: &[(usize, &Book)]) -> String {
        if listing.is_empty() {
            return EMPTY_LIBRARY.to_string();
        }

        let mut buf = String::from("# Your Library\n\n");
        for (pos, book) in listing {
            buf.push_str(&format!("## {}. {}\n", pos, book.title()));
            buf.push_str(&format!("**Author:** {}\n", book.author()));
            buf.push_str(&format!(
                "**Year:** {} | **Genre:** {} | **Status:** {}\n",
                book.year(),
                book.genre(),
                book.status_label()
            ));
            buf.push_str("---\n");
        }
        buf
    }

    /// 検索語が空のときの案内（エラーにはしない）。
    pub fn render_search_prompt(field: SearchField) -> String {
        match field {
            SearchField::Title => "Enter a title to search.".to_string(),
            SearchField::Author => "Enter an author to search.".to_string(),
        }
    }

    pub fn render_search_results(results: &[&Book]) -> String {
        if results.is_empty() {
            return NO_MATCHES.to_string();
        }

        let mut buf = String::from("# Matching Books\n\n");
        for book in results {
            buf.push_str(&Self::render_card(book));
            buf.push_str("---\n");
        }
        buf
    }

    pub fn render_statistics(stats: &Statistics) -> String {
        if stats.total == 0 {
            return EMPTY_LIBRARY.to_string();
        }

        format!(
            "# Library Statistics\n\nTotal books: {}\nPercentage read: {:.1}%\n{}\n",
            stats.total,
            stats.percentage_read,
            Self::progress_bar(stats.progress())
        )
    }

    /// `[████░░░░]` 形式のテキストバー。範囲外の値は0〜1に丸める。
    fn progress_bar(fraction: f64) -> String {
        let filled = (fraction.clamp(0.0, 1.0) * PROGRESS_CELLS as f64).round() as usize;
        format!(
            "[{}{}]",
            "█".repeat(filled),
            "░".repeat(PROGRESS_CELLS - filled)
        )
    }
}
