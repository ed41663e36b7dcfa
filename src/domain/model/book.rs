use serde::{de, Deserialize, Deserializer, Serialize};

use crate::domain::error::DomainError;

/// 出版年の下限（入力フォームの範囲）
pub const MIN_YEAR: i64 = 0;
/// 出版年の上限（入力フォームの範囲）
pub const MAX_YEAR: i64 = 2100;

/// 本の追加リクエスト。空タイトルや重複はそのまま受け付ける。
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
    pub read: bool,
}

/// 蔵書1冊分のレコード。タイトルが事実上のキー（一意性は保証しない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    #[serde(deserialize_with = "deserialize_year")]
    year: u16,
    genre: String,
    read: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: u16,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    /// リクエストから生成する。年はフォームの範囲に収まる整数へ変換する。
    pub fn from_request(req: AddBookRequest) -> Result<Self, DomainError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&req.year) {
            return Err(DomainError::YearOutOfRange(req.year));
        }
        let year = u16::try_from(req.year).map_err(|_| DomainError::YearOutOfRange(req.year))?;
        Ok(Self::new(req.title, req.author, year, req.genre, req.read))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    /// 表示用の読了ステータス
    pub fn status_label(&self) -> &'static str {
        if self.read {
            "✓ Read"
        } else {
            "✗ Unread"
        }
    }
}

/// 保存済みの年を読む。`1965.0` のような整数値の浮動小数も受け付ける。
fn deserialize_year<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredYear {
        Int(u16),
        Float(f64),
    }

    match StoredYear::deserialize(deserializer)? {
        StoredYear::Int(year) => Ok(year),
        StoredYear::Float(year)
            if year.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&year) =>
        {
            Ok(year as u16)
        }
        StoredYear::Float(year) => Err(de::Error::custom(format!("invalid year: {year}"))),
    }
}
