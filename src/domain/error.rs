#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("year {0} out of range (0-2100)")]
    YearOutOfRange(i64),
}
