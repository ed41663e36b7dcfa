use super::model::catalog::Catalog;

/// 永続化の抽象。Infra層が実装する。
pub trait CatalogRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// 保存済みCatalogを読み込む。未保存なら空のCatalogを返す。
    fn load(&self) -> Result<Catalog, Self::Error>;
    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error>;
}
