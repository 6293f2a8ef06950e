use sqlx::AnyPool;

pub trait Context: Sync + Send {
    fn db(&self) -> &AnyPool;
}
